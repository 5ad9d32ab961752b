// src/table/mod.rs
//
// Generic search / sort / paginate over an already-fetched row set. Rows are
// mirrored once into `serde_json::Value` so key paths ("campaign.campaign_name")
// resolve uniformly across the loosely-shaped joined rows the backend returns.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

/// Table parameters as they arrive on the query string.
#[derive(Debug, Default, Deserialize)]
pub struct TableParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>, // "asc" | "desc"
    pub page: Option<usize>,
}

/// One page of rows plus the pagination bookkeeping the UI renders.
#[derive(Debug, Serialize)]
pub struct TablePage<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub start_index: usize,
    pub end_index: usize,
}

pub struct TableController<T> {
    rows: Vec<T>,
    mirror: Vec<Value>,
    search_fields: Vec<String>,
    page_size: usize,
    query: String,
    sort: Option<SortConfig>,
    page: usize,
}

impl<T: Serialize + Clone> TableController<T> {
    pub fn new(rows: Vec<T>, search_fields: &[&str], page_size: usize) -> Self {
        let mirror = rows
            .iter()
            .map(|row| serde_json::to_value(row).unwrap_or(Value::Null))
            .collect();
        Self {
            rows,
            mirror,
            search_fields: search_fields.iter().map(|f| f.to_string()).collect(),
            page_size: page_size.max(1),
            query: String::new(),
            sort: None,
            page: 1,
        }
    }

    /// Case-insensitive substring search across the configured fields.
    /// Resets to the first page.
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.page = 1;
    }

    /// Sorts by `key` (one `.` level of nesting supported). Selecting the
    /// current key flips direction; a new key starts ascending. Resets to
    /// the first page.
    pub fn sort(&mut self, key: &str) {
        let direction = match &self.sort {
            Some(current) if current.key == key && current.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        self.sort = Some(SortConfig { key: key.to_string(), direction });
        self.page = 1;
    }

    /// Moves to page `n`. Out-of-range requests are ignored rather than
    /// clamped; the existing UI depends on the no-op.
    pub fn page(&mut self, n: usize) {
        if n >= 1 && n <= self.total_pages() {
            self.page = n;
        }
    }

    /// Applies query-string parameters in search → sort → page order, so the
    /// page request lands on the already-filtered result.
    pub fn apply(&mut self, params: &TableParams) {
        if let Some(q) = &params.q {
            self.search(q);
        }
        if let Some(key) = &params.sort {
            self.sort(key);
            if params.dir.as_deref() == Some("desc") {
                self.sort(key); // second select of the same key flips to desc
            }
        }
        if let Some(n) = params.page {
            self.page(n);
        }
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn sort_config(&self) -> Option<&SortConfig> {
        self.sort.as_ref()
    }

    pub fn total_items(&self) -> usize {
        self.ordered_indices().len()
    }

    pub fn total_pages(&self) -> usize {
        self.total_items().div_ceil(self.page_size)
    }

    pub fn visible_rows(&self) -> Vec<T> {
        let ordered = self.ordered_indices();
        let start = (self.page - 1) * self.page_size;
        ordered
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| self.rows[i].clone())
            .collect()
    }

    pub fn page_payload(&self) -> TablePage<T> {
        let total_items = self.total_items();
        TablePage {
            rows: self.visible_rows(),
            page: self.page,
            total_pages: self.total_pages(),
            total_items,
            start_index: (self.page - 1) * self.page_size + 1,
            end_index: (self.page * self.page_size).min(total_items),
        }
    }

    fn filtered_indices(&self) -> Vec<usize> {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return (0..self.rows.len()).collect();
        }
        (0..self.rows.len())
            .filter(|&i| {
                self.search_fields.iter().any(|field| {
                    self.mirror[i]
                        .get(field)
                        .map(|value| field_matches(value, &query))
                        .unwrap_or(false)
                })
            })
            .collect()
    }

    fn ordered_indices(&self) -> Vec<usize> {
        let mut indices = self.filtered_indices();
        let Some(sort) = &self.sort else { return indices };
        indices.sort_by(|&a, &b| {
            let left = key_path(&self.mirror[a], &sort.key);
            let right = key_path(&self.mirror[b], &sort.key);
            match (left, right) {
                // missing values sort last in either direction
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(l), Some(r)) => {
                    let ordering = compare_values(l, r);
                    match sort.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                }
            }
        });
        indices
    }
}

/// Resolves a dotted key path, one nesting level deep in practice. Null is
/// treated the same as absent.
fn key_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
        .filter(|v| !v.is_null())
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn field_matches(value: &Value, query: &str) -> bool {
    match value {
        Value::Null => false,
        // one level of nesting: a joined relation matches if any of its own
        // values does
        Value::Object(map) => map
            .values()
            .map(render_scalar)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
            .contains(query),
        other => render_scalar(other).to_lowercase().contains(query),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => collate(x, y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => collate(&render_scalar(a), &render_scalar(b)),
    }
}

/// Case-insensitive comparison. The frontend sorted with `localeCompare`;
/// this matches it for the ASCII-dominant names the tool sees.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
