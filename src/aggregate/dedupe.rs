// src/aggregate/dedupe.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::Response;

/// Composite key mirroring the upstream ingestion contract: the same reply
/// can arrive more than once via webhook retries, differing only in row id
/// and received timestamp.
fn duplicate_key(row: &Response) -> String {
    [
        row.lead_id.to_string(),
        row.campaign_id.map(|id| id.to_string()).unwrap_or_default(),
        row.response_label.clone().unwrap_or_default(),
        row.response_text
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        row.received_date.clone().unwrap_or_default(),
    ]
    .join("|")
}

/// Best available receive timestamp. Rows missing both fall back to epoch,
/// ranking them oldest.
fn received_stamp(row: &Response) -> DateTime<Utc> {
    row.received_at.or(row.created_at).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Collapses duplicate responses, keeping the most recently received record
/// per key. First-seen order is preserved; a strictly newer duplicate
/// replaces the kept row in place. Equal timestamps keep the earlier row.
pub fn dedupe_responses(rows: Vec<Response>) -> Vec<Response> {
    let mut kept: Vec<Response> = Vec::with_capacity(rows.len());
    let mut index_by_key: HashMap<String, usize> = HashMap::with_capacity(rows.len());

    for row in rows {
        let key = duplicate_key(&row);
        match index_by_key.get(&key) {
            None => {
                index_by_key.insert(key, kept.len());
                kept.push(row);
            }
            Some(&at) => {
                if received_stamp(&row) > received_stamp(&kept[at]) {
                    kept[at] = row;
                }
            }
        }
    }

    kept
}
