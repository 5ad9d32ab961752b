// src/filters.rs
//
// One immutable filter object flows from the query string down into every
// fetch and aggregation call; routes never reach for ambient state.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Default dashboard window: the last 7 days up to `end`.
    pub fn past_week(end: NaiveDate) -> Self {
        Self { start: end - Duration::days(7), end }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardFilters {
    /// Window on `received_date` for chart panels.
    pub date_range: Option<DateRange>,
    /// Separate window used by the response-recency views.
    pub response_date_range: Option<DateRange>,
    pub channel: Option<String>,
    pub campaigns: Option<Vec<Uuid>>,
}

impl DashboardFilters {
    pub fn with_date_range(mut self, range: Option<DateRange>) -> Self {
        self.date_range = range;
        self
    }

    pub fn with_response_date_range(mut self, range: Option<DateRange>) -> Self {
        self.response_date_range = range;
        self
    }

    pub fn with_channel(mut self, channel: Option<String>) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_campaigns(mut self, campaigns: Option<Vec<Uuid>>) -> Self {
        self.campaigns = campaigns;
        self
    }

    /// Stable key for the per-panel snapshot cache.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Filter fields as they arrive on the query string. `campaign` is a
/// comma-separated UUID list; entries that fail to parse are dropped
/// silently, like every other malformed input in this layer.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub response_from: Option<NaiveDate>,
    pub response_to: Option<NaiveDate>,
    pub channel: Option<String>,
    pub campaign: Option<String>,
}

fn range_of(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<DateRange> {
    match (start, end) {
        (Some(start), Some(end)) => Some(DateRange { start, end }),
        _ => None,
    }
}

impl FilterParams {
    pub fn into_filters(self) -> DashboardFilters {
        let campaigns = self
            .campaign
            .map(|raw| {
                raw.split(',')
                    .filter_map(|part| Uuid::parse_str(part.trim()).ok())
                    .collect::<Vec<_>>()
            })
            .filter(|ids| !ids.is_empty());
        DashboardFilters::default()
            .with_date_range(range_of(self.from, self.to))
            .with_response_date_range(range_of(self.response_from, self.response_to))
            .with_channel(self.channel)
            .with_campaigns(campaigns)
    }
}

fn push_date_bounds(qb: &mut QueryBuilder<'_, Postgres>, column: &str, range: &DateRange) {
    // received_date is ISO text, which compares chronologically
    qb.push(format!(" AND {column} >= "))
        .push_bind(range.start.format("%Y-%m-%d").to_string())
        .push(format!(" AND {column} <= "))
        .push_bind(range.end.format("%Y-%m-%d").to_string());
}

/// Appends the response WHERE clauses for the active filter set. The base
/// query ends in `WHERE 1=1` so every clause composes with a plain `AND`.
pub fn push_response_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &DashboardFilters) {
    if let Some(channel) = &filters.channel {
        qb.push(" AND r.channel = ").push_bind(channel.clone());
    }
    if let Some(ids) = &filters.campaigns {
        qb.push(" AND r.campaign_id = ANY(").push_bind(ids.clone()).push(")");
    }
    if let Some(range) = &filters.date_range {
        push_date_bounds(qb, "r.received_date", range);
    }
    if let Some(range) = &filters.response_date_range {
        push_date_bounds(qb, "r.received_date", range);
    }
}

/// Same composition for the leads table.
pub fn push_lead_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &DashboardFilters) {
    if let Some(channel) = &filters.channel {
        qb.push(" AND l.first_touch_channel = ").push_bind(channel.clone());
    }
    if let Some(ids) = &filters.campaigns {
        qb.push(" AND l.campaign_id = ANY(").push_bind(ids.clone()).push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn past_week_spans_seven_days_back() {
        let range = DateRange::past_week(day(2024, 1, 10));
        assert_eq!(range.start, day(2024, 1, 3));
        assert_eq!(range.end, day(2024, 1, 10));
    }

    #[test]
    fn params_parse_campaign_csv_and_drop_garbage() {
        let params = FilterParams {
            campaign: Some(format!(
                "{}, not-a-uuid ,{}",
                Uuid::from_u128(1),
                Uuid::from_u128(2)
            )),
            ..Default::default()
        };
        let filters = params.into_filters();
        assert_eq!(
            filters.campaigns,
            Some(vec![Uuid::from_u128(1), Uuid::from_u128(2)])
        );
    }

    #[test]
    fn all_garbage_campaign_list_means_no_filter() {
        let params = FilterParams { campaign: Some("nope,also-no".into()), ..Default::default() };
        assert_eq!(params.into_filters().campaigns, None);
    }

    #[test]
    fn half_open_date_params_are_ignored() {
        let params = FilterParams { from: Some(day(2024, 1, 1)), ..Default::default() };
        assert_eq!(params.into_filters().date_range, None);
    }

    #[test]
    fn fingerprint_distinguishes_filter_sets() {
        let a = DashboardFilters::default().with_channel(Some("email".into()));
        let b = DashboardFilters::default().with_channel(Some("linkedin".into()));
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
    }

    #[test]
    fn response_filter_sql_composes_all_clauses() {
        let filters = DashboardFilters::default()
            .with_channel(Some("email".into()))
            .with_campaigns(Some(vec![Uuid::from_u128(7)]))
            .with_date_range(Some(DateRange { start: day(2024, 1, 1), end: day(2024, 1, 7) }));
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM responses r WHERE 1=1");
        push_response_filters(&mut qb, &filters);
        let sql = qb.into_sql();
        assert!(sql.contains("r.channel = "));
        assert!(sql.contains("r.campaign_id = ANY("));
        assert!(sql.contains("r.received_date >= "));
        assert!(sql.contains("r.received_date <= "));
    }

    #[test]
    fn empty_filters_add_no_clauses() {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM responses r WHERE 1=1");
        push_response_filters(&mut qb, &DashboardFilters::default());
        assert_eq!(qb.into_sql(), "SELECT * FROM responses r WHERE 1=1");
    }
}
