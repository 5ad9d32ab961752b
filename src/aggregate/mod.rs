// src/aggregate/mod.rs
//
// In-memory aggregation over already-fetched rows. Everything here is pure:
// slices in, fresh buckets out, no shared state.

use chrono::NaiveDate;

use crate::models::Response;

pub mod buckets;
pub mod campaigns;
pub mod dedupe;
pub mod labels;

/// Sentinel bucket for rows the backend left unlabeled.
pub const UNKNOWN_LABEL: &str = "Unknown";

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn pct(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(count as f64 / total as f64 * 100.0)
    }
}

/// Received date as a calendar date. `None` for missing or malformed text;
/// bucketing callers skip those rows, totals elsewhere still count them.
pub(crate) fn parse_received_date(row: &Response) -> Option<NaiveDate> {
    let raw = row.received_date.as_deref()?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use crate::models::{CampaignRef, Response};

    pub fn response(lead: u128, campaign: u128, label: &str, date: &str) -> Response {
        Response {
            id: Uuid::new_v4(),
            lead_id: Uuid::from_u128(lead),
            campaign_id: Some(Uuid::from_u128(campaign)),
            channel: "email".into(),
            response_label: if label.is_empty() { None } else { Some(label.into()) },
            response_text: Some("hi".into()),
            received_date: if date.is_empty() { None } else { Some(date.into()) },
            received_at: None,
            created_at: None,
            lead: None,
            campaign: None,
        }
    }

    pub fn named(mut base: Response, campaign_name: &str) -> Response {
        base.campaign = Some(CampaignRef { campaign_name: campaign_name.into() });
        base
    }

    pub fn at(mut base: Response, received_at: &str) -> Response {
        base.received_at = received_at.parse::<DateTime<Utc>>().ok();
        base
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::response;
    use super::*;

    #[test]
    fn pct_is_zero_for_empty_total() {
        assert_eq!(pct(0, 0), 0.0);
        assert_eq!(pct(5, 0), 0.0);
    }

    #[test]
    fn pct_rounds_to_one_decimal() {
        // 2/3 -> 66.666... -> 66.7
        assert_eq!(pct(2, 3), 66.7);
        assert_eq!(pct(1, 3), 33.3);
        assert_eq!(pct(1, 1), 100.0);
    }

    #[test]
    fn malformed_received_date_parses_to_none() {
        assert!(parse_received_date(&response(1, 1, "Interested", "01-05-2024")).is_none());
        assert!(parse_received_date(&response(1, 1, "Interested", "not a date")).is_none());
        assert!(parse_received_date(&response(1, 1, "Interested", "")).is_none());
        assert_eq!(
            parse_received_date(&response(1, 1, "Interested", "2024-01-05")),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }
}
