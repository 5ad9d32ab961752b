// src/models/mod.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ───────────────────────────────────────
// Backend tables (read-only from here)
// ───────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Campaign {
    pub id: Uuid,
    pub campaign_name: String,
    pub sector: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Joined campaign relation. Absent whenever the foreign key is null or the
/// join found nothing, so consumers must not assume it is there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRef {
    pub campaign_name: String,
}

/// Joined lead relation, same caveat as [`CampaignRef`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRef {
    pub company_name: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub full_name: Option<String>,
    pub first_touch_channel: Option<String>, // "email" | "linkedin"
    pub updated_at: DateTime<Utc>,
    pub campaign: Option<CampaignRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub channel: String,                // "email" | "linkedin"
    pub response_label: Option<String>, // "Interested" | "Referral" | ...
    pub response_text: Option<String>,
    /// ISO `YYYY-MM-DD` as stored by the ingestion pipeline. Kept as text:
    /// upstream rows are occasionally malformed and bucketing skips those.
    pub received_date: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub lead: Option<LeadRef>,
    pub campaign: Option<CampaignRef>,
}

// ───────────────────────────────────────
// Flat join rows as they come off sqlx
// ───────────────────────────────────────
#[derive(Debug, Clone, FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub full_name: Option<String>,
    pub first_touch_channel: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub campaign_name: Option<String>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Lead {
            id: row.id,
            campaign_id: row.campaign_id,
            company_name: row.company_name,
            full_name: row.full_name,
            first_touch_channel: row.first_touch_channel,
            updated_at: row.updated_at,
            campaign: row.campaign_name.map(|campaign_name| CampaignRef { campaign_name }),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ResponseRow {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub channel: String,
    pub response_label: Option<String>,
    pub response_text: Option<String>,
    pub received_date: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub lead_company_name: Option<String>,
    pub lead_full_name: Option<String>,
    pub campaign_name: Option<String>,
}

impl From<ResponseRow> for Response {
    fn from(row: ResponseRow) -> Self {
        // A LEFT JOIN that found nothing leaves both lead columns null; only
        // materialize the relation when at least one of them came back.
        let lead = if row.lead_company_name.is_some() || row.lead_full_name.is_some() {
            Some(LeadRef {
                company_name: row.lead_company_name,
                full_name: row.lead_full_name,
            })
        } else {
            None
        };
        Response {
            id: row.id,
            lead_id: row.lead_id,
            campaign_id: row.campaign_id,
            channel: row.channel,
            response_label: row.response_label,
            response_text: row.response_text,
            received_date: row.received_date,
            received_at: row.received_at,
            created_at: row.created_at,
            lead,
            campaign: row.campaign_name.map(|campaign_name| CampaignRef { campaign_name }),
        }
    }
}

// ───────────────────────────────────────
// Derived buckets (recomputed per fetch, never persisted)
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: String, // ISO YYYY-MM-DD
    pub channel: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayCount {
    pub weekday: u32, // 1..=7, Monday..Sunday
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
    pub percent: f64, // share of all rows, one decimal
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSplit {
    pub campaign_name: String,
    pub total_replies: u64,
    pub positive_replies: u64,
    pub negative_replies: u64,
    pub success_rate: f64, // positive / total * 100, 0.0 when total is 0
}

/// Per-campaign response recency, seeded from the campaign table so that
/// campaigns without any responses still show up with zero counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignActivity {
    pub id: Uuid,
    pub campaign_name: String,
    pub sector: Option<String>,
    pub is_active: bool,
    pub total_responses: u64,
    pub responses_last_7_days: u64,
    pub responses_last_30_days: u64,
    pub earliest_response_date: Option<String>,
    pub latest_response_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewKpi {
    pub total_emails_sent: u64,
    pub total_responses: u64,
    pub positive_rate: f64,
    pub interested: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_row_without_join_columns_has_no_relations() {
        let row = ResponseRow {
            id: Uuid::from_u128(1),
            lead_id: Uuid::from_u128(2),
            campaign_id: None,
            channel: "email".into(),
            response_label: None,
            response_text: None,
            received_date: None,
            received_at: None,
            created_at: None,
            lead_company_name: None,
            lead_full_name: None,
            campaign_name: None,
        };
        let response = Response::from(row);
        assert!(response.lead.is_none());
        assert!(response.campaign.is_none());
    }

    #[test]
    fn response_row_with_partial_lead_still_builds_relation() {
        let row = ResponseRow {
            id: Uuid::from_u128(1),
            lead_id: Uuid::from_u128(2),
            campaign_id: Some(Uuid::from_u128(3)),
            channel: "email".into(),
            response_label: Some("Interested".into()),
            response_text: None,
            received_date: Some("2024-01-05".into()),
            received_at: None,
            created_at: None,
            lead_company_name: Some("Acme Corp".into()),
            lead_full_name: None,
            campaign_name: Some("Acme".into()),
        };
        let response = Response::from(row);
        assert_eq!(
            response.lead,
            Some(LeadRef {
                company_name: Some("Acme Corp".into()),
                full_name: None
            })
        );
        assert_eq!(
            response.campaign,
            Some(CampaignRef { campaign_name: "Acme".into() })
        );
    }
}
