// src/routes/campaigns.rs

use axum::{extract::{Query, State}, Json};
use chrono::Utc;
use sqlx::{query_as, PgPool};

use crate::aggregate::campaigns::{aggregate_by_campaign, campaign_activity};
use crate::aggregate::dedupe::dedupe_responses;
use crate::filters::FilterParams;
use crate::models::{Campaign, CampaignActivity, CampaignSplit};
use crate::AppState;

use super::responses::fetch_responses;
use super::rows_or_empty;

async fn fetch_campaigns(pool: &PgPool, active_only: bool) -> Result<Vec<Campaign>, sqlx::Error> {
    let sql = if active_only {
        r#"SELECT id, campaign_name, sector, is_active, created_at
           FROM public.campaigns WHERE is_active = true ORDER BY campaign_name"#
    } else {
        r#"SELECT id, campaign_name, sector, is_active, created_at
           FROM public.campaigns ORDER BY campaign_name"#
    };
    query_as::<_, Campaign>(sql).fetch_all(pool).await
}

// GET /api/v1/campaigns (active ones, for the filter dropdown)
pub async fn list_campaigns(State(state): State<AppState>) -> Json<Vec<Campaign>> {
    Json(rows_or_empty("campaigns", fetch_campaigns(&state.pool, true).await))
}

// GET /api/v1/campaigns/split
pub async fn campaign_split(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
) -> Json<Vec<CampaignSplit>> {
    let filters = filter_params.into_filters();
    let key = filters.fingerprint();
    if let Some(splits) = state.panels.split.fresh(&key) {
        return Json(splits);
    }

    let generation = state.panels.split.begin();
    let rows = rows_or_empty("campaign_split", fetch_responses(&state.pool, &filters).await);
    let splits = aggregate_by_campaign(&dedupe_responses(rows));
    state.panels.split.publish(generation, &key, splits.clone());
    Json(splits)
}

// GET /api/v1/campaigns/activity
// Recency view; includes zero-activity campaigns, unlike the response-driven
// split.
pub async fn activity(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
) -> Json<Vec<CampaignActivity>> {
    let filters = filter_params.into_filters();
    let campaigns = rows_or_empty("campaign_activity", fetch_campaigns(&state.pool, false).await);
    let responses =
        rows_or_empty("campaign_activity", fetch_responses(&state.pool, &filters).await);
    let responses = dedupe_responses(responses);
    let today = Utc::now().date_naive();
    Json(campaign_activity(&campaigns, &responses, today))
}
