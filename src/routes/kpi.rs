// src/routes/kpi.rs

use axum::{extract::{Query, State}, Json};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::aggregate::dedupe::dedupe_responses;
use crate::aggregate::labels::{classify_response, Sentiment};
use crate::aggregate::pct;
use crate::filters::{push_lead_filters, DashboardFilters, FilterParams};
use crate::models::OverviewKpi;
use crate::AppState;

use super::responses::fetch_responses;
use super::rows_or_empty;

/// Outreach volume: leads first touched on the active channel (email unless
/// the filter says otherwise), under the campaign filter.
async fn count_emails_sent(
    pool: &PgPool,
    filters: &DashboardFilters,
) -> Result<i64, sqlx::Error> {
    let channel_filter = filters
        .clone()
        .with_channel(Some(filters.channel.clone().unwrap_or_else(|| "email".into())));
    let mut qb: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM public.leads l WHERE 1=1");
    push_lead_filters(&mut qb, &channel_filter);
    let (count,): (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(count)
}

// GET /api/v1/kpi/overview
pub async fn overview(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
) -> Json<OverviewKpi> {
    let filters = filter_params.into_filters();
    let key = filters.fingerprint();
    if let Some(kpi) = state.panels.overview.fresh(&key) {
        return Json(kpi);
    }

    let generation = state.panels.overview.begin();
    let rows = rows_or_empty("kpi_overview", fetch_responses(&state.pool, &filters).await);
    let rows = dedupe_responses(rows);

    let total_responses = rows.len() as u64;
    let positive = rows
        .iter()
        .filter(|r| classify_response(r) == Sentiment::Positive)
        .count() as u64;
    let interested = rows
        .iter()
        .filter(|r| r.response_label.as_deref() == Some("Interested"))
        .count() as u64;

    let total_emails_sent = match count_emails_sent(&state.pool, &filters).await {
        Ok(count) => count.max(0) as u64,
        Err(error) => {
            tracing::error!(%error, "emails-sent count failed, serving 0");
            0
        }
    };

    let kpi = OverviewKpi {
        total_emails_sent,
        total_responses,
        positive_rate: pct(positive, total_responses),
        interested,
    };
    state.panels.overview.publish(generation, &key, kpi.clone());
    Json(kpi)
}
