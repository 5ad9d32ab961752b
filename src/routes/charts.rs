// src/routes/charts.rs
//
// Chart panels. Each one fetches under the active filter set, aggregates in
// memory, and answers with a chart-ready `{labels, datasets}` shape. Panels
// are independent: one failing degrades to an empty chart without touching
// the others.

use axum::{extract::{Query, State}, Json};
use chrono::Utc;

use crate::aggregate::buckets::{bucket_by_date, bucket_by_weekday, fill_trailing_week};
use crate::aggregate::campaigns::aggregate_by_campaign;
use crate::aggregate::dedupe::dedupe_responses;
use crate::aggregate::labels::aggregate_by_label;
use crate::charts::{
    build_campaign_chart, build_daily_chart, build_label_chart, build_weekday_chart, ChartData,
};
use crate::filters::{DateRange, FilterParams};
use crate::AppState;

use super::responses::fetch_responses;
use super::rows_or_empty;

/// Campaigns shown on the performance chart, matching the dashboard card.
const TOP_CAMPAIGNS: usize = 5;

// GET /api/v1/charts/daily
pub async fn daily(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
) -> Json<ChartData> {
    let today = Utc::now().date_naive();
    let filters = filter_params.into_filters();
    // An explicit range charts exactly what it covers; without one the panel
    // is the fixed past-7-days card, fetched over the default window and
    // zero-filled across all of it.
    let explicit_range = filters.date_range.is_some();
    let filters = if explicit_range {
        filters
    } else {
        let range = DateRange::past_week(today);
        filters.with_date_range(Some(range))
    };

    let key = filters.fingerprint();
    if let Some(chart) = state.panels.daily.fresh(&key) {
        return Json(chart);
    }

    let generation = state.panels.daily.begin();
    let rows = rows_or_empty("daily", fetch_responses(&state.pool, &filters).await);
    let rows = dedupe_responses(rows);
    let buckets = bucket_by_date(&rows);

    let chart = if explicit_range {
        build_daily_chart(&buckets, "Daily Responses")
    } else {
        let channel = filters.channel.as_deref().unwrap_or("all");
        let week = fill_trailing_week(&buckets, today, channel);
        build_daily_chart(&week, "Daily Responses")
    };

    state.panels.daily.publish(generation, &key, chart.clone());
    Json(chart)
}

// GET /api/v1/charts/weekday
pub async fn weekday(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
) -> Json<ChartData> {
    let filters = filter_params.into_filters();
    let key = filters.fingerprint();
    if let Some(chart) = state.panels.weekday.fresh(&key) {
        return Json(chart);
    }

    let generation = state.panels.weekday.begin();
    let rows = rows_or_empty("weekday", fetch_responses(&state.pool, &filters).await);
    let buckets = bucket_by_weekday(&dedupe_responses(rows));
    let chart = build_weekday_chart(&buckets, "Responses");

    state.panels.weekday.publish(generation, &key, chart.clone());
    Json(chart)
}

// GET /api/v1/charts/labels
pub async fn labels(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
) -> Json<ChartData> {
    let filters = filter_params.into_filters();
    let key = filters.fingerprint();
    if let Some(chart) = state.panels.labels.fresh(&key) {
        return Json(chart);
    }

    let generation = state.panels.labels.begin();
    let rows = rows_or_empty("labels", fetch_responses(&state.pool, &filters).await);
    let mut buckets = aggregate_by_label(&dedupe_responses(rows));
    // legend wants the big slices first
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    let chart = build_label_chart(&buckets, "Response Labels");

    state.panels.labels.publish(generation, &key, chart.clone());
    Json(chart)
}

// GET /api/v1/charts/campaigns
pub async fn campaigns(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
) -> Json<ChartData> {
    let filters = filter_params.into_filters();
    let key = filters.fingerprint();
    if let Some(chart) = state.panels.campaigns.fresh(&key) {
        return Json(chart);
    }

    let generation = state.panels.campaigns.begin();
    let rows = rows_or_empty("campaigns_chart", fetch_responses(&state.pool, &filters).await);
    let mut splits = aggregate_by_campaign(&dedupe_responses(rows));
    splits.truncate(TOP_CAMPAIGNS);
    let chart = build_campaign_chart(&splits);

    state.panels.campaigns.publish(generation, &key, chart.clone());
    Json(chart)
}
