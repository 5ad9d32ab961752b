// src/routes/responses.rs

use axum::{extract::{Query, State}, Json};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::aggregate::dedupe::dedupe_responses;
use crate::filters::{push_response_filters, DashboardFilters, FilterParams};
use crate::models::{Response, ResponseRow};
use crate::table::{TableController, TablePage, TableParams, DEFAULT_PAGE_SIZE};
use crate::AppState;

use super::rows_or_empty;

/// Fields the response table searches, joined relations included.
const SEARCH_FIELDS: &[&str] =
    &["response_label", "response_text", "lead", "campaign"];

/// Responses with their lead and campaign display columns joined in. Shared
/// by every panel that aggregates over responses.
pub async fn fetch_responses(
    pool: &PgPool,
    filters: &DashboardFilters,
) -> Result<Vec<Response>, sqlx::Error> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        r#"SELECT r.id, r.lead_id, r.campaign_id, r.channel, r.response_label, r.response_text,
                  r.received_date, r.received_at, r.created_at,
                  l.company_name AS lead_company_name, l.full_name AS lead_full_name,
                  c.campaign_name
           FROM public.responses r
           LEFT JOIN public.leads l ON l.id = r.lead_id
           LEFT JOIN public.campaigns c ON c.id = r.campaign_id
           WHERE 1=1"#,
    );
    push_response_filters(&mut qb, filters);
    qb.push(" ORDER BY r.received_at DESC NULLS LAST, r.id");

    let rows: Vec<ResponseRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Response::from).collect())
}

// GET /api/v1/responses
pub async fn list_responses(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
    Query(table_params): Query<TableParams>,
) -> Json<TablePage<Response>> {
    let filters = filter_params.into_filters();
    let rows = rows_or_empty("responses", fetch_responses(&state.pool, &filters).await);
    let rows = dedupe_responses(rows);

    let mut table = TableController::new(rows, SEARCH_FIELDS, DEFAULT_PAGE_SIZE);
    table.apply(&table_params);
    Json(table.page_payload())
}
