// src/routes/leads.rs

use axum::{extract::{Query, State}, Json};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::filters::{push_lead_filters, DashboardFilters, FilterParams};
use crate::models::{Lead, LeadRow};
use crate::table::{TableController, TablePage, TableParams, DEFAULT_PAGE_SIZE};
use crate::AppState;

use super::rows_or_empty;

const SEARCH_FIELDS: &[&str] = &["company_name", "full_name", "campaign"];

async fn fetch_leads(
    pool: &PgPool,
    filters: &DashboardFilters,
) -> Result<Vec<Lead>, sqlx::Error> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        r#"SELECT l.id, l.campaign_id, l.company_name, l.full_name, l.first_touch_channel,
                  l.updated_at, c.campaign_name
           FROM public.leads l
           LEFT JOIN public.campaigns c ON c.id = l.campaign_id
           WHERE 1=1"#,
    );
    push_lead_filters(&mut qb, filters);
    qb.push(" ORDER BY l.updated_at DESC");

    let rows: Vec<LeadRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Lead::from).collect())
}

// GET /api/v1/leads
pub async fn list_leads(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
    Query(table_params): Query<TableParams>,
) -> Json<TablePage<Lead>> {
    let filters = filter_params.into_filters();
    let rows = rows_or_empty("leads", fetch_leads(&state.pool, &filters).await);

    let mut table = TableController::new(rows, SEARCH_FIELDS, DEFAULT_PAGE_SIZE);
    table.apply(&table_params);
    Json(table.page_payload())
}
