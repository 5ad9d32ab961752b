// src/main.rs

use std::env;
use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::{Pool, Postgres};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod aggregate;
mod charts;
mod db;
mod filters;
mod models;
mod panel;
mod routes;
mod table;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub panels: Arc<panel::Panels>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Initialize DB pool
    let pool = db::connect().await?;
    let state = AppState { pool, panels: Arc::new(panel::Panels::new()) };

    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Root API router (reads only)
    let api = Router::new()
        // health
        .route("/health", get(routes::health::health))
        // campaigns
        .route("/api/v1/campaigns", get(routes::campaigns::list_campaigns))
        .route("/api/v1/campaigns/split", get(routes::campaigns::campaign_split))
        .route("/api/v1/campaigns/activity", get(routes::campaigns::activity))
        // tables
        .route("/api/v1/leads", get(routes::leads::list_leads))
        .route("/api/v1/responses", get(routes::responses::list_responses))
        // chart panels
        .route("/api/v1/charts/daily", get(routes::charts::daily))
        .route("/api/v1/charts/weekday", get(routes::charts::weekday))
        .route("/api/v1/charts/labels", get(routes::charts::labels))
        .route("/api/v1/charts/campaigns", get(routes::charts::campaigns))
        // KPI cards
        .route("/api/v1/kpi/overview", get(routes::kpi::overview))
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Port (axum 0.7 style)
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080); // default 8080

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("🚀 API listening on http://127.0.0.1:{port}");

    axum::serve(listener, api.into_make_service()).await?;
    Ok(())
}
