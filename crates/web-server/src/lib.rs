use ai_analyst::AnalystClient;
use analytics::AnalyticsEngine;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub engine: AnalyticsEngine,
    pub analyst: Arc<dyn AnalystClient>,
    /// How many days of history the AI review endpoint sends for analysis.
    pub history_days: i64,
}

/// Builds the full application router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        // --- Accounts ---
        .route(
            "/api/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route(
            "/api/accounts/:id",
            put(handlers::update_account).delete(handlers::delete_account),
        )
        .route(
            "/api/accounts/:id/default",
            post(handlers::set_default_account),
        )
        // --- Trades ---
        .route(
            "/api/trades",
            get(handlers::list_trades).post(handlers::create_trade),
        )
        .route(
            "/api/trades/:id",
            put(handlers::update_trade).delete(handlers::delete_trade),
        )
        // --- Analytics ---
        .route("/api/analytics/summary", get(handlers::get_summary))
        .route("/api/analytics/equity-curve", get(handlers::get_equity_curve))
        .route("/api/analytics/drawdown", get(handlers::get_drawdown))
        .route("/api/analytics/symbols", get(handlers::get_symbol_breakdown))
        .route("/api/analytics/heatmap", get(handlers::get_heatmap))
        .route("/api/analytics/calendar", get(handlers::get_calendar))
        // --- AI Review ---
        .route("/api/analyst/review", get(handlers::get_analyst_review))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 2))
}

/// The main function to configure and run the web server. Tracing is
/// initialized by the binary, not here.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = build_router(Arc::new(state));

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
