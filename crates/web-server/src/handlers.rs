use crate::{error::AppError, AppState};
use ai_analyst::AnalystReview;
use analytics::{
    CalendarMonth, DrawdownPoint, EquityPoint, HeatmapYear, MetricsSummary, SymbolMetrics,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Datelike, Duration, Utc};
use core_types::{Account, TradeRecord};
use database::{NewAccount, NewTrade, TradeFilter};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// The common query parameters of the analytics endpoints. All bounds are
/// inclusive and optional; an empty query means "every trade".
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub account_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl AnalyticsQuery {
    fn filter(&self) -> TradeFilter {
        TradeFilter {
            account_id: self.account_id,
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SymbolsQuery {
    pub account_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HeatmapQuery {
    pub account_id: Option<Uuid>,
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub account_id: Option<Uuid>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// # GET /api/accounts
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = state.db_repo.list_accounts().await?;
    Ok(Json(accounts))
}

/// # POST /api/accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewAccount>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state.db_repo.create_account(input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// # PUT /api/accounts/:id
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewAccount>,
) -> Result<Json<Account>, AppError> {
    let account = state.db_repo.update_account(id, input).await?;
    Ok(Json(account))
}

/// # POST /api/accounts/:id/default
pub async fn set_default_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, AppError> {
    let account = state.db_repo.set_default_account(id).await?;
    Ok(Json(account))
}

/// # DELETE /api/accounts/:id
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.db_repo.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Trades
// ---------------------------------------------------------------------------

/// # GET /api/trades
pub async fn list_trades(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<TradeRecord>>, AppError> {
    let trades = state.db_repo.list_trades(query.filter()).await?;
    Ok(Json(trades))
}

/// # POST /api/trades
pub async fn create_trade(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewTrade>,
) -> Result<(StatusCode, Json<TradeRecord>), AppError> {
    let trade = state.db_repo.create_trade(input).await?;
    Ok((StatusCode::CREATED, Json(trade)))
}

/// # PUT /api/trades/:id
pub async fn update_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewTrade>,
) -> Result<Json<TradeRecord>, AppError> {
    let trade = state.db_repo.update_trade(id, input).await?;
    Ok(Json(trade))
}

/// # DELETE /api/trades/:id
pub async fn delete_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.db_repo.delete_trade(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// # GET /api/analytics/summary
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<MetricsSummary>, AppError> {
    let trades = state.db_repo.list_trades(query.filter()).await?;
    Ok(Json(state.engine.summarize(&trades)))
}

/// # GET /api/analytics/equity-curve
pub async fn get_equity_curve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<EquityPoint>>, AppError> {
    let trades = state.db_repo.list_trades(query.filter()).await?;
    Ok(Json(state.engine.equity_curve(&trades)))
}

/// # GET /api/analytics/drawdown
pub async fn get_drawdown(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<DrawdownPoint>>, AppError> {
    let trades = state.db_repo.list_trades(query.filter()).await?;
    Ok(Json(state.engine.drawdown_series(&trades)))
}

/// # GET /api/analytics/symbols
pub async fn get_symbol_breakdown(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SymbolsQuery>,
) -> Result<Json<Vec<SymbolMetrics>>, AppError> {
    let filter = TradeFilter {
        account_id: query.account_id,
        from: query.from,
        to: query.to,
    };
    let trades = state.db_repo.list_trades(filter).await?;
    let mut breakdown = state.engine.symbol_breakdown(&trades);
    if let Some(limit) = query.limit {
        breakdown.truncate(limit);
    }
    Ok(Json(breakdown))
}

/// # GET /api/analytics/heatmap
/// Defaults to the current UTC year when none is given.
pub async fn get_heatmap(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HeatmapQuery>,
) -> Result<Json<HeatmapYear>, AppError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let filter = TradeFilter {
        account_id: query.account_id,
        ..Default::default()
    };
    let trades = state.db_repo.list_trades(filter).await?;
    Ok(Json(state.engine.heatmap_year(&trades, year)))
}

/// # GET /api/analytics/calendar
/// Defaults to the current UTC month when none is given.
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarMonth>, AppError> {
    let now = Utc::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| now.month());
    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest(format!("Invalid month: {month}")));
    }
    let filter = TradeFilter {
        account_id: query.account_id,
        ..Default::default()
    };
    let trades = state.db_repo.list_trades(filter).await?;
    Ok(Json(state.engine.calendar_month(&trades, year, month)))
}

// ---------------------------------------------------------------------------
// AI Review
// ---------------------------------------------------------------------------

/// # GET /api/analyst/review
/// Sends the recent trade history to the AI service for a coaching review.
/// When the window contains no trades, a canned review is returned without
/// calling the service.
pub async fn get_analyst_review(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalystReview>, AppError> {
    let filter = TradeFilter {
        account_id: query.account_id,
        from: Some(Utc::now() - Duration::days(state.history_days)),
        to: None,
    };
    let trades = state.db_repo.list_trades(filter).await?;

    if trades.is_empty() {
        return Ok(Json(AnalystReview::no_recent_trades()));
    }

    let review = state.analyst.review(&trades).await?;
    Ok(Json(review))
}
