use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::Authenticated;
use crate::services::reporting;
use crate::state::AppState;

/// Create expense analytics routes (any authenticated user)
pub fn analytics_routes(state: AppState) -> Router {
    Router::new()
        .route("/expense-summary", get(expense_summary))
        .route("/detailed-expense-records", get(detailed_expense_records))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DetailedParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Comma-separated subset of: fuel, reparation, maintenance, purchases
    pub categories: Option<String>,
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(AppError::BadRequest(
            "end_date must not be before start_date".to_string(),
        ));
    }
    Ok(())
}

/// Cost totals and a month-by-month breakdown over a date range
async fn expense_summary(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<reporting::ExpenseSummary>> {
    check_range(params.start_date, params.end_date)?;
    let summary =
        reporting::expense_summary(&state.db, params.start_date, params.end_date).await?;
    Ok(Json(summary))
}

/// Raw expense records per category over a date range
async fn detailed_expense_records(
    State(state): State<AppState>,
    Query(params): Query<DetailedParams>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<reporting::DetailedExpenses>> {
    check_range(params.start_date, params.end_date)?;

    let categories: Vec<String> = params
        .categories
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let records = reporting::detailed_expense_records(
        &state.db,
        params.start_date,
        params.end_date,
        &categories,
    )
    .await?;

    Ok(Json(records))
}
