use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::Authenticated;
use crate::services::reporting;
use crate::state::AppState;

/// Create dashboard data routes (any authenticated user)
pub fn dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route("/kpis", get(kpis))
        .route("/performance-insights", get(performance_insights))
        .route("/alerts", get(alerts))
        .route("/recent-pannes", get(recent_pannes))
        .route("/upcoming-trips", get(upcoming_trips))
        .route("/charts/monthly-activity", get(monthly_activity))
        .route("/charts/vehicle-status", get(vehicle_status))
        .route("/top-performing-drivers", get(top_drivers))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct MonthsParams {
    pub months_to_display: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u64>,
}

async fn kpis(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<reporting::KpiStats>> {
    Ok(Json(reporting::dashboard_kpis(&state.db).await?))
}

async fn performance_insights(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<reporting::PerformanceInsights>> {
    Ok(Json(reporting::performance_insights(&state.db).await?))
}

async fn alerts(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<reporting::AlertsResponse>> {
    Ok(Json(reporting::dashboard_alerts(&state.db).await?))
}

async fn recent_pannes(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<Vec<reporting::PanneDetail>>> {
    Ok(Json(reporting::recent_pannes(&state.db, 3).await?))
}

async fn upcoming_trips(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<Vec<reporting::UpcomingTrip>>> {
    Ok(Json(reporting::upcoming_trips(&state.db, 3).await?))
}

async fn monthly_activity(
    State(state): State<AppState>,
    Query(params): Query<MonthsParams>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<reporting::MonthlyActivity>> {
    let months = params.months_to_display.unwrap_or(12).clamp(1, 36);
    Ok(Json(reporting::monthly_activity(&state.db, months).await?))
}

async fn vehicle_status(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<reporting::VehicleStatusChart>> {
    Ok(Json(reporting::vehicle_status_chart(&state.db).await?))
}

async fn top_drivers(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<Vec<reporting::TopDriver>>> {
    let limit = params.limit.unwrap_or(3).clamp(1, 10) as usize;
    Ok(Json(reporting::top_drivers(&state.db, limit).await?))
}
