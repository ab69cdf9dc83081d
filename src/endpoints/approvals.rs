use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::Authenticated;
use crate::models::request_approval::ApprovalDecision;
use crate::schemas::request::VehicleRequestOut;
use crate::state::AppState;

/// Create approval routes
pub fn approvals_routes(state: AppState) -> Router {
    Router::new()
        .route("/{request_id}", post(submit_approval))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ApprovalSubmission {
    /// "approved" or "denied"
    pub status: String,
    pub comments: Option<String>,
}

/// Submit one approval decision for a request.
///
/// The caller's role selects the approval step; the workflow records the
/// decision and projects the request's aggregate status atomically. Returns
/// the updated request with its full approval log.
async fn submit_approval(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
    Authenticated(actor): Authenticated,
    Json(submission): Json<ApprovalSubmission>,
) -> Result<Json<VehicleRequestOut>> {
    let decision = match submission.status.to_lowercase().as_str() {
        "approved" => ApprovalDecision::Approved,
        "denied" => ApprovalDecision::Denied,
        other => {
            return Err(AppError::BadRequest(format!(
                "Invalid decision '{}'. Must be 'approved' or 'denied'.",
                other
            )));
        }
    };

    let updated = state
        .approvals
        .submit_decision(
            &state.db,
            request_id,
            &actor.user,
            actor.role,
            decision,
            submission.comments,
        )
        .await?;

    let response = VehicleRequestOut::from_model(&state.db, updated).await?;
    Ok(Json(response))
}
