//! Vehicle-request approval workflow
//!
//! A request moves through an ordered chain of role-owned approval steps
//! (chef -> logistic -> charoi/admin). Each step is decided exactly once;
//! the decision row and the projected request status are written in the
//! same transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};

use crate::application::config::approvals::ApprovalConfig;
use crate::error::{AppError, Result};
use crate::middleware::RoleKind;
use crate::models::prelude::*;
use crate::models::request_approval::{self, ApprovalDecision};
use crate::models::user;
use crate::models::vehicle_request::{self, RequestStatus};

/// Approval state machine with an explicit step-ordering policy.
///
/// With `enforce_step_order` off (the default), a later step may be decided
/// before earlier ones exist — a missing chef does not block the logistic
/// desk. With it on, step N is only accepted once steps 1..N are all
/// recorded as approved.
#[derive(Clone)]
pub struct ApprovalWorkflow {
    enforce_step_order: bool,
}

impl ApprovalWorkflow {
    pub fn new(config: &ApprovalConfig) -> Self {
        Self {
            enforce_step_order: config.enforce_step_order,
        }
    }

    /// Record one approval decision and project the request's aggregate
    /// status, atomically.
    ///
    /// Fails with Forbidden when the role owns no step, NotFound when the
    /// request is missing, and Conflict when the step was already decided
    /// (or, under the strict policy, when a predecessor step is not yet
    /// approved). Nothing is persisted on failure.
    pub async fn submit_decision(
        &self,
        db: &DatabaseConnection,
        request_id: i32,
        approver: &user::Model,
        role: RoleKind,
        decision: ApprovalDecision,
        comments: Option<String>,
    ) -> Result<vehicle_request::Model> {
        let step = role.approval_step().ok_or_else(|| {
            AppError::Forbidden("Your role is not configured for approvals.".to_string())
        })?;

        if decision == ApprovalDecision::Pending {
            return Err(AppError::BadRequest(
                "Decision must be 'approved' or 'denied'.".to_string(),
            ));
        }

        let txn = db.begin().await?;

        let request = VehicleRequest::find_by_id(request_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Request with ID {} not found.", request_id))
            })?;

        if self.enforce_step_order && step > 1 {
            let prior = RequestApproval::find()
                .filter(request_approval::Column::RequestId.eq(request_id))
                .filter(request_approval::Column::ApprovalStep.lt(step))
                .all(&txn)
                .await?;

            for required in 1..step {
                let approved = prior
                    .iter()
                    .any(|a| a.approval_step == required && a.status == ApprovalDecision::Approved);
                if !approved {
                    return Err(AppError::Conflict(format!(
                        "Approval step {} requires step {} to be approved first.",
                        step, required
                    )));
                }
            }
        }

        let new_approval = request_approval::ActiveModel {
            request_id: Set(request_id),
            approval_step: Set(step),
            status: Set(decision),
            comments: Set(comments),
            approver_id: Set(Some(approver.id)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        // The unique index on (request_id, approval_step) is the authority on
        // step uniqueness; a violation means the step was already decided,
        // possibly by a concurrent submission.
        if let Err(e) = new_approval.insert(&txn).await {
            return Err(match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(format!(
                    "Approval step {} has already been processed.",
                    step
                )),
                _ => e.into(),
            });
        }

        let new_status = match decision {
            // Denial at any step cancels the whole request.
            ApprovalDecision::Denied => RequestStatus::Denied,
            ApprovalDecision::Approved => match step {
                1 => RequestStatus::ApprovedByChef,
                2 => RequestStatus::ApprovedByLogistic,
                _ => RequestStatus::FullyApproved,
            },
            ApprovalDecision::Pending => unreachable!("rejected above"),
        };

        let mut request_model: vehicle_request::ActiveModel = request.into();
        request_model.status = Set(new_status);
        let updated = request_model.update(&txn).await?;

        txn.commit().await?;

        Ok(updated)
    }
}
