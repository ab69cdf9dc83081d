use std::env;

#[derive(Debug, Clone)]
pub struct ApprovalConfig {
    /// When true, an approval step is only accepted once every earlier step
    /// has been recorded as approved. Off by default: a missing chef must
    /// not block the logistic desk.
    pub enforce_step_order: bool,
}

impl ApprovalConfig {
    pub fn from_env() -> Self {
        Self {
            enforce_step_order: env::var("FLEETDASH_ENFORCE_STEP_ORDER")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
        }
    }
}
