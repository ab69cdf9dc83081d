use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::services::approval::ApprovalWorkflow;
use crate::services::security::TokenService;

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub config: Arc<Config>,
    pub tokens: TokenService,
    pub approvals: ApprovalWorkflow,
}

impl AppState {
    pub fn new(db: DbConn, config: Config) -> Self {
        let tokens = TokenService::new(&config.auth);
        let approvals = ApprovalWorkflow::new(&config.approvals);
        Self {
            db,
            config: Arc::new(config),
            tokens,
            approvals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_db;

    #[tokio::test]
    async fn test_app_state_clone_shares_config() {
        let db = create_test_db().await;
        let state1 = AppState::new(db, Config::from_env());
        let state2 = state1.clone();

        assert!(Arc::ptr_eq(&state1.config, &state2.config));
    }
}
