pub mod approvals;
pub mod auth;
pub mod database;
pub mod server;

use std::env;

/// Application configuration loaded from environment variables.
///
/// Built once in the bootstrapper and carried in `AppState`; handlers never
/// consult the process environment directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub auth: auth::AuthConfig,
    pub approvals: approvals::ApprovalConfig,

    pub version: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: server::ServerConfig::from_env(),
            database: database::DatabaseConfig::from_env(),
            auth: auth::AuthConfig::from_env(),
            approvals: approvals::ApprovalConfig::from_env(),

            version: env!("CARGO_PKG_VERSION").to_string(),

            log_level: env::var("FLEETDASH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
