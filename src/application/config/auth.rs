use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens.
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            secret_key: env::var("FLEETDASH_SECRET_KEY")
                .unwrap_or_else(|_| "insecure-dev-secret-change-me".to_string()),
            access_token_expire_minutes: env::var("FLEETDASH_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}
