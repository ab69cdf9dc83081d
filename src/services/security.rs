use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::auth::AuthConfig;
use crate::error::Result;

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub role: String,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
    pub jti: String,
}

/// Issues and validates HS256 access tokens.
///
/// Built from `AuthConfig` at startup and carried in `AppState`; there is no
/// process-wide key cache.
#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
    access_token_expire_minutes: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.secret_key.as_bytes().to_vec(),
            access_token_expire_minutes: config.access_token_expire_minutes,
        }
    }

    /// Create a JWT access token for a user
    pub fn create_access_token(&self, user_id: i32, role: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.access_token_expire_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )?;
        Ok(token)
    }

    /// Decode and validate a JWT access token
    pub fn decode_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    let hashed = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    Ok(hashed)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
