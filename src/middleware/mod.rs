pub mod auth;
pub mod roles;

pub use auth::require_auth;
pub use auth::AuthenticatedUser;
pub use auth::SESSION_COOKIE_NAME;
pub use roles::*;
