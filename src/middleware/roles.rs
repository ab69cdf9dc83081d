//! Role model and type-safe authorization extractors
//!
//! Every authorization decision goes through the closed `RoleKind` enum and
//! the capability table below; handlers never compare role strings.
//!
//! Usage in handlers:
//! ```ignore
//! use crate::middleware::{Authorized, FleetManage};
//!
//! async fn delete_vehicle(
//!     Authorized(actor): Authorized<FleetManage>,
//!     Path(id): Path<i32>,
//! ) -> Result<...> {
//!     // Capability already verified - just use actor
//! }
//! ```

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;

/// Closed set of roles understood by the application.
///
/// Role rows in the database carry these names; anything else fails
/// authentication rather than silently matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Superadmin,
    Admin,
    Charoi,
    Logistic,
    Chef,
    User,
    Driver,
}

impl RoleKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "superadmin" => Some(Self::Superadmin),
            "admin" => Some(Self::Admin),
            "charoi" => Some(Self::Charoi),
            "logistic" => Some(Self::Logistic),
            "chef" => Some(Self::Chef),
            "user" => Some(Self::User),
            "driver" => Some(Self::Driver),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Admin => "admin",
            Self::Charoi => "charoi",
            Self::Logistic => "logistic",
            Self::Chef => "chef",
            Self::User => "user",
            Self::Driver => "driver",
        }
    }

    /// Admin and superadmin are interchangeable everywhere.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Superadmin | Self::Admin)
    }

    /// The approval-chain step this role decides, if any.
    /// 1 = chef, 2 = logistic, 3 = charoi/admin.
    pub fn approval_step(self) -> Option<i32> {
        match self {
            Self::Chef => Some(1),
            Self::Logistic => Some(2),
            Self::Charoi | Self::Admin | Self::Superadmin => Some(3),
            _ => None,
        }
    }
}

/// Trait for capability marker types
pub trait Capability: Send + Sync + 'static {
    /// The capability name (e.g., "fleet.manage")
    const NAME: &'static str;

    /// Whether a role holds this capability
    fn allows(role: RoleKind) -> bool;
}

/// Macro to define capability types
///
/// Creates zero-sized marker types that implement `Capability` with a fixed
/// role set.
macro_rules! define_capabilities {
    ($($(#[$meta:meta])* $name:ident => $cap:expr, [$($role:ident),+ $(,)?]),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Capability for $name {
                const NAME: &'static str = $cap;

                fn allows(role: RoleKind) -> bool {
                    matches!(role, $(RoleKind::$role)|+)
                }
            }
        )*
    };
}

// The full capability table
define_capabilities! {
    /// Create, update and delete fleet records (vehicles, lookups,
    /// maintenance, repairs, drivers, users)
    FleetManage => "fleet.manage", [Superadmin, Admin],

    /// See the role-filtered request queue
    RequestsReview => "requests.review", [Superadmin, Admin, Charoi, Logistic, Chef],

    /// Assign vehicles and drivers to requests, read pending counts
    RequestsAssign => "requests.assign", [Superadmin, Admin, Charoi, Logistic],
}

/// Extractor that requires a specific capability
///
/// Verifies that the authenticated caller's role holds the capability before
/// the handler runs; rejects with 403 Forbidden otherwise.
#[derive(Debug, Clone)]
pub struct Authorized<C: Capability>(pub AuthenticatedUser, pub PhantomData<C>);

impl<S, C> FromRequestParts<S> for Authorized<C>
where
    S: Send + Sync,
    C: Capability,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if !C::allows(auth_user.role) {
            return Err(AppError::Forbidden(format!(
                "Permission denied: {} required",
                C::NAME
            )));
        }

        Ok(Authorized(auth_user.clone(), PhantomData))
    }
}

/// Extractor for any authenticated caller (no specific capability required)
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        Ok(Authenticated(auth_user.clone()))
    }
}
