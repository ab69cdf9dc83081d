pub mod approval;
pub mod reporting;
pub mod security;

pub use approval::ApprovalWorkflow;
pub use security::{hash_password, verify_password, TokenService};
