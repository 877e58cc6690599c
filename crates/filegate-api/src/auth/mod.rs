//! Access gate: bearer token to tenant resolution.

pub mod identity;
pub mod middleware;
pub mod models;

pub use identity::{GoTrueIdentityResolver, IdentityResolver};
pub use middleware::auth_middleware;
pub use models::TenantContext;
