//! `kitflow-auth` — pure authentication/authorization boundary.
//!
//! Identity itself is resolved by the hosted auth provider; this crate only
//! models the resolved caller (principal + roles), the deterministic claims
//! checks, and the policy decision. It is intentionally decoupled from HTTP
//! and storage.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, authorize, require_admin};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use permissions::Permission;
pub use principal::{Principal, PrincipalId};
pub use roles::Role;
