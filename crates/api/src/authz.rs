//! API-side authorization guard.
//!
//! Enforces permissions at the route boundary (before any service call),
//! keeping the store services role-aware only where they must be (admin
//! gates on deletions and bulk clears).

use axum::http::StatusCode;

use kitflow_auth::{Permission, Principal, Role, authorize};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Role→permission policy.
///
/// - `admin`: everything.
/// - `user`: reads plus day-to-day writes (no deletions, no bulk clears).
/// - `member`: read-only.
pub fn permissions_from_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(Role::is_admin) {
        return vec![Permission::new("*")];
    }

    let mut perms: Vec<Permission> = READ_PERMISSIONS
        .iter()
        .map(|p| Permission::new(*p))
        .collect();

    if roles.iter().any(|r| r.as_str() == "user") {
        perms.extend(WRITE_PERMISSIONS.iter().map(|p| Permission::new(*p)));
    }

    perms
}

const READ_PERMISSIONS: &[&str] = &[
    "kits.read",
    "programs.read",
    "directory.read",
    "inventory.read",
    "assignments.read",
    "reports.read",
];

const WRITE_PERMISSIONS: &[&str] = &[
    "kits.write",
    "programs.write",
    "directory.write",
    "inventory.write",
    "assignments.write",
    "chat.use",
    "files.write",
];

/// Resolve the request's principal and check one permission, mapping a
/// denial straight to the HTTP error response.
pub fn require(
    ctx: &PrincipalContext,
    permission: &str,
) -> Result<Principal, axum::response::Response> {
    let principal = Principal::new(
        ctx.principal_id(),
        ctx.roles().to_vec(),
        permissions_from_roles(ctx.roles()),
    );

    authorize(&principal, &Permission::new(permission.to_string())).map_err(|e| {
        errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })?;

    Ok(principal)
}
