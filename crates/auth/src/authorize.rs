use std::collections::HashSet;

use thiserror::Error;

use crate::{Permission, Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    #[error("forbidden: requires role '{0}'")]
    MissingRole(String),
}

/// Authorize a principal against a required permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = principal.permissions.iter().map(|p| p.as_str()).collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Require the `admin` role (deletions, bulk clears, role changes).
pub fn require_admin(principal: &Principal) -> Result<(), AuthzError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::MissingRole(Role::admin().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrincipalId;

    fn principal(roles: Vec<Role>, permissions: Vec<Permission>) -> Principal {
        Principal::new(PrincipalId::new(), roles, permissions)
    }

    #[test]
    fn wildcard_grants_everything() {
        let p = principal(vec![Role::admin()], vec![Permission::new("*")]);
        assert!(authorize(&p, &Permission::new("kits.write")).is_ok());
        assert!(authorize(&p, &Permission::new("assignments.clear")).is_ok());
    }

    #[test]
    fn exact_permission_grants_only_itself() {
        let p = principal(vec![Role::member()], vec![Permission::new("kits.read")]);
        assert!(authorize(&p, &Permission::new("kits.read")).is_ok());
        let err = authorize(&p, &Permission::new("kits.write")).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("kits.write".to_string()));
    }

    #[test]
    fn require_admin_rejects_non_admin_roles() {
        let p = principal(vec![Role::user()], vec![Permission::new("kits.write")]);
        assert!(require_admin(&p).is_err());

        let p = principal(vec![Role::admin()], vec![]);
        assert!(require_admin(&p).is_ok());
    }
}
