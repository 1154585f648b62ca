use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles are intentionally opaque strings at this layer; mapping roles to
/// permissions is done by the caller/policy layer. The hosted auth provider
/// grants one of three roles: `admin`, `user`, `member`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Full access, including deletions and bulk-clear operations.
    pub fn admin() -> Self {
        Self(Cow::Borrowed("admin"))
    }

    /// Day-to-day access: reads plus non-administrative writes.
    pub fn user() -> Self {
        Self(Cow::Borrowed("user"))
    }

    /// Read-only access.
    pub fn member() -> Self {
        Self(Cow::Borrowed("member"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == "admin"
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
