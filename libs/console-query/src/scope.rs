//! Role and tenant affiliation of the signed-in actor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Console role of the signed-in user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Customer,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projection of the tenant an actor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRef {
    pub id: u64,
}

/// The signed-in user as seen by the scoping rules.
///
/// Only `role` and `tenant.id` drive decisions. Scoping here is a client-side
/// convenience; the services enforce access on their own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub role: Role,
    #[serde(default)]
    pub tenant: Option<TenantRef>,
}

impl Actor {
    #[must_use]
    pub fn admin(id: u64) -> Self {
        Self {
            id,
            role: Role::Admin,
            tenant: None,
        }
    }

    #[must_use]
    pub fn manager(id: u64, tenant_id: u64) -> Self {
        Self {
            id,
            role: Role::Manager,
            tenant: Some(TenantRef { id: tenant_id }),
        }
    }

    #[must_use]
    pub fn customer(id: u64) -> Self {
        Self {
            id,
            role: Role::Customer,
            tenant: None,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<u64> {
        self.tenant.map(|t| t.id)
    }
}
