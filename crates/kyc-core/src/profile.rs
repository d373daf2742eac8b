//! # Caller Profile
//!
//! The per-request view of a user: role, active flag, and tenant. Profiles
//! are fetched fresh from the identity backend for every gated request and
//! dropped when the request's evaluation ends.

use serde::{Deserialize, Serialize};

use crate::identity::{TenantId, UserId};
use crate::role::Role;

/// Reference to the tenant a user belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRef {
    /// Tenant identifier.
    pub id: TenantId,
    /// Whether the tenant is administratively enabled.
    pub is_active: bool,
}

/// Profile of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerProfile {
    /// The user this profile belongs to.
    pub user_id: UserId,
    /// Permission class.
    pub role: Role,
    /// Whether the user account is administratively enabled.
    pub is_active: bool,
    /// Owning tenant. A missing tenant is treated as disabled.
    pub tenant: Option<TenantRef>,
}

/// Why an account may not enter the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The user account is disabled.
    UserInactive,
    /// The owning tenant is disabled.
    TenantInactive,
    /// The profile references no tenant.
    TenantMissing,
}

impl DenyReason {
    /// Short machine-readable label, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserInactive => "user_inactive",
            Self::TenantInactive => "tenant_inactive",
            Self::TenantMissing => "tenant_missing",
        }
    }
}

/// Outcome of the account-level check, evaluated before any route check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// User and tenant are both enabled; carries the tenant.
    Admitted(TenantId),
    /// The account may not enter, whatever its role.
    Denied(DenyReason),
}

impl CallerProfile {
    /// Decide whether this account may enter the portal at all.
    ///
    /// A disabled tenant is reported ahead of a disabled user: disabling a
    /// tenant locks out every one of its users regardless of their flags.
    pub fn admission(&self) -> Admission {
        match self.tenant {
            None => Admission::Denied(DenyReason::TenantMissing),
            Some(TenantRef {
                is_active: false, ..
            }) => Admission::Denied(DenyReason::TenantInactive),
            Some(_) if !self.is_active => Admission::Denied(DenyReason::UserInactive),
            Some(TenantRef { id, .. }) => Admission::Admitted(id),
        }
    }

    /// Tenant identifier, if any.
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant.map(|t| t.id)
    }
}
