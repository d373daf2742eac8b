//! # Roles
//!
//! Permission classes assigned to portal users. A role decides which route
//! prefixes a caller may open. The derived `Ord` only keys the policy
//! table; it is not a privilege ranking, since the classes are not nested
//! (a relationship manager can reach `/clients`, which a reviewer cannot,
//! and vice versa for `/review`).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Permission class of a portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator with access to every tenant.
    Superadmin,
    /// Tenant administrator.
    Admin,
    /// Approves or rejects cases prepared by analysts.
    Reviewer,
    /// Works cases, documents and screening alerts.
    Analyst,
    /// Owns the client relationship for onboarding cases.
    #[serde(alias = "relationship-manager")]
    RelationshipManager,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Superadmin,
        Role::Admin,
        Role::Reviewer,
        Role::Analyst,
        Role::RelationshipManager,
    ];

    /// Return the wire representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Admin => "admin",
            Self::Reviewer => "reviewer",
            Self::Analyst => "analyst",
            Self::RelationshipManager => "relationship_manager",
        }
    }

    /// Parse a role from its wire form.
    ///
    /// Accepts the hyphenated spelling of `relationship_manager` as well,
    /// since both appear in backend profile rows.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "superadmin" => Ok(Self::Superadmin),
            "admin" => Ok(Self::Admin),
            "reviewer" => Ok(Self::Reviewer),
            "analyst" => Ok(Self::Analyst),
            "relationship_manager" | "relationship-manager" => Ok(Self::RelationshipManager),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
