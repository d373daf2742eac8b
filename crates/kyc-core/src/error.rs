//! # Error Hierarchy
//!
//! Structured error types for the domain layer, built with `thiserror`.
//! Each variant carries the offending value so operators can act on the
//! message without a debugger.

use thiserror::Error;

use crate::role::Role;

/// Domain primitive validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A role string did not name any known role.
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// An identifier string was not a valid UUID.
    #[error("invalid {kind} identifier {value:?}")]
    InvalidIdentifier {
        /// Which identifier was being parsed (e.g. "user", "tenant").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Route-access policy construction failure.
///
/// Raised at process start when the policy table is inconsistent; a policy
/// that constructs successfully upholds every invariant for its lifetime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A role has no entry in the table.
    #[error("role '{}' has no route-access entry", .0.as_str())]
    MissingRole(Role),

    /// A role's prefix list is empty, so it has no default landing path.
    #[error("role '{}' has an empty prefix list", .0.as_str())]
    EmptyPrefixes(Role),

    /// A prefix is not an absolute path.
    #[error("role '{}' has relative prefix {prefix:?}; prefixes must start with '/'", .role.as_str())]
    RelativePrefix {
        /// The role owning the prefix.
        role: Role,
        /// The rejected prefix.
        prefix: String,
    },
}
