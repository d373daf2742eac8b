#![deny(missing_docs)]

//! # kyc-core -- Foundational Types for the KYC Portal Access Gate
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It performs no I/O and has no internal crate dependencies -- only
//! `serde`, `thiserror`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** You cannot pass a [`TenantId`]
//!    where a [`UserId`] is expected.
//!
//! 2. **One [`Role`] enum.** Every permission class is a variant, and the
//!    [`RouteAccessPolicy`] is validated to cover all of them.
//!
//! 3. **The policy is a value, not a global.** It is built once at process
//!    start, validated, and handed to the gate behind an `Arc`.
//!
//! 4. **Structured errors.** [`ValidationError`] and [`PolicyError`] are
//!    `thiserror` enums -- no `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod policy;
pub mod profile;
pub mod role;
pub mod route;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{PolicyError, ValidationError};
pub use identity::{TenantId, UserId};
pub use policy::RouteAccessPolicy;
pub use profile::{Admission, CallerProfile, DenyReason, TenantRef};
pub use role::Role;
pub use route::{normalize_path, path_has_prefix, PublicRoutes};
