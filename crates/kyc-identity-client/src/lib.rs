//! # kyc-identity-client -- Identity backend access for the gate
//!
//! The portal does not issue sessions or store credentials. A hosted
//! authentication service does, and this crate is the only path through
//! which the rest of the workspace talks to it.
//!
//! ## Architecture
//!
//! - [`IdentityBackend`] is the narrow interface the gate depends on:
//!   resolve the caller behind a set of session credentials, and fetch a
//!   caller's profile.
//! - [`HostedIdentityClient`] implements it over HTTP against the hosted
//!   service's auth and REST endpoints.
//! - [`InMemoryIdentityBackend`] implements it over in-process maps, for
//!   tests and local development.
//!
//! ## Endpoint Convention
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET    | `/auth/v1/user` | Caller behind an access token |
//! | POST   | `/auth/v1/token?grant_type=refresh_token` | Rotate a session |
//! | GET    | `/rest/v1/profiles?id=eq.{id}` | Role, active flag, tenant |

pub mod backend;
pub mod config;
pub mod error;
pub mod hosted;
pub mod memory;
pub mod types;

pub use backend::IdentityBackend;
pub use config::IdentityBackendConfig;
pub use error::IdentityError;
pub use hosted::HostedIdentityClient;
pub use memory::InMemoryIdentityBackend;
pub use types::{
    AuthenticatedCaller, CallerResolution, SessionCredentials, SessionTokens, SessionUpdate,
};
