//! # Route Modules
//!
//! - `health` -- liveness, readiness, and gate counters under `/api`.
//!   Public: the gate never looks up a caller for these.
//! - `pages` -- the landing page, the sign-in page, and the protected page
//!   fallback that renders for every other path the gate lets through.

pub mod health;
pub mod pages;
