//! # Gate Metrics
//!
//! In-process atomic counters of gate outcomes, served as JSON at
//! `/api/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::gate::{GateDecision, SignInReason};

#[derive(Debug, Default)]
struct Counters {
    bypassed: AtomicU64,
    forwarded: AtomicU64,
    sign_in_redirects: AtomicU64,
    lookup_failures: AtomicU64,
    inactive_redirects: AtomicU64,
    landing_redirects: AtomicU64,
}

/// Shared metrics state. Clones share counters.
#[derive(Debug, Clone, Default)]
pub struct GateMetrics {
    counters: Arc<Counters>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateMetricsSnapshot {
    pub bypassed: u64,
    pub forwarded: u64,
    pub sign_in_redirects: u64,
    /// Subset of `sign_in_redirects` caused by a failed backend lookup.
    pub lookup_failures: u64,
    pub inactive_redirects: u64,
    pub landing_redirects: u64,
}

impl GateMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one gate decision.
    pub fn record(&self, decision: &GateDecision) {
        let c = &self.counters;
        let counter = match decision {
            GateDecision::Bypass => &c.bypassed,
            GateDecision::Forward(_) => &c.forwarded,
            GateDecision::SignIn(reason) => {
                if *reason == SignInReason::LookupFailed {
                    c.lookup_failures.fetch_add(1, Ordering::Relaxed);
                }
                &c.sign_in_redirects
            }
            GateDecision::AccountInactive { .. } => &c.inactive_redirects,
            GateDecision::Landing { .. } => &c.landing_redirects,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GateMetricsSnapshot {
        let c = &self.counters;
        GateMetricsSnapshot {
            bypassed: c.bypassed.load(Ordering::Relaxed),
            forwarded: c.forwarded.load(Ordering::Relaxed),
            sign_in_redirects: c.sign_in_redirects.load(Ordering::Relaxed),
            lookup_failures: c.lookup_failures.load(Ordering::Relaxed),
            inactive_redirects: c.inactive_redirects.load(Ordering::Relaxed),
            landing_redirects: c.landing_redirects.load(Ordering::Relaxed),
        }
    }
}
