//! Shared station state behind a bounded-wait gate.

use crate::error::{Result, StationError};
use crate::station::data::Reading;
use crate::telemetry::token::AccessToken;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

/// Everything the station gate protects.
///
/// The reading and the outbound credential share one synchronization domain
/// on purpose: a cycle's message construction and credential capture must
/// not interleave with a renewal (see DESIGN.md).
#[derive(Debug)]
pub struct StationInner {
    pub reading: Reading,
    pub token: AccessToken,
}

/// Tick accounting for the two periodic loops.
#[derive(Debug, Default)]
pub struct StationStats {
    pub samples: AtomicU64,
    pub skipped_ticks: AtomicU64,
    pub renewals: AtomicU64,
    pub skipped_renewals: AtomicU64,
}

/// Owned container for the shared reading and credential.
///
/// All mutation goes through [`acquire`](StationState::acquire); readers use
/// [`snapshot`](StationState::snapshot), which takes the same lock rather
/// than reading lock-free, so a snapshot always reflects exactly one
/// acquisition cycle.
#[derive(Clone)]
pub struct StationState {
    inner: Arc<Mutex<StationInner>>,
    stats: Arc<StationStats>,
}

impl StationState {
    /// Create the station state with a zero-valued reading and the initial
    /// outbound credential.
    pub fn new(token: AccessToken) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StationInner {
                reading: Reading::default(),
                token,
            })),
            stats: Arc::new(StationStats::default()),
        }
    }

    /// Acquire the station gate, waiting at most `timeout`.
    ///
    /// On timeout the caller skips its cycle entirely; there is no partial
    /// update and no retry until the next scheduled tick.
    pub async fn acquire(&self, timeout: Duration) -> Result<MutexGuard<'_, StationInner>> {
        tokio::time::timeout(timeout, self.inner.lock())
            .await
            .map_err(|_| StationError::LockTimeout)
    }

    /// Synchronized clone of the current reading for the HTTP responder.
    pub async fn snapshot(&self) -> Reading {
        self.inner.lock().await.reading.clone()
    }

    /// Synchronized clone of the current outbound credential.
    pub async fn current_token(&self) -> AccessToken {
        self.inner.lock().await.token.clone()
    }

    /// Record the outcome of one completed telemetry send.
    pub async fn record_send_outcome(&self, ok: bool) {
        self.inner.lock().await.reading.last_send_ok = Some(ok);
    }

    pub fn stats(&self) -> &StationStats {
        &self.stats
    }

    pub(crate) fn count_sample(&self) {
        self.stats.samples.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_skipped_tick(&self) {
        self.stats.skipped_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_renewal(&self) {
        self.stats.renewals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_skipped_renewal(&self) {
        self.stats.skipped_renewals.fetch_add(1, Ordering::Relaxed);
    }
}
