//! Minimum-interval gate for outbound requests.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

/// Default spacing between history requests.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Keeps successive requests at least `min_interval` apart.
///
/// The first acquisition never waits. Each caller reserves the next free slot
/// under the lock and sleeps outside it, so concurrent callers queue up in
/// order instead of all waking at once.
#[derive(Debug)]
pub struct RequestGate {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Lock the slot mutex, recovering from poison if necessary.
    fn lock_slot(&self) -> MutexGuard<'_, Option<Instant>> {
        self.next_slot.lock().unwrap_or_else(|poisoned| {
            warn!("Request gate mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Reserve a slot, returning when it may be used.
    fn reserve(&self) -> Instant {
        let now = Instant::now();
        let mut next_slot = self.lock_slot();

        let slot = match *next_slot {
            Some(slot) if slot > now => slot,
            _ => now,
        };
        *next_slot = Some(slot + self.min_interval);
        slot
    }

    /// Wait until a request may be issued.
    pub async fn acquire(&self) {
        let slot = self.reserve();
        let wait = slot.saturating_duration_since(Instant::now());

        if wait > Duration::ZERO {
            debug!("Request gate: waiting {:?}", wait);
            tokio::time::sleep_until(slot).await;
        }
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
