//! Transaction timer configuration and Timer J bookkeeping.
//!
//! RFC 3261 Section 17.2.2 keeps a completed non-INVITE server transaction
//! alive for Timer J so that late request retransmissions still get the
//! stored final response instead of spawning a fresh transaction. This
//! module holds the standard duration configuration and the per-transaction
//! bookkeeping; the firing itself is driven by an external scheduler that
//! compares the current time against [`TimerJ::deadline`] and dispatches
//! [`SipEvent::TimerJFired`](crate::transaction::SipEvent::TimerJFired).
//! A fire that arrives after termination is dropped by the transition
//! table, so arming and clearing need no cancellation handshake.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Standard RFC 3261 timer durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// T1, the round-trip time estimate (default 500 ms).
    pub t1: Duration,
    /// T2, the maximum retransmission interval (default 4 s).
    pub t2: Duration,
    /// T4, the maximum message lifetime in the network (default 5 s).
    pub t4: Duration,
    /// Timer J, the post-completion wait (64*T1 = 32 s for unreliable
    /// transports, zero for reliable ones).
    pub wait_time_j: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            t1: Duration::from_millis(500),
            t2: Duration::from_secs(4),
            t4: Duration::from_secs(5),
            wait_time_j: Duration::from_secs(32),
        }
    }
}

impl TimerSettings {
    /// Settings for a reliable transport: no retransmissions can arrive, so
    /// Timer J collapses to zero and completed transactions die immediately.
    pub fn for_reliable_transport() -> Self {
        Self {
            wait_time_j: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Timer J state for one transaction: armed on entering Completed, cleared
/// on termination.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerJ {
    pub start: Option<Instant>,
    pub length: Option<Duration>,
}

impl TimerJ {
    /// Record the arming timestamp. Idempotence is the caller's concern:
    /// the state machine only arms when not already Completed.
    pub fn arm(&mut self, length: Duration) {
        self.start = Some(Instant::now());
        self.length = Some(length);
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.length = None;
    }

    pub fn is_armed(&self) -> bool {
        self.start.is_some()
    }

    /// When the external scheduler should deliver the fire event.
    pub fn deadline(&self) -> Option<Instant> {
        Some(self.start? + self.length?)
    }
}
