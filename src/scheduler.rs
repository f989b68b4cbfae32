//! Fixed-cadence frame throttle
//!
//! The host may tick tens of times per second. Only the first cycle after
//! each `interval` is armed; every other cycle is suppressed. The throttle is
//! leading-edge: the very first cycle always emits.

use std::time::{Duration, Instant};

/// Default interval between emitted frames
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Whether the current cycle emits a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDecision {
    Armed,
    Suppressed,
}

/// Decides which host cycles emit a frame
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    last_emit: Option<Instant>,
    decision: CycleDecision,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            decision: CycleDecision::Suppressed,
        }
    }

    /// Start a cycle at `now` and decide whether it will emit
    pub fn begin_cycle(&mut self, now: Instant) -> CycleDecision {
        let armed = match self.last_emit {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };

        self.decision = if armed {
            self.last_emit = Some(now);
            CycleDecision::Armed
        } else {
            CycleDecision::Suppressed
        };
        self.decision
    }

    /// Finish the cycle. Returns true if a frame should be emitted now.
    ///
    /// The decision is consumed, so an end without a matching start never
    /// emits.
    pub fn end_cycle(&mut self) -> bool {
        let armed = self.decision == CycleDecision::Armed;
        self.decision = CycleDecision::Suppressed;
        armed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_emit(&self) -> Option<Instant> {
        self.last_emit
    }
}
