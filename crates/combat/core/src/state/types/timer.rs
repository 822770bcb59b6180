//! Wall-clock bookkeeping for per-combatant turn timers.

use serde::{Deserialize, Serialize};

/// Accumulated and live turn time for one combatant.
///
/// `total_time_ms` holds completed turns only. The live span of a running
/// turn is derived from `started_at_ms` at query time and folded into the
/// total when the timer stops.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTimer {
    pub total_time_ms: u64,
    pub is_active: bool,
    pub started_at_ms: Option<u64>,
}

impl TurnTimer {
    /// Fresh zeroed timer, not running.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Fresh timer already running at `now_ms`.
    pub fn running(now_ms: u64) -> Self {
        Self {
            total_time_ms: 0,
            is_active: true,
            started_at_ms: Some(now_ms),
        }
    }

    /// Folds the live span into the total and stops the clock.
    pub fn stop(&mut self, now_ms: u64) {
        self.total_time_ms += self.live_span_ms(now_ms);
        self.is_active = false;
        self.started_at_ms = None;
    }

    /// Starts a new live span without touching the accumulated total.
    pub fn resume(&mut self, now_ms: u64) {
        self.is_active = true;
        self.started_at_ms = Some(now_ms);
    }

    /// Elapsed milliseconds of the current live span, zero when stopped.
    pub fn live_span_ms(&self, now_ms: u64) -> u64 {
        match self.started_at_ms {
            Some(started) if self.is_active => now_ms.saturating_sub(started),
            _ => 0,
        }
    }
}

/// Display-ready view of a timer with the live span already resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerInfo {
    pub total_time_ms: u64,
    pub current_time_ms: u64,
    pub is_active: bool,
}
