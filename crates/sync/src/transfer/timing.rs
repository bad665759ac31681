//! Scheduling helpers for the serial app loop
//!
//! Pure timing predicates plus a small timer the loop polls each tick.

use chrono::{DateTime, Utc};

/// Check if at least `period_s` seconds passed since `last_run`.
///
/// A job that never ran is always due.
pub fn interval_elapsed(last_run: Option<DateTime<Utc>>, period_s: u64) -> bool {
    match last_run {
        Some(last) => {
            let elapsed = Utc::now() - last;
            elapsed.num_seconds() >= period_s as i64
        }
        None => true,
    }
}

/// Fixed-interval timer driven by polling
///
/// The first `due` after construction fires immediately; afterwards the
/// timer re-arms when [`mark_run`](Self::mark_run) is called, so a slow
/// job never overlaps with its own next run.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_s: u64,
    last_run: Option<DateTime<Utc>>,
}

impl IntervalTimer {
    pub fn new(period_s: u64) -> Self {
        Self {
            period_s,
            last_run: None,
        }
    }

    /// Is the job due to run now
    pub fn due(&self) -> bool {
        interval_elapsed(self.last_run, self.period_s)
    }

    /// Record that the job just ran
    pub fn mark_run(&mut self) {
        self.last_run = Some(Utc::now());
    }

    /// Change the period; the elapsed time since the last run is kept
    pub fn set_period(&mut self, period_s: u64) {
        self.period_s = period_s;
    }
}
