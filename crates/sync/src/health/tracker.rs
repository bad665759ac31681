//! In-memory accounting of per-item sync failures
//!
//! Tracks how often the transfer of a given checklist item has failed
//! since it last succeeded, and derives a process-wide health flag.
//! The flag acts as a dead-man's-switch for the health-check ping:
//! once any single item has failed `unhealthy_after` times in a row,
//! pings stop and an external monitor notices their absence.

use log::{error, info};
use std::collections::HashMap;

/// Composite identity of one synchronizable unit: (list name, item text)
///
/// Item text is not a stable id; if a note is reworded, its failure
/// history starts over. Accepted approximation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ErrorKey {
    list: String,
    item: String,
}

impl ErrorKey {
    fn new(list_name: &str, item_name: &str) -> Self {
        Self {
            list: list_name.to_string(),
            item: item_name.to_string(),
        }
    }
}

/// Failure streak for one key since it was last cleared
#[derive(Debug)]
struct ErrorRecord {
    count: u32,
    /// Recorded causes in chronological order; grows until the key succeeds
    causes: Vec<String>,
}

/// Tracks sync errors during runtime, in memory only
///
/// A process restart resets all failure history and health state.
/// Threshold-based hysteresis keeps isolated transient API errors from
/// flapping the health signal while still surfacing items that fail
/// on every pass (e.g. a task the remote service consistently rejects).
pub struct SyncErrorTracker {
    errors: HashMap<ErrorKey, ErrorRecord>,
    healthy: bool,
    unhealthy_after: u32,
}

impl SyncErrorTracker {
    /// Default failure streak after which the tracker reports unhealthy
    pub const DEFAULT_UNHEALTHY_AFTER: u32 = 5;

    /// Create a tracker that turns unhealthy once any single item has
    /// failed `unhealthy_after` times without an intervening success.
    ///
    /// `unhealthy_after` must be at least 1; a zero threshold would mean
    /// "always unhealthy" and is clamped up.
    pub fn new(unhealthy_after: u32) -> Self {
        Self {
            errors: HashMap::new(),
            healthy: true,
            unhealthy_after: unhealthy_after.max(1),
        }
    }

    /// Is the sync subsystem healthy
    pub fn healthy(&self) -> bool {
        self.healthy
    }

    /// Number of items currently carrying a failure streak
    pub fn tracked_errors(&self) -> usize {
        self.errors.len()
    }

    /// Current failure streak for one item (0 if none recorded)
    pub fn failure_count(&self, list_name: &str, item_name: &str) -> u32 {
        self.errors
            .get(&ErrorKey::new(list_name, item_name))
            .map_or(0, |record| record.count)
    }

    /// Record a failed transfer attempt for one item
    ///
    /// Increments the item's streak and appends the cause. Flips the
    /// tracker to unhealthy when the streak reaches the threshold.
    pub fn record_failure(&mut self, list_name: &str, item_name: &str, cause: &anyhow::Error) {
        error!("could not sync '{item_name}' from '{list_name}': {cause:#}");

        let record = self
            .errors
            .entry(ErrorKey::new(list_name, item_name))
            .or_insert(ErrorRecord {
                count: 0,
                causes: Vec::new(),
            });
        record.count += 1;
        record.causes.push(format!("{cause:#}"));

        if record.count >= self.unhealthy_after && self.healthy {
            self.healthy = false;
            error!(
                "unhealthy sync state: '{item_name}' from '{list_name}' failed {} times",
                record.count
            );
        }
    }

    /// Record a completed transfer for one item
    ///
    /// Clears the item's failure history entirely. The tracker recovers
    /// to healthy once no remaining streak is at the threshold.
    pub fn record_success(&mut self, list_name: &str, item_name: &str) {
        self.errors.remove(&ErrorKey::new(list_name, item_name));

        if !self.healthy
            && self
                .errors
                .values()
                .all(|record| record.count < self.unhealthy_after)
        {
            self.healthy = true;
            info!("sync state is healthy again");
        }
    }
}

impl Default for SyncErrorTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_UNHEALTHY_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    const LIST: &str = "mockedList";
    const ITEM: &str = "mockedItem";

    fn err() -> anyhow::Error {
        anyhow!("mocked error")
    }

    #[test]
    fn test_initial_health_state() {
        let tracker = SyncErrorTracker::default();
        assert!(tracker.healthy());
        assert_eq!(tracker.tracked_errors(), 0);
    }

    #[test]
    fn test_unhealthy_after_same_errors() {
        let mut tracker = SyncErrorTracker::new(2);
        tracker.record_failure(LIST, ITEM, &err());
        assert!(tracker.healthy());

        tracker.record_failure(LIST, ITEM, &err());
        assert!(!tracker.healthy());
    }

    #[test]
    fn test_threshold_boundary() {
        // T-1 failures leave the tracker healthy; the T-th flips it
        let mut tracker = SyncErrorTracker::new(4);
        for _ in 0..3 {
            tracker.record_failure(LIST, ITEM, &err());
            assert!(tracker.healthy());
        }
        tracker.record_failure(LIST, ITEM, &err());
        assert!(!tracker.healthy());
    }

    #[test]
    fn test_healthy_after_different_errors() {
        // Distinct keys never combine counts
        let mut tracker = SyncErrorTracker::new(2);
        tracker.record_failure(LIST, ITEM, &err());
        assert!(tracker.healthy());

        tracker.record_failure(LIST, "anotherItem", &err());
        assert!(tracker.healthy());
        assert_eq!(tracker.tracked_errors(), 2);
    }

    #[test]
    fn test_success_without_failure_is_noop() {
        let mut tracker = SyncErrorTracker::new(2);
        tracker.record_success(LIST, ITEM);
        assert!(tracker.healthy());
        assert_eq!(tracker.tracked_errors(), 0);
    }

    #[test]
    fn test_healthy_after_errors_resolved() {
        let mut tracker = SyncErrorTracker::new(2);
        tracker.record_failure(LIST, ITEM, &err());
        assert!(tracker.healthy());

        tracker.record_failure(LIST, ITEM, &err());
        assert!(!tracker.healthy());

        tracker.record_success(LIST, ITEM);
        assert!(tracker.healthy());
    }

    #[test]
    fn test_recovery_blocked_by_other_chronic_key() {
        let mut tracker = SyncErrorTracker::new(2);
        tracker.record_failure(LIST, ITEM, &err());
        tracker.record_failure(LIST, ITEM, &err());
        tracker.record_failure(LIST, "anotherItem", &err());
        tracker.record_failure(LIST, "anotherItem", &err());
        assert!(!tracker.healthy());

        // One chronic key resolved, the other still holds health down
        tracker.record_success(LIST, ITEM);
        assert!(!tracker.healthy());

        tracker.record_success(LIST, "anotherItem");
        assert!(tracker.healthy());
    }

    #[test]
    fn test_failure_then_success_roundtrip() {
        let mut tracker = SyncErrorTracker::new(2);
        tracker.record_failure(LIST, ITEM, &err());
        tracker.record_success(LIST, ITEM);

        assert!(tracker.healthy());
        assert_eq!(tracker.failure_count(LIST, ITEM), 0);
        assert_eq!(tracker.tracked_errors(), 0);
    }

    #[test]
    fn test_groceries_scenario() {
        // Concrete walk-through with T=2: milk turns unhealthy, eggs has a
        // single failure, so resolving milk restores health.
        let mut tracker = SyncErrorTracker::new(2);

        tracker.record_failure("Groceries", "milk", &err());
        assert!(tracker.healthy());

        tracker.record_failure("Groceries", "milk", &err());
        assert!(!tracker.healthy());

        tracker.record_failure("Groceries", "eggs", &err());
        assert!(!tracker.healthy());

        tracker.record_success("Groceries", "milk");
        assert!(tracker.healthy());
        assert_eq!(tracker.failure_count("Groceries", "eggs"), 1);
    }

    #[test]
    fn test_failure_count_accumulates() {
        let mut tracker = SyncErrorTracker::new(10);
        for expected in 1..=3 {
            tracker.record_failure(LIST, ITEM, &err());
            assert_eq!(tracker.failure_count(LIST, ITEM), expected);
        }
    }

    #[test]
    fn test_zero_threshold_clamped() {
        let mut tracker = SyncErrorTracker::new(0);
        assert!(tracker.healthy());
        tracker.record_failure(LIST, ITEM, &err());
        assert!(!tracker.healthy());
    }
}
