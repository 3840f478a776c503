/*!
 * Lock-Free Scheduler Statistics
 * Atomic counters readable without holding the device queue lock
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Point-in-time view of the scheduler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoSchedStats {
    pub admitted: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub untracked: u64,
    pub dispatched: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub expired_dispatches: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub merged: u64,
    pub queued: usize,
}

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

/// Atomic scheduler statistics
///
/// # Performance
/// - Cache-line aligned to prevent false sharing with the scheduler state
/// - Relaxed ordering throughout; a snapshot is consistent per counter only
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct AtomicIoSchedStats {
    admitted: AtomicU64,
    untracked: AtomicU64,
    dispatched: AtomicU64,
    expired_dispatches: AtomicU64,
    merged: AtomicU64,
    queued: AtomicUsize,
}

impl AtomicIoSchedStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub(crate) fn inc_admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_untracked(&self) {
        self.untracked.fetch_add(1, Ordering::Relaxed);
    }

    /// Hot path - called on every successful dispatch
    #[inline(always)]
    pub(crate) fn inc_dispatched(&self, expired: bool) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        if expired {
            self.expired_dispatches.fetch_add(1, Ordering::Relaxed);
        }
        self.queued.fetch_sub(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_merged(&self) {
        self.merged.fetch_add(1, Ordering::Relaxed);
        self.queued.fetch_sub(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn snapshot(&self) -> IoSchedStats {
        IoSchedStats {
            admitted: self.admitted.load(Ordering::Relaxed),
            untracked: self.untracked.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            expired_dispatches: self.expired_dispatches.load(Ordering::Relaxed),
            merged: self.merged.load(Ordering::Relaxed),
            queued: self.queued.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_track_queue_depth() {
        let stats = AtomicIoSchedStats::new();
        stats.inc_admitted();
        stats.inc_admitted();
        stats.inc_admitted();
        stats.inc_dispatched(false);
        stats.inc_dispatched(true);
        stats.inc_untracked();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.admitted, 3);
        assert_eq!(snapshot.dispatched, 2);
        assert_eq!(snapshot.expired_dispatches, 1);
        assert_eq!(snapshot.untracked, 1);
        assert_eq!(snapshot.queued, 1);
    }

    #[test]
    fn test_zero_counters_skipped_in_json() {
        let json = serde_json::to_string(&IoSchedStats::default()).unwrap();
        assert!(!json.contains("merged"));
        assert!(json.contains("\"dispatched\":0"));
    }
}
