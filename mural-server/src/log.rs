//! Append-only stroke update log with differential queries.
//!
//! Records are kept in id order (which is also time order, since the
//! board assigns ids monotonically at submission time). Lagging clients
//! catch up by asking for everything newer than their cursor; the log
//! only has to retain strokes long enough for that, so old entries are
//! trimmed from the front once a snapshot has made them durable.

use std::collections::VecDeque;

/// One recorded stroke.
///
/// The color and polyline are stored exactly as submitted and echoed
/// verbatim to polling clients; only the rasterizer interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    /// Monotonic id, assigned by the board at append time. Never reused.
    pub id: u64,
    /// Submitting user.
    pub user: u32,
    /// Brush diameter as submitted.
    pub brush_size: u32,
    /// Color hex string as submitted.
    pub color_hex: String,
    /// Polyline text as submitted.
    pub polyline: String,
    /// Submission time, unix epoch milliseconds.
    pub timestamp_ms: u64,
}

impl UpdateRecord {
    /// Render the record as one diff line: `<id> <size> <color> <polyline>`.
    #[must_use]
    pub fn wire_line(&self) -> String {
        format!(
            "{} {} {} {}\n",
            self.id, self.brush_size, self.color_hex, self.polyline
        )
    }
}

/// Ordered sequence of stroke records.
///
/// The board is the sole writer and assigns strictly increasing ids, so
/// insertion order, id order, and time order all coincide. That is what
/// lets [`UpdateLog::prune_older_than`] trim a prefix instead of
/// scanning the whole log.
#[derive(Debug, Default)]
pub struct UpdateLog {
    records: VecDeque<UpdateRecord>,
}

impl UpdateLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. The caller must assign an id greater than every
    /// id already in the log.
    pub fn append(&mut self, record: UpdateRecord) {
        debug_assert!(
            self.records.back().map_or(true, |last| last.id < record.id),
            "update ids must be strictly increasing"
        );
        self.records.push_back(record);
    }

    /// Records newer than `last_seen` that were not submitted by `user`,
    /// in ascending id order.
    pub fn newer_for(&self, user: u32, last_seen: u64) -> impl Iterator<Item = &UpdateRecord> {
        self.records
            .iter()
            .filter(move |record| record.user != user && record.id > last_seen)
    }

    /// Drop records older than `max_age_ms` from the front of the log.
    ///
    /// Stops at the first record still inside the window; later records
    /// are at least as new, so nothing past it can be expired.
    pub fn prune_older_than(&mut self, max_age_ms: u64, now_ms: u64) {
        while let Some(front) = self.records.front() {
            if now_ms.saturating_sub(front.timestamp_ms) > max_age_ms {
                self.records.pop_front();
            } else {
                break;
            }
        }
    }

    /// Number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log retains no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, user: u32, timestamp_ms: u64) -> UpdateRecord {
        UpdateRecord {
            id,
            user,
            brush_size: 8,
            color_hex: "ff0000".to_string(),
            polyline: "10,10,20,20".to_string(),
            timestamp_ms,
        }
    }

    #[test]
    fn test_newer_for_filters_own_and_seen_records() {
        let mut log = UpdateLog::new();
        log.append(record(1, 7, 100));
        log.append(record(2, 3, 200));
        log.append(record(3, 7, 300));
        log.append(record(4, 5, 400));

        // User 7 never sees its own strokes, and nothing at or below
        // the cursor.
        let ids: Vec<u64> = log.newer_for(7, 2).map(|r| r.id).collect();
        assert_eq!(ids, vec![4]);

        let ids: Vec<u64> = log.newer_for(7, 0).map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_newer_for_returns_ascending_ids() {
        let mut log = UpdateLog::new();
        for id in 1..=5 {
            log.append(record(id, 1, id * 100));
        }

        let ids: Vec<u64> = log.newer_for(9, 0).map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_prune_removes_only_expired_prefix() {
        let mut log = UpdateLog::new();
        log.append(record(1, 1, 1_000));
        log.append(record(2, 1, 6_000));
        log.append(record(3, 1, 11_000));

        // At t=16_000 with a 10s window: 15s old goes, 10s old stays
        // (the cutoff is strictly older-than).
        log.prune_older_than(10_000, 16_000);

        let ids: Vec<u64> = log.newer_for(9, 0).map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_prune_on_empty_log_is_a_no_op() {
        let mut log = UpdateLog::new();
        log.prune_older_than(10_000, 99_999);
        assert!(log.is_empty());
    }

    #[test]
    fn test_prune_can_empty_the_log() {
        let mut log = UpdateLog::new();
        log.append(record(1, 1, 100));
        log.append(record(2, 1, 200));
        log.prune_older_than(1_000, 50_000);
        assert!(log.is_empty());
    }

    #[test]
    fn test_wire_line_format() {
        let r = record(42, 1, 0);
        assert_eq!(r.wire_line(), "42 8 ff0000 10,10,20,20\n");
    }

    #[test]
    fn test_record_timestamps_in_the_future_are_not_pruned() {
        let mut log = UpdateLog::new();
        log.append(record(1, 1, 90_000));
        // now < timestamp (clock skew); the age saturates to zero.
        log.prune_older_than(10_000, 80_000);
        assert_eq!(log.len(), 1);
    }
}
