//! Execution statistics
//!
//! Counters only, monotonic, exact. A delta is produced per `produce_row`
//! call, owned by the caller after return, and merged additively into the
//! query-wide accumulator. Deltas are never shared or mutated concurrently.

use serde::Serialize;
use uuid::Uuid;

/// Incremental statistics returned by one `produce_row` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecStats {
    /// Rows counted by a counting node (`do_count`)
    pub counted: u64,
    /// Rows written to an output block
    pub written: u64,
    /// Rows dropped by a filtering node
    pub filtered: u64,
    /// Row-level mutation failures tolerated by configuration
    pub errors: u64,
}

impl ExecStats {
    /// Creates an empty delta
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counted-rows counter
    pub fn incr_counted(&mut self) {
        self.counted += 1;
    }

    /// Increments the written-rows counter
    pub fn incr_written(&mut self) {
        self.written += 1;
    }

    /// Increments the filtered-rows counter
    pub fn incr_filtered(&mut self) {
        self.filtered += 1;
    }

    /// Increments the row-error counter
    pub fn incr_errors(&mut self) {
        self.errors += 1;
    }

    /// Returns true if every counter is zero
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Adds another delta into this one
    pub fn merge(&mut self, other: &ExecStats) {
        self.counted += other.counted;
        self.written += other.written;
        self.filtered += other.filtered;
        self.errors += other.errors;
    }
}

/// Query-wide statistics accumulator.
///
/// Append/merge-only: deltas flow in from execution blocks, final counts
/// flow out for query reporting.
#[derive(Debug, Clone, Serialize)]
pub struct QueryStats {
    /// Query this accumulator belongs to
    pub query_id: Uuid,
    /// Summed deltas
    pub totals: ExecStats,
    /// Number of `produce_row` calls observed
    pub calls: u64,
}

impl QueryStats {
    /// Creates an empty accumulator for `query_id`
    pub fn new(query_id: Uuid) -> Self {
        Self {
            query_id,
            totals: ExecStats::default(),
            calls: 0,
        }
    }

    /// Merges one call's delta
    pub fn merge(&mut self, delta: &ExecStats) {
        self.totals.merge(delta);
        self.calls += 1;
    }

    /// Returns the total rows counted
    pub fn counted(&self) -> u64 {
        self.totals.counted
    }

    /// Returns the total rows written
    pub fn written(&self) -> u64 {
        self.totals.written
    }

    /// Returns the total row-level errors tolerated
    pub fn errors(&self) -> u64 {
        self.totals.errors
    }
}
