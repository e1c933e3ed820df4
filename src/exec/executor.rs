//! The generic executor contract

use crate::block::OutputRow;

use super::errors::ExecResult;
use super::state::ExecState;
use super::stats::ExecStats;

/// One physical plan node's per-row transformation.
///
/// The execution block is generic over this trait; each concrete kind
/// (modification, filter, calculation, ...) implements it independently.
///
/// # Contract
///
/// `produce_row` is called only against a sink with remaining capacity. It
/// pulls at most one input row via the node's fetcher and:
///
/// - on WAITING from upstream, returns `(Waiting, empty delta)` without
///   touching the sink — the call must be a no-op so it can be retried;
/// - on exhaustion with no row, returns `(Done, empty delta)`;
/// - otherwise writes exactly one row to the sink, accumulates its stats
///   delta, and returns the upstream state unchanged. WAITING is never
///   converted into DONE or vice versa.
///
/// Configuration/width disagreements with the incoming block are fatal
/// planner bugs, reported through `ExecResult`, never papered over.
pub trait Executor {
    /// Node-type name used in log events
    fn node_type(&self) -> &'static str;

    /// Produces at most one output row
    fn produce_row(&mut self, output: &mut OutputRow) -> ExecResult<(ExecState, ExecStats)>;
}
