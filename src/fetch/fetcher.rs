//! Fetch contracts

use std::sync::Arc;

use crate::block::{InputRow, ItemBlock};
use crate::exec::{ExecResult, ExecState};

/// A producer of item blocks: the child execution block, or a
/// distributed-fetch collaborator awaiting remote replies.
///
/// # Contract
///
/// - Never blocks the calling thread. A source that cannot supply data
///   without blocking I/O returns `(Waiting, None)`; the caller returns
///   control upward and retries later.
/// - A block alongside `Done` is the final block. After that, every call
///   returns `(Done, None)`.
/// - Forward progress is guaranteed: a finite number of WAITING returns is
///   eventually followed by HASMORE or DONE for the same logical request.
pub trait BlockSource {
    /// Pulls the next block of at most `at_most` rows
    fn next_block(&mut self, at_most: usize) -> ExecResult<(ExecState, Option<Arc<ItemBlock>>)>;
}

/// The upstream-pull half of an executor.
///
/// Exactly one of the following holds per `fetch_row` call: a valid row was
/// returned, the state is `Done` with an invalid row, or the state is
/// `Waiting` with an invalid row. A valid row together with `Done` means
/// explicitly "this is the last row"; it is never inferred.
pub trait RowFetcher {
    /// Pulls the next input row
    fn fetch_row(&mut self) -> ExecResult<(ExecState, InputRow)>;

    /// Pulls a whole block, for executors that need block-level access
    fn fetch_block(&mut self, at_most: usize)
        -> ExecResult<(ExecState, Option<Arc<ItemBlock>>)>;
}
