//! Execution block driver
//!
//! An execution block owns one executor and drives it: it allocates an
//! output block, calls `produce_row` until the block is full or upstream
//! is exhausted, and reports the control state to its own caller. Blocks
//! implement `BlockSource`, so they chain child to parent along the plan
//! tree and the top-level driver consumes from the root.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use crate::block::{ItemBlock, OutputRow, RegisterSet};
use crate::fault::{points, FailurePoints};
use crate::fetch::BlockSource;
use crate::observe::Logger;

use super::errors::{ExecError, ExecResult};
use super::executor::Executor;
use super::infos::ExecutorInfos;
use super::state::ExecState;
use super::stats::{ExecStats, QueryStats};

/// Default row capacity of one output block
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Drives one executor and chains to the consumer above it.
///
/// Single-threaded and cooperative: exactly one caller invokes `get_some`
/// at a time, WAITING is the only suspension mechanism, and a suspended
/// call is resumed later with no side effects repeated. The query-wide
/// abort flag is polled between `produce_row` calls.
pub struct ExecutionBlock<E: Executor> {
    executor: E,
    query_id: Uuid,
    nr_output_registers: usize,
    keep: RegisterSet,
    clear: RegisterSet,
    batch_size: usize,
    pending: Option<OutputRow>,
    done: bool,
    abort: Arc<AtomicBool>,
    failure_points: Arc<FailurePoints>,
    stats: QueryStats,
}

impl<E: Executor> ExecutionBlock<E> {
    /// Creates a block driving `executor` under the node configuration
    /// `infos`, aborting when `abort` is set.
    pub fn new(executor: E, infos: &ExecutorInfos, abort: Arc<AtomicBool>) -> Self {
        let query_id = Uuid::new_v4();
        Self {
            executor,
            query_id,
            nr_output_registers: infos.nr_output_registers(),
            keep: infos.registers_to_keep().clone(),
            clear: infos.registers_to_clear().clone(),
            batch_size: DEFAULT_BATCH_SIZE,
            pending: None,
            done: false,
            abort,
            failure_points: FailurePoints::disabled(),
            stats: QueryStats::new(query_id),
        }
    }

    /// Overrides the per-call output block capacity
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Replaces the failure-point hook, for failure-path tests
    pub fn with_failure_points(mut self, hook: Arc<FailurePoints>) -> Self {
        self.failure_points = hook;
        self
    }

    /// The query id this block reports under
    pub fn query_id(&self) -> Uuid {
        self.query_id
    }

    /// Accumulated statistics for this block
    pub fn stats(&self) -> &QueryStats {
        &self.stats
    }

    /// Pulls up to `at_most` result rows from this block.
    ///
    /// Returns `(Waiting, None)` when upstream suspended — the partially
    /// filled output survives and the call is retried later. Returns the
    /// final rows with `Done`; after that every call is `(Done, None)`.
    pub fn get_some(&mut self, at_most: usize) -> ExecResult<(ExecState, Option<Arc<ItemBlock>>)> {
        if self.done {
            return Ok((ExecState::Done, None));
        }
        if at_most == 0 {
            return Err(ExecError::Protocol {
                message: "get_some called with zero capacity".to_string(),
            });
        }

        let capacity = at_most.min(self.batch_size);
        let mut output = self.pending.take().unwrap_or_else(|| {
            OutputRow::new(
                capacity,
                self.nr_output_registers,
                self.keep.clone(),
                self.clear.clone(),
            )
        });

        let mut upstream = ExecState::HasMore;
        while !output.is_full() {
            if self.abort.load(Ordering::Relaxed) {
                let err = ExecError::QueryAborted;
                self.log_fatal(&err);
                return Err(err);
            }

            match self.executor.produce_row(&mut output) {
                Ok((state, delta)) => {
                    self.stats.merge(&delta);
                    match state {
                        ExecState::Waiting => {
                            // Suspend: keep the partial output for re-entry
                            self.pending = Some(output);
                            return Ok((ExecState::Waiting, None));
                        }
                        ExecState::HasMore => {
                            output.advance_row()?;
                        }
                        ExecState::Done => {
                            if output.row_produced() {
                                output.advance_row()?;
                            }
                            upstream = ExecState::Done;
                            break;
                        }
                    }
                }
                Err(err) if !err.is_fatal() => {
                    // Row-level mutation failure: count it, keep the rows
                    // already in the sink, move on to the next row
                    if output.row_produced() {
                        let err = ExecError::Protocol {
                            message: "row-level error after a partial row write".to_string(),
                        };
                        self.log_fatal(&err);
                        return Err(err);
                    }
                    let mut delta = ExecStats::new();
                    delta.incr_errors();
                    self.stats.merge(&delta);
                    Logger::warn(
                        "row_error_tolerated",
                        &[
                            ("code", err.code()),
                            ("node", self.executor.node_type()),
                            ("query_id", &self.query_id.to_string()),
                        ],
                    );
                }
                Err(err) => {
                    self.log_fatal(&err);
                    return Err(err);
                }
            }
        }

        self.failure_points.check(points::BLOCK_BEFORE_SEAL)?;

        let rows = output.rows_written();
        let block = output.into_block();
        if upstream == ExecState::Done {
            self.done = true;
            self.log_done();
            if rows == 0 {
                return Ok((ExecState::Done, None));
            }
            return Ok((ExecState::Done, Some(Arc::new(block))));
        }
        Ok((ExecState::HasMore, Some(Arc::new(block))))
    }

    fn log_fatal(&self, err: &ExecError) {
        Logger::fatal(
            "executor_error",
            &[
                ("code", err.code()),
                ("message", &err.to_string()),
                ("node", self.executor.node_type()),
                ("query_id", &self.query_id.to_string()),
            ],
        );
    }

    fn log_done(&self) {
        Logger::info(
            "block_done",
            &[
                ("calls", &self.stats.calls.to_string()),
                ("counted", &self.stats.counted().to_string()),
                ("node", self.executor.node_type()),
                ("query_id", &self.query_id.to_string()),
                ("row_errors", &self.stats.errors().to_string()),
                ("written", &self.stats.written().to_string()),
            ],
        );
    }
}

impl<E: Executor> BlockSource for ExecutionBlock<E> {
    fn next_block(&mut self, at_most: usize) -> ExecResult<(ExecState, Option<Arc<ItemBlock>>)> {
        self.get_some(at_most)
    }
}
