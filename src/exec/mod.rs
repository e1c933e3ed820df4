//! Executor subsystem for aqueduct
//!
//! An executor implements one physical plan node's per-row transformation:
//! it pulls at most one input row from its fetcher, writes at most one
//! output row, and reports the WAITING/HASMORE/DONE control state upward.
//! Execution blocks drive executors and chain child to parent to match the
//! plan tree.
//!
//! # Invariants
//!
//! - DONE is terminal and idempotent
//! - WAITING calls leave the output sink untouched
//! - Rows come out in the exact order they were fetched
//! - Configuration/width violations fail fast, never silently

mod block;
mod errors;
mod executor;
mod infos;
mod modification;
mod state;
mod stats;

pub use block::{ExecutionBlock, DEFAULT_BATCH_SIZE};
pub use errors::{ExecError, ExecResult, Severity};
pub use executor::Executor;
pub use infos::ExecutorInfos;
pub use modification::{ModificationExecutor, ModificationInfos};
pub use state::ExecState;
pub use stats::{ExecStats, QueryStats};
