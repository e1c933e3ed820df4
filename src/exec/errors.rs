//! Pipeline error taxonomy
//!
//! Error codes:
//! - AQUE_REGISTER_OUT_OF_BOUNDS (FATAL)
//! - AQUE_WIDTH_MISMATCH (FATAL)
//! - AQUE_OUTPUT_OVERFLOW (FATAL)
//! - AQUE_ROW_REWRITE (FATAL)
//! - AQUE_UNINITIALIZED_ROW (FATAL)
//! - AQUE_PROTOCOL_VIOLATION (FATAL)
//! - AQUE_INJECTED_FAILURE (FATAL)
//! - AQUE_QUERY_ABORTED (FATAL)
//! - AQUE_ROW_MUTATION_FAILED (ERROR, recoverable per row)
//!
//! Suspension (WAITING) and exhaustion (DONE) are control states, never
//! errors. Fatal errors unwind the block chain by early-return and abort
//! the query; rows already delivered downstream are never retracted.

use std::fmt;

use thiserror::Error;

use crate::block::RegisterId;

/// Severity levels for pipeline errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable at row granularity; the query may continue
    Error,
    /// Internal-consistency failure; the query must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Pipeline error type.
///
/// Configuration and invariant violations indicate a planning or driver
/// bug and are fatal: the register layout the planner produced must agree
/// with the blocks flowing through it, and the driver must never write
/// past capacity or rewrite sealed rows.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Register index outside the block's declared width
    #[error("register {register} out of bounds (width {width})")]
    RegisterOutOfBounds { register: RegisterId, width: usize },

    /// Configured register width disagrees with the incoming block
    #[error("register width mismatch: node expects {expected}, block has {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    /// Write attempted past the output block's row capacity
    #[error("output block overflow: capacity {capacity} exhausted")]
    OutputOverflow { capacity: usize },

    /// A register slot was written twice in the same pass
    #[error("register {register} already written for the current row")]
    RowRewrite { register: RegisterId },

    /// Read through a row view with no block bound
    #[error("read through an uninitialized input row")]
    UninitializedRow,

    /// The control-state protocol was violated by a caller
    #[error("protocol violation: {message}")]
    Protocol { message: String },

    /// A failure point armed by a test fired at a named checkpoint
    #[error("injected failure at checkpoint '{checkpoint}'")]
    InjectedFailure { checkpoint: String },

    /// The query-wide abort flag was set
    #[error("query aborted")]
    QueryAborted,

    /// The storage collaborator reported a failed mutation for one row
    #[error("row mutation failed: {reason}")]
    RowMutationFailed { reason: String },
}

impl ExecError {
    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ExecError::RegisterOutOfBounds { .. } => "AQUE_REGISTER_OUT_OF_BOUNDS",
            ExecError::WidthMismatch { .. } => "AQUE_WIDTH_MISMATCH",
            ExecError::OutputOverflow { .. } => "AQUE_OUTPUT_OVERFLOW",
            ExecError::RowRewrite { .. } => "AQUE_ROW_REWRITE",
            ExecError::UninitializedRow => "AQUE_UNINITIALIZED_ROW",
            ExecError::Protocol { .. } => "AQUE_PROTOCOL_VIOLATION",
            ExecError::InjectedFailure { .. } => "AQUE_INJECTED_FAILURE",
            ExecError::QueryAborted => "AQUE_QUERY_ABORTED",
            ExecError::RowMutationFailed { .. } => "AQUE_ROW_MUTATION_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ExecError::RowMutationFailed { .. } => Severity::Error,
            _ => Severity::Fatal,
        }
    }

    /// Returns whether this error must abort the query
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for pipeline operations
pub type ExecResult<T> = Result<T, ExecError>;
