//! Execution control states

use std::fmt;

/// Control state flowing bottom-up through the executor chain.
///
/// Exactly one state accompanies every fetch and every produced row. The
/// state is recomputed on each call and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// Upstream cannot supply data without blocking I/O; the caller must
    /// return control upward and retry later. Never surfaced to the user.
    Waiting,
    /// A row or block was produced and more may follow.
    HasMore,
    /// Upstream is exhausted. A row alongside DONE is the last row;
    /// every subsequent call keeps returning DONE with no data.
    Done,
}

impl ExecState {
    /// Returns the string representation used in log events
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecState::Waiting => "WAITING",
            ExecState::HasMore => "HASMORE",
            ExecState::Done => "DONE",
        }
    }
}

impl fmt::Display for ExecState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
