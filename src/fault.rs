//! Failure-point injection for testing failure propagation
//!
//! Tests arm a named checkpoint; the owning executor consults the hook at
//! that checkpoint and fails the call through the normal error taxonomy,
//! exactly like a genuine internal error. With nothing armed, `check` is a
//! no-op fast path, so production pipelines pay nothing.
//!
//! Unlike a process-global switch, the hook is an explicit collaborator:
//! it is handed to the node configuration that owns it and shared via
//! `Arc`, so two pipelines in one process can be armed independently.

use std::collections::HashSet;
use std::sync::Arc;

use crate::exec::{ExecError, ExecResult};

/// A set of armed failure checkpoints, keyed by name
#[derive(Debug, Default)]
pub struct FailurePoints {
    armed: HashSet<String>,
}

impl FailurePoints {
    /// Creates a hook with nothing armed, for normal operation
    pub fn disabled() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a hook with the given checkpoints armed
    pub fn armed(names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            armed: names.iter().map(|n| n.to_string()).collect(),
        })
    }

    /// Returns true if the named checkpoint is armed
    pub fn is_armed(&self, name: &str) -> bool {
        !self.armed.is_empty() && self.armed.contains(name)
    }

    /// Fails with an injected error if the named checkpoint is armed
    pub fn check(&self, name: &str) -> ExecResult<()> {
        if self.armed.is_empty() {
            return Ok(());
        }
        if self.armed.contains(name) {
            return Err(ExecError::InjectedFailure {
                checkpoint: name.to_string(),
            });
        }
        Ok(())
    }
}

/// All defined failure checkpoint names
pub mod points {
    /// Before the modification executor writes its output register
    pub const MODIFICATION_BEFORE_WRITE: &str = "modification_before_write";

    /// Before the execution block seals a finished output block
    pub const BLOCK_BEFORE_SEAL: &str = "block_before_seal";

    /// Get all failure checkpoint names
    pub fn all() -> &'static [&'static str] {
        &[MODIFICATION_BEFORE_WRITE, BLOCK_BEFORE_SEAL]
    }
}
