//! Per-node executor configuration

use crate::block::{RegisterId, RegisterSet};

use super::errors::ExecResult;

/// Immutable per-plan-node configuration, fixed at plan-compile time.
///
/// The planner guarantees that the register indices it hands over are valid
/// against the block layout it also produced; this type re-checks that
/// contract once, at construction, and fails fast on violation. After
/// construction an `ExecutorInfos` is shared by reference across every
/// block the node processes and never mutated.
#[derive(Debug, Clone)]
pub struct ExecutorInfos {
    input_registers: RegisterSet,
    output_registers: RegisterSet,
    nr_input_registers: usize,
    nr_output_registers: usize,
    registers_to_clear: RegisterSet,
    registers_to_keep: RegisterSet,
}

impl ExecutorInfos {
    /// Builds and validates node configuration.
    ///
    /// `read` and `write` are the registers this node reads and writes;
    /// `clear` names registers whose values die at this node, `keep` names
    /// registers copied through on whole-row copies.
    pub fn new(
        read: &[RegisterId],
        write: &[RegisterId],
        nr_input_registers: usize,
        nr_output_registers: usize,
        clear: &[RegisterId],
        keep: &[RegisterId],
    ) -> ExecResult<Self> {
        Ok(Self {
            input_registers: RegisterSet::from_indices(nr_input_registers, read)?,
            output_registers: RegisterSet::from_indices(nr_output_registers, write)?,
            nr_input_registers,
            nr_output_registers,
            registers_to_clear: RegisterSet::from_indices(nr_input_registers, clear)?,
            registers_to_keep: RegisterSet::from_indices(nr_input_registers, keep)?,
        })
    }

    /// Registers this node reads
    pub fn input_registers(&self) -> &RegisterSet {
        &self.input_registers
    }

    /// Registers this node writes
    pub fn output_registers(&self) -> &RegisterSet {
        &self.output_registers
    }

    /// Register width of incoming blocks
    pub fn nr_input_registers(&self) -> usize {
        self.nr_input_registers
    }

    /// Register width of outgoing blocks
    pub fn nr_output_registers(&self) -> usize {
        self.nr_output_registers
    }

    /// Registers whose values are dropped at this node
    pub fn registers_to_clear(&self) -> &RegisterSet {
        &self.registers_to_clear
    }

    /// Registers copied through on whole-row copies
    pub fn registers_to_keep(&self) -> &RegisterSet {
        &self.registers_to_keep
    }
}
