//! Write-side row cursor

use crate::exec::{ExecError, ExecResult};

use super::batch::ItemBlock;
use super::input_row::InputRow;
use super::registers::{RegisterId, RegisterSet};
use super::value::RowValue;

/// A cursor into an item block being built.
///
/// Exactly one row is open for writing at a time. An executor writes the
/// open row with `set_value` or `copy_row`; the driver seals it with
/// `advance_row`. Sealed rows can never be rewritten, and writes past
/// capacity fail loudly.
#[derive(Debug)]
pub struct OutputRow {
    block: ItemBlock,
    next_row: usize,
    produced: bool,
    keep: RegisterSet,
    clear: RegisterSet,
}

impl OutputRow {
    /// Creates a sink over a fresh block of `capacity` rows and `registers`
    /// slots each.
    ///
    /// `keep` and `clear` govern whole-row copy-through: `copy_row` copies
    /// exactly the kept input registers minus the cleared ones.
    pub fn new(capacity: usize, registers: usize, keep: RegisterSet, clear: RegisterSet) -> Self {
        Self {
            block: ItemBlock::new(capacity, registers),
            next_row: 0,
            produced: false,
            keep,
            clear,
        }
    }

    /// Writes `value` into `register` of the open row
    pub fn set_value(&mut self, register: RegisterId, value: RowValue) -> ExecResult<()> {
        if self.is_full() {
            return Err(ExecError::OutputOverflow {
                capacity: self.block.rows(),
            });
        }
        self.block.set_value(self.next_row, register, value)?;
        self.produced = true;
        Ok(())
    }

    /// Copies an input row through to the open row.
    ///
    /// Copies every register in the keep set that is not in the clear set;
    /// unset input slots stay unset. The copy is refcount-cheap.
    pub fn copy_row(&mut self, input: &InputRow) -> ExecResult<()> {
        if self.is_full() {
            return Err(ExecError::OutputOverflow {
                capacity: self.block.rows(),
            });
        }
        let kept: Vec<RegisterId> = self
            .keep
            .iter()
            .filter(|&register| !self.clear.contains(register))
            .collect();
        for register in kept {
            if let Some(value) = input.value(register)? {
                self.block.set_value(self.next_row, register, value.clone())?;
            }
        }
        self.produced = true;
        Ok(())
    }

    /// Returns true if the open row has been written this pass
    pub fn row_produced(&self) -> bool {
        self.produced
    }

    /// Seals the open row and moves the cursor to the next one.
    ///
    /// Advancing a row nothing was written to is a driver bug.
    pub fn advance_row(&mut self) -> ExecResult<()> {
        if !self.produced {
            return Err(ExecError::Protocol {
                message: "advance_row called on an unwritten row".to_string(),
            });
        }
        self.next_row += 1;
        self.produced = false;
        Ok(())
    }

    /// Returns true when no row remains to write into
    pub fn is_full(&self) -> bool {
        self.next_row >= self.block.rows()
    }

    /// Returns the number of sealed rows
    pub fn rows_written(&self) -> usize {
        self.next_row
    }

    /// Returns the total row capacity
    pub fn capacity(&self) -> usize {
        self.block.rows()
    }

    /// Seals the sink, shrinking the block to the rows actually written
    pub fn into_block(mut self) -> ItemBlock {
        debug_assert!(!self.produced, "open row discarded by into_block");
        self.block.shrink_rows(self.next_row);
        self.block
    }
}
