//! Item blocks: bounded batches of fixed-width tuple rows

use crate::exec::{ExecError, ExecResult};

use super::registers::RegisterId;
use super::value::RowValue;

/// A bounded batch of tuple rows sharing one register layout.
///
/// Storage is row-major: `rows × registers` slots, each either a present
/// `RowValue` or unset. Every row has exactly the same register width.
///
/// A block is owned by exactly one pipeline stage at a time; producers hand
/// blocks downstream as `Arc<ItemBlock>` and give up their own handle, so no
/// two stages ever mutate the same block.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBlock {
    rows: usize,
    registers: usize,
    slots: Vec<Option<RowValue>>,
}

impl ItemBlock {
    /// Creates a block with `rows` rows of `registers` unset slots
    pub fn new(rows: usize, registers: usize) -> Self {
        Self {
            rows,
            registers,
            slots: vec![None; rows * registers],
        }
    }

    /// Returns the number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the register width shared by every row
    pub fn registers(&self) -> usize {
        self.registers
    }

    /// Reads the value at `(row, register)`.
    ///
    /// Returns `None` for a slot that was never written. Out-of-bounds
    /// access is a fatal internal-consistency failure.
    pub fn value_at(&self, row: usize, register: RegisterId) -> ExecResult<Option<&RowValue>> {
        let index = self.slot_index(row, register)?;
        Ok(self.slots[index].as_ref())
    }

    /// Writes the value at `(row, register)`.
    ///
    /// Rewriting a slot that already holds a value is fatal: a row may be
    /// written only once per pass.
    pub fn set_value(
        &mut self,
        row: usize,
        register: RegisterId,
        value: RowValue,
    ) -> ExecResult<()> {
        let index = self.slot_index(row, register)?;
        if self.slots[index].is_some() {
            return Err(ExecError::RowRewrite { register });
        }
        self.slots[index] = Some(value);
        Ok(())
    }

    /// Drops trailing rows so the block holds exactly `rows` rows.
    ///
    /// Used by the output sink to seal a partially-filled block. Growing a
    /// block is not supported.
    pub fn shrink_rows(&mut self, rows: usize) {
        debug_assert!(rows <= self.rows);
        if rows < self.rows {
            self.slots.truncate(rows * self.registers);
            self.rows = rows;
        }
    }

    fn slot_index(&self, row: usize, register: RegisterId) -> ExecResult<usize> {
        if register >= self.registers {
            return Err(ExecError::RegisterOutOfBounds {
                register,
                width: self.registers,
            });
        }
        if row >= self.rows {
            return Err(ExecError::Protocol {
                message: format!("row {} out of bounds (block has {})", row, self.rows),
            });
        }
        Ok(row * self.registers + register)
    }
}
