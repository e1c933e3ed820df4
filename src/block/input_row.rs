//! Read-side row cursor

use std::sync::Arc;

use crate::exec::{ExecError, ExecResult};

use super::batch::ItemBlock;
use super::registers::RegisterId;
use super::value::RowValue;

/// A lightweight cursor into one row of an item block.
///
/// Cloning the view clones the block handle, not the data. A
/// default-constructed view binds no block; callers must check
/// `is_initialized` before reading, and reads through an invalid view fail
/// loudly rather than returning a default.
#[derive(Debug, Clone, Default)]
pub struct InputRow {
    block: Option<Arc<ItemBlock>>,
    row: usize,
}

impl InputRow {
    /// Creates a view of `row` within `block`
    pub fn new(block: Arc<ItemBlock>, row: usize) -> Self {
        debug_assert!(row < block.rows());
        Self {
            block: Some(block),
            row,
        }
    }

    /// Creates the invalid view used alongside WAITING and DONE
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Returns true if the view is bound to a block
    pub fn is_initialized(&self) -> bool {
        self.block.is_some()
    }

    /// Reads the value in `register` for this row.
    ///
    /// Returns `None` for an unset slot. Reading through an uninitialized
    /// view is a fatal programming error.
    pub fn value(&self, register: RegisterId) -> ExecResult<Option<&RowValue>> {
        let block = self.block.as_ref().ok_or(ExecError::UninitializedRow)?;
        block.value_at(self.row, register)
    }

    /// Returns the register width of the underlying block
    pub fn width(&self) -> ExecResult<usize> {
        let block = self.block.as_ref().ok_or(ExecError::UninitializedRow)?;
        Ok(block.registers())
    }

    /// Returns the row offset within the block, if bound
    pub fn row_offset(&self) -> Option<usize> {
        self.block.as_ref().map(|_| self.row)
    }
}
