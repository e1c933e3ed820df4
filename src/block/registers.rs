//! Register indices and plan-time register sets

use crate::exec::{ExecError, ExecResult};

/// Index of a column slot within an item block.
///
/// Allocated at plan-compile time, one per declared variable in the plan
/// subtree, stable for the lifetime of the query.
pub type RegisterId = usize;

/// A set of register indices, sized to a known register width.
///
/// Clear/keep sets are fixed at plan-compile time and small, so this is a
/// plain bit-set rather than a hash set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSet {
    words: Vec<u64>,
    width: usize,
}

impl RegisterSet {
    /// Creates an empty set over `width` registers
    pub fn empty(width: usize) -> Self {
        Self {
            words: vec![0; width.div_ceil(64)],
            width,
        }
    }

    /// Creates a set containing every register below `width`
    pub fn full(width: usize) -> Self {
        let mut set = Self::empty(width);
        for register in 0..width {
            set.words[register / 64] |= 1 << (register % 64);
        }
        set
    }

    /// Creates a set from explicit indices.
    ///
    /// An index at or beyond `width` is a planner contract violation and
    /// fails fast.
    pub fn from_indices(width: usize, indices: &[RegisterId]) -> ExecResult<Self> {
        let mut set = Self::empty(width);
        for &register in indices {
            set.insert(register)?;
        }
        Ok(set)
    }

    /// Adds a register to the set
    pub fn insert(&mut self, register: RegisterId) -> ExecResult<()> {
        if register >= self.width {
            return Err(ExecError::RegisterOutOfBounds {
                register,
                width: self.width,
            });
        }
        self.words[register / 64] |= 1 << (register % 64);
        Ok(())
    }

    /// Returns true if the register is in the set
    pub fn contains(&self, register: RegisterId) -> bool {
        register < self.width && self.words[register / 64] & (1 << (register % 64)) != 0
    }

    /// Returns the register width this set was sized to
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of registers in the set
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates the member registers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = RegisterId> + '_ {
        (0..self.width).filter(|&r| self.contains(r))
    }
}
