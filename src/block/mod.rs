//! Tuple batch subsystem for aqueduct
//!
//! Item rows move through the pipeline in bounded blocks of fixed register
//! width. A block is owned by exactly one stage at a time and handed
//! downstream as an `Arc` handle; row views never mutate the block they read.
//!
//! # Invariants
//!
//! - Every row in a block has exactly the same register width
//! - Register access is bounds-checked; violations are fatal, never wrapped
//! - Reads through an uninitialized row view fail loudly

mod batch;
mod input_row;
mod output_row;
mod registers;
mod value;

pub use batch::ItemBlock;
pub use input_row::InputRow;
pub use output_row::OutputRow;
pub use registers::{RegisterId, RegisterSet};
pub use value::RowValue;
