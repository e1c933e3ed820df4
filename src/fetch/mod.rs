//! Upstream fetch subsystem for aqueduct
//!
//! Fetchers are the upstream-facing half of an executor: they pull rows or
//! whole blocks from the producer below, abstracting over local and
//! distributed sources. A fetcher never blocks; a source that would need a
//! round trip reports WAITING and the whole pipeline suspends.

mod fetcher;
mod single_row;

pub use fetcher::{BlockSource, RowFetcher};
pub use single_row::SingleRowFetcher;
