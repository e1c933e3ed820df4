//! Row-at-a-time fetcher over a block source

use std::sync::Arc;

use crate::block::{InputRow, ItemBlock};
use crate::exec::{ExecError, ExecResult, ExecState, DEFAULT_BATCH_SIZE};

use super::fetcher::{BlockSource, RowFetcher};

/// The standard fetcher: pulls blocks from its source and serves them one
/// row at a time.
///
/// WAITING from the source passes through untouched with an invalid row.
/// When the source flags a block as final, the fetcher reports `Done`
/// together with that block's last row, so "last row" is always explicit.
#[derive(Debug)]
pub struct SingleRowFetcher<S: BlockSource> {
    source: S,
    current: Option<Arc<ItemBlock>>,
    next_row: usize,
    block_is_final: bool,
    exhausted: bool,
}

impl<S: BlockSource> SingleRowFetcher<S> {
    /// Creates a fetcher reading from `source`
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: None,
            next_row: 0,
            block_is_final: false,
            exhausted: false,
        }
    }

    /// Pulls the next non-empty block from the source.
    ///
    /// Returns the state to report when no row can be served.
    fn pull_block(&mut self) -> ExecResult<Option<ExecState>> {
        let (state, block) = self.source.next_block(DEFAULT_BATCH_SIZE)?;
        match state {
            ExecState::Waiting => {
                debug_assert!(block.is_none());
                Ok(Some(ExecState::Waiting))
            }
            ExecState::Done => {
                self.exhausted = true;
                match block {
                    Some(block) if block.rows() > 0 => {
                        self.current = Some(block);
                        self.next_row = 0;
                        self.block_is_final = true;
                        Ok(None)
                    }
                    _ => Ok(Some(ExecState::Done)),
                }
            }
            ExecState::HasMore => {
                let block = block.ok_or_else(|| ExecError::Protocol {
                    message: "source reported HASMORE without a block".to_string(),
                })?;
                if block.rows() == 0 {
                    return Err(ExecError::Protocol {
                        message: "source delivered an empty block with HASMORE".to_string(),
                    });
                }
                self.current = Some(block);
                self.next_row = 0;
                self.block_is_final = false;
                Ok(None)
            }
        }
    }
}

impl<S: BlockSource> RowFetcher for SingleRowFetcher<S> {
    fn fetch_row(&mut self) -> ExecResult<(ExecState, InputRow)> {
        if self.current.is_none() {
            if self.exhausted {
                return Ok((ExecState::Done, InputRow::invalid()));
            }
            if let Some(state) = self.pull_block()? {
                return Ok((state, InputRow::invalid()));
            }
        }

        // A block with at least one unserved row is loaded here
        let block = self
            .current
            .clone()
            .ok_or_else(|| ExecError::Protocol {
                message: "fetcher lost its current block".to_string(),
            })?;
        let row = InputRow::new(Arc::clone(&block), self.next_row);
        self.next_row += 1;

        let last_in_block = self.next_row >= block.rows();
        if last_in_block {
            self.current = None;
        }
        if last_in_block && self.block_is_final {
            Ok((ExecState::Done, row))
        } else {
            Ok((ExecState::HasMore, row))
        }
    }

    fn fetch_block(
        &mut self,
        at_most: usize,
    ) -> ExecResult<(ExecState, Option<Arc<ItemBlock>>)> {
        if self.exhausted {
            return Ok((ExecState::Done, None));
        }
        let (state, block) = self.source.next_block(at_most)?;
        if state == ExecState::Done {
            self.exhausted = true;
        }
        Ok((state, block))
    }
}
