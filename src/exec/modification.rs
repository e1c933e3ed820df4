//! Modification executor
//!
//! The row-shape and bookkeeping half of a data-mutation plan node
//! (insert/update/delete/upsert). The actual storage mutation happens in
//! the broader modification stage outside this core; this executor only
//! moves values between register layouts and counts processed rows.

use std::sync::Arc;

use crate::block::{InputRow, OutputRow, RegisterId, RowValue};
use crate::fault::{points, FailurePoints};
use crate::fetch::RowFetcher;

use super::errors::{ExecError, ExecResult};
use super::executor::Executor;
use super::infos::ExecutorInfos;
use super::state::ExecState;
use super::stats::ExecStats;

/// Configuration for one modification plan node
#[derive(Debug, Clone)]
pub struct ModificationInfos {
    base: ExecutorInfos,
    input_register: RegisterId,
    output_register: RegisterId,
    do_count: bool,
    return_inherited_results: bool,
    failure_points: Arc<FailurePoints>,
}

impl ModificationInfos {
    /// Builds and validates node configuration.
    ///
    /// The keep set defaults to the full input width so that inherited
    /// results copy whole rows; `clear` punches holes into that for
    /// registers whose values die at this node.
    pub fn new(
        input_register: RegisterId,
        output_register: RegisterId,
        nr_input_registers: usize,
        nr_output_registers: usize,
        clear: &[RegisterId],
        do_count: bool,
        return_inherited_results: bool,
    ) -> ExecResult<Self> {
        let keep: Vec<RegisterId> = (0..nr_input_registers).collect();
        Ok(Self {
            base: ExecutorInfos::new(
                &[input_register],
                &[output_register],
                nr_input_registers,
                nr_output_registers,
                clear,
                &keep,
            )?,
            input_register,
            output_register,
            do_count,
            return_inherited_results,
            failure_points: FailurePoints::disabled(),
        })
    }

    /// Replaces the failure-point hook, for failure-path tests
    pub fn with_failure_points(mut self, hook: Arc<FailurePoints>) -> Self {
        self.failure_points = hook;
        self
    }

    /// Shared register configuration
    pub fn base(&self) -> &ExecutorInfos {
        &self.base
    }

    /// The single register this node reads
    pub fn input_register(&self) -> RegisterId {
        self.input_register
    }

    /// The single register this node writes
    pub fn output_register(&self) -> RegisterId {
        self.output_register
    }

    /// Whether each processed row increments the mutation counter
    pub fn do_count(&self) -> bool {
        self.do_count
    }

    /// Whether the whole input row passes through unchanged
    pub fn return_inherited_results(&self) -> bool {
        self.return_inherited_results
    }
}

/// Executor for modification plan nodes.
///
/// Consumes one row per call: either copies the whole row through
/// (inherited results) or moves the configured input register's value into
/// the configured output register, leaving every other output register
/// unset. WAITING and DONE from the fetcher propagate unchanged.
#[derive(Debug)]
pub struct ModificationExecutor<F: RowFetcher> {
    fetcher: F,
    infos: Arc<ModificationInfos>,
}

impl<F: RowFetcher> ModificationExecutor<F> {
    /// Creates an executor reading rows from `fetcher`
    pub fn new(fetcher: F, infos: Arc<ModificationInfos>) -> Self {
        Self { fetcher, infos }
    }

    fn write_row(&self, input: &InputRow, output: &mut OutputRow) -> ExecResult<()> {
        if self.infos.return_inherited_results() {
            output.copy_row(input)?;
        } else {
            // An unset input slot reads as JSON null on the single-register path
            let value = input
                .value(self.infos.input_register())?
                .cloned()
                .unwrap_or_else(RowValue::null);
            self.infos
                .failure_points
                .check(points::MODIFICATION_BEFORE_WRITE)?;
            output.set_value(self.infos.output_register(), value)?;
        }
        Ok(())
    }
}

impl<F: RowFetcher> Executor for ModificationExecutor<F> {
    fn node_type(&self) -> &'static str {
        "modification"
    }

    fn produce_row(&mut self, output: &mut OutputRow) -> ExecResult<(ExecState, ExecStats)> {
        let mut stats = ExecStats::new();
        let (state, input) = self.fetcher.fetch_row()?;

        if state == ExecState::Waiting {
            debug_assert!(!input.is_initialized());
            return Ok((state, stats));
        }

        if !input.is_initialized() {
            if state != ExecState::Done {
                return Err(ExecError::Protocol {
                    message: format!("fetcher returned {} without a row", state),
                });
            }
            return Ok((state, stats));
        }

        if input.width()? != self.infos.base().nr_input_registers() {
            return Err(ExecError::WidthMismatch {
                expected: self.infos.base().nr_input_registers(),
                actual: input.width()?,
            });
        }

        self.write_row(&input, output)?;
        stats.incr_written();
        if self.infos.do_count() {
            stats.incr_counted();
        }
        Ok((state, stats))
    }
}
