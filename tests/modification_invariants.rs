//! Modification Executor Invariant Tests
//!
//! Tests for invariants:
//! - M1: do_count totals exactly N over N produced rows, however many
//!       WAITING calls interleave
//! - M2: return_inherited_results copies every register unchanged
//! - M3: the single-register path leaves all other output registers unset
//! - M4: an armed failure point fails the call fatally with no row written
//! - M5: configuration/block width disagreement fails fast
//! - M6: clear sets punch holes into copy-through
//!
//! The executor under test performs no storage mutation; it owns only the
//! row-shape and bookkeeping contract around the mutation stage.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serde_json::{json, Value};

use aqueduct::block::{ItemBlock, OutputRow, RegisterSet, RowValue};
use aqueduct::exec::{
    ExecResult, ExecState, ExecutionBlock, Executor, ModificationExecutor, ModificationInfos,
};
use aqueduct::fault::{points, FailurePoints};
use aqueduct::fetch::{BlockSource, SingleRowFetcher};

// =============================================================================
// Test Utilities
// =============================================================================

struct ScriptedSource {
    responses: Vec<(ExecState, Option<Arc<ItemBlock>>)>,
}

impl ScriptedSource {
    fn new(mut responses: Vec<(ExecState, Option<Arc<ItemBlock>>)>) -> Self {
        responses.reverse();
        Self { responses }
    }
}

impl BlockSource for ScriptedSource {
    fn next_block(&mut self, _at_most: usize) -> ExecResult<(ExecState, Option<Arc<ItemBlock>>)> {
        Ok(self.responses.pop().unwrap_or((ExecState::Done, None)))
    }
}

fn block_from_rows(rows: &[Vec<Value>]) -> Arc<ItemBlock> {
    let registers = rows.first().map_or(0, Vec::len);
    let mut block = ItemBlock::new(rows.len(), registers);
    for (row, values) in rows.iter().enumerate() {
        for (register, value) in values.iter().enumerate() {
            block
                .set_value(row, register, RowValue::new(value.clone()))
                .unwrap();
        }
    }
    Arc::new(block)
}

fn sink(capacity: usize, registers: usize) -> OutputRow {
    OutputRow::new(
        capacity,
        registers,
        RegisterSet::full(registers),
        RegisterSet::empty(registers),
    )
}

// =============================================================================
// INVARIANT M1: Counting Is Exact
// =============================================================================

/// M1: N rows with do_count on yield a counted total of exactly N, with
/// WAITING rounds interleaved between every block.
#[test]
fn test_m1_do_count_totals_exactly_n() {
    let source = ScriptedSource::new(vec![
        (ExecState::Waiting, None),
        (ExecState::HasMore, Some(block_from_rows(&[vec![json!(0)]]))),
        (ExecState::Waiting, None),
        (ExecState::Waiting, None),
        (
            ExecState::HasMore,
            Some(block_from_rows(&[vec![json!(1)], vec![json!(2)]])),
        ),
        (ExecState::Waiting, None),
        (ExecState::Done, Some(block_from_rows(&[vec![json!(3)]]))),
    ]);
    let infos = Arc::new(ModificationInfos::new(0, 0, 1, 1, &[], true, true).unwrap());
    let executor = ModificationExecutor::new(SingleRowFetcher::new(source), Arc::clone(&infos));
    let mut block = ExecutionBlock::new(executor, infos.base(), Arc::new(AtomicBool::new(false)));

    let mut produced = 0;
    loop {
        let (state, rows) = block.get_some(100).unwrap();
        if let Some(rows) = rows {
            produced += rows.rows();
        }
        match state {
            ExecState::Waiting => continue,
            ExecState::HasMore => continue,
            ExecState::Done => break,
        }
    }

    assert_eq!(produced, 4);
    assert_eq!(
        block.stats().counted(),
        4,
        "M1 VIOLATION: counted diverged from rows produced"
    );
    assert_eq!(block.stats().written(), 4);
}

// =============================================================================
// INVARIANT M2: Inherited Results Round-Trip
// =============================================================================

/// M2: With return_inherited_results, an input row {0: "a", 1: 42} comes
/// out with identical values at every register index.
#[test]
fn test_m2_inherited_results_round_trip() {
    let source = ScriptedSource::new(vec![(
        ExecState::Done,
        Some(block_from_rows(&[vec![json!("a"), json!(42)]])),
    )]);
    let infos = Arc::new(ModificationInfos::new(0, 0, 2, 2, &[], true, true).unwrap());
    let mut executor = ModificationExecutor::new(SingleRowFetcher::new(source), Arc::clone(&infos));
    let mut output = sink(1, 2);

    let (state, delta) = executor.produce_row(&mut output).unwrap();
    assert_eq!(state, ExecState::Done);
    assert_eq!(delta.counted, 1);
    output.advance_row().unwrap();

    let result = output.into_block();
    assert_eq!(result.value_at(0, 0).unwrap().unwrap().json(), &json!("a"));
    assert_eq!(result.value_at(0, 1).unwrap().unwrap().json(), &json!(42));
}

// =============================================================================
// INVARIANT M3: Single-Register Copy
// =============================================================================

/// M3: input register 0 = "x" copied to output register 3 leaves output
/// registers 0-2 unset.
#[test]
fn test_m3_single_register_copy_leaves_rest_unset() {
    let source = ScriptedSource::new(vec![(
        ExecState::Done,
        Some(block_from_rows(&[vec![json!("x")]])),
    )]);
    let infos = Arc::new(ModificationInfos::new(0, 3, 1, 4, &[], false, false).unwrap());
    let mut executor = ModificationExecutor::new(SingleRowFetcher::new(source), Arc::clone(&infos));
    let mut output = sink(1, 4);

    let (state, delta) = executor.produce_row(&mut output).unwrap();
    assert_eq!(state, ExecState::Done);
    assert_eq!(delta.counted, 0, "do_count off must not count");
    output.advance_row().unwrap();

    let result = output.into_block();
    assert_eq!(result.value_at(0, 3).unwrap().unwrap().json(), &json!("x"));
    for register in 0..3 {
        assert!(
            result.value_at(0, register).unwrap().is_none(),
            "M3 VIOLATION: register {} should be unset",
            register
        );
    }
}

/// M3: do_count is independent of the copy branch taken.
#[test]
fn test_m3_counting_is_independent_of_branch() {
    for inherited in [false, true] {
        let source = ScriptedSource::new(vec![(
            ExecState::Done,
            Some(block_from_rows(&[vec![json!(7)]])),
        )]);
        let infos = Arc::new(ModificationInfos::new(0, 0, 1, 1, &[], true, inherited).unwrap());
        let mut executor =
            ModificationExecutor::new(SingleRowFetcher::new(source), Arc::clone(&infos));
        let mut output = sink(1, 1);

        let (_, delta) = executor.produce_row(&mut output).unwrap();
        assert_eq!(delta.counted, 1, "inherited={}", inherited);
    }
}

// =============================================================================
// INVARIANT M4: Injected Failures Propagate Like Internal Errors
// =============================================================================

/// M4: An armed checkpoint fails the call fatally and no row is written.
#[test]
fn test_m4_injected_failure_writes_no_row() {
    let source = ScriptedSource::new(vec![(
        ExecState::Done,
        Some(block_from_rows(&[vec![json!("doomed")]])),
    )]);
    let infos = Arc::new(
        ModificationInfos::new(0, 0, 1, 1, &[], true, false)
            .unwrap()
            .with_failure_points(FailurePoints::armed(&[points::MODIFICATION_BEFORE_WRITE])),
    );
    let mut executor = ModificationExecutor::new(SingleRowFetcher::new(source), Arc::clone(&infos));
    let mut output = sink(1, 1);

    let err = executor.produce_row(&mut output).unwrap_err();
    assert_eq!(err.code(), "AQUE_INJECTED_FAILURE");
    assert!(err.is_fatal());
    assert!(!output.row_produced());
    assert_eq!(output.rows_written(), 0);
}

/// M4: The driver surfaces the injected failure and terminates the query,
/// exactly like a genuine internal error.
#[test]
fn test_m4_driver_unwinds_on_injected_failure() {
    let source = ScriptedSource::new(vec![(
        ExecState::Done,
        Some(block_from_rows(&[vec![json!(1)]])),
    )]);
    let infos = Arc::new(
        ModificationInfos::new(0, 0, 1, 1, &[], true, false)
            .unwrap()
            .with_failure_points(FailurePoints::armed(&[points::MODIFICATION_BEFORE_WRITE])),
    );
    let executor = ModificationExecutor::new(SingleRowFetcher::new(source), Arc::clone(&infos));
    let mut block = ExecutionBlock::new(executor, infos.base(), Arc::new(AtomicBool::new(false)));

    let err = block.get_some(10).unwrap_err();
    assert_eq!(err.code(), "AQUE_INJECTED_FAILURE");
}

/// M4: With nothing armed the hook is a no-op and rows flow normally.
#[test]
fn test_m4_disarmed_hook_is_a_no_op() {
    let source = ScriptedSource::new(vec![(
        ExecState::Done,
        Some(block_from_rows(&[vec![json!(1)]])),
    )]);
    let infos = Arc::new(ModificationInfos::new(0, 0, 1, 1, &[], true, false).unwrap());
    let mut executor = ModificationExecutor::new(SingleRowFetcher::new(source), Arc::clone(&infos));
    let mut output = sink(1, 1);

    let (state, _) = executor.produce_row(&mut output).unwrap();
    assert_eq!(state, ExecState::Done);
    assert!(output.row_produced());
}

// =============================================================================
// INVARIANT M5: Width Mismatches Fail Fast
// =============================================================================

/// M5: A block narrower than the node's configured input width is a fatal
/// planner bug, not a silently wrong row.
#[test]
fn test_m5_width_mismatch_fails_fast() {
    let source = ScriptedSource::new(vec![(
        ExecState::Done,
        Some(block_from_rows(&[vec![json!(1)]])), // width 1
    )]);
    let infos = Arc::new(ModificationInfos::new(0, 0, 2, 2, &[], false, true).unwrap());
    let mut executor = ModificationExecutor::new(SingleRowFetcher::new(source), Arc::clone(&infos));
    let mut output = sink(1, 2);

    let err = executor.produce_row(&mut output).unwrap_err();
    assert_eq!(err.code(), "AQUE_WIDTH_MISMATCH");
    assert!(err.is_fatal());
}

/// M5: Register indices outside the declared widths are rejected at
/// configuration time, before any row flows.
#[test]
fn test_m5_invalid_registers_rejected_at_plan_time() {
    assert!(ModificationInfos::new(2, 0, 2, 1, &[], false, false).is_err());
    assert!(ModificationInfos::new(0, 1, 1, 1, &[], false, false).is_err());
    assert!(ModificationInfos::new(0, 0, 1, 1, &[5], false, false).is_err());
}

// =============================================================================
// INVARIANT M6: Clear Sets Punch Holes Into Copy-Through
// =============================================================================

/// M6: A cleared register is dropped on copy-through while its neighbors
/// survive.
#[test]
fn test_m6_clear_set_drops_values_on_copy() {
    let source = ScriptedSource::new(vec![(
        ExecState::Done,
        Some(block_from_rows(&[vec![json!("keep"), json!("drop"), json!("keep2")]])),
    )]);
    let infos = Arc::new(ModificationInfos::new(0, 0, 3, 3, &[1], true, true).unwrap());
    let executor = ModificationExecutor::new(SingleRowFetcher::new(source), Arc::clone(&infos));
    let mut block = ExecutionBlock::new(executor, infos.base(), Arc::new(AtomicBool::new(false)));

    let (state, rows) = block.get_some(10).unwrap();
    assert_eq!(state, ExecState::Done);
    let rows = rows.unwrap();
    assert_eq!(rows.value_at(0, 0).unwrap().unwrap().json(), &json!("keep"));
    assert!(rows.value_at(0, 1).unwrap().is_none(), "M6 VIOLATION");
    assert_eq!(rows.value_at(0, 2).unwrap().unwrap().json(), &json!("keep2"));
}
