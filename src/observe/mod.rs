//! Structured logging for the pipeline
//!
//! One log line = one event: synchronous JSON lines with deterministic key
//! ordering, errors and fatals to stderr. Execution blocks log fatal
//! failures and DONE transitions; nothing in the hot per-row path logs.

mod logger;

pub use logger::{Logger, Severity};
