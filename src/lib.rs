//! aqueduct - A strict, pull-based row-pipeline execution core
//!
//! Executors pull item rows from upstream producers, transform them per
//! their plan node, and push results downstream under the
//! WAITING/HASMORE/DONE control protocol.

pub mod block;
pub mod exec;
pub mod fault;
pub mod fetch;
pub mod observe;
