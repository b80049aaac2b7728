//! Dialect-specific passes and the pipeline that runs them
//!
//! Each diagram dialect with something to repair gets its own module; the
//! orchestrator decides which passes apply to a block.

pub mod class;
pub mod flowchart;
pub mod orchestrator;
pub mod sequence;

pub use orchestrator::*;
