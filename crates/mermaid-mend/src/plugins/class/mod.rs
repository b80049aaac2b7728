//! Class diagram autofix rules

mod stereotype;

pub use stereotype::{stereotype_line, StereotypeStripper};
