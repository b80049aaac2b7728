//! Flowchart node quoting
//!
//! Finds `ID<open>label<close>` node declarations and wraps labels that the
//! renderer would otherwise reject in double quotes.

mod bracket;
mod quote;
mod scanner;

pub use bracket::*;
pub use quote::*;
pub use scanner::*;
