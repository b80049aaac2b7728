//! Core abstractions for diagram normalization
//!
//! Shared types, errors, diagnostics, configuration and the document-level
//! fence scanner. Dialect-specific passes live in [`crate::plugins`].

mod autofix;
pub mod chumsky_utils;
mod config;
mod diagnostic;
mod document;
mod error;
pub mod logging;
mod text;
mod types;

pub use autofix::*;
pub use config::*;
pub use diagnostic::*;
pub use document::*;
pub use error::*;
pub use logging::*;
pub use text::*;
pub use types::*;
