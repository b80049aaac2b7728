//! Sequence diagram autofix rules
//!
//! ```text
//! sequenceDiagram
//!     activate Repo
//!     Service->>Ord: <<create>>      %% becomes «create»
//!     deactivate Ord                 %% becomes deactivate Repo
//! ```

mod activation;
mod markers;
mod message;

pub use activation::{ActivationStack, ActivationStackCorrector, Directive, DirectiveKind};
pub use markers::ReservedMarkerRewriter;
pub use message::{find_arrow, ActivationShorthand, MessageLine, MESSAGE_ARROWS};
