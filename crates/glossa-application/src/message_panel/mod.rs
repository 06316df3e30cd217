//! Message panel: per-message view state and the operations menu.
//!
//! # Module Structure
//!
//! - `host`: handlers supplied by the embedding application
//! - `state`: display props and values derived from the message
//! - `operation`: menu operations and dispatch outcomes
//! - `panel`: the `MessagePanel` itself

mod host;
mod operation;
mod panel;
mod state;

pub use host::{HostCapabilities, MessageHost};
pub use operation::{MenuEntry, MessageOperation, OperationOutcome};
pub use panel::MessagePanel;
pub use state::{MessageFlags, PanelMenu, PanelProps, TextAbilities};
