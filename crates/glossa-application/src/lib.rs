//! Application layer for Glossa.
//!
//! Ties the domain types to the host application: the message panel with its
//! operations menu, per-panel translation state, and the settings dialog.

pub mod message_panel;
pub mod settings_dialog;
pub mod translation_session;

pub use message_panel::{HostCapabilities, MessageHost, MessageOperation, MessagePanel};
pub use settings_dialog::TranslationSettingsDialog;
pub use translation_session::{TranslationReport, TranslationSession};
