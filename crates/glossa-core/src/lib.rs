pub mod config;
pub mod error;
pub mod message;
pub mod model;
pub mod safety;
pub mod translation;

// Re-export common error type
pub use error::{GlossaError, Result};
