//! Gemini HTTP clients: text translation and the model catalog proxy.

pub mod gemini_catalog;
pub mod gemini_models;
pub mod gemini_translator;
pub mod rpc;

pub use gemini_catalog::{AccessOnlyInput, GeminiAccess, GeminiDialect, GeminiModelCatalog};
pub use gemini_translator::GeminiTranslator;
pub use rpc::{RpcError, RpcErrorCode};
