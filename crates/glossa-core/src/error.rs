//! Error types for Glossa.

use std::fmt;
use thiserror::Error;

/// Encoding that failed to (de)serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Toml,
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
        })
    }
}

/// The error type shared by the Glossa crates.
///
/// Variants carry plain strings so the error stays `Clone` and can be
/// reported per fragment after a translation fan-out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlossaError {
    /// No usable API key in the translation settings.
    #[error("No valid API key found")]
    MissingCredential,

    /// Network-level failure talking to a remote endpoint.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid {format} data: {message}")]
    Serialization { format: DataFormat, message: String },

    /// Local file system failure.
    #[error("I/O failure: {message}")]
    Io { message: String },

    /// Unreadable or inconsistent `config.toml`.
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No {entity_type} with id '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A translation is already running for this message.
    #[error("Translation already in progress for message '{0}'")]
    TranslationInProgress(String),

    /// A host handler reported a failure.
    #[error("Host handler error: {0}")]
    Host(String),

    /// Broken internal assumption.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GlossaError {
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    fn serialization(format: DataFormat, err: impl fmt::Display) -> Self {
        Self::Serialization {
            format,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for GlossaError {
    fn from(err: std::io::Error) -> Self {
        Self::io(format!("{err} ({:?})", err.kind()))
    }
}

impl From<serde_json::Error> for GlossaError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(DataFormat::Json, err)
    }
}

impl From<toml::de::Error> for GlossaError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization(DataFormat::Toml, err)
    }
}

impl From<toml::ser::Error> for GlossaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::serialization(DataFormat::Toml, err)
    }
}

pub type Result<T> = std::result::Result<T, GlossaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: GlossaError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        match err {
            GlossaError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_json_error_is_serialization() {
        let err: GlossaError = serde_json::from_str::<serde_json::Value>("{ nope")
            .unwrap_err()
            .into();
        assert!(err.is_serialization());
        assert!(err.to_string().starts_with("Invalid JSON data"));
    }

    #[test]
    fn test_toml_error_format() {
        let err: GlossaError = toml::from_str::<toml::Value>("a = ").unwrap_err().into();
        assert!(matches!(
            err,
            GlossaError::Serialization {
                format: DataFormat::Toml,
                ..
            }
        ));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            GlossaError::MissingCredential.to_string(),
            "No valid API key found"
        );
        assert_eq!(
            GlossaError::not_found("message", "m1").to_string(),
            "No message with id 'm1'"
        );
    }
}
