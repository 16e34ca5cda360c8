//! Centralized error types for moblog.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the moblog library.
///
/// Every variant except [`MoblogError::Conversion`] is fatal to the
/// invocation that produced it.
#[derive(Error, Debug)]
pub enum MoblogError {
    /// The inbound message or its `From` address could not be parsed.
    #[error("Cannot parse e-mail: {0}")]
    InputParse(String),

    /// The sender is not in the configured accept list.
    #[error("Sender not accepted: {0}")]
    SenderRejected(String),

    /// An image part is not a decodable raster image.
    #[error("Cannot decode image '{name}': {source}")]
    ImageDecode {
        name: String,
        source: image::ImageError,
    },

    /// Re-encoding a normalized image failed.
    #[error("Cannot encode image '{name}': {source}")]
    ImageEncode {
        name: String,
        source: image::ImageError,
    },

    /// Writing a post or asset file failed.
    #[error("Cannot write '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A repository step (clean, add, commit, push) failed.
    #[error("Cannot execute {command}: {reason}")]
    ExternalTool { command: String, reason: String },

    /// The confirmation reply could not be sent.
    #[error("Cannot send e-mail: {0}")]
    Notification(String),

    /// HTML could not be converted to Markdown.
    #[error("HTML conversion failed: {0}")]
    Conversion(String),
}

/// Convenience alias for `Result<T, MoblogError>`.
pub type Result<T> = std::result::Result<T, MoblogError>;

impl MoblogError {
    /// Create a `FileWrite` variant from a path and an `io::Error`.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Create an `ExternalTool` variant for the given command line.
    pub fn tool(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExternalTool {
            command: command.into(),
            reason: reason.into(),
        }
    }
}
