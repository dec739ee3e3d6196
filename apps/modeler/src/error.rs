//! # Application Errors
//!
//! Everything the CLI can report. Transport and server errors come from the
//! API clients untouched; identifier errors come from the core sanitizer.

use crate::api::ClientError;
use modeler_core::ModelerError;
use thiserror::Error;

/// Top-level error of the Modeler application.
#[derive(Debug, Error)]
pub enum AppError {
    /// HTTP transport, server or decode failure.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Sanitizer or route failure.
    #[error(transparent)]
    Core(#[from] ModelerError),

    /// Bad configuration value or file.
    #[error("configuration error: {0}")]
    Config(String),

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// A payload given on the command line is not a JSON object.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
