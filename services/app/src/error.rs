//! services/app/src/error.rs
//!
//! Defines the primary error type for the entire `app` service.

use crate::config::ConfigError;
use crate::notes::save_task::SaveError;
use daily_memo_core::ports::PortError;

/// The primary error type for the `app` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service
    /// ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a terminal failure of one phase of the note save pipeline.
    #[error("Save Error: {0}")]
    Save(#[from] SaveError),

    /// Represents a standard Input/Output error (e.g., reading stdin).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
