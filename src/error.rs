//! Unified error handling for the trendlens crate
//!
//! This module provides a unified error type that consolidates the
//! domain-specific errors into a single `Error` enum, while keeping the
//! domain errors usable on their own.
//!
//! # Architecture
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use trendlens::error::{Error, ErrorCategory};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         eprintln!("Retrying: {err}");
//!     } else {
//!         eprintln!("Fatal error ({:?}): {err}", err.category());
//!     }
//! }
//! ```

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::analytics::error::AnalysisError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid analysis parameters
    Analysis,
    /// Configuration and validation errors
    Config,
    /// Runtime and task errors
    Runtime,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Config => "config",
            Self::Runtime => "runtime",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the trendlens crate
#[derive(Error, Debug)]
pub enum Error {
    /// Trend analysis errors
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Background analysis task failed or was cancelled
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Analysis(e) => e.is_recoverable(),
            Self::Task(e) => e.is_cancelled(),
            Self::Config(_) | Self::Other { .. } => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Analysis(_) => ErrorCategory::Analysis,
            Self::Task(_) => ErrorCategory::Runtime,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err: Error = AnalysisError::UnsupportedTimeFrame("decade".to_string()).into();
        assert_eq!(err.category(), ErrorCategory::Analysis);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Analysis error: unsupported time frame: decade");
    }

    #[test]
    fn test_invalid_threshold_is_analysis_error() {
        let err: Error = AnalysisError::InvalidThreshold {
            name: "cooccurrence_threshold",
            value: 1.5,
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Analysis);
        assert_eq!(
            err.to_string(),
            "Analysis error: Invalid threshold for cooccurrence_threshold: 1.5"
        );
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("max_trends must be greater than 0");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.category().as_str(), "config");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_other_error() {
        let err = Error::with_source("reading input", std::io::Error::other("boom"));
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(err.to_string(), "reading input");
    }
}
