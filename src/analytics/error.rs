//! Error types for trend analysis operations

use thiserror::Error;

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur during trend analysis
///
/// Almost every analysis degrades to an empty result on missing data; the
/// variants here cover caller mistakes that cannot be degraded.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Time frame label is not one of day/week/month/quarter/year
    #[error("unsupported time frame: {0}")]
    UnsupportedTimeFrame(String),

    /// Threshold outside its valid range
    #[error("Invalid threshold for {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

impl AnalysisError {
    /// Analysis errors are programmer or configuration errors
    pub fn is_recoverable(&self) -> bool {
        false
    }
}
