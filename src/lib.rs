//! trendlens - Trend detection engine for news analytics
//!
//! Turns per-article entity and keyword observations into time-bucketed
//! frequency signals, scores their growth, finds co-occurring entities and
//! assembles ranked, evidenced trends.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`analytics`] - Interval keys, keyword and entity trend detection
//! - [`config`] - Configuration management and settings
//! - [`models`] - Entity and article input records
//! - [`error`] - Unified error type
//! - [`logging`] - Tracing subscriber setup
//! - [`utils`] - Common text helpers
//!
//! # Example
//!
//! ```no_run
//! use trendlens::analytics::TrendDetector;
//! use trendlens::config::Config;
//! use trendlens::models::{Article, Entity};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let entities: Vec<Entity> = Vec::new();
//!     let articles: Vec<Article> = Vec::new();
//!
//!     let mut detector = TrendDetector::new(config.analysis);
//!     for trend in detector.detect_entity_trends(&entities, &articles) {
//!         println!("{} ({:.2})", trend.name, trend.confidence_score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{
        KeywordExtractor, TimeFrame, TrendAnalysis, TrendDetector, TrendStatus, TrendType,
    };
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{Article, Entity, EntityKey};
}

// Direct re-exports for convenience
pub use models::{Article, Entity, EntityKey};
