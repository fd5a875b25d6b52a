//! Analytics module for keyword and entity trend detection
//!
//! Data flows leaf first: [`interval`] bucket keys, [`keywords`] extraction,
//! [`keyword_trends`] growth detection, [`significance`] scoring,
//! [`cooccurrence`] enrichment, and [`entity_trends`] assembling ranked
//! [`trend::TrendAnalysis`] values.

pub mod cooccurrence;
pub mod entity_trends;
pub mod error;
pub mod interval;
pub mod keyword_trends;
pub mod keywords;
pub mod significance;
pub mod trend;

pub use cooccurrence::{find_related_entities, CacheStats, CooccurrenceCache, RelatedEntity};
pub use entity_trends::{detect_entity_trends_blocking, TrendDetector};
pub use error::{AnalysisError, AnalysisResult};
pub use interval::{
    calculate_date_range, calculate_date_range_at, date_range_for_label, get_interval_key,
    Interval, TimeFrame,
};
pub use keyword_trends::{
    analyze_keyword_trends, detect_keyword_trends, detect_keyword_trends_with, keyword_trend_data,
    KeywordTrend, KeywordTrendData, KeywordTrendSignal,
};
pub use keywords::{EntitySpan, KeywordExtractor, NlpPipeline, NounChunk, Token};
pub use significance::{
    analyze_frequency_patterns, calculate_statistical_significance, FrequencyPattern,
    SignificanceScore,
};
pub use trend::{
    describe_trend_label, TrendAnalysis, TrendEntity, TrendEvidenceItem, TrendStatus, TrendType,
};
