//! Trend value objects produced by the entity trend detector

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence above which a trend is confirmed
pub const CONFIRMED_CONFIDENCE: f64 = 0.8;

/// Confidence bounds
pub const MIN_CONFIDENCE: f64 = 0.6;
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Kind of trend detected for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendType {
    /// Entity with only a handful of mentions
    NovelEntity,

    /// Sharp increase in mentions
    FrequencySpike,

    /// Moderate, sustained increase in mentions
    EmergingTopic,

    /// Steady coverage over time
    SustainedCoverage,
}

impl TrendType {
    /// Classify a significant entity group
    ///
    /// - `mention_count <= 3`: NovelEntity
    /// - `significance > 2.0`: FrequencySpike
    /// - otherwise: EmergingTopic
    #[must_use]
    pub fn classify(mention_count: usize, significance: f64) -> Self {
        if mention_count <= 3 {
            Self::NovelEntity
        } else if significance > 2.0 {
            Self::FrequencySpike
        } else {
            Self::EmergingTopic
        }
    }

    /// Parse a stored label such as `"frequency_spike"` or `"FREQUENCY-SPIKE"`
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "novel_entity" => Some(Self::NovelEntity),
            "frequency_spike" => Some(Self::FrequencySpike),
            "emerging_topic" => Some(Self::EmergingTopic),
            "sustained_coverage" => Some(Self::SustainedCoverage),
            _ => None,
        }
    }

    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NovelEntity => "novel_entity",
            Self::FrequencySpike => "frequency_spike",
            Self::EmergingTopic => "emerging_topic",
            Self::SustainedCoverage => "sustained_coverage",
        }
    }

    /// Tag form of the type (`"novel-entity"`)
    #[must_use]
    pub fn tag(&self) -> String {
        self.as_str().replace('_', "-")
    }

    /// Human-readable description for an entity of this trend type
    #[must_use]
    pub fn describe(&self, entity_type: &str, topic: &str) -> String {
        let kind = entity_type.to_lowercase();
        match self {
            Self::NovelEntity => {
                format!("New {kind} '{topic}' appearing in local news coverage")
            }
            Self::FrequencySpike => {
                format!("Significant increase in mentions of {kind} '{topic}'")
            }
            Self::EmergingTopic => {
                format!("Steadily increasing coverage of {kind} '{topic}' in local news")
            }
            Self::SustainedCoverage => {
                format!("Consistent ongoing coverage of {kind} '{topic}' in local news")
            }
        }
    }
}

impl fmt::Display for TrendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description for a trend type label, with a fallback for unknown labels
#[must_use]
pub fn describe_trend_label(label: &str, entity_type: &str, topic: &str) -> String {
    match TrendType::parse(label) {
        Some(trend_type) => trend_type.describe(entity_type, topic),
        None => format!(
            "Unusual pattern in mentions of {} '{topic}' in local news",
            entity_type.to_lowercase()
        ),
    }
}

/// Review status of a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    Potential,
    Confirmed,
}

impl TrendStatus {
    /// Confirmed above [`CONFIRMED_CONFIDENCE`]
    #[must_use]
    pub fn from_confidence(confidence_score: f64) -> Self {
        if confidence_score > CONFIRMED_CONFIDENCE {
            Self::Confirmed
        } else {
            Self::Potential
        }
    }

    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Potential => "potential",
            Self::Confirmed => "confirmed",
        }
    }
}

/// Map a significance score onto `[0.6, 0.99]`
#[must_use]
pub fn confidence_from_significance(significance: f64) -> f64 {
    (significance / 3.0)
        .min(1.0)
        .max(MIN_CONFIDENCE)
        .min(MAX_CONFIDENCE)
}

/// Entity attached to a trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEntity {
    pub text: String,
    pub entity_type: String,
    pub frequency: usize,

    /// 1.0 for the primary entity, the co-occurrence rate for related ones
    pub relevance_score: f64,
}

impl TrendEntity {
    /// Primary entity that triggered the trend
    #[must_use]
    pub fn primary(text: impl Into<String>, entity_type: impl Into<String>, frequency: usize) -> Self {
        Self {
            text: text.into(),
            entity_type: entity_type.into(),
            frequency,
            relevance_score: 1.0,
        }
    }
}

/// Article cited in support of a trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEvidenceItem {
    pub article_id: i64,
    pub article_url: String,
    pub article_title: String,
    pub published_at: DateTime<Utc>,
    pub evidence_text: String,
    pub relevance_score: f64,
}

/// Ranked, evidenced trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend_type: TrendType,
    pub name: String,
    pub description: String,
    pub status: TrendStatus,

    /// In `[0.6, 0.99]`
    pub confidence_score: f64,

    pub start_date: DateTime<Utc>,
    pub statistical_significance: f64,
    pub tags: Vec<String>,

    /// Primary entity first, then co-occurring entities
    pub entities: Vec<TrendEntity>,

    /// One item per distinct source article
    pub evidence: Vec<TrendEvidenceItem>,
}

impl TrendAnalysis {
    /// Entity that triggered the trend
    #[must_use]
    pub fn primary_entity(&self) -> Option<&TrendEntity> {
        self.entities.first()
    }

    /// Co-occurring entities
    #[must_use]
    pub fn related_entities(&self) -> &[TrendEntity] {
        self.entities.get(1..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(TrendType::classify(2, 5.0), TrendType::NovelEntity);
        assert_eq!(TrendType::classify(3, 3.0), TrendType::NovelEntity);
        assert_eq!(TrendType::classify(5, 2.5), TrendType::FrequencySpike);
        assert_eq!(TrendType::classify(4, 2.0), TrendType::EmergingTopic);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            TrendType::NovelEntity.describe("ORG", "Acme Corp"),
            "New org 'Acme Corp' appearing in local news coverage"
        );
        assert_eq!(
            TrendType::FrequencySpike.describe("PERSON", "Jane Doe"),
            "Significant increase in mentions of person 'Jane Doe'"
        );
        assert_eq!(
            TrendType::EmergingTopic.describe("GPE", "Springfield"),
            "Steadily increasing coverage of gpe 'Springfield' in local news"
        );
        assert_eq!(
            TrendType::SustainedCoverage.describe("EVENT", "Fair"),
            "Consistent ongoing coverage of event 'Fair' in local news"
        );
        assert_eq!(
            describe_trend_label("mystery", "ORG", "Acme"),
            "Unusual pattern in mentions of org 'Acme' in local news"
        );
        assert_eq!(
            describe_trend_label("FREQUENCY_SPIKE", "ORG", "Acme"),
            TrendType::FrequencySpike.describe("ORG", "Acme")
        );
    }

    #[test]
    fn test_tags_and_labels() {
        assert_eq!(TrendType::NovelEntity.tag(), "novel-entity");
        assert_eq!(TrendType::parse("sustained-coverage"), Some(TrendType::SustainedCoverage));
        assert_eq!(
            serde_json::to_string(&TrendType::FrequencySpike).unwrap(),
            "\"frequency_spike\""
        );
        assert_eq!(serde_json::to_string(&TrendStatus::Confirmed).unwrap(), "\"confirmed\"");
    }

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(confidence_from_significance(0.0), MIN_CONFIDENCE);
        assert_eq!(confidence_from_significance(9.0), MAX_CONFIDENCE);
        assert!((confidence_from_significance(2.4) - 0.8).abs() < 1e-12);
        assert!(confidence_from_significance(2.5) > confidence_from_significance(2.4));
    }

    #[test]
    fn test_status() {
        assert_eq!(TrendStatus::from_confidence(0.8), TrendStatus::Potential);
        assert_eq!(TrendStatus::from_confidence(0.81), TrendStatus::Confirmed);
        assert_eq!(TrendStatus::Potential.as_str(), "potential");
    }
}
