// Input records supplied by the ingestion layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Named entity extracted from an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub article_id: i64,
    pub text: String,
    pub entity_type: String, // PERSON, ORG, GPE, EVENT, ...
}

impl Entity {
    /// Create a new entity record
    pub fn new(
        id: i64,
        article_id: i64,
        text: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            article_id,
            text: text.into(),
            entity_type: entity_type.into(),
        }
    }

    /// Grouping key shared by every mention of the same entity
    pub fn key(&self) -> EntityKey {
        EntityKey::new(&self.text, &self.entity_type)
    }

    /// Whether this record refers to the same entity as `other`
    pub fn same_entity(&self, other: &Entity) -> bool {
        self.text == other.text && self.entity_type == other.entity_type
    }
}

/// `(text, entity_type)` pair used for frequency counting
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub text: String,
    pub entity_type: String,
}

impl EntityKey {
    pub fn new(text: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity_type: entity_type.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.entity_type)
    }
}

/// News article referenced by entity records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Article {
    pub id: i64,
    pub title: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Create a new article record
    pub fn new(id: i64, title: Option<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title,
            url: url.into(),
            published_at: None,
        }
    }

    /// Set the publication timestamp
    #[must_use]
    pub fn published(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Title for display, synthesized when the article has none
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => crate::utils::normalize_whitespace(title),
            _ => format!("Article {}", self.id),
        }
    }
}

/// SHA256 fingerprint of an entity pool, used to detect stale cached results
pub fn pool_fingerprint(entities: &[Entity]) -> String {
    let mut hasher = Sha256::new();
    for entity in entities {
        hasher.update(entity.id.to_le_bytes());
        hasher.update(entity.article_id.to_le_bytes());
        hasher.update(entity.text.as_bytes());
        hasher.update([0u8]);
        hasher.update(entity.entity_type.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
