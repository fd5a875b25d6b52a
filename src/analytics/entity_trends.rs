//! Entity trend detection with significance scoring and co-occurrence evidence
//!
//! This module provides functionality for:
//! - Grouping entity mentions by `(text, entity_type)`
//! - Scoring groups against a baseline and classifying the trend
//! - Enriching trends with co-occurring entities and source-article evidence
//! - Bucketing entity mentions into per-interval frequency timelines

use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::cooccurrence::{CacheStats, CooccurrenceCache};
use super::interval::{get_interval_key, Interval};
use super::significance::{
    analyze_frequency_patterns, calculate_statistical_significance, FrequencyPattern,
};
use super::trend::{
    confidence_from_significance, TrendAnalysis, TrendEntity, TrendEvidenceItem, TrendStatus,
    TrendType,
};
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::models::{Article, Entity, EntityKey};
use crate::utils::truncate_text;

/// Relevance attached to every evidence item
const EVIDENCE_RELEVANCE: f64 = 1.0;

/// Maximum characters of evidence text
const MAX_EVIDENCE_TEXT: usize = 200;

/// Ceiling for related-entity relevance; 1.0 marks the primary entity only
const MAX_RELATED_RELEVANCE: f64 = 0.99;

/// Mentions of one `(text, entity_type)` pair
#[derive(Debug)]
struct EntityGroup<'a> {
    key: EntityKey,
    records: Vec<&'a Entity>,
    seen_ids: HashSet<i64>,
}

impl<'a> EntityGroup<'a> {
    fn new(key: EntityKey) -> Self {
        Self {
            key,
            records: Vec::new(),
            seen_ids: HashSet::new(),
        }
    }

    /// Add a record, ignoring repeats of the same record id
    fn add(&mut self, entity: &'a Entity) {
        if self.seen_ids.insert(entity.id) {
            self.records.push(entity);
        }
    }

    fn mention_count(&self) -> usize {
        self.records.len()
    }
}

/// Group entities of the wanted types by key, in first-seen order
fn group_entities<'a>(entities: &'a [Entity], entity_types: &[String]) -> Vec<EntityGroup<'a>> {
    let mut index: HashMap<EntityKey, usize> = HashMap::new();
    let mut groups: Vec<EntityGroup<'a>> = Vec::new();

    for entity in entities
        .iter()
        .filter(|e| entity_types.iter().any(|t| *t == e.entity_type))
    {
        let key = entity.key();
        let pos = match index.get(&key) {
            Some(&pos) => pos,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(EntityGroup::new(key));
                groups.len() - 1
            }
        };
        groups[pos].add(entity);
    }

    groups
}

/// Entity trend detector
///
/// Holds the analysis configuration and a co-occurrence cache that lives
/// until [`TrendDetector::clear_cache`] is called or the entity pool changes.
#[derive(Debug, Default)]
pub struct TrendDetector {
    config: AnalysisConfig,
    cache: CooccurrenceCache,
}

impl TrendDetector {
    /// Create a detector with the given configuration
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            cache: CooccurrenceCache::new(),
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Drop cached co-occurrence results
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Co-occurrence cache statistics
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Detect entity trends as of now
    pub fn detect_entity_trends(
        &mut self,
        entities: &[Entity],
        articles: &[Article],
    ) -> Vec<TrendAnalysis> {
        self.detect_entity_trends_at(entities, articles, Utc::now())
    }

    /// Detect entity trends as of `now`
    ///
    /// Identical inputs and `now` give identical output.
    pub fn detect_entity_trends_at(
        &mut self,
        entities: &[Entity],
        articles: &[Article],
        now: DateTime<Utc>,
    ) -> Vec<TrendAnalysis> {
        let groups = group_entities(entities, &self.config.entity_types);
        let article_index: HashMap<i64, &Article> = articles.iter().map(|a| (a.id, a)).collect();
        let start_date = Duration::try_days(self.config.lookback_days)
            .and_then(|lookback| now.checked_sub_signed(lookback))
            .unwrap_or(now);

        self.cache.prepare(entities);

        let mut trends = Vec::new();
        for group in &groups {
            let mention_count = group.mention_count();
            if mention_count < self.config.min_mentions {
                continue;
            }

            // Half-count baseline stands in for previous-period data
            let baseline = mention_count / 2;
            let score = calculate_statistical_significance(
                mention_count,
                baseline,
                self.config.min_significance,
            );
            if !score.is_significant {
                tracing::debug!(
                    entity = %group.key,
                    mentions = mention_count,
                    z_score = score.z_score,
                    "Entity below significance threshold"
                );
                continue;
            }

            let trend = self.build_trend(group, score.strength(), entities, &article_index, start_date);
            tracing::debug!(
                entity = %group.key,
                mentions = mention_count,
                trend_type = %trend.trend_type,
                confidence = trend.confidence_score,
                "Entity trend detected"
            );
            trends.push(trend);
        }

        trends.sort_by(|a, b| {
            b.confidence_score
                .partial_cmp(&a.confidence_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        trends.truncate(self.config.max_trends);

        tracing::info!(
            entities = entities.len(),
            articles = articles.len(),
            groups = groups.len(),
            trends = trends.len(),
            "Entity trend detection finished"
        );

        trends
    }

    fn build_trend(
        &mut self,
        group: &EntityGroup<'_>,
        significance: f64,
        all_entities: &[Entity],
        article_index: &HashMap<i64, &Article>,
        start_date: DateTime<Utc>,
    ) -> TrendAnalysis {
        let EntityKey { text, entity_type } = &group.key;
        let mention_count = group.mention_count();

        let trend_type = TrendType::classify(mention_count, significance);
        let confidence_score = confidence_from_significance(significance);

        let mut trend_entities = vec![TrendEntity::primary(text, entity_type, mention_count)];
        if let Some(representative) = group.records.first() {
            let related = self.cache.related(
                representative,
                all_entities,
                self.config.cooccurrence_threshold,
            );
            trend_entities.extend(
                related
                    .into_iter()
                    .take(self.config.max_related_entities)
                    .map(|r| TrendEntity {
                        text: r.text,
                        entity_type: r.entity_type,
                        frequency: r.co_occurrence_count,
                        relevance_score: r.co_occurrence_rate.min(MAX_RELATED_RELEVANCE),
                    }),
            );
        }

        TrendAnalysis {
            trend_type,
            name: group.key.to_string(),
            description: trend_type.describe(entity_type, text),
            status: TrendStatus::from_confidence(confidence_score),
            confidence_score,
            start_date,
            statistical_significance: significance,
            tags: vec![entity_type.to_lowercase(), trend_type.tag()],
            entities: trend_entities,
            evidence: Self::collect_evidence(group, article_index),
        }
    }

    /// One evidence item per distinct article with a known publication date
    fn collect_evidence(
        group: &EntityGroup<'_>,
        article_index: &HashMap<i64, &Article>,
    ) -> Vec<TrendEvidenceItem> {
        let mut seen: HashSet<i64> = HashSet::new();

        group
            .records
            .iter()
            .filter(|record| seen.insert(record.article_id))
            .filter_map(|record| {
                let article = article_index.get(&record.article_id)?;
                let published_at = article.published_at?;
                let title = article.display_title();
                Some(TrendEvidenceItem {
                    article_id: article.id,
                    article_url: article.url.clone(),
                    evidence_text: truncate_text(
                        &format!("{} mentioned in \"{title}\"", group.key.text),
                        MAX_EVIDENCE_TEXT,
                    ),
                    article_title: title,
                    published_at,
                    relevance_score: EVIDENCE_RELEVANCE,
                })
            })
            .collect()
    }

    /// Per-entity mention counts bucketed by the publication date of the source article
    ///
    /// Mentions whose article is unknown or undated fall into the current bucket.
    #[must_use]
    pub fn entity_frequency_timeline(
        &self,
        entities: &[Entity],
        articles: &[Article],
        interval: Interval,
    ) -> BTreeMap<EntityKey, BTreeMap<String, usize>> {
        let published: HashMap<i64, Option<DateTime<Utc>>> =
            articles.iter().map(|a| (a.id, a.published_at)).collect();

        let mut timeline: BTreeMap<EntityKey, BTreeMap<String, usize>> = BTreeMap::new();
        for group in group_entities(entities, &self.config.entity_types) {
            let buckets = timeline.entry(group.key.clone()).or_default();
            for record in &group.records {
                let timestamp = published.get(&record.article_id).copied().flatten();
                *buckets.entry(get_interval_key(timestamp, interval)).or_insert(0) += 1;
            }
        }

        timeline
    }

    /// Frequency patterns of every entity with enough buckets
    #[must_use]
    pub fn frequency_patterns(
        &self,
        entities: &[Entity],
        articles: &[Article],
        interval: Interval,
    ) -> Vec<(EntityKey, FrequencyPattern)> {
        self.entity_frequency_timeline(entities, articles, interval)
            .into_iter()
            .filter_map(|(key, buckets)| {
                analyze_frequency_patterns(&buckets, self.config.min_data_points)
                    .map(|pattern| (key, pattern))
            })
            .collect()
    }
}

/// Run entity trend detection on the blocking thread pool
///
/// For async callers with large inputs; uses a fresh detector.
pub async fn detect_entity_trends_blocking(
    config: AnalysisConfig,
    entities: Vec<Entity>,
    articles: Vec<Article>,
) -> Result<Vec<TrendAnalysis>> {
    tokio::task::spawn_blocking(move || {
        TrendDetector::new(config).detect_entity_trends(&entities, &articles)
    })
    .await
    .map_err(Error::from)
}
