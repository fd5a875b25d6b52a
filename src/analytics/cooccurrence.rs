//! Co-occurrence analysis between entities sharing source articles

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{pool_fingerprint, Entity, EntityKey};

/// Default minimum co-occurrence rate
pub const DEFAULT_COOCCURRENCE_THRESHOLD: f64 = 0.3;

/// Maximum related entities returned per target
pub const MAX_RELATED_ENTITIES: usize = 10;

/// Entity found in the same articles as a target entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub text: String,
    pub entity_type: String,

    /// Share of the target's articles that also contain this entity
    pub co_occurrence_rate: f64,

    /// Number of target articles that also contain this entity
    pub co_occurrence_count: usize,
}

/// Find entities that frequently appear in the same articles as `target`
///
/// An article belongs to the target when it holds an entity with the
/// target's id or with the target's `(text, entity_type)`. Each other entity
/// is counted once per article. Entities below `threshold` are dropped and
/// at most [`MAX_RELATED_ENTITIES`] are returned, by count descending.
pub fn find_related_entities(
    target: &Entity,
    all_entities: &[Entity],
    threshold: f64,
) -> Vec<RelatedEntity> {
    let mut by_article: BTreeMap<i64, Vec<&Entity>> = BTreeMap::new();
    for entity in all_entities {
        by_article.entry(entity.article_id).or_default().push(entity);
    }

    let is_target = |e: &Entity| e.id == target.id || e.same_entity(target);

    let target_articles: Vec<&Vec<&Entity>> = by_article
        .values()
        .filter(|entities| entities.iter().any(|e| is_target(e)))
        .collect();

    if target_articles.is_empty() {
        return Vec::new();
    }

    let mut index: HashMap<EntityKey, usize> = HashMap::new();
    let mut tallies: Vec<(EntityKey, usize)> = Vec::new();

    for entities in &target_articles {
        let mut seen: HashSet<EntityKey> = HashSet::new();
        for entity in entities.iter().filter(|e| !is_target(e)) {
            let key = entity.key();
            if !seen.insert(key.clone()) {
                continue;
            }
            match index.get(&key) {
                Some(&pos) => tallies[pos].1 += 1,
                None => {
                    index.insert(key.clone(), tallies.len());
                    tallies.push((key, 1));
                }
            }
        }
    }

    let article_count = target_articles.len() as f64;
    let mut related: Vec<RelatedEntity> = tallies
        .into_iter()
        .map(|(key, count)| RelatedEntity {
            text: key.text,
            entity_type: key.entity_type,
            co_occurrence_rate: count as f64 / article_count,
            co_occurrence_count: count,
        })
        .filter(|r| r.co_occurrence_rate >= threshold)
        .collect();

    related.sort_by(|a, b| b.co_occurrence_count.cmp(&a.co_occurrence_count));
    related.truncate(MAX_RELATED_ENTITIES);
    related
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Caller-owned cache of co-occurrence results for one entity pool
///
/// Results are only valid for the pool they were computed from; switching
/// to a pool with a different fingerprint empties the cache. Not shared
/// between threads.
#[derive(Debug, Default)]
pub struct CooccurrenceCache {
    fingerprint: Option<String>,
    entries: HashMap<(EntityKey, u64), Vec<RelatedEntity>>,
    stats: CacheStats,
}

impl CooccurrenceCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the cache to an entity pool, dropping entries from other pools
    pub fn prepare(&mut self, all_entities: &[Entity]) {
        let fingerprint = pool_fingerprint(all_entities);
        if self.fingerprint.as_deref() != Some(fingerprint.as_str()) {
            if !self.entries.is_empty() {
                tracing::debug!(entries = self.entries.len(), "Entity pool changed, clearing co-occurrence cache");
            }
            self.entries.clear();
            self.fingerprint = Some(fingerprint);
        }
    }

    /// Related entities for `target`, computed once per pool and threshold
    ///
    /// Call [`CooccurrenceCache::prepare`] with the same pool first.
    pub fn related(
        &mut self,
        target: &Entity,
        all_entities: &[Entity],
        threshold: f64,
    ) -> Vec<RelatedEntity> {
        let key = (target.key(), threshold.to_bits());
        if let Some(cached) = self.entries.get(&key) {
            self.stats.hits += 1;
            return cached.clone();
        }

        self.stats.misses += 1;
        let related = find_related_entities(target, all_entities, threshold);
        self.entries.insert(key, related.clone());
        related
    }

    /// Drop all cached results
    pub fn clear(&mut self) {
        self.entries.clear();
        self.fingerprint = None;
    }

    /// Number of cached targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss statistics since creation
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<Entity> {
        vec![
            Entity::new(1, 1, "A", "ORG"),
            Entity::new(2, 2, "A", "ORG"),
            Entity::new(3, 3, "A", "ORG"),
            Entity::new(4, 1, "B", "PERSON"),
            Entity::new(5, 2, "B", "PERSON"),
            Entity::new(6, 3, "C", "GPE"),
            Entity::new(7, 4, "D", "GPE"),
        ]
    }

    #[test]
    fn test_cooccurrence_rate() {
        let entities = pool();
        let related = find_related_entities(&entities[0], &entities, 0.3);

        assert_eq!(related.len(), 2);
        assert_eq!(related[0].text, "B");
        assert_eq!(related[0].co_occurrence_count, 2);
        assert!((related[0].co_occurrence_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(related[1].text, "C");
        assert!(related.iter().all(|r| r.text != "A" && r.text != "D"));
    }

    #[test]
    fn test_threshold_filters() {
        let entities = pool();
        let related = find_related_entities(&entities[0], &entities, 0.5);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].text, "B");
    }

    #[test]
    fn test_unknown_target() {
        let entities = pool();
        let stranger = Entity::new(99, 99, "Z", "ORG");
        assert!(find_related_entities(&stranger, &entities, 0.3).is_empty());
        assert!(find_related_entities(&entities[0], &[], 0.3).is_empty());
    }

    #[test]
    fn test_counts_once_per_article() {
        let entities = vec![
            Entity::new(1, 1, "A", "ORG"),
            Entity::new(2, 1, "B", "ORG"),
            Entity::new(3, 1, "B", "ORG"),
            Entity::new(4, 2, "A", "ORG"),
        ];
        let related = find_related_entities(&entities[0], &entities, 0.3);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].co_occurrence_count, 1);
        assert!((related[0].co_occurrence_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_caps_at_ten() {
        let mut entities = vec![Entity::new(0, 1, "Hub", "ORG")];
        for i in 1..=12 {
            entities.push(Entity::new(i, 1, format!("Other {i}"), "PERSON"));
        }
        let related = find_related_entities(&entities[0], &entities, 0.3);
        assert_eq!(related.len(), MAX_RELATED_ENTITIES);
        assert_eq!(related[0].text, "Other 1");
    }

    #[test]
    fn test_cache_hits_and_invalidation() {
        let entities = pool();
        let mut cache = CooccurrenceCache::new();

        cache.prepare(&entities);
        let first = cache.related(&entities[0], &entities, 0.3);
        let second = cache.related(&entities[1], &entities, 0.3);
        assert_eq!(first, second);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.len(), 1);

        let smaller = entities[..3].to_vec();
        cache.prepare(&smaller);
        assert!(cache.is_empty());
        assert!(cache.related(&smaller[0], &smaller, 0.3).is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert!((cache.stats().hit_rate() - 1.0 / 3.0).abs() < 1e-9);
    }
}
