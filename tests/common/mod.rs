//! Common test utilities

use chrono::{DateTime, Duration, TimeZone, Utc};
use trendlens::models::{Article, Entity};

/// Fixed analysis time
#[allow(dead_code)]
pub fn analysis_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

/// Create a dated article published `days_ago` days before the analysis time
#[allow(dead_code)]
pub fn create_article(id: i64, days_ago: i64) -> Article {
    Article::new(
        id,
        Some(format!("Local headline number {id}")),
        format!("https://news.example.com/articles/{id}"),
    )
    .published(analysis_time() - Duration::days(days_ago))
}

/// Create `count` dated articles with ids `1..=count`
#[allow(dead_code)]
pub fn create_articles(count: i64) -> Vec<Article> {
    (1..=count).map(|id| create_article(id, id % 7)).collect()
}

/// One entity record per article id, with ids starting at `first_id`
#[allow(dead_code)]
pub fn create_mentions(
    text: &str,
    entity_type: &str,
    article_ids: &[i64],
    first_id: i64,
) -> Vec<Entity> {
    article_ids
        .iter()
        .enumerate()
        .map(|(i, &article_id)| Entity::new(first_id + i as i64, article_id, text, entity_type))
        .collect()
}
