//! Keyword trend analysis over time-bucketed frequency series
//!
//! This module provides functionality for:
//! - Bucketing article headlines by interval and extracting per-bucket keywords
//! - Tracking per-keyword frequency series across buckets
//! - Flagging keywords whose frequency grows between the first and last bucket

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::interval::{get_interval_key, Interval};
use super::keywords::KeywordExtractor;
use crate::config::KeywordConfig;
use crate::models::Article;

/// Per-period keyword counts, keyed by interval key
pub type KeywordTrendData = BTreeMap<String, Vec<(String, usize)>>;

/// Periods needed before growth is measured
const DEFAULT_MIN_PERIODS: usize = 2;

/// Minimum mentions across all periods before a keyword is considered
const MIN_TOTAL_MENTIONS: usize = 3;

/// Growth rate above which a keyword is flagged
const GROWTH_THRESHOLD: f64 = 0.5;

/// Last-period count at which a keyword is flagged regardless of growth
const MIN_LAST_COUNT: usize = 3;

/// Frequency series for one keyword
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordTrend {
    /// Keyword being tracked
    pub keyword: String,

    /// Counts per period key (sorted chronologically by key)
    data: BTreeMap<String, usize>,
}

impl KeywordTrend {
    /// Create an empty series for `keyword`
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            data: BTreeMap::new(),
        }
    }

    /// Add a count for a period
    ///
    /// Repeated entries for the same period accumulate.
    pub fn add_count(&mut self, period: &str, count: usize) {
        *self.data.entry(period.to_string()).or_insert(0) += count;
    }

    /// Count in a period, zero when absent
    #[must_use]
    pub fn count_at(&self, period: &str) -> usize {
        self.data.get(period).copied().unwrap_or(0)
    }

    /// Sum of counts over all periods
    #[must_use]
    pub fn total_mentions(&self) -> usize {
        self.data.values().sum()
    }

    /// Number of periods with a recorded count
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if there are no recorded periods
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Counts per period
    #[must_use]
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.data
    }
}

/// Keyword flagged as trending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTrendSignal {
    pub term: String,

    /// `(last - first) / max(1, first)`
    pub growth_rate: f64,

    pub first_count: usize,
    pub last_count: usize,
    pub total_mentions: usize,
}

/// Build keyword series from per-period keyword lists, in first-seen order
fn build_series(trend_data: &KeywordTrendData) -> Vec<KeywordTrend> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<KeywordTrend> = Vec::new();

    for (period, keywords) in trend_data {
        for (term, count) in keywords {
            let pos = *index.entry(term.as_str()).or_insert_with(|| {
                series.push(KeywordTrend::new(term.clone()));
                series.len() - 1
            });
            series[pos].add_count(period, *count);
        }
    }

    series
}

/// Compare keyword series across periods and flag growing terms
///
/// Needs at least two periods. Terms must appear in both the first and the
/// last period; those missing from the first period are left to the entity
/// trend path. Results are sorted by growth rate, then total mentions.
pub fn detect_keyword_trends(trend_data: &KeywordTrendData) -> Vec<KeywordTrendSignal> {
    detect_keyword_trends_with(trend_data, DEFAULT_MIN_PERIODS)
}

/// [`detect_keyword_trends`] with a custom minimum number of periods
///
/// Values below two are treated as two.
pub fn detect_keyword_trends_with(
    trend_data: &KeywordTrendData,
    min_periods: usize,
) -> Vec<KeywordTrendSignal> {
    if trend_data.len() < min_periods.max(DEFAULT_MIN_PERIODS) {
        return Vec::new();
    }

    let (Some((first_period, _)), Some((last_period, _))) =
        (trend_data.first_key_value(), trend_data.last_key_value())
    else {
        return Vec::new();
    };

    let mut signals: Vec<KeywordTrendSignal> = build_series(trend_data)
        .into_iter()
        .filter_map(|series| {
            let total_mentions = series.total_mentions();
            if total_mentions < MIN_TOTAL_MENTIONS {
                return None;
            }

            let first_count = series.count_at(first_period);
            let last_count = series.count_at(last_period);
            if first_count == 0 || last_count == 0 {
                return None;
            }

            let growth_rate =
                (last_count as f64 - first_count as f64) / first_count.max(1) as f64;
            if growth_rate > GROWTH_THRESHOLD || last_count >= MIN_LAST_COUNT {
                Some(KeywordTrendSignal {
                    term: series.keyword,
                    growth_rate,
                    first_count,
                    last_count,
                    total_mentions,
                })
            } else {
                None
            }
        })
        .collect();

    signals.sort_by(|a, b| {
        b.growth_rate
            .partial_cmp(&a.growth_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.total_mentions.cmp(&a.total_mentions))
    });

    tracing::debug!(
        periods = trend_data.len(),
        signals = signals.len(),
        "Keyword trend detection finished"
    );

    signals
}

/// Bucket article titles by interval and extract the top keywords per bucket
///
/// Articles without a title are skipped; a missing publication date puts
/// the article in the current bucket.
pub fn keyword_trend_data(
    articles: &[Article],
    interval: Interval,
    extractor: &KeywordExtractor,
    top_n: usize,
) -> KeywordTrendData {
    let mut headlines: BTreeMap<String, Vec<&str>> = BTreeMap::new();

    for article in articles {
        let Some(title) = article.title.as_deref().filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        headlines
            .entry(get_interval_key(article.published_at, interval))
            .or_default()
            .push(title);
    }

    headlines
        .into_iter()
        .map(|(period, titles)| (period, extractor.extract_keywords(&titles, top_n)))
        .collect()
}

/// Bucket, extract and detect keyword trends using configured settings
pub fn analyze_keyword_trends(
    articles: &[Article],
    extractor: &KeywordExtractor,
    config: &KeywordConfig,
) -> Vec<KeywordTrendSignal> {
    let data = keyword_trend_data(articles, config.interval, extractor, config.top_n);
    detect_keyword_trends_with(&data, config.min_periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn period(entries: &[(&str, usize)]) -> Vec<(String, usize)> {
        entries.iter().map(|(k, c)| (k.to_string(), *c)).collect()
    }

    #[test]
    fn test_keyword_trend_series() {
        let mut trend = KeywordTrend::new("budget");
        trend.add_count("2024-01-01", 2);
        trend.add_count("2024-01-02", 3);
        trend.add_count("2024-01-02", 1);

        assert_eq!(trend.len(), 2);
        assert!(!trend.is_empty());
        assert_eq!(trend.count_at("2024-01-02"), 4);
        assert_eq!(trend.count_at("2024-01-03"), 0);
        assert_eq!(trend.total_mentions(), 6);
    }

    #[test]
    fn test_requires_two_periods() {
        let mut data = KeywordTrendData::new();
        data.insert("2024-01-01".to_string(), period(&[("x", 10)]));
        assert!(detect_keyword_trends(&data).is_empty());
    }

    #[test]
    fn test_noise_filter() {
        let mut data = KeywordTrendData::new();
        data.insert("2024-01-01".to_string(), period(&[("x", 1)]));
        data.insert("2024-01-02".to_string(), period(&[("x", 1)]));
        assert!(detect_keyword_trends(&data).is_empty());
    }

    #[test]
    fn test_growth_detection() {
        let mut data = KeywordTrendData::new();
        data.insert(
            "2024-01-01".to_string(),
            period(&[("flood", 1), ("election", 4), ("parade", 2)]),
        );
        data.insert("2024-01-02".to_string(), period(&[("flood", 2), ("storm", 5)]));
        data.insert(
            "2024-01-03".to_string(),
            period(&[("flood", 4), ("election", 4), ("parade", 2), ("storm", 6)]),
        );

        let signals = detect_keyword_trends(&data);
        let terms: Vec<&str> = signals.iter().map(|s| s.term.as_str()).collect();

        // flood grows 3x; election is flat but has 4 in the last period;
        // parade is flat below 3; storm is missing from the first period
        assert_eq!(terms, vec!["flood", "election"]);

        let flood = &signals[0];
        assert!((flood.growth_rate - 3.0).abs() < f64::EPSILON);
        assert_eq!(flood.first_count, 1);
        assert_eq!(flood.last_count, 4);
        assert_eq!(flood.total_mentions, 7);
        assert_eq!(signals[1].growth_rate, 0.0);
    }

    #[test]
    fn test_ties_broken_by_total_mentions() {
        let mut data = KeywordTrendData::new();
        data.insert("2024-W01".to_string(), period(&[("a", 1), ("b", 2)]));
        data.insert("2024-W02".to_string(), period(&[("a", 0), ("b", 5)]));
        data.insert("2024-W03".to_string(), period(&[("a", 2), ("b", 4)]));

        let signals = detect_keyword_trends(&data);
        assert_eq!(signals.len(), 2);
        // both grow by 1.0; b has more mentions
        assert_eq!(signals[0].term, "b");
        assert_eq!(signals[1].term, "a");
    }

    #[test]
    fn test_min_periods() {
        let mut data = KeywordTrendData::new();
        data.insert("2024-01-01".to_string(), period(&[("flood", 1)]));
        data.insert("2024-01-02".to_string(), period(&[("flood", 4)]));

        assert_eq!(detect_keyword_trends_with(&data, 0).len(), 1);
        assert_eq!(detect_keyword_trends_with(&data, 2).len(), 1);
        assert!(detect_keyword_trends_with(&data, 3).is_empty());
    }

    #[test]
    fn test_analyze_uses_keyword_config() {
        let articles: Vec<Article> = [(1, 1, "Flood warning"), (2, 2, "Flood flood flood")]
            .into_iter()
            .map(|(id, day, title)| {
                Article::new(id, Some(title.to_string()), format!("u{id}"))
                    .published(Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap())
            })
            .collect();
        let extractor = KeywordExtractor::new();

        let daily = analyze_keyword_trends(&articles, &extractor, &KeywordConfig::default());
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].term, "flood");
        assert_eq!((daily[0].first_count, daily[0].last_count), (1, 3));

        // a single monthly bucket has nothing to compare
        let monthly = KeywordConfig {
            interval: Interval::Month,
            ..KeywordConfig::default()
        };
        assert!(analyze_keyword_trends(&articles, &extractor, &monthly).is_empty());

        let strict = KeywordConfig {
            min_periods: 3,
            ..KeywordConfig::default()
        };
        assert!(analyze_keyword_trends(&articles, &extractor, &strict).is_empty());
    }

    #[test]
    fn test_keyword_trend_data_buckets_by_interval() {
        let day1 = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
        let articles = vec![
            Article::new(1, Some("Harbor bridge closed".to_string()), "u1").published(day1),
            Article::new(2, Some("Harbor bridge reopens".to_string()), "u2").published(day2),
            Article::new(3, None, "u3").published(day2),
        ];

        let data = keyword_trend_data(&articles, Interval::Day, &KeywordExtractor::new(), 10);

        assert_eq!(data.len(), 2);
        let first = &data["2024-03-01"];
        assert_eq!(first[0], ("harbor".to_string(), 1));
        assert!(data["2024-03-02"].contains(&("reopens".to_string(), 1)));
    }
}
