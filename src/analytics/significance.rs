//! Significance scoring and frequency dispersion analysis
//!
//! The significance score is a coarse two-tier heuristic (0.0, 1.8 or 2.0),
//! not a formal z-test. The branch thresholds are part of the observable
//! behaviour and must not be tuned.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Default z-score threshold for significance
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 1.5;

/// Default minimum number of buckets for pattern analysis
pub const DEFAULT_MIN_DATA_POINTS: usize = 3;

/// Result of comparing a current count against a baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificanceScore {
    /// Heuristic score: 0.0, 1.8 or 2.0
    pub z_score: f64,

    /// `current / baseline`, `None` for a zero baseline
    pub growth_rate: Option<f64>,

    /// `z_score >= threshold`
    pub is_significant: bool,
}

impl SignificanceScore {
    /// Strength of the signal: the growth ratio, or the z tier for new topics
    #[must_use]
    pub fn strength(&self) -> f64 {
        self.growth_rate.unwrap_or(self.z_score)
    }
}

/// Score `current` mentions against `baseline` mentions
///
/// - baseline 0: brand-new topic, z = 2.0, significant only with 2+ mentions
/// - `current >= 3` and growth >= 1.5: z = 2.0
/// - `current >= 2` and growth >= 2.0: z = 1.8
/// - otherwise z = 0.0
#[must_use]
pub fn calculate_statistical_significance(
    current: usize,
    baseline: usize,
    threshold: f64,
) -> SignificanceScore {
    if baseline == 0 {
        return SignificanceScore {
            z_score: 2.0,
            growth_rate: None,
            is_significant: current >= 2,
        };
    }

    let growth_rate = current as f64 / baseline as f64;
    let z_score = if current >= 3 && growth_rate >= 1.5 {
        2.0
    } else if current >= 2 && growth_rate >= 2.0 {
        1.8
    } else {
        0.0
    };

    SignificanceScore {
        z_score,
        growth_rate: Some(growth_rate),
        is_significant: z_score >= threshold,
    }
}

/// Dispersion statistics over a frequency map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyPattern {
    pub mean: f64,

    /// Population standard deviation
    pub std: f64,

    /// `std / max(1, mean)`
    pub coefficient_of_variation: f64,

    /// Coefficient of variation above 1.0
    pub is_spiky: bool,

    /// Coefficient of variation below 0.5
    pub is_consistent: bool,
}

/// Classify a frequency map as spiky or consistent
///
/// Returns `None` when the map has fewer than `min_data_points` keys.
#[must_use]
pub fn analyze_frequency_patterns(
    frequencies: &BTreeMap<String, usize>,
    min_data_points: usize,
) -> Option<FrequencyPattern> {
    if frequencies.is_empty() || frequencies.len() < min_data_points {
        return None;
    }

    let values: Vec<f64> = frequencies.values().map(|&v| v as f64).collect();
    let mean = values.iter().mean();
    let std = values.iter().population_std_dev();
    let coefficient_of_variation = std / mean.max(1.0);

    Some(FrequencyPattern {
        mean,
        std,
        coefficient_of_variation,
        is_spiky: coefficient_of_variation > 1.0,
        is_consistent: coefficient_of_variation < 0.5,
    })
}
