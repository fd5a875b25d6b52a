//! Time bucketing helpers
//!
//! - [`Interval`] keys timestamps into day/week/month/year buckets whose
//!   string keys sort chronologically
//! - [`TimeFrame`] turns a named window plus a period count into a
//!   concrete `(start, end)` date range

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{AnalysisError, AnalysisResult};

/// Bucket granularity for time-series counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl Interval {
    /// Parse an interval label
    ///
    /// Unknown labels fall back to [`Interval::Year`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        // Case and surrounding whitespace are ignored, so "Day" is a day.
        match s.trim().to_lowercase().as_str() {
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::Year,
        }
    }

    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Bucket key for a timestamp
    #[must_use]
    pub fn key(&self, timestamp: DateTime<Utc>) -> String {
        match self {
            Self::Day => timestamp.format("%Y-%m-%d").to_string(),
            Self::Week => {
                // ISO week-year with a zero-padded week (2025-W01), so week
                // keys sort chronologically and stay in the right year at
                // year boundaries.
                let week = timestamp.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Self::Month => timestamp.format("%Y-%m").to_string(),
            Self::Year => timestamp.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a timestamp to its bucket key, using the current time when missing
#[must_use]
pub fn get_interval_key(timestamp: Option<DateTime<Utc>>, interval: Interval) -> String {
    interval.key(timestamp.unwrap_or_else(Utc::now))
}

/// Named analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeFrame {
    /// Length of one period in days
    ///
    /// Month, quarter and year are fixed approximations (30/90/365).
    #[must_use]
    pub fn unit_days(&self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }

    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Get all time frames
    #[must_use]
    pub fn all() -> [Self; 5] {
        [Self::Day, Self::Week, Self::Month, Self::Quarter, Self::Year]
    }
}

impl FromStr for TimeFrame {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(AnalysisError::UnsupportedTimeFrame(other.to_string())),
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date range ending now and covering `periods` units of `time_frame`
#[must_use]
pub fn calculate_date_range(time_frame: TimeFrame, periods: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    calculate_date_range_at(time_frame, periods, Utc::now())
}

/// Date range ending at `end` and covering `periods` units of `time_frame`
///
/// A start before the representable minimum saturates to it.
#[must_use]
pub fn calculate_date_range_at(
    time_frame: TimeFrame,
    periods: u32,
    end: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Duration::try_days(time_frame.unit_days() * i64::from(periods))
        .and_then(|span| end.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    (start, end)
}

/// Date range for a time frame label such as `"week"`
pub fn date_range_for_label(
    label: &str,
    periods: u32,
) -> AnalysisResult<(DateTime<Utc>, DateTime<Utc>)> {
    let time_frame: TimeFrame = label.parse()?;
    Ok(calculate_date_range(time_frame, periods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn march_15() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_interval_keys() {
        let ts = Some(march_15());
        assert_eq!(get_interval_key(ts, Interval::Day), "2024-03-15");
        assert_eq!(get_interval_key(ts, Interval::Week), "2024-W11");
        assert_eq!(get_interval_key(ts, Interval::Month), "2024-03");
        assert_eq!(get_interval_key(ts, Interval::Year), "2024");
    }

    #[test]
    fn test_unknown_interval_falls_back_to_year() {
        assert_eq!(Interval::parse("fortnight"), Interval::Year);
        assert_eq!(Interval::parse(" Week "), Interval::Week);
        assert_eq!(Interval::parse("MONTH"), Interval::Month);
        assert_eq!(Interval::parse("Day"), Interval::Day);
    }

    #[test]
    fn test_week_key_uses_iso_year() {
        // 2024-12-30 is in ISO week 1 of 2025
        let ts = Utc.with_ymd_and_hms(2024, 12, 30, 0, 0, 0).unwrap();
        assert_eq!(Interval::Week.key(ts), "2025-W01");

        let early = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(Interval::Week.key(early), "2024-W05");
    }

    #[test]
    fn test_week_keys_sort_chronologically() {
        let a = Interval::Week.key(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        let b = Interval::Week.key(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
        assert!(a < b, "{a} should sort before {b}");
    }

    #[test]
    fn test_missing_timestamp_uses_now() {
        let key = get_interval_key(None, Interval::Year);
        assert_eq!(key, Utc::now().format("%Y").to_string());
    }

    #[test]
    fn test_date_range_units() {
        let end = march_15();
        for (frame, days) in [
            (TimeFrame::Day, 1),
            (TimeFrame::Week, 7),
            (TimeFrame::Month, 30),
            (TimeFrame::Quarter, 90),
            (TimeFrame::Year, 365),
        ] {
            let (start, stop) = calculate_date_range_at(frame, 2, end);
            assert_eq!(stop, end);
            assert_eq!(end - start, Duration::days(2 * days), "{frame}");
        }
    }

    #[test]
    fn test_zero_periods_is_empty_range() {
        let end = march_15();
        let (start, stop) = calculate_date_range_at(TimeFrame::Month, 0, end);
        assert_eq!(start, stop);
    }

    #[test]
    fn test_time_frame_parse() {
        assert_eq!("Quarter".parse::<TimeFrame>(), Ok(TimeFrame::Quarter));
        assert_eq!(
            "decade".parse::<TimeFrame>(),
            Err(AnalysisError::UnsupportedTimeFrame("decade".to_string()))
        );
        assert!(date_range_for_label("century", 1).is_err());
        assert!(date_range_for_label("week", 1).is_ok());
    }
}
