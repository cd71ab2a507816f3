//! Temporal granularity inference for resampling.
//!
//! Given a shared, ordered date axis, infers which coarser calendar
//! resolutions are both implied by the sampling cadence and long enough
//! (relative to the total span) to produce a meaningful downsample.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::error::{MtsError, Result};

/// Minimum number of whole units the total span must contain for a
/// granularity to be offered as a resampling candidate.
pub const MIN_UNIT_COUNT: i64 = 3;

/// Average-length calendar year in seconds (365.2425 days).
const YEAR_SECS: i64 = 31_556_952;
/// Average-length calendar month in seconds (30.436875 days).
const MONTH_SECS: i64 = 2_629_746;

/// A calendar resolution accepted by [`MTSerie::resample`](crate::core::MTSerie::resample).
///
/// Ordered coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResampleRule {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl ResampleRule {
    /// All rules, coarsest first.
    pub const ALL: [ResampleRule; 6] = [
        ResampleRule::Year,
        ResampleRule::Month,
        ResampleRule::Day,
        ResampleRule::Hour,
        ResampleRule::Minute,
        ResampleRule::Second,
    ];

    /// Truncate a timestamp to the start of its bucket at this resolution.
    pub fn bucket_start(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            ResampleRule::Year => Utc
                .with_ymd_and_hms(t.year(), 1, 1, 0, 0, 0)
                .single()
                .unwrap_or(t),
            ResampleRule::Month => Utc
                .with_ymd_and_hms(t.year(), t.month(), 1, 0, 0, 0)
                .single()
                .unwrap_or(t),
            ResampleRule::Day => truncate_seconds(t, 86_400),
            ResampleRule::Hour => truncate_seconds(t, 3_600),
            ResampleRule::Minute => truncate_seconds(t, 60),
            ResampleRule::Second => truncate_seconds(t, 1),
        }
    }

    /// Number of whole units of this resolution contained in `d`.
    fn whole_units(&self, d: Duration) -> i64 {
        match self {
            ResampleRule::Year => d.num_seconds() / YEAR_SECS,
            ResampleRule::Month => d.num_seconds() / MONTH_SECS,
            ResampleRule::Day => d.num_days(),
            ResampleRule::Hour => d.num_hours(),
            ResampleRule::Minute => d.num_minutes(),
            ResampleRule::Second => d.num_seconds(),
        }
    }
}

/// Floor a timestamp to a multiple of `unit_secs` since the epoch.
fn truncate_seconds(t: DateTime<Utc>, unit_secs: i64) -> DateTime<Utc> {
    let secs = t.timestamp();
    DateTime::<Utc>::from_timestamp(secs - secs.rem_euclid(unit_secs), 0).unwrap_or(t)
}

/// The sampling granularity of a gap: the coarsest unit the gap contains a
/// whole one of. Sub-second gaps map to [`ResampleRule::Second`].
fn sampling_granularity(gap: Duration) -> ResampleRule {
    for rule in ResampleRule::ALL {
        if rule.whole_units(gap) != 0 {
            return rule;
        }
    }
    ResampleRule::Second
}

/// Median gap between consecutive timestamps.
fn median_gap(dates: &[DateTime<Utc>]) -> Result<Duration> {
    if dates.len() < 2 {
        return Err(MtsError::InsufficientData {
            needed: 2,
            got: dates.len(),
        });
    }

    let mut diffs: Vec<Duration> = dates.windows(2).map(|w| w[1] - w[0]).collect();
    if diffs.iter().any(|d| *d < Duration::zero()) {
        return Err(MtsError::InvalidParameter(
            "dates must be in non-decreasing order".to_string(),
        ));
    }
    diffs.sort();

    let n = diffs.len();
    if n % 2 == 1 {
        Ok(diffs[n / 2])
    } else {
        Ok((diffs[n / 2 - 1] + diffs[n / 2]) / 2)
    }
}

/// Infer the resampling rules a date axis supports without producing a
/// degenerate (near-empty) result.
///
/// The candidate ladder contains every resolution at or coarser than the
/// sampling granularity of the median inter-sample gap; each candidate is
/// kept only if the total span contains at least [`MIN_UNIT_COUNT`] whole
/// units of it. The gates are independent, so a coarser unit can survive
/// even when a finer one is excluded. Result is ordered coarsest to finest.
pub fn allowed_downsample_rules(dates: &[DateTime<Utc>]) -> Result<Vec<ResampleRule>> {
    let gap = median_gap(dates)?;
    let finest = sampling_granularity(gap);

    let span = *dates.last().ok_or(MtsError::EmptyData)? - dates[0];

    Ok(ResampleRule::ALL
        .into_iter()
        .filter(|rule| *rule <= finest && rule.whole_units(span) >= MIN_UNIT_COUNT)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn spaced(n: usize, step: Duration) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + step * i as i32).collect()
    }

    // ==================== bucket_start ====================

    #[test]
    fn bucket_start_truncates_each_resolution() {
        let t = Utc.with_ymd_and_hms(2024, 5, 17, 13, 42, 31).unwrap();

        assert_eq!(
            ResampleRule::Year.bucket_start(t),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            ResampleRule::Month.bucket_start(t),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            ResampleRule::Day.bucket_start(t),
            Utc.with_ymd_and_hms(2024, 5, 17, 0, 0, 0).unwrap()
        );
        assert_eq!(
            ResampleRule::Hour.bucket_start(t),
            Utc.with_ymd_and_hms(2024, 5, 17, 13, 0, 0).unwrap()
        );
        assert_eq!(
            ResampleRule::Minute.bucket_start(t),
            Utc.with_ymd_and_hms(2024, 5, 17, 13, 42, 0).unwrap()
        );
        assert_eq!(ResampleRule::Second.bucket_start(t), t);
    }

    // ==================== allowed_downsample_rules ====================

    #[test]
    fn daily_cadence_over_a_month_allows_day_only() {
        let dates = spaced(31, Duration::days(1));
        let rules = allowed_downsample_rules(&dates).unwrap();

        // Span holds 30 days but no 3 whole months or years.
        assert_eq!(rules, vec![ResampleRule::Day]);
    }

    #[test]
    fn hourly_cadence_over_ten_days_allows_day_and_hour() {
        let dates = spaced(241, Duration::hours(1));
        let rules = allowed_downsample_rules(&dates).unwrap();

        assert_eq!(rules, vec![ResampleRule::Day, ResampleRule::Hour]);
    }

    #[test]
    fn minutely_cadence_over_two_hours_allows_minute_only() {
        let dates = spaced(121, Duration::minutes(1));
        let rules = allowed_downsample_rules(&dates).unwrap();

        // 2 hours < 3, so Hour is gated out while Minute survives.
        assert_eq!(rules, vec![ResampleRule::Minute]);
    }

    #[test]
    fn monthly_cadence_over_two_years_allows_month_only() {
        let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let dates: Vec<_> = (0..25)
            .map(|i| {
                Utc.with_ymd_and_hms(2020 + (i / 12), 1 + (i % 12) as u32, 1, 0, 0, 0)
                    .unwrap()
            })
            .collect();
        assert_eq!(dates[0], base);

        let rules = allowed_downsample_rules(&dates).unwrap();

        // Only 2 whole years in the span, so Year is excluded independently.
        assert_eq!(rules, vec![ResampleRule::Month]);
    }

    #[test]
    fn never_offers_rules_finer_than_the_cadence() {
        // Daily data over 10 days: Hour would pass its span gate (240 h),
        // but it is finer than the sampling granularity.
        let dates = spaced(11, Duration::days(1));
        let rules = allowed_downsample_rules(&dates).unwrap();

        assert!(!rules.contains(&ResampleRule::Hour));
        assert_eq!(rules, vec![ResampleRule::Day]);
    }

    #[test]
    fn subsecond_cadence_maps_to_second_granularity() {
        let dates = spaced(21, Duration::milliseconds(500));
        let rules = allowed_downsample_rules(&dates).unwrap();

        // 10 s span holds >= 3 whole seconds.
        assert_eq!(rules, vec![ResampleRule::Second]);
    }

    #[test]
    fn requires_at_least_two_dates() {
        let dates = spaced(1, Duration::days(1));
        let result = allowed_downsample_rules(&dates);

        assert_eq!(
            result,
            Err(MtsError::InsufficientData { needed: 2, got: 1 })
        );
    }

    #[test]
    fn rejects_unordered_dates() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let dates = vec![base + Duration::days(1), base, base + Duration::days(2)];

        assert!(matches!(
            allowed_downsample_rules(&dates),
            Err(MtsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn median_gap_is_robust_to_a_single_outlier_gap() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut dates: Vec<_> = (0..240).map(|i| base + Duration::hours(i)).collect();
        // One 5-day hole does not change the hourly cadence.
        dates.push(*dates.last().unwrap() + Duration::days(5));

        let rules = allowed_downsample_rules(&dates).unwrap();
        assert_eq!(rules, vec![ResampleRule::Day, ResampleRule::Hour]);
    }
}
