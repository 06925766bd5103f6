//! Monthly satisfaction trend over the most recent calendar months.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::analyzers::types::{TrendClassification, TrendPeriod, TrendReport};
use crate::analyzers::utility::{mean, round_to_tenth};
use crate::survey::SurveyResponse;

/// Number of monthly periods, ending with the current month.
pub const PERIOD_COUNT: u32 = 6;

/// Trailing periods considered when classifying.
pub const CLASSIFICATION_WINDOW: usize = 3;

/// Minimum change in average (either direction) that counts as movement.
pub const TREND_THRESHOLD: f64 = 0.3;

/// Buckets `responses` into the last [`PERIOD_COUNT`] months (UTC) and
/// classifies the trajectory.
pub fn analyze_trend(responses: &[&SurveyResponse], now: DateTime<Utc>) -> TrendReport {
    let periods: Vec<TrendPeriod> = period_starts(now)
        .into_iter()
        .map(|start| monthly_period(responses, start))
        .collect();
    let classification = classify_trend(&periods);

    TrendReport {
        periods,
        classification,
    }
}

/// Compares the first and last non-empty period among the trailing
/// [`CLASSIFICATION_WINDOW`]. Fewer than two non-empty periods is stable.
pub fn classify_trend(periods: &[TrendPeriod]) -> TrendClassification {
    let start = periods.len().saturating_sub(CLASSIFICATION_WINDOW);
    let recent: Vec<&TrendPeriod> = periods[start..]
        .iter()
        .filter(|p| p.responses > 0)
        .collect();

    if recent.len() < 2 {
        return TrendClassification::Stable;
    }

    let diff = recent[recent.len() - 1].average - recent[0].average;
    if diff > TREND_THRESHOLD {
        TrendClassification::Improving
    } else if diff < -TREND_THRESHOLD {
        TrendClassification::Declining
    } else {
        TrendClassification::Stable
    }
}

fn period_starts(now: DateTime<Utc>) -> Vec<NaiveDate> {
    let Some(current) = now.date_naive().with_day(1) else {
        return Vec::new();
    };

    (0..PERIOD_COUNT)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}

fn monthly_period(responses: &[&SurveyResponse], start: NaiveDate) -> TrendPeriod {
    let members: Vec<&SurveyResponse> = responses
        .iter()
        .copied()
        .filter(|r| {
            r.timestamp
                .is_some_and(|ts| ts.year() == start.year() && ts.month() == start.month())
        })
        .collect();
    let averages: Vec<f64> = members.iter().filter_map(|r| r.average).collect();

    TrendPeriod {
        period: start.format("%Y-%m").to_string(),
        year: start.year(),
        month: start.month(),
        responses: members.len(),
        average: round_to_tenth(mean(&averages)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 9, 30, 0).unwrap()
    }

    fn at(year: i32, month: u32, day: u32, average: f64) -> SurveyResponse {
        SurveyResponse::new(
            format!("{year}-{month}-{day}"),
            Utc.with_ymd_and_hms(year, month, day, 8, 0, 0).unwrap(),
            "familiar",
            "emergencia",
        )
        .with_average(average)
    }

    fn period(responses: usize, average: f64) -> TrendPeriod {
        TrendPeriod {
            period: String::new(),
            year: 2026,
            month: 1,
            responses,
            average,
        }
    }

    #[test]
    fn test_six_periods_oldest_first_across_year_boundary() {
        let report = analyze_trend(&[], now());
        let labels: Vec<&str> = report.periods.iter().map(|p| p.period.as_str()).collect();

        assert_eq!(labels, ["2025-10", "2025-11", "2025-12", "2026-01", "2026-02", "2026-03"]);
        assert!(report.periods.iter().all(|p| p.responses == 0 && p.average == 0.0));
        assert_eq!(report.classification, TrendClassification::Stable);
    }

    #[test]
    fn test_bucket_membership_and_average() {
        let responses = vec![
            at(2026, 3, 1, 4.0),
            at(2026, 3, 19, 4.5),
            at(2026, 2, 28, 3.0),
            at(2025, 3, 10, 1.0),
            at(2025, 9, 30, 2.0),
        ];
        let refs: Vec<&SurveyResponse> = responses.iter().collect();
        let report = analyze_trend(&refs, now());

        let march = &report.periods[5];
        assert_eq!(march.responses, 2);
        assert_eq!(march.average, 4.3);

        let february = &report.periods[4];
        assert_eq!(february.responses, 1);
        assert_eq!(february.average, 3.0);

        let total: usize = report.periods.iter().map(|p| p.responses).sum();
        assert_eq!(total, 3);

        let mut undated = at(2026, 3, 2, 1.0);
        undated.timestamp = None;
        let mut with_undated = refs.clone();
        with_undated.push(&undated);
        assert_eq!(analyze_trend(&with_undated, now()), report);
        assert_eq!(report.classification, TrendClassification::Improving);
    }

    #[test]
    fn test_classify_improving() {
        let periods = vec![
            period(0, 0.0),
            period(0, 0.0),
            period(0, 0.0),
            period(4, 3.0),
            period(2, 3.5),
            period(3, 4.0),
        ];
        assert_eq!(classify_trend(&periods), TrendClassification::Improving);
    }

    #[test]
    fn test_classify_declining_skips_empty_periods() {
        let periods = vec![
            period(5, 1.0),
            period(5, 1.0),
            period(5, 1.0),
            period(4, 4.2),
            period(0, 0.0),
            period(3, 3.1),
        ];
        assert_eq!(classify_trend(&periods), TrendClassification::Declining);
    }

    #[test]
    fn test_classify_single_recent_period_is_stable() {
        let periods = vec![
            period(9, 1.0),
            period(9, 5.0),
            period(9, 1.0),
            period(0, 0.0),
            period(0, 0.0),
            period(6, 4.8),
        ];
        assert_eq!(classify_trend(&periods), TrendClassification::Stable);
    }

    #[test]
    fn test_classify_small_change_is_stable() {
        let periods = vec![period(2, 3.8), period(2, 3.9), period(2, 4.0)];
        assert_eq!(classify_trend(&periods), TrendClassification::Stable);
    }
}
