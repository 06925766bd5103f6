//! Data types produced by the analytics pipeline.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::survey::QuestionSet;

/// Lowest and highest distribution bucket.
pub const RATING_BUCKETS: std::ops::RangeInclusive<u8> = 1..=5;

/// Mean rating for one question over the responses that answered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAverage {
    pub question_id: String,
    pub text: String,
    pub average: f64,
}

/// Promoter/passive/detractor split on the relationship question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NpsBreakdown {
    pub promoters: usize,
    pub passives: usize,
    pub detractors: usize,
    pub total_rated: usize,
    pub nps_score: i32,
}

/// Running totals for one service type.
///
/// `average_rating` always equals `total_rating / rated`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    pub count: usize,
    pub rated: usize,
    pub total_rating: f64,
    pub average_rating: f64,
}

impl ServiceStats {
    pub fn record(&mut self, average: Option<f64>) {
        self.count += 1;
        if let Some(average) = average {
            self.rated += 1;
            self.total_rating += average;
        }
        self.average_rating = if self.rated == 0 {
            0.0
        } else {
            self.total_rating / self.rated as f64
        };
    }
}

/// Direction of satisfaction over the most recent periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendClassification {
    Improving,
    #[default]
    Stable,
    Declining,
}

impl fmt::Display for TrendClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrendClassification::Improving => "improving",
            TrendClassification::Stable => "stable",
            TrendClassification::Declining => "declining",
        })
    }
}

/// One calendar month of responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPeriod {
    /// `YYYY-MM` label.
    pub period: String,
    pub year: i32,
    pub month: u32,
    pub responses: usize,
    pub average: f64,
}

/// Monthly periods, oldest first, and the classification derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub periods: Vec<TrendPeriod>,
    pub classification: TrendClassification,
}

/// Aggregate statistics over a filtered response set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_responses: usize,
    pub average_rating: f64,
    pub question_averages: Vec<QuestionAverage>,
    pub distribution: BTreeMap<u8, usize>,
    #[serde(flatten)]
    pub nps: NpsBreakdown,
    pub responses_by_service: BTreeMap<String, ServiceStats>,
    pub trend: TrendClassification,
}

impl Metrics {
    /// The "no data" state: every counter and average at zero, one zeroed
    /// entry per question and per distribution bucket, trend stable.
    pub fn empty(questions: &QuestionSet) -> Self {
        Metrics {
            total_responses: 0,
            average_rating: 0.0,
            question_averages: questions
                .iter()
                .map(|q| QuestionAverage {
                    question_id: q.id.clone(),
                    text: q.text.clone(),
                    average: 0.0,
                })
                .collect(),
            distribution: empty_distribution(),
            nps: NpsBreakdown::default(),
            responses_by_service: BTreeMap::new(),
            trend: TrendClassification::Stable,
        }
    }

    pub fn question_average(&self, question_id: &str) -> Option<f64> {
        self.question_averages
            .iter()
            .find(|q| q.question_id == question_id)
            .map(|q| q.average)
    }

    /// Number of responses that landed in a distribution bucket.
    pub fn distributed(&self) -> usize {
        self.distribution.values().sum()
    }
}

pub fn empty_distribution() -> BTreeMap<u8, usize> {
    RATING_BUCKETS.map(|bucket| (bucket, 0)).collect()
}
