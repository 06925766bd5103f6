use crate::analyzers::trend::analyze_trend;
use crate::analyzers::types::{
    Metrics, NpsBreakdown, QuestionAverage, RATING_BUCKETS, ServiceStats, TrendClassification,
    empty_distribution,
};
use crate::analyzers::utility::{mean, round_half_up, round_to_tenth};
use crate::survey::{QuestionSet, SurveyResponse};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Relationship ratings at or above this count as promoters.
pub const PROMOTER_MIN: u8 = 4;

/// Relationship ratings at or below this count as detractors.
pub const DETRACTOR_MAX: u8 = 2;

/// Aggregates a filtered response set into [`Metrics`].
///
/// An empty set yields [`Metrics::empty`]. Responses without a numeric
/// `average` still count towards totals but are left out of every mean and
/// of the distribution. Averages that round outside 1..=5 are dropped from
/// the distribution. `now` anchors the monthly trend classification.
pub fn aggregate_metrics(
    responses: &[&SurveyResponse],
    questions: &QuestionSet,
    now: DateTime<Utc>,
) -> Metrics {
    let trend = analyze_trend(responses, now).classification;
    aggregate_metrics_with_trend(responses, questions, trend)
}

/// Same as [`aggregate_metrics`] with an already computed trend
/// classification for the same responses.
pub fn aggregate_metrics_with_trend(
    responses: &[&SurveyResponse],
    questions: &QuestionSet,
    trend: TrendClassification,
) -> Metrics {
    if responses.is_empty() {
        return Metrics::empty(questions);
    }

    let averages: Vec<f64> = responses.iter().filter_map(|r| r.average).collect();

    let question_averages = questions
        .iter()
        .map(|q| {
            let values: Vec<f64> = responses
                .iter()
                .filter_map(|r| r.ratings.answer(&q.id).rating())
                .map(f64::from)
                .collect();

            QuestionAverage {
                question_id: q.id.clone(),
                text: q.text.clone(),
                average: mean(&values),
            }
        })
        .collect();

    let mut distribution = empty_distribution();
    let mut dropped = 0usize;
    for average in &averages {
        let bucket = round_half_up(*average);
        if bucket >= f64::from(*RATING_BUCKETS.start()) && bucket <= f64::from(*RATING_BUCKETS.end())
        {
            *distribution.entry(bucket as u8).or_default() += 1;
        } else {
            dropped += 1;
        }
    }

    let mut responses_by_service: BTreeMap<String, ServiceStats> = BTreeMap::new();
    for response in responses {
        responses_by_service
            .entry(response.service_type.clone())
            .or_default()
            .record(response.average);
    }

    let nps = net_promoter(responses, questions);

    debug!(
        total = responses.len(),
        invalid_averages = responses.len() - averages.len(),
        out_of_range = dropped,
        nps = nps.nps_score,
        %trend,
        "Aggregated survey metrics"
    );

    Metrics {
        total_responses: responses.len(),
        average_rating: round_to_tenth(mean(&averages)),
        question_averages,
        distribution,
        nps,
        responses_by_service,
        trend,
    }
}

/// Splits the relationship question's ratings into promoters, passives and
/// detractors. Unanswered responses are not counted.
pub fn net_promoter(responses: &[&SurveyResponse], questions: &QuestionSet) -> NpsBreakdown {
    let mut nps = NpsBreakdown::default();

    for rating in responses
        .iter()
        .filter_map(|r| questions.relationship_answer(r).rating())
    {
        match rating {
            r if r >= PROMOTER_MIN => nps.promoters += 1,
            r if r <= DETRACTOR_MAX => nps.detractors += 1,
            _ => nps.passives += 1,
        }
    }

    nps.total_rated = nps.promoters + nps.passives + nps.detractors;
    nps.nps_score = nps_score(nps.promoters, nps.detractors, nps.total_rated);
    nps
}

/// `round((promoters - detractors) / total_rated * 100)`, 0 when nothing was rated.
pub fn nps_score(promoters: usize, detractors: usize, total_rated: usize) -> i32 {
    if total_rated == 0 {
        return 0;
    }
    let share = (promoters as f64 - detractors as f64) / total_rated as f64;
    round_half_up(share * 100.0) as i32
}
