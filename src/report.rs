use std::fmt::Write;

use crate::analyzers::analyzer::SurveyAnalytics;
use crate::analyzers::grade::{nps_band, satisfaction_level};

/// Renders the current filtered view as a Markdown report.
pub fn build_report(analytics: &SurveyAnalytics) -> String {
    let metrics = analytics.metrics();
    let trend = analytics.trend();

    let mut output = String::new();

    let _ = writeln!(output, "# Customer Satisfaction Report");
    let _ = writeln!(
        output,
        "Window `{}`, segment `{}`, as of {}",
        analytics.date_filter(),
        analytics.segment_filter(),
        analytics.reference_time().format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");

    if !analytics.has_responses() {
        let _ = writeln!(output, "No survey responses recorded for this window.");
        return output;
    }

    let _ = writeln!(output, "- Responses: {}", metrics.total_responses);
    let _ = writeln!(
        output,
        "- Average rating: {:.1} ({})",
        metrics.average_rating,
        satisfaction_level(metrics.average_rating)
    );
    let _ = writeln!(output, "- Trend: {}", metrics.trend);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Net Promoter Score");
    if metrics.nps.total_rated == 0 {
        let _ = writeln!(output, "No ratings recorded for the recommendation question.");
    } else {
        let _ = writeln!(
            output,
            "- NPS {} ({})",
            metrics.nps.nps_score,
            nps_band(metrics.nps.nps_score)
        );
        let _ = writeln!(
            output,
            "- {} promoters, {} passives, {} detractors out of {} rated",
            metrics.nps.promoters,
            metrics.nps.passives,
            metrics.nps.detractors,
            metrics.nps.total_rated
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Rating Distribution");
    for (bucket, count) in metrics.distribution.iter().rev() {
        let _ = writeln!(output, "- {} stars: {}", bucket, count);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Questions");
    if metrics.question_averages.is_empty() {
        let _ = writeln!(output, "No questions configured.");
    } else {
        for question in &metrics.question_averages {
            let _ = writeln!(
                output,
                "- {}: {:.1}",
                if question.text.is_empty() {
                    &question.question_id
                } else {
                    &question.text
                },
                question.average
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Services");
    for (service, stats) in &metrics.responses_by_service {
        let _ = writeln!(
            output,
            "- {}: {} responses (avg {:.1})",
            service, stats.count, stats.average_rating
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Monthly Trend");
    for period in &trend.periods {
        if period.responses == 0 {
            let _ = writeln!(output, "- {}: no responses", period.period);
        } else {
            let _ = writeln!(
                output,
                "- {}: {} responses (avg {:.1})",
                period.period, period.responses, period.average
            );
        }
    }

    output
}
