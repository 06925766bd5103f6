//! Output formatting and persistence for survey metrics.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::analyzer::SurveyAnalytics;

/// One flat row summarizing a filtered view, suitable for a CSV history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub generated_at: DateTime<Utc>,
    pub window: String,
    pub segment: String,
    pub total_responses: usize,
    pub average_rating: f64,
    pub promoters: usize,
    pub passives: usize,
    pub detractors: usize,
    pub nps_score: i32,
    pub trend: String,
}

impl MetricsRecord {
    pub fn from_analytics(analytics: &SurveyAnalytics) -> Self {
        let metrics = analytics.metrics();
        MetricsRecord {
            generated_at: analytics.reference_time(),
            window: analytics.date_filter().to_string(),
            segment: analytics.segment_filter().to_string(),
            total_responses: metrics.total_responses,
            average_rating: metrics.average_rating,
            promoters: metrics.nps.promoters,
            passives: metrics.nps.passives,
            detractors: metrics.nps.detractors,
            nps_score: metrics.nps.nps_score,
            trend: analytics.trend().classification.to_string(),
        }
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    info!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a [`MetricsRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &MetricsRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
