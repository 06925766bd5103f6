//! CLI entry point for the survey insights tool.
//!
//! Loads satisfaction surveys from a `db.json` file or the REST store,
//! applies the requested window and segment, and prints metrics, the
//! monthly trend, or a Markdown report.

mod infra;
mod services;

use crate::infra::file::FileSurveySource;
use crate::infra::mockapi::RestSurveySource;
use crate::services::survey_source::SurveySource;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use survey_insights::analyzers::analyzer::SurveyAnalytics;
use survey_insights::analyzers::filter::{DateWindow, SegmentFilter};
use survey_insights::analyzers::grade::{nps_band, satisfaction_level};
use survey_insights::config::AnalyticsConfig;
use survey_insights::output::{MetricsRecord, append_record, print_json, print_pretty};
use survey_insights::report::build_report;
use survey_insights::store::ResponseStore;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "survey_insights")]
#[command(about = "Satisfaction survey analytics for service reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ViewArgs {
    /// Path to a db.json file or base URL of the REST store (defaults to SURVEY_API_URL)
    #[arg(value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// Date window: last7days, last30days, last3months or all
    #[arg(short, long, default_value = "all")]
    window: String,

    /// Customer segment, or "all"
    #[arg(short, long, default_value = "all")]
    segment: String,

    /// Reference time (RFC 3339) used instead of the current clock
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    /// JSON analytics config file
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute metrics for the filtered responses
    Analyze {
        #[command(flatten)]
        view: ViewArgs,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        output: Option<String>,

        /// Print the full metrics as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the monthly satisfaction trend
    Trend {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Write a Markdown report
    Report {
        #[command(flatten)]
        view: ViewArgs,

        /// Report file to write
        #[arg(long, default_value = "survey_report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/survey_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("survey_insights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { view, output, json } => {
            let analytics = load_analytics(&view).await?;
            let metrics = analytics.metrics();

            if !analytics.has_responses() {
                warn!(
                    window = %analytics.date_filter(),
                    segment = %analytics.segment_filter(),
                    "No survey responses match the current filters"
                );
            }

            if json {
                print_json(metrics)?;
            } else {
                print_pretty(metrics);
            }

            info!(
                total = metrics.total_responses,
                average = metrics.average_rating,
                satisfaction = %satisfaction_level(metrics.average_rating),
                nps = metrics.nps.nps_score,
                nps_band = %nps_band(metrics.nps.nps_score),
                trend = %metrics.trend,
                "Survey metrics summary"
            );

            if let Some(path) = output {
                append_record(&path, &MetricsRecord::from_analytics(&analytics))?;
                info!(path = %path, "Summary row appended");
            }
        }
        Commands::Trend { view } => {
            let analytics = load_analytics(&view).await?;
            let trend = analytics.trend();

            for period in &trend.periods {
                info!(
                    period = %period.period,
                    responses = period.responses,
                    average = period.average,
                    "Period"
                );
            }

            info!(classification = %trend.classification, "Trend");
        }
        Commands::Report { view, out } => {
            let analytics = load_analytics(&view).await?;
            let report = build_report(&analytics);

            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "Report written");
        }
    }

    Ok(())
}

/// Picks a file or REST source from the CLI argument or `SURVEY_API_URL`.
fn resolve_source(source: Option<&str>) -> Result<Box<dyn SurveySource>> {
    let source = match source {
        Some(s) => s.to_string(),
        None => match std::env::var("SURVEY_API_URL") {
            Ok(url) => url,
            Err(_) => bail!("no survey source given and SURVEY_API_URL is not set"),
        },
    };

    if source.starts_with("http") {
        Ok(Box::new(RestSurveySource::new(source)?))
    } else {
        Ok(Box::new(FileSurveySource::new(source)))
    }
}

/// Loads the dataset and builds an analytics view with the requested filters.
#[tracing::instrument(skip(view), fields(window = %view.window, segment = %view.segment))]
async fn load_analytics(view: &ViewArgs) -> Result<SurveyAnalytics> {
    let config = match &view.config {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };

    let source = resolve_source(view.source.as_deref())?;
    let db = source.load().await?;

    let window = DateWindow::from_key(&view.window);
    if window == DateWindow::All && view.window != "all" {
        warn!(window = %view.window, "Unknown date window, using all responses");
    }

    let store = ResponseStore::new(db.responses);
    let mut analytics = SurveyAnalytics::new(store.snapshot(), config.question_set(db.questions));
    analytics.set_date_filter(window);
    analytics.set_segment_filter(SegmentFilter::from_key(&view.segment));
    analytics.pin_reference_time(view.as_of);

    info!(
        responses = store.len(),
        matched = analytics.filtered().len(),
        "Analytics view ready"
    );
    Ok(analytics)
}
