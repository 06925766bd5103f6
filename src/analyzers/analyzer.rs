use crate::analyzers::aggregate::aggregate_metrics_with_trend;
use crate::analyzers::filter::{DateWindow, ResponseFilter, SegmentFilter};
use crate::analyzers::trend::analyze_trend;
use crate::analyzers::types::{Metrics, TrendReport};
use crate::survey::{QuestionSet, SurveyResponse};
use chrono::{DateTime, Utc};
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::debug;

/// Filtered view over a survey snapshot with memoized metrics and trend.
///
/// Results are cached for the current dataset, window, segment and
/// reference time. Any setter that changes one of those drops the cache;
/// setting the value already in place keeps it.
pub struct SurveyAnalytics {
    dataset: Arc<[SurveyResponse]>,
    questions: QuestionSet,
    filter: ResponseFilter,
    reference_time: Option<DateTime<Utc>>,
    cache: AnalyticsCache,
}

#[derive(Default)]
struct AnalyticsCache {
    now: OnceCell<DateTime<Utc>>,
    filtered: OnceCell<Vec<usize>>,
    metrics: OnceCell<Metrics>,
    trend: OnceCell<TrendReport>,
}

impl SurveyAnalytics {
    pub fn new(dataset: Arc<[SurveyResponse]>, questions: QuestionSet) -> Self {
        Self {
            dataset,
            questions,
            filter: ResponseFilter::default(),
            reference_time: None,
            cache: AnalyticsCache::default(),
        }
    }

    pub fn set_date_filter(&mut self, window: DateWindow) {
        if self.filter.window != window {
            self.filter.window = window;
            self.invalidate();
        }
    }

    pub fn set_segment_filter(&mut self, segment: SegmentFilter) {
        if self.filter.segment != segment {
            self.filter.segment = segment;
            self.invalidate();
        }
    }

    /// Swaps the snapshot. Identity, not content, decides whether the cache survives.
    pub fn set_dataset(&mut self, dataset: Arc<[SurveyResponse]>) {
        if !Arc::ptr_eq(&self.dataset, &dataset) {
            self.dataset = dataset;
            self.invalidate();
        }
    }

    /// Fixes "now" for windowing and trend periods. `None` reads the clock
    /// once per recomputation.
    pub fn pin_reference_time(&mut self, now: Option<DateTime<Utc>>) {
        if self.reference_time != now {
            self.reference_time = now;
            self.invalidate();
        }
    }

    pub fn date_filter(&self) -> DateWindow {
        self.filter.window
    }

    pub fn segment_filter(&self) -> &SegmentFilter {
        &self.filter.segment
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn dataset(&self) -> &Arc<[SurveyResponse]> {
        &self.dataset
    }

    /// The instant the current results are computed against.
    pub fn reference_time(&self) -> DateTime<Utc> {
        *self
            .cache
            .now
            .get_or_init(|| self.reference_time.unwrap_or_else(Utc::now))
    }

    pub fn filtered(&self) -> Vec<&SurveyResponse> {
        self.filtered_indices()
            .iter()
            .map(|&i| &self.dataset[i])
            .collect()
    }

    pub fn has_responses(&self) -> bool {
        !self.filtered_indices().is_empty()
    }

    /// The trend classification is taken from [`SurveyAnalytics::trend`].
    pub fn metrics(&self) -> &Metrics {
        self.cache.metrics.get_or_init(|| {
            aggregate_metrics_with_trend(
                &self.filtered(),
                &self.questions,
                self.trend().classification,
            )
        })
    }

    pub fn trend(&self) -> &TrendReport {
        self.cache
            .trend
            .get_or_init(|| analyze_trend(&self.filtered(), self.reference_time()))
    }

    fn filtered_indices(&self) -> &[usize] {
        self.cache.filtered.get_or_init(|| {
            let now = self.reference_time();
            let indices: Vec<usize> = self
                .dataset
                .iter()
                .enumerate()
                .filter(|(_, r)| self.filter.matches(r, now))
                .map(|(i, _)| i)
                .collect();

            debug!(
                window = %self.filter.window,
                segment = %self.filter.segment,
                dataset = self.dataset.len(),
                matched = indices.len(),
                "Filtered survey responses"
            );
            indices
        })
    }

    fn invalidate(&mut self) {
        self.cache = AnalyticsCache::default();
    }
}
