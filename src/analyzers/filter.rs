//! Narrows a response snapshot by reporting window and customer segment.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

use crate::survey::SurveyResponse;

/// How far back from "now" responses are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    Last7Days,
    Last30Days,
    Last3Months,
    #[default]
    All,
}

impl DateWindow {
    /// Parses a window key. Unknown keys mean no temporal restriction.
    pub fn from_key(key: &str) -> Self {
        match key {
            "last7days" => DateWindow::Last7Days,
            "last30days" => DateWindow::Last30Days,
            "last3months" => DateWindow::Last3Months,
            _ => DateWindow::All,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            DateWindow::Last7Days => "last7days",
            DateWindow::Last30Days => "last30days",
            DateWindow::Last3Months => "last3months",
            DateWindow::All => "all",
        }
    }

    pub fn duration(self) -> Option<Duration> {
        match self {
            DateWindow::Last7Days => Some(Duration::days(7)),
            DateWindow::Last30Days => Some(Duration::days(30)),
            DateWindow::Last3Months => Some(Duration::days(90)),
            DateWindow::All => None,
        }
    }

    /// Inclusive at the far boundary; future timestamps are always inside.
    /// A missing timestamp is only inside [`DateWindow::All`].
    pub fn contains(self, timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match (self.duration(), timestamp) {
            (None, _) => true,
            (Some(window), Some(ts)) => now - ts <= window,
            (Some(_), None) => false,
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Customer segment restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SegmentFilter {
    #[default]
    All,
    Only(String),
}

impl SegmentFilter {
    pub fn from_key(key: &str) -> Self {
        if key == "all" {
            SegmentFilter::All
        } else {
            SegmentFilter::Only(key.to_string())
        }
    }

    pub fn key(&self) -> &str {
        match self {
            SegmentFilter::All => "all",
            SegmentFilter::Only(segment) => segment,
        }
    }

    pub fn matches(&self, segment: &str) -> bool {
        match self {
            SegmentFilter::All => true,
            SegmentFilter::Only(wanted) => wanted == segment,
        }
    }
}

impl fmt::Display for SegmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A window and segment applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResponseFilter {
    pub window: DateWindow,
    pub segment: SegmentFilter,
}

impl ResponseFilter {
    pub fn new(window: DateWindow, segment: SegmentFilter) -> Self {
        Self { window, segment }
    }

    pub fn matches(&self, response: &SurveyResponse, now: DateTime<Utc>) -> bool {
        self.window.contains(response.timestamp, now) && self.segment.matches(&response.segment)
    }

    /// Keeps matching responses in their original order.
    pub fn apply<'a>(
        &self,
        responses: &'a [SurveyResponse],
        now: DateTime<Utc>,
    ) -> Vec<&'a SurveyResponse> {
        responses.iter().filter(|r| self.matches(r, now)).collect()
    }
}

pub fn filter_responses<'a>(
    responses: &'a [SurveyResponse],
    window: DateWindow,
    segment: &SegmentFilter,
    now: DateTime<Utc>,
) -> Vec<&'a SurveyResponse> {
    ResponseFilter::new(window, segment.clone()).apply(responses, now)
}

/// Same as [`filter_responses`], reading the clock once for the whole call.
pub fn filter_responses_now<'a>(
    responses: &'a [SurveyResponse],
    window: DateWindow,
    segment: &SegmentFilter,
) -> Vec<&'a SurveyResponse> {
    filter_responses(responses, window, segment, Utc::now())
}
