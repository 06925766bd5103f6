//! Survey records as served by the mock REST store.
//!
//! Records are decoded leniently: identifiers may be strings or integers,
//! timestamps may be RFC 3339 strings, naive date-times or plain dates (read
//! as UTC) or epoch milliseconds, and any timestamp, rating or average that
//! is not usable is kept as "no value" rather than rejected. Only a record
//! without an `id` fails to decode.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One satisfaction survey answered by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    /// `None` when missing or unreadable. Such a response is outside every
    /// bounded window and every trend period, but still part of `all`.
    #[serde(default, deserialize_with = "de_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Empty when missing; only the `all` segment matches it.
    #[serde(default)]
    pub segment: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub ratings: Ratings,
    /// Precomputed mean rating. `None` when the stored value is not numeric.
    #[serde(default, deserialize_with = "de_average")]
    pub average: Option<f64>,
}

impl SurveyResponse {
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        segment: impl Into<String>,
        service_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: Some(timestamp),
            segment: segment.into(),
            service_type: service_type.into(),
            ratings: Ratings::default(),
            average: None,
        }
    }

    pub fn with_average(mut self, average: f64) -> Self {
        self.average = Some(average).filter(|a| a.is_finite());
        self
    }

    pub fn with_rating(mut self, question_id: impl Into<String>, rating: u8) -> Self {
        self.ratings.insert(question_id, rating);
        self
    }
}

/// Whether a question was rated on a given response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Rated(u8),
    Unanswered,
}

impl Answer {
    pub fn rating(self) -> Option<u8> {
        match self {
            Answer::Rated(r) => Some(r),
            Answer::Unanswered => None,
        }
    }
}

/// Ratings keyed by question id.
///
/// Only positive integer ratings are stored. A `0`, `null`, fractional or
/// non-numeric value is indistinguishable from a missing key: all of them
/// read back as [`Answer::Unanswered`].
///
/// Ratings are whole numbers on the 1–5 scale. A fractional value such as
/// `3.5` is not rounded: it is treated as unanswered, the same as `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ratings(BTreeMap<String, u8>);

impl Ratings {
    pub fn answer(&self, question_id: &str) -> Answer {
        match self.0.get(question_id) {
            Some(&r) => Answer::Rated(r),
            None => Answer::Unanswered,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn insert(&mut self, question_id: impl Into<String>, rating: u8) {
        let question_id = question_id.into();
        if rating == 0 {
            self.0.remove(&question_id);
        } else {
            self.0.insert(question_id, rating);
        }
    }
}

impl<K: Into<String>> FromIterator<(K, u8)> for Ratings {
    fn from_iter<I: IntoIterator<Item = (K, u8)>>(iter: I) -> Self {
        let mut ratings = Ratings::default();
        for (question_id, rating) in iter {
            ratings.insert(question_id, rating);
        }
        ratings
    }
}

impl<'de> Deserialize<'de> for Ratings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(question_id, value)| {
                value
                    .as_u64()
                    .and_then(|r| u8::try_from(r).ok())
                    .map(|r| (question_id, r))
            })
            .collect())
    }
}

/// A survey question definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// The closed, ordered set of questions whose ratings are read.
///
/// Also names the relationship question that feeds the Net Promoter Score.
/// That question does not have to be part of the ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
    relationship_id: String,
}

impl QuestionSet {
    /// Builds the set, keeping the first definition of any duplicated id.
    pub fn new(questions: Vec<Question>, relationship_id: impl Into<String>) -> Self {
        let mut unique: Vec<Question> = Vec::with_capacity(questions.len());
        for question in questions {
            if !unique.iter().any(|q| q.id == question.id) {
                unique.push(question);
            }
        }

        Self {
            questions: unique,
            relationship_id: relationship_id.into(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn relationship_id(&self) -> &str {
        &self.relationship_id
    }

    /// The relationship question's answer on `response`.
    pub fn relationship_answer(&self, response: &SurveyResponse) -> Answer {
        response.ratings.answer(&self.relationship_id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Parses the timestamp forms the REST store serves. Strings without an
/// offset are read as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn de_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|ms| ms.is_finite()).map(|ms| ms as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Some(serde_json::Value::String(text)) => parse_timestamp(&text),
        _ => None,
    })
}

fn de_average<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|a| a.is_finite()))
}
