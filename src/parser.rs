//! JSON decoding for the mock REST store payloads.

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::survey::{Question, SurveyResponse};

/// Everything the json-server `db.json` document holds that analytics reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyDatabase {
    pub responses: Vec<SurveyResponse>,
    pub questions: Vec<Question>,
}

/// Decodes a `/surveyResponses` JSON array.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or not an array. Individual
/// malformed records are skipped and logged.
pub fn parse_responses(bytes: &[u8]) -> Result<Vec<SurveyResponse>> {
    let value: Value = serde_json::from_slice(bytes).context("survey responses are not valid JSON")?;
    records_from_value(value, "surveyResponses")
}

/// Decodes a `/questions` JSON array.
pub fn parse_questions(bytes: &[u8]) -> Result<Vec<Question>> {
    let value: Value = serde_json::from_slice(bytes).context("questions are not valid JSON")?;
    records_from_value(value, "questions")
}

/// Decodes a whole `db.json` document. Missing collections are empty.
pub fn parse_database(bytes: &[u8]) -> Result<SurveyDatabase> {
    let mut document: Value =
        serde_json::from_slice(bytes).context("survey database is not valid JSON")?;
    let Some(object) = document.as_object_mut() else {
        bail!("survey database must be a JSON object");
    };

    let mut take = |key: &str| {
        object.remove(key).unwrap_or_else(|| {
            warn!(collection = key, "Collection missing from survey database");
            Value::Array(Vec::new())
        })
    };
    let responses = take("surveyResponses");
    let questions = take("questions");

    Ok(SurveyDatabase {
        responses: records_from_value(responses, "surveyResponses")?,
        questions: records_from_value(questions, "questions")?,
    })
}

fn records_from_value<T: DeserializeOwned>(value: Value, collection: &str) -> Result<Vec<T>> {
    let Value::Array(items) = value else {
        bail!("expected `{collection}` to be a JSON array");
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(collection, index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect())
}
