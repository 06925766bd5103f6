use anyhow::{Context, Result};
use serde::Deserialize;

use crate::survey::{Question, QuestionSet};

/// Question id used for the Net Promoter Score when none is configured.
pub const DEFAULT_RELATIONSHIP_QUESTION: &str = "recomendacion";

/// Analytics settings.
///
/// Stored as a JSON object on disk; missing keys fall back to defaults:
/// ```json
/// { "relationshipQuestionId": "recomendacion" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsConfig {
    pub relationship_question_id: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            relationship_question_id: DEFAULT_RELATIONSHIP_QUESTION.to_string(),
        }
    }
}

impl AnalyticsConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analytics config '{path}'"))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid analytics config '{path}'"))
    }

    pub fn question_set(&self, questions: Vec<Question>) -> QuestionSet {
        QuestionSet::new(questions, self.relationship_question_id.clone())
    }
}
