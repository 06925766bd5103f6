use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use survey_insights::parser::{SurveyDatabase, parse_database};
use survey_insights::survey::{Question, SurveyResponse};
use tracing::info;

use crate::services::survey_source::SurveySource;

/// Reads surveys from a local json-server `db.json` document.
pub struct FileSurveySource {
    path: PathBuf,
}

impl FileSurveySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<SurveyDatabase> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let db = parse_database(&bytes)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        info!(
            path = %self.path.display(),
            responses = db.responses.len(),
            questions = db.questions.len(),
            "Survey database loaded"
        );
        Ok(db)
    }
}

#[async_trait]
impl SurveySource for FileSurveySource {
    async fn list_responses(&self) -> Result<Vec<SurveyResponse>> {
        Ok(self.read().await?.responses)
    }

    async fn list_questions(&self) -> Result<Vec<Question>> {
        Ok(self.read().await?.questions)
    }

    async fn load(&self) -> Result<SurveyDatabase> {
        self.read().await
    }
}
