//! Trait for loading survey data from the external data-access layer.

use anyhow::Result;
use survey_insights::parser::SurveyDatabase;
use survey_insights::survey::{Question, SurveyResponse};

/// Abstraction over a survey data provider (e.g., the mock REST store).
#[async_trait::async_trait]
pub trait SurveySource: Send + Sync {
    /// Returns every recorded survey response, in store order.
    async fn list_responses(&self) -> Result<Vec<SurveyResponse>>;

    /// Returns the ordered question definitions.
    async fn list_questions(&self) -> Result<Vec<Question>>;

    /// Loads responses and questions together.
    async fn load(&self) -> Result<SurveyDatabase> {
        Ok(SurveyDatabase {
            responses: self.list_responses().await?,
            questions: self.list_questions().await?,
        })
    }
}
