use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use survey_insights::fetch::{BasicClient, HttpClient, fetch_bytes};
use survey_insights::parser::{parse_questions, parse_responses};
use survey_insights::survey::{Question, SurveyResponse};
use tracing::info;

use crate::services::survey_source::SurveySource;

/// Reads surveys from the json-server style REST store
/// (`GET {base}/surveyResponses`, `GET {base}/questions`).
pub struct RestSurveySource<C = BasicClient> {
    base_url: String,
    client: C,
}

impl RestSurveySource<BasicClient> {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = BasicClient::with_timeout(Duration::from_secs(30))?;
        Ok(Self::with_client(base_url, client))
    }
}

impl<C: HttpClient> RestSurveySource<C> {
    pub fn with_client(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn endpoint(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), collection)
    }

    async fn fetch(&self, collection: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(collection);
        fetch_bytes(&self.client, &url)
            .await
            .with_context(|| format!("failed to fetch {url}"))
    }
}

#[async_trait]
impl<C: HttpClient> SurveySource for RestSurveySource<C> {
    async fn list_responses(&self) -> Result<Vec<SurveyResponse>> {
        let responses = parse_responses(&self.fetch("surveyResponses").await?)?;
        info!(count = responses.len(), base_url = %self.base_url, "Survey responses fetched");
        Ok(responses)
    }

    async fn list_questions(&self) -> Result<Vec<Question>> {
        let questions = parse_questions(&self.fetch("questions").await?)?;
        info!(count = questions.len(), base_url = %self.base_url, "Questions fetched");
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let source = RestSurveySource::with_client("http://localhost:3001/", BasicClient::new());
        assert_eq!(
            source.endpoint("surveyResponses"),
            "http://localhost:3001/surveyResponses"
        );

        let source = RestSurveySource::with_client("http://localhost:3001", BasicClient::new());
        assert_eq!(source.endpoint("questions"), "http://localhost:3001/questions");
    }
}
