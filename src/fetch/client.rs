use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes requests against the survey REST store.
///
/// Kept as a trait so sources can be wired to a preconfigured or wrapped
/// client without knowing how it is built.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
