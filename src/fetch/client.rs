use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for outbound HTTP requests.
///
/// Geocoders take any `HttpClient`, so wrappers (or a test transport) can be
/// layered in without touching the lookup logic.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
