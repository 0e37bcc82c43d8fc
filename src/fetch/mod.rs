mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use reqwest::Url;

/// Issues a GET for `url` and returns the raw body, failing on a non-success status.
///
/// Transport errors are returned untouched inside the `anyhow::Error` so
/// callers can downcast to [`reqwest::Error`] and inspect them.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: Url) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
