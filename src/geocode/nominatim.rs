use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use super::Geocoder;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::types::Coordinates;

pub const DEFAULT_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

/// Free-text geocoder backed by the Nominatim `/search` endpoint.
///
/// Each lookup sends `"{city}, {state}, USA"` and keeps only the best match.
/// A request that times out resolves to `None` instead of failing.
pub struct NominatimGeocoder<C> {
    client: C,
    search_url: Url,
}

impl<C: HttpClient> NominatimGeocoder<C> {
    pub fn new(client: C, search_url: &str) -> Result<Self> {
        let search_url = Url::parse(search_url)
            .with_context(|| format!("Invalid geocoder URL: {search_url}"))?;
        Ok(Self { client, search_url })
    }

    fn query_url(&self, city: &str, state: &str) -> Url {
        let query = format!("{city}, {state}, USA");
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }
}

#[async_trait]
impl<C: HttpClient> Geocoder for NominatimGeocoder<C> {
    #[tracing::instrument(skip(self))]
    async fn locate(&self, city: &str, state: &str) -> Result<Option<Coordinates>> {
        let url = self.query_url(city, state);

        let body = match fetch_bytes(&self.client, url).await {
            Ok(body) => body,
            Err(e) if is_timeout(&e) => {
                debug!(error = %e, "Geocoding request timed out");
                return Ok(None);
            }
            Err(e) => return Err(e.context(format!("Geocoding failed for {city}, {state}"))),
        };

        let coordinates = parse_search_response(&body)?;
        debug!(?coordinates, "Geocoding response parsed");
        Ok(coordinates)
    }
}

fn is_timeout(err: &anyhow::Error) -> bool {
    err.downcast_ref::<reqwest::Error>()
        .is_some_and(reqwest::Error::is_timeout)
}

/// Extracts the first match from a Nominatim JSON search response.
///
/// An empty result list is `Ok(None)`; a malformed body or an unparsable
/// coordinate is an error.
pub fn parse_search_response(body: &[u8]) -> Result<Option<Coordinates>> {
    let results: Vec<SearchResult> =
        serde_json::from_slice(body).context("Failed to parse geocoding response")?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let latitude: f64 = first
        .lat
        .parse()
        .map_err(|e| anyhow!("Invalid latitude in response: {e}"))?;
    let longitude: f64 = first
        .lon
        .parse()
        .map_err(|e| anyhow!("Invalid longitude in response: {e}"))?;

    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}
