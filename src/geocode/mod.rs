//! Resolving city/state pairs to coordinates.
//!
//! [`Geocoder`] is the lookup seam. [`NominatimGeocoder`] talks to the
//! OpenStreetMap search API over any [`crate::fetch::HttpClient`], and
//! [`CachedGeocoder`] memoizes another geocoder's answers per pair.

mod cache;
mod nominatim;

pub use cache::CachedGeocoder;
pub use nominatim::{DEFAULT_SEARCH_URL, NominatimGeocoder, parse_search_response};

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::types::{Coordinates, CustomerRecord, GeocodedRecord};

/// Maps a `(city, state)` pair to coordinates.
///
/// `Ok(None)` means the location could not be resolved: no match, or the
/// lookup timed out. Any other failure is an error.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, city: &str, state: &str) -> Result<Option<Coordinates>>;
}

/// Geocodes each record in order, one awaited lookup at a time.
#[tracing::instrument(skip_all, fields(rows = records.len()))]
pub async fn geocode_records<G: Geocoder + ?Sized>(
    records: Vec<CustomerRecord>,
    geocoder: &G,
) -> Result<Vec<GeocodedRecord>> {
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        let coordinates = geocoder.locate(&record.city, &record.state).await?;
        if coordinates.is_none() {
            debug!(city = %record.city, state = %record.state, "Location unresolved");
        }
        out.push(GeocodedRecord {
            record,
            coordinates,
        });
    }

    Ok(out)
}
