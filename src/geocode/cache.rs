use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Geocoder;
use crate::types::Coordinates;

/// A [`Geocoder`] wrapper that remembers every answer by `(city, state)`.
///
/// Unresolved pairs are cached too, so a miss is never retried within a run.
/// Errors are not cached.
pub struct CachedGeocoder<G> {
    pub inner: G,
    entries: Mutex<HashMap<(String, String), Option<Coordinates>>>,
}

impl<G> CachedGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct pairs looked up so far.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, key: &(String, String)) -> Option<Option<Coordinates>> {
        self.entries().get(key).copied()
    }

    // The map is only ever inserted into whole, so a panic elsewhere cannot
    // leave it half-written.
    fn entries(&self) -> MutexGuard<'_, HashMap<(String, String), Option<Coordinates>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn locate(&self, city: &str, state: &str) -> Result<Option<Coordinates>> {
        let key = (city.to_string(), state.to_string());
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let result = self.inner.locate(city, state).await?;
        self.entries().insert(key, result);
        Ok(result)
    }
}
