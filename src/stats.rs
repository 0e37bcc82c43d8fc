use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::types::{GeocodedRecord, StateAggregate};

/// Counters describing one completed run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub input_rows: usize,
    pub normalized_rows: usize,

    // geocoding
    pub geocoded: usize,
    pub unresolved: usize,
    pub distinct_lookups: Option<usize>,

    pub states: usize,
    pub output: PathBuf,
}

impl RunSummary {
    pub fn from_run(
        input_rows: usize,
        records: &[GeocodedRecord],
        aggregates: &[StateAggregate],
        output: PathBuf,
    ) -> Self {
        let geocoded = records.iter().filter(|r| r.is_resolved()).count();

        RunSummary {
            generated_at: Utc::now(),
            input_rows,
            normalized_rows: records.len(),
            geocoded,
            unresolved: records.len() - geocoded,
            distinct_lookups: None,
            states: aggregates.len(),
            output,
        }
    }

    /// Records how many distinct pairs actually reached the geocoding service.
    pub fn with_distinct_lookups(mut self, lookups: usize) -> Self {
        self.distinct_lookups = Some(lookups);
        self
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn resolved_pct(&self) -> f64 {
        Self::pct(self.geocoded, self.normalized_rows)
    }
}
