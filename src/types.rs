//! Row and aggregate types shared by the pipeline stages.

use serde::{Deserialize, Serialize};

/// A single customer row as read from the input CSV.
///
/// `state` may hold several comma-separated codes until the row has been
/// through [`crate::normalize::explode_states`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CustomerRecord {
    #[serde(rename = "Organization Name")]
    pub organization_name: String,
    #[serde(rename = "Customer Type")]
    pub customer_type: Option<String>,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Org Specialty")]
    pub org_specialty: Option<String>,
    #[serde(rename = "City")]
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A customer row paired with the result of its geocoding lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedRecord {
    pub record: CustomerRecord,
    pub coordinates: Option<Coordinates>,
}

impl GeocodedRecord {
    pub fn is_resolved(&self) -> bool {
        self.coordinates.is_some()
    }
}

impl AsRef<CustomerRecord> for GeocodedRecord {
    fn as_ref(&self) -> &CustomerRecord {
        &self.record
    }
}

impl AsRef<CustomerRecord> for CustomerRecord {
    fn as_ref(&self) -> &CustomerRecord {
        self
    }
}

/// Per-state totals backing the choropleth layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateAggregate {
    pub state: String,
    pub count: usize,
    pub hover_info: String,
}

/// Flat row layout used when exporting the geocoded table.
#[derive(Debug, Serialize)]
pub(crate) struct GeocodedRow<'a> {
    #[serde(rename = "Organization Name")]
    pub(crate) organization_name: &'a str,
    #[serde(rename = "Customer Type")]
    pub(crate) customer_type: Option<&'a str>,
    #[serde(rename = "State")]
    pub(crate) state: &'a str,
    #[serde(rename = "Org Specialty")]
    pub(crate) org_specialty: Option<&'a str>,
    #[serde(rename = "City")]
    pub(crate) city: &'a str,
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
}

impl<'a> From<&'a GeocodedRecord> for GeocodedRow<'a> {
    fn from(r: &'a GeocodedRecord) -> Self {
        GeocodedRow {
            organization_name: &r.record.organization_name,
            customer_type: r.record.customer_type.as_deref(),
            state: &r.record.state,
            org_specialty: r.record.org_specialty.as_deref(),
            city: &r.record.city,
            latitude: r.coordinates.map(|c| c.latitude),
            longitude: r.coordinates.map(|c| c.longitude),
        }
    }
}
