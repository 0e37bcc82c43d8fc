//! CSV reader for the customer list.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::types::CustomerRecord;

/// Loads every customer row from the CSV at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a required column is
/// missing, or a row fails to deserialize.
pub fn load_customers(path: &Path) -> Result<Vec<CustomerRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open customer CSV: {}", path.display()))?;
    let rows = read_customers(file)
        .with_context(|| format!("Failed to read customer CSV: {}", path.display()))?;
    debug!(path = %path.display(), rows = rows.len(), "Customer CSV loaded");
    Ok(rows)
}

/// Deserializes customer rows from any reader carrying a headered CSV.
pub fn read_customers<R: Read>(reader: R) -> Result<Vec<CustomerRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: CustomerRecord = result?;
        rows.push(record);
    }

    Ok(rows)
}
