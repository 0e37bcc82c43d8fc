//! Writing and presenting run artifacts.
//!
//! Covers the HTML map, the optional geocoded-table CSV export, the run
//! summary log lines, and launching the platform viewer.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::stats::RunSummary;
use crate::types::{GeocodedRecord, GeocodedRow};
use csv::WriterBuilder;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Logs the run summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &RunSummary) {
    debug!("{:#?}", summary);
}

/// Logs the run summary as pretty-printed JSON.
pub fn print_json(summary: &RunSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Writes the rendered map to `path`, creating parent directories as needed.
pub fn write_html(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write map: {}", path.display()))?;
    debug!(path = %path.display(), bytes = html.len(), "Map written");
    Ok(())
}

/// Writes the geocoded table as CSV: the five input columns plus
/// `latitude` and `longitude`, left empty for unresolved rows.
///
/// Overwrites any existing file.
pub fn write_geocoded_csv(path: &Path, records: &[GeocodedRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to create CSV: {}", path.display()))?;

    for record in records {
        writer.serialize(GeocodedRow::from(record))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = records.len(), "Geocoded CSV written");
    Ok(())
}

/// Opens `path` with the platform's default viewer without waiting for it.
pub fn open_in_viewer(path: &Path) -> Result<()> {
    let mut cmd = viewer_command(path);
    cmd.spawn()
        .with_context(|| format!("Failed to open viewer for {}", path.display()))?;
    info!(path = %path.display(), "Opened map in viewer");
    Ok(())
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}
