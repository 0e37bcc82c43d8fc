//! End-to-end batch run: load, normalize, geocode, aggregate, render, write.

use anyhow::Result;
use tracing::info;

use crate::aggregate::aggregate_by_state;
use crate::config::{MapStyle, RunConfig};
use crate::geocode::{Geocoder, geocode_records};
use crate::normalize::explode_states;
use crate::output::{open_in_viewer, write_geocoded_csv, write_html};
use crate::parser::load_customers;
use crate::render::{MapFigure, render_html};
use crate::stats::RunSummary;
use crate::types::{CustomerRecord, GeocodedRecord, StateAggregate};

/// In-memory products of a run, before anything touches the filesystem.
#[derive(Debug)]
pub struct MapArtifacts {
    pub records: Vec<GeocodedRecord>,
    pub aggregates: Vec<StateAggregate>,
    pub figure: MapFigure,
}

/// Turns raw customer rows into the geocoded table, per-state aggregates,
/// and the figure built from them.
pub async fn build_map<G: Geocoder + ?Sized>(
    customers: Vec<CustomerRecord>,
    geocoder: &G,
    style: &MapStyle,
) -> Result<MapArtifacts> {
    let normalized = explode_states(customers);
    info!(rows = normalized.len(), "State lists expanded");

    let records = geocode_records(normalized, geocoder).await?;
    let aggregates = aggregate_by_state(&records);
    info!(states = aggregates.len(), "Aggregated by state");

    let figure = MapFigure::build(&aggregates, &records, style);

    Ok(MapArtifacts {
        records,
        aggregates,
        figure,
    })
}

/// Runs the whole batch described by `config` using `geocoder` for lookups.
#[tracing::instrument(skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
pub async fn run<G: Geocoder + ?Sized>(config: &RunConfig, geocoder: &G) -> Result<RunSummary> {
    let customers = load_customers(&config.input)?;
    let input_rows = customers.len();
    info!(rows = input_rows, "Customer list loaded");

    let artifacts = build_map(customers, geocoder, &config.style).await?;

    let html = render_html(&artifacts.figure)?;
    write_html(&config.output, &html)?;
    info!(markers = artifacts.figure.marker_count(), "Map written");

    if let Some(path) = &config.geocoded_csv {
        write_geocoded_csv(path, &artifacts.records)?;
        info!(path = %path.display(), "Geocoded table exported");
    }

    if config.open_viewer {
        open_in_viewer(&config.output)?;
    }

    Ok(RunSummary::from_run(
        input_rows,
        &artifacts.records,
        &artifacts.aggregates,
        config.output.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::tests::StubGeocoder;

    fn customer(org: &str, state: &str, city: &str) -> CustomerRecord {
        CustomerRecord {
            organization_name: org.to_string(),
            customer_type: Some("Pain Management".to_string()),
            state: state.to_string(),
            org_specialty: Some("Nephrology".to_string()),
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_map_acme_scenario() {
        let geocoder = StubGeocoder::default()
            .with("Detroit", "MI", 42.33, -83.05)
            .with("Detroit", "IL", 41.0, -88.0);

        let artifacts = build_map(
            vec![customer("Acme Clinic", "MI, IL", "Detroit")],
            &geocoder,
            &MapStyle::default(),
        )
        .await
        .unwrap();

        assert_eq!(artifacts.records.len(), 2);
        assert_eq!(artifacts.aggregates.len(), 2);
        for a in &artifacts.aggregates {
            assert_eq!(a.count, 1);
            assert_eq!(a.hover_info, "Acme Clinic (Pain Management; Nephrology)");
        }
        assert_eq!(artifacts.figure.marker_count(), 2);
        assert_eq!(geocoder.calls(), 2);
    }

    #[tokio::test]
    async fn test_build_map_unresolved_counted_not_plotted() {
        let geocoder = StubGeocoder::default().with("Detroit", "MI", 42.33, -83.05);

        let artifacts = build_map(
            vec![
                customer("Acme Clinic", "MI", "Detroit"),
                customer("Ghost Clinic", "MI", "Atlantis"),
            ],
            &geocoder,
            &MapStyle::default(),
        )
        .await
        .unwrap();

        assert_eq!(artifacts.aggregates.len(), 1);
        assert_eq!(artifacts.aggregates[0].count, 2);
        assert_eq!(artifacts.figure.marker_count(), 1);
        assert!(artifacts.records[1].coordinates.is_none());
    }
}
