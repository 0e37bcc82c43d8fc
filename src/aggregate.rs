//! Per-state grouping for the choropleth layer.

use std::collections::BTreeMap;

use crate::types::{CustomerRecord, StateAggregate};

/// Stand-in for a missing customer type or specialty.
pub const PLACEHOLDER: &str = "—";

/// Line separator inside a hover tooltip.
pub const LINE_BREAK: &str = "<br>";

/// Groups records by state code, counting rows and building one tooltip line each.
///
/// Aggregates come out ordered by state code. Coordinates play no part here:
/// every record counts whether or not it was geocoded.
pub fn aggregate_by_state<I, R>(records: I) -> Vec<StateAggregate>
where
    I: IntoIterator<Item = R>,
    R: AsRef<CustomerRecord>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for record in records {
        let record = record.as_ref();
        groups
            .entry(record.state.clone())
            .or_default()
            .push(tooltip_line(record));
    }

    groups
        .into_iter()
        .map(|(state, lines)| StateAggregate {
            state,
            count: lines.len(),
            hover_info: lines.join(LINE_BREAK),
        })
        .collect()
}

/// Formats `"{org} ({type}; {specialty})"` for one record.
pub fn tooltip_line(record: &CustomerRecord) -> String {
    format!(
        "{} ({}; {})",
        record.organization_name,
        or_placeholder(record.customer_type.as_deref()),
        or_placeholder(record.org_specialty.as_deref()),
    )
}

fn or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::explode_states;
    use crate::types::{Coordinates, GeocodedRecord};

    fn record(org: &str, ctype: Option<&str>, state: &str, spec: Option<&str>) -> CustomerRecord {
        CustomerRecord {
            organization_name: org.to_string(),
            customer_type: ctype.map(str::to_string),
            state: state.to_string(),
            org_specialty: spec.map(str::to_string),
            city: "Detroit".to_string(),
        }
    }

    #[test]
    fn test_multi_state_row_scenario() {
        let rows = explode_states(vec![record(
            "Acme Clinic",
            Some("Pain Management"),
            "MI, IL",
            Some("Nephrology"),
        )]);

        let agg = aggregate_by_state(&rows);

        assert_eq!(agg.len(), 2);
        for a in &agg {
            assert_eq!(a.count, 1);
            assert_eq!(a.hover_info, "Acme Clinic (Pain Management; Nephrology)");
        }
        let mut states: Vec<_> = agg.iter().map(|a| a.state.as_str()).collect();
        states.sort();
        assert_eq!(states, vec!["IL", "MI"]);
    }

    #[test]
    fn test_duplicates_not_deduplicated() {
        let rows = vec![
            record("Acme", Some("Clinic"), "OH", Some("Cardiology")),
            record("Acme", Some("Clinic"), "OH", Some("Cardiology")),
        ];

        let agg = aggregate_by_state(&rows);

        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].count, 2);
        assert_eq!(
            agg[0].hover_info,
            "Acme (Clinic; Cardiology)<br>Acme (Clinic; Cardiology)"
        );
    }

    #[test]
    fn test_placeholder_for_missing_fields() {
        let rows = vec![
            record("NoType", None, "TX", Some("Oncology")),
            record("EmptySpec", Some("Hospital"), "TX", Some("")),
        ];

        let agg = aggregate_by_state(&rows);

        assert_eq!(
            agg[0].hover_info,
            "NoType (—; Oncology)<br>EmptySpec (Hospital; —)"
        );
    }

    #[test]
    fn test_count_matches_lines() {
        let rows = vec![
            record("A", None, "CA", None),
            record("B", None, "NV", None),
            record("C", None, "CA", None),
        ];

        for a in aggregate_by_state(&rows) {
            assert_eq!(a.count, a.hover_info.split(LINE_BREAK).count());
        }
    }

    #[test]
    fn test_unresolved_records_still_counted() {
        let geocoded = vec![
            GeocodedRecord {
                record: record("Found", None, "MI", None),
                coordinates: Some(Coordinates {
                    latitude: 42.3,
                    longitude: -83.0,
                }),
            },
            GeocodedRecord {
                record: record("Lost", None, "MI", None),
                coordinates: None,
            },
        ];

        let agg = aggregate_by_state(&geocoded);

        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].count, 2);
        assert!(agg[0].hover_info.contains("Lost"));
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<CustomerRecord> = vec![];
        assert!(aggregate_by_state(&rows).is_empty());
    }
}
