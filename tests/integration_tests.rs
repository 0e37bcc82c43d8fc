use anyhow::Result;
use async_trait::async_trait;
use customer_map::config::RunConfig;
use customer_map::geocode::{CachedGeocoder, Geocoder};
use customer_map::pipeline;
use customer_map::types::Coordinates;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

struct TableGeocoder {
    known: HashMap<&'static str, (f64, f64)>,
    calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for TableGeocoder {
    async fn locate(&self, city: &str, _state: &str) -> Result<Option<Coordinates>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.known.get(city).map(|&(latitude, longitude)| Coordinates {
            latitude,
            longitude,
        }))
    }
}

fn table() -> TableGeocoder {
    TableGeocoder {
        known: HashMap::from([("Detroit", (42.33, -83.05)), ("Chicago", (41.88, -87.63))]),
        calls: AtomicUsize::new(0),
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const CUSTOMERS: &str = "\
Organization Name,Customer Type,State,Org Specialty,City
Acme Clinic,Pain Management,\"MI, IL\",Nephrology,Detroit
Lakeside Health,,IL,Cardiology,Chicago
Ghost Practice,Clinic,IL,,Xyzzyville
";

#[tokio::test]
async fn test_full_pipeline() {
    let dir = temp_dir("customer_map_full_pipeline");
    let input = dir.join("customers.csv");
    fs::write(&input, CUSTOMERS).unwrap();

    let config = RunConfig {
        input,
        output: dir.join("out").join("customer_map.html"),
        open_viewer: false,
        geocoded_csv: Some(dir.join("geocoded.csv")),
        ..RunConfig::default()
    };

    let geocoder = table();
    let summary = pipeline::run(&config, &geocoder).await.expect("pipeline failed");

    assert_eq!(summary.input_rows, 3);
    assert_eq!(summary.normalized_rows, 4);
    assert_eq!(summary.states, 2);
    assert_eq!(summary.unresolved, 1);
    assert_eq!(summary.geocoded, 3);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 4);

    let html = fs::read_to_string(&config.output).unwrap();
    assert!(html.contains("Plotly.newPlot"));
    assert!(html.contains("Acme Clinic (Pain Management; Nephrology)"));
    assert!(html.contains("Lakeside Health (—; Cardiology)"));
    assert!(html.contains("Ghost Practice (Clinic; —)"));
    assert!(!html.contains("Xyzzyville"));

    let csv = fs::read_to_string(dir.join("geocoded.csv")).unwrap();
    assert_eq!(csv.lines().count(), 5);

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_cached_pipeline_deduplicates_lookups() {
    let dir = temp_dir("customer_map_cached_pipeline");
    let input = dir.join("customers.csv");
    fs::write(
        &input,
        "\
Organization Name,Customer Type,State,Org Specialty,City
A,,MI,,Detroit
B,,MI,,Detroit
C,,MI,,Detroit
",
    )
    .unwrap();

    let config = RunConfig {
        input,
        output: dir.join("customer_map.html"),
        open_viewer: false,
        ..RunConfig::default()
    };

    let geocoder = CachedGeocoder::new(table());
    let summary = pipeline::run(&config, &geocoder).await.unwrap();

    assert_eq!(summary.normalized_rows, 3);
    assert_eq!(summary.geocoded, 3);
    assert_eq!(geocoder.inner.calls.load(Ordering::SeqCst), 1);
    assert_eq!(geocoder.len(), 1);

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_missing_column_aborts() {
    let dir = temp_dir("customer_map_missing_column");
    let input = dir.join("customers.csv");
    fs::write(&input, "Organization Name,State\nAcme,MI\n").unwrap();

    let config = RunConfig {
        input,
        output: dir.join("customer_map.html"),
        open_viewer: false,
        ..RunConfig::default()
    };

    let result = pipeline::run(&config, &table()).await;
    assert!(result.is_err());
    assert!(!config.output.exists());

    fs::remove_dir_all(&dir).unwrap();
}
