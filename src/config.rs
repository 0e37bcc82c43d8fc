//! Run parameters and figure styling.
//!
//! Every field has a fixed default; the CLI only overrides them.

use std::path::PathBuf;
use std::time::Duration;

use crate::geocode::DEFAULT_SEARCH_URL;

pub const DEFAULT_INPUT: &str = "customers.csv";
pub const DEFAULT_OUTPUT: &str = "customer_map.html";
pub const DEFAULT_USER_AGENT: &str = "my_customer_map";
pub const DEFAULT_TIMEOUT_SECS: u64 = 1;

/// Everything the pipeline needs to know about a single run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub user_agent: String,
    pub timeout: Duration,
    pub geocoder_url: String,
    pub cache_lookups: bool,
    pub open_viewer: bool,
    pub geocoded_csv: Option<PathBuf>,
    pub style: MapStyle,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            geocoder_url: DEFAULT_SEARCH_URL.to_string(),
            cache_lookups: true,
            open_viewer: true,
            geocoded_csv: None,
            style: MapStyle::default(),
        }
    }
}

/// Visual constants for the rendered figure.
#[derive(Debug, Clone, PartialEq)]
pub struct MapStyle {
    pub title: String,
    pub colorscale: String,
    pub colorbar_title: String,
    pub marker_size: u32,
    pub marker_color: String,
    pub marker_opacity: f64,
    pub marker_layer_name: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            title: "Customer Map by State (hover to see all orgs)".to_string(),
            colorscale: "Viridis".to_string(),
            colorbar_title: "Count".to_string(),
            marker_size: 8,
            marker_color: "red".to_string(),
            marker_opacity: 0.7,
            marker_layer_name: "Cities".to_string(),
        }
    }
}
