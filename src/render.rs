//! Plotly figure assembly and HTML rendering.
//!
//! The figure is plain serde data: a choropleth trace keyed by state code and
//! a scattergeo trace of city markers, serialized into the JSON shape that
//! `Plotly.newPlot` accepts.

use anyhow::{Result, ensure};
use serde::Serialize;

use crate::config::MapStyle;
use crate::types::{GeocodedRecord, StateAggregate};

const SCRIPT_CLOSE: &str = "</script>";
const PLOT_DIV_ID: &str = "customer-map";

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Choropleth(ChoroplethTrace),
    Scattergeo(ScatterGeoTrace),
}

/// State-level fill layer.
#[derive(Debug, Serialize)]
pub struct ChoroplethTrace {
    pub locations: Vec<String>,
    pub z: Vec<usize>,
    pub customdata: Vec<String>,
    pub locationmode: &'static str,
    pub colorscale: String,
    pub colorbar: ColorBar,
    pub hovertemplate: &'static str,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

/// City marker layer. Only resolved records contribute points.
#[derive(Debug, Serialize)]
pub struct ScatterGeoTrace {
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub text: Vec<String>,
    pub mode: &'static str,
    pub marker: Marker,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct Marker {
    pub size: u32,
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct Layout {
    pub title: Title,
    pub geo: Geo,
    pub margin: Margin,
}

#[derive(Debug, Serialize)]
pub struct Geo {
    pub scope: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

/// A complete figure: traces plus layout.
#[derive(Debug, Serialize)]
pub struct MapFigure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl MapFigure {
    /// Assembles the choropleth from `aggregates` and the marker layer from
    /// `records`. Records without coordinates are skipped silently.
    pub fn build(
        aggregates: &[StateAggregate],
        records: &[GeocodedRecord],
        style: &MapStyle,
    ) -> Self {
        let choropleth = ChoroplethTrace {
            locations: aggregates.iter().map(|a| a.state.clone()).collect(),
            z: aggregates.iter().map(|a| a.count).collect(),
            customdata: aggregates.iter().map(|a| a.hover_info.clone()).collect(),
            locationmode: "USA-states",
            colorscale: style.colorscale.clone(),
            colorbar: ColorBar {
                title: Title {
                    text: style.colorbar_title.clone(),
                    x: None,
                },
            },
            hovertemplate: "<b>%{location}</b><br><br>%{customdata}<extra></extra>",
            name: String::new(),
        };

        let mut markers = ScatterGeoTrace {
            lon: Vec::new(),
            lat: Vec::new(),
            text: Vec::new(),
            mode: "markers",
            marker: Marker {
                size: style.marker_size,
                color: style.marker_color.clone(),
                opacity: style.marker_opacity,
            },
            name: style.marker_layer_name.clone(),
        };
        for r in records {
            if let Some(c) = r.coordinates {
                markers.lon.push(c.longitude);
                markers.lat.push(c.latitude);
                markers.text.push(r.record.city.clone());
            }
        }

        MapFigure {
            data: vec![Trace::Choropleth(choropleth), Trace::Scattergeo(markers)],
            layout: Layout {
                title: Title {
                    text: style.title.clone(),
                    x: Some(0.5),
                },
                geo: Geo { scope: "usa" },
                margin: Margin {
                    r: 0,
                    t: 50,
                    l: 0,
                    b: 0,
                },
            },
        }
    }

    pub fn marker_count(&self) -> usize {
        self.data
            .iter()
            .map(|t| match t {
                Trace::Scattergeo(s) => s.lon.len(),
                Trace::Choropleth(_) => 0,
            })
            .sum()
    }
}

/// Renders `figure` as a self-contained HTML page with plotly.js inlined.
pub fn render_html(figure: &MapFigure) -> Result<String> {
    let bundle = plotly_bundle()?;
    let data = script_safe_json(&figure.data)?;
    let layout = script_safe_json(&figure.layout)?;
    let title = escape_html(&figure.layout.title.text);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
{bundle}
</head>
<body>
<div id="{PLOT_DIV_ID}" style="height:100vh; width:100%;"></div>
<script type="text/javascript">
Plotly.newPlot("{PLOT_DIV_ID}", {data}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#
    ))
}

/// The inline `<script>` elements carrying the plotly.js bundle shipped with
/// the `plotly` crate, lifted from the page it renders for an empty plot.
fn plotly_bundle() -> Result<String> {
    // With `plotly_embed_js`, plotly 0.10 inlines the local bundle by default.
    let plot = plotly::Plot::new();
    let page = plot.to_html();

    // Everything after the last call belongs to the empty plot itself.
    let head = page
        .rfind("Plotly.newPlot")
        .map_or(page.as_str(), |end| &page[..end]);

    let mut bundle = String::new();
    let mut rest = head;
    while let Some(open) = rest.find("<script") {
        let tail = &rest[open..];
        let Some(tag_end) = tail.find('>') else { break };
        let Some(close) = tail.find(SCRIPT_CLOSE) else { break };
        let element = &tail[..close + SCRIPT_CLOSE.len()];
        if !tail[..tag_end].contains("src=") && close > tag_end + 1 {
            bundle.push_str(element);
            bundle.push('\n');
        }
        rest = &tail[close + SCRIPT_CLOSE.len()..];
    }

    ensure!(
        bundle.contains("Plotly"),
        "plotly.js bundle not found; is the plotly_embed_js feature enabled?"
    );
    Ok(bundle)
}

/// Serializes to JSON safe to embed in a `<script>` element.
///
/// `<`, `>` and `&` only ever occur inside JSON strings, so replacing them
/// with `\u` escapes keeps the value intact while leaving nothing the HTML
/// parser can act on.
fn script_safe_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
