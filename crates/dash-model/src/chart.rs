//! Chart payloads carried by widgets, and the catalog of fixed charts keyed
//! by widget id.
//!
//! The JSON shape follows the Chart.js doughnut config the seed data is
//! written in (`labels`, `datasets[].data`, `datasets[].backgroundColor`,
//! `plugins.legend.position`). Fields this crate does not interpret are kept
//! in `extra` so a payload passes through unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(default)]
    pub background_color: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hover_background_color: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default)]
    pub plugins: PluginOptions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginOptions {
    #[serde(default)]
    pub legend: LegendOptions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendOptions {
    #[serde(default = "default_true")]
    pub display: bool,
    #[serde(default)]
    pub position: LegendPosition,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            display: true,
            position: LegendPosition::default(),
            extra: Map::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl ChartOptions {
    /// Options with the legend placed at `position`.
    pub fn with_legend(position: LegendPosition) -> Self {
        let mut opts = Self::default();
        opts.plugins.legend.position = position;
        opts
    }
}

/// Plain 24-bit colour, independent of any terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` or `#rgb`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        let channel = |i: usize, w: usize| u8::from_str_radix(hex.get(i..i + w)?, 16).ok();
        match hex.len() {
            6 => Some(Self(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            3 => {
                let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
                Some(Self(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }
}

/// Used for slices whose colour is missing or unparsable.
const FALLBACK_PALETTE: [Rgb; 6] = [
    Rgb(120, 100, 200),
    Rgb(80, 160, 220),
    Rgb(80, 200, 120),
    Rgb(255, 184, 80),
    Rgb(255, 95, 95),
    Rgb(115, 115, 138),
];

/// One drawable slice of a proportion chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<'a> {
    pub label: &'a str,
    pub value: f64,
    /// Share of the total in `0.0..=1.0`. Zero for every slice when the
    /// total is zero.
    pub fraction: f64,
    pub color: Rgb,
}

impl ChartData {
    /// Slices of the first dataset, aligned with `labels` by index.
    ///
    /// Negative and non-finite values count as zero.
    pub fn slices(&self) -> Vec<Slice<'_>> {
        let Some(dataset) = self.datasets.first() else {
            return Vec::new();
        };
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let total: f64 = dataset.data.iter().copied().map(clean).sum();

        dataset
            .data
            .iter()
            .enumerate()
            .map(|(i, &raw)| {
                let value = clean(raw);
                Slice {
                    label: self.labels.get(i).map(String::as_str).unwrap_or(""),
                    value,
                    fraction: if total > 0.0 { value / total } else { 0.0 },
                    color: dataset
                        .background_color
                        .get(i)
                        .and_then(|c| Rgb::parse_hex(c))
                        .unwrap_or(FALLBACK_PALETTE[i % FALLBACK_PALETTE.len()]),
                }
            })
            .collect()
    }

    /// Build a single-dataset chart where hover colours repeat the fill.
    pub fn single(labels: &[&str], values: &[f64], colors: &[&str]) -> Self {
        let colors: Vec<String> = colors.iter().map(|c| c.to_string()).collect();
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            datasets: vec![Dataset {
                label: None,
                data: values.to_vec(),
                background_color: colors.clone(),
                hover_background_color: colors,
            }],
        }
    }
}

/// A chart that is drawn for a widget id regardless of the widget's own fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedChart {
    pub data: ChartData,
    pub options: ChartOptions,
}

/// Lookup table from widget id to a fixed chart.
#[derive(Debug, Clone, Default)]
pub struct ChartCatalog {
    charts: HashMap<String, FixedChart>,
}

impl ChartCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The two demo charts the dashboard ships with.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(
            "cloud-accounts",
            FixedChart {
                data: ChartData::single(
                    &["Connected", "Not Connected"],
                    &[2.0, 2.0],
                    &["#1e90ff", "#87cefa"],
                ),
                options: ChartOptions::with_legend(LegendPosition::Bottom),
            },
        );
        catalog.insert(
            "cloud-risk-assessment",
            FixedChart {
                data: ChartData::single(
                    &["Failed", "Warning", "Not Available", "Passed"],
                    &[1689.0, 681.0, 36.0, 7253.0],
                    &["#ff4c4c", "#ffdd57", "#57a3ff", "#57ff57"],
                ),
                options: ChartOptions::with_legend(LegendPosition::Bottom),
            },
        );
        catalog
    }

    pub fn insert(&mut self, widget_id: impl Into<String>, chart: FixedChart) {
        self.charts.insert(widget_id.into(), chart);
    }

    pub fn get(&self, widget_id: &str) -> Option<&FixedChart> {
        self.charts.get(widget_id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}
