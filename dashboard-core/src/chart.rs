//! Line-chart description and the single live chart slot.
//!
//! [`ChartSpec`] is a toolkit-neutral description of the trend chart. A
//! [`ChartBackend`] turns it into a live [`ChartInstance`]; [`ChartSlot`]
//! holds at most one of those at a time.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use serde_json::{Value, json};

use crate::{
    model::{Metric, Theme},
    trends::TrendPoint,
};

const TEMPERATURE_LABEL: &str = "Temperature (°F)";
const HUMIDITY_LABEL: &str = "Humidity (%)";
const TEMPERATURE_COLOR: &str = "#0071e3";
const TEMPERATURE_FILL: &str = "rgba(0,113,227,0.1)";
const HUMIDITY_COLOR: &str = "#34c759";
const HUMIDITY_FILL: &str = "rgba(52,199,89,0.1)";

/// Theme-dependent colors for axes, legend and tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: &'static str,
    pub grid: &'static str,
    pub tooltip_background: &'static str,
    pub tooltip_border: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                text: "#000000",
                grid: "#e5e5e7",
                tooltip_background: "white",
                tooltip_border: "#e5e5e7",
            },
            Theme::Dark => Palette {
                text: "#f5f5f7",
                grid: "rgba(255,255,255,0.1)",
                tooltip_background: "#1c1c1e",
                tooltip_border: "#333",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisId {
    /// Left axis.
    Primary,
    /// Right axis, only present when both metrics are plotted.
    Secondary,
}

impl AxisId {
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisId::Primary => "y",
            AxisId::Secondary => "y1",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
    pub color: &'static str,
    pub fill: &'static str,
    pub axis: AxisId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub primary_title: &'static str,
    pub secondary_title: Option<&'static str>,
    pub palette: Palette,
}

impl ChartSpec {
    /// Build the trend chart for already filtered and ordered points.
    pub fn line(points: &[TrendPoint], metric: Metric, theme: Theme) -> Self {
        let labels = points.iter().map(|p| p.label.clone()).collect();
        let mut datasets = Vec::with_capacity(2);

        if metric.shows_temperature() {
            datasets.push(Dataset {
                label: TEMPERATURE_LABEL,
                data: points.iter().map(|p| p.temperature).collect(),
                color: TEMPERATURE_COLOR,
                fill: TEMPERATURE_FILL,
                axis: AxisId::Primary,
            });
        }

        if metric.shows_humidity() {
            datasets.push(Dataset {
                label: HUMIDITY_LABEL,
                data: points.iter().map(|p| p.humidity).collect(),
                color: HUMIDITY_COLOR,
                fill: HUMIDITY_FILL,
                axis: if metric == Metric::Humidity { AxisId::Primary } else { AxisId::Secondary },
            });
        }

        ChartSpec {
            labels,
            datasets,
            primary_title: if metric == Metric::Humidity { HUMIDITY_LABEL } else { TEMPERATURE_LABEL },
            secondary_title: (metric == Metric::All).then_some(HUMIDITY_LABEL),
            palette: Palette::for_theme(theme),
        }
    }

    pub fn point_count(&self) -> usize {
        self.labels.len()
    }

    /// Chart.js `line` configuration for this spec.
    pub fn to_chartjs(&self) -> Value {
        let p = &self.palette;

        let datasets: Vec<Value> = self
            .datasets
            .iter()
            .map(|d| {
                json!({
                    "label": d.label,
                    "data": d.data,
                    "borderColor": d.color,
                    "backgroundColor": d.fill,
                    "borderWidth": 3,
                    "tension": 0.4,
                    "fill": true,
                    "yAxisID": d.axis.as_str(),
                    "pointRadius": 2,
                    "pointHoverRadius": 6,
                    "pointBackgroundColor": d.color,
                    "pointBorderColor": "#fff",
                    "pointBorderWidth": 2,
                })
            })
            .collect();

        let mut scales = json!({
            "x": {
                "grid": { "color": p.grid, "drawBorder": false },
                "ticks": {
                    "color": p.text,
                    "font": { "family": "Inter", "size": 10 },
                    "maxRotation": 45,
                    "minRotation": 0,
                    "autoSkip": true,
                    "maxTicksLimit": 20,
                },
            },
            "y": {
                "type": "linear",
                "display": true,
                "position": "left",
                "grid": { "color": p.grid, "drawBorder": false },
                "title": {
                    "display": true,
                    "text": self.primary_title,
                    "color": p.text,
                    "font": { "weight": "600", "family": "Inter" },
                },
                "ticks": { "color": p.text, "font": { "family": "Inter", "size": 11 } },
            },
        });

        if let Some(title) = self.secondary_title {
            scales["y1"] = json!({
                "type": "linear",
                "display": true,
                "position": "right",
                "grid": { "drawOnChartArea": false },
                "title": {
                    "display": true,
                    "text": title,
                    "color": p.text,
                    "font": { "weight": "600", "family": "Inter" },
                },
                "ticks": { "color": p.text, "font": { "family": "Inter", "size": 11 } },
            });
        }

        json!({
            "type": "line",
            "data": { "labels": self.labels, "datasets": datasets },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "interaction": { "mode": "index", "intersect": false },
                "plugins": {
                    "legend": {
                        "display": true,
                        "position": "top",
                        "labels": {
                            "font": { "size": 13, "family": "Inter" },
                            "padding": 20,
                            "usePointStyle": true,
                            "color": p.text,
                        },
                    },
                    "tooltip": {
                        "backgroundColor": p.tooltip_background,
                        "titleColor": p.text,
                        "bodyColor": p.text,
                        "borderColor": p.tooltip_border,
                        "borderWidth": 1,
                        "cornerRadius": 8,
                        "padding": 12,
                        "displayColors": true,
                    },
                },
                "scales": scales,
            },
        })
    }
}

/// A chart drawn by some backend.
pub trait ChartInstance: fmt::Debug {
    fn spec(&self) -> &ChartSpec;

    /// Swap colors and redraw in place; data is left alone.
    fn recolor(&mut self, palette: Palette);

    fn destroy(self: Box<Self>);
}

/// Rendering sink for trend charts.
pub trait ChartBackend {
    fn create(&mut self, spec: ChartSpec) -> Box<dyn ChartInstance>;
}

/// Owner of the one live chart.
#[derive(Debug, Default)]
pub struct ChartSlot {
    live: Option<Box<dyn ChartInstance>>,
}

impl ChartSlot {
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn live(&self) -> Option<&dyn ChartInstance> {
        self.live.as_deref()
    }

    /// Destroy the live chart, if any. Returns whether one was destroyed.
    pub fn destroy(&mut self) -> bool {
        match self.live.take() {
            Some(chart) => {
                chart.destroy();
                true
            }
            None => false,
        }
    }

    /// Destroy the current chart, then create a new one from `spec`.
    pub fn replace(&mut self, backend: &mut dyn ChartBackend, spec: ChartSpec) {
        self.destroy();
        self.live = Some(backend.create(spec));
    }

    pub fn recolor(&mut self, palette: Palette) -> bool {
        match self.live.as_mut() {
            Some(chart) => {
                chart.recolor(palette);
                true
            }
            None => false,
        }
    }
}

/// Shared drawing target holding the current Chart.js configuration.
#[derive(Debug, Clone, Default)]
pub struct ChartCanvas(Arc<Mutex<Option<Value>>>);

impl ChartCanvas {
    pub fn draw(&self, config: Value) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(config);
    }

    pub fn clear(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn config(&self) -> Option<Value> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Backend that draws Chart.js configurations onto a [`ChartCanvas`].
#[derive(Debug, Clone)]
pub struct ChartJsBackend {
    canvas: ChartCanvas,
}

impl ChartJsBackend {
    pub fn new(canvas: ChartCanvas) -> Self {
        Self { canvas }
    }
}

impl ChartBackend for ChartJsBackend {
    fn create(&mut self, spec: ChartSpec) -> Box<dyn ChartInstance> {
        self.canvas.draw(spec.to_chartjs());
        Box::new(ChartJsChart { spec, canvas: self.canvas.clone() })
    }
}

#[derive(Debug)]
struct ChartJsChart {
    spec: ChartSpec,
    canvas: ChartCanvas,
}

impl ChartInstance for ChartJsChart {
    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    fn recolor(&mut self, palette: Palette) {
        self.spec.palette = palette;
        self.canvas.draw(self.spec.to_chartjs());
    }

    fn destroy(self: Box<Self>) {
        self.canvas.clear();
    }
}
