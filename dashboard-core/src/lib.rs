//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Shared domain models (snapshot records, forecasts, trend series)
//! - The backend client and its trait seam
//! - Pure renderers for the dashboard panels
//! - Trend-window filtering and the chart description
//! - The page session and the event loop that drives it
//! - Configuration & persisted preferences
//!
//! It is used by `dashboard-cli`, but any frontend that implements
//! [`Surface`] and [`ChartBackend`] can host the same session.

pub mod api;
pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod icons;
pub mod insights;
pub mod model;
pub mod page;
pub mod prefs;
pub mod render;
pub mod session;
pub mod trends;

#[cfg(test)]
mod testing;

pub use api::{DashboardApi, HttpBackend};
pub use app::{App, ControlEvent};
pub use chart::{ChartBackend, ChartCanvas, ChartJsBackend, ChartSpec};
pub use config::Config;
pub use error::DashboardError;
pub use model::{
    ApiReply, ForecastDay, Insight, InsightKind, Metric, Theme, TrendSeries, WeatherSnapshotRecord,
};
pub use page::{Control, HtmlPage, Panel, Surface};
pub use prefs::{MemoryPreferenceStore, PreferenceStore, TomlPreferenceStore};
pub use session::{Fetch, Reply, Session};
