use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Current conditions for one city, as served by `/api/latest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshotRecord {
    pub city: String,
    /// Degrees Fahrenheit.
    pub temperature: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    pub condition: String,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Miles per hour.
    pub wind_speed: f64,
    #[serde(default)]
    pub pressure: Option<f64>,
    /// Meters.
    #[serde(default)]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub local_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl WeatherSnapshotRecord {
    /// Apparent temperature, falling back to the measured one.
    ///
    /// The backend sends `0` for unknown readings, so zero counts as missing.
    pub fn feels_like_or_temperature(&self) -> f64 {
        match self.feels_like {
            Some(v) if v != 0.0 => v,
            _ => self.temperature,
        }
    }
}

/// One day of the multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub condition: String,
    pub temp_avg: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity_avg: f64,
    pub wind_speed_avg: f64,
    /// Maximum probability of precipitation, in percent.
    #[serde(default)]
    pub pop_max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub daily: Vec<ForecastDay>,
}

/// Time series for one city in parallel-array form.
///
/// All three vectors are index-aligned; see [`TrendSeries::check_aligned`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn check_aligned(&self) -> Result<()> {
        let labels = self.labels.len();
        if self.temperature.len() != labels || self.humidity.len() != labels {
            return Err(DashboardError::Misaligned {
                labels,
                temperature: self.temperature.len(),
                humidity: self.humidity.len(),
            });
        }
        Ok(())
    }
}

/// `{ "error": "..." }` payload the backend returns instead of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendError {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Either the requested data or a backend-reported error.
///
/// The error variant is tried first: a bare `{ "error": .. }` object would
/// otherwise deserialize as a [`ForecastResponse`] with no days.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiReply<T> {
    Error(BackendError),
    Data(T),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Info,
    Warning,
    Alert,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Info => "info",
            InsightKind::Warning => "warning",
            InsightKind::Alert => "alert",
        }
    }
}

/// Human-readable observation derived from the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub icon: &'static str,
    pub title: &'static str,
    pub content: String,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(DashboardError::UnknownValue { kind: "theme", value: s.to_string() }),
        }
    }
}

/// Which series the trend chart plots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    Temp,
    Humidity,
    #[default]
    All,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Temp => "temp",
            Metric::Humidity => "humidity",
            Metric::All => "all",
        }
    }

    pub const fn all() -> &'static [Metric] {
        &[Metric::Temp, Metric::Humidity, Metric::All]
    }

    pub fn shows_temperature(&self) -> bool {
        matches!(self, Metric::Temp | Metric::All)
    }

    pub fn shows_humidity(&self) -> bool {
        matches!(self, Metric::Humidity | Metric::All)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "temp" => Ok(Metric::Temp),
            "humidity" => Ok(Metric::Humidity),
            "all" => Ok(Metric::All),
            _ => Err(DashboardError::UnknownValue { kind: "metric", value: s.to_string() }),
        }
    }
}
