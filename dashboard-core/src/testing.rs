//! Fakes shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::{
    api::DashboardApi,
    chart::{ChartBackend, ChartInstance, ChartSpec, Palette},
    error::{DashboardError, Result},
    model::{
        ApiReply, BackendError, ForecastDay, ForecastResponse, HealthStatus, TrendSeries,
        WeatherSnapshotRecord,
    },
};

/// Canned backend. Anything not configured fails like an unreachable host.
#[derive(Debug, Default)]
pub struct FakeApi {
    pub latest: Option<ApiReply<Vec<WeatherSnapshotRecord>>>,
    pub forecasts: HashMap<String, ApiReply<ForecastResponse>>,
    pub trends: HashMap<String, ApiReply<TrendSeries>>,
}

fn unreachable(path: &str) -> DashboardError {
    DashboardError::Status {
        url: format!("http://fake{path}"),
        status: 502,
        body: "Bad Gateway".to_string(),
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn latest(&self) -> Result<ApiReply<Vec<WeatherSnapshotRecord>>> {
        self.latest.clone().ok_or_else(|| unreachable("/api/latest"))
    }

    async fn forecast(&self, city: &str) -> Result<ApiReply<ForecastResponse>> {
        self.forecasts.get(city).cloned().ok_or_else(|| unreachable("/api/forecast"))
    }

    async fn trends(&self, city: &str) -> Result<ApiReply<TrendSeries>> {
        self.trends.get(city).cloned().ok_or_else(|| unreachable("/api/trends"))
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus { status: "healthy".to_string(), timestamp: None })
    }
}

pub fn backend_error<T>(message: &str) -> ApiReply<T> {
    ApiReply::Error(BackendError { error: message.to_string(), details: None })
}

pub fn record(city: &str, temperature: f64, condition: &str) -> WeatherSnapshotRecord {
    WeatherSnapshotRecord {
        city: city.to_string(),
        temperature,
        feels_like: None,
        condition: condition.to_string(),
        humidity: 55.0,
        wind_speed: 6.0,
        pressure: Some(1015.0),
        visibility: Some(10000.0),
        local_time: "08:30 AM".to_string(),
        timestamp: None,
        latitude: None,
        longitude: None,
    }
}

pub fn forecast_day(date: &str, pop_max: f64) -> ForecastDay {
    ForecastDay {
        date: date.to_string(),
        condition: "light rain".to_string(),
        temp_avg: 50.2,
        temp_min: 44.0,
        temp_max: 57.9,
        humidity_avg: 80.0,
        wind_speed_avg: 11.0,
        pop_max,
    }
}

pub fn series(labels: &[&str]) -> TrendSeries {
    TrendSeries {
        labels: labels.iter().map(|l| l.to_string()).collect(),
        temperature: (0..labels.len()).map(|i| 50.0 + i as f64).collect(),
        humidity: (0..labels.len()).map(|i| 70.0 - i as f64).collect(),
    }
}

/// Chart backend that counts live instances.
#[derive(Debug, Clone, Default)]
pub struct RecordingCharts {
    alive: Arc<AtomicUsize>,
    recolors: Arc<AtomicUsize>,
    created: Arc<Mutex<Vec<ChartSpec>>>,
}

impl RecordingCharts {
    pub fn alive(&self) -> usize {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn recolors(&self) -> usize {
        self.recolors.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<ChartSpec> {
        self.created.lock().unwrap().clone()
    }
}

impl ChartBackend for RecordingCharts {
    fn create(&mut self, spec: ChartSpec) -> Box<dyn ChartInstance> {
        self.alive.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(spec.clone());
        Box::new(RecordedChart { spec, owner: self.clone() })
    }
}

#[derive(Debug)]
struct RecordedChart {
    spec: ChartSpec,
    owner: RecordingCharts,
}

impl ChartInstance for RecordedChart {
    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    fn recolor(&mut self, palette: Palette) {
        self.spec.palette = palette;
        self.owner.recolors.fetch_add(1, Ordering::SeqCst);
    }

    fn destroy(self: Box<Self>) {
        self.owner.alive.fetch_sub(1, Ordering::SeqCst);
    }
}
