//! Client for the dashboard's backend proxy.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{DashboardError, Result},
    model::{ApiReply, ForecastResponse, HealthStatus, TrendSeries, WeatherSnapshotRecord},
};

/// Data source for the dashboard panels.
///
/// `Ok(ApiReply::Error(..))` is a backend-reported failure; `Err(..)` means
/// the request never produced a usable body.
#[async_trait]
pub trait DashboardApi: Send + Sync + Debug {
    async fn latest(&self) -> Result<ApiReply<Vec<WeatherSnapshotRecord>>>;

    async fn forecast(&self, city: &str) -> Result<ApiReply<ForecastResponse>>;

    async fn trends(&self, city: &str) -> Result<ApiReply<TrendSeries>>;

    async fn health(&self) -> Result<HealthStatus>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|_| DashboardError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(DashboardError::InvalidUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| DashboardError::Http { url: base_url.to_string(), source })?;

        Ok(Self { base, http })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url, config.request_timeout())
    }

    /// `base` joined with `segments`, each segment percent-escaped.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| DashboardError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {url}");

        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| DashboardError::Http { url: url.to_string(), source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| DashboardError::Http { url: url.to_string(), source })?;

        // Error payloads come with 4xx/5xx statuses, so decode first and only
        // report the status when the body is not one of ours.
        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(DashboardError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            }),
            Err(source) => Err(DashboardError::Decode { url: url.to_string(), source }),
        }
    }
}

#[async_trait]
impl DashboardApi for HttpBackend {
    async fn latest(&self) -> Result<ApiReply<Vec<WeatherSnapshotRecord>>> {
        self.get_json(self.endpoint(&["api", "latest"])?).await
    }

    async fn forecast(&self, city: &str) -> Result<ApiReply<ForecastResponse>> {
        self.get_json(self.endpoint(&["api", "forecast", city])?).await
    }

    async fn trends(&self, city: &str) -> Result<ApiReply<TrendSeries>> {
        self.get_json(self.endpoint(&["api", "trends", city])?).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.get_json(self.endpoint(&["health"])?).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
