use thiserror::Error;

/// Errors raised by the dashboard core.
///
/// Backend-reported `{ "error": .. }` payloads are not errors at this level;
/// they arrive as [`crate::model::ApiReply::Error`].
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid backend URL '{0}'")]
    InvalidUrl(String),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "trend series is misaligned: {labels} labels, {temperature} temperatures, {humidity} humidity values"
    )]
    Misaligned { labels: usize, temperature: usize, humidity: usize },

    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
