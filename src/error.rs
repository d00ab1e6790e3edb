//! Error types shared across the crate's seams.

use thiserror::Error;

/// Why a position could not be obtained.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location access denied: {0}")]
    Denied(String),
    #[error("location unavailable: {0}")]
    Unavailable(String),
    #[error("invalid coordinates (lon {longitude}, lat {latitude})")]
    InvalidCoordinates { longitude: f64, latitude: f64 },
}

/// Failure to get a usable payload out of the statistics endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response is not valid JSON: {reason}")]
    InvalidJson { reason: String, body: String },
    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Raw response text, when the server sent one.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            FetchError::Status { body, .. } | FetchError::InvalidJson { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Terminal failure of a single interaction.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("location unavailable")]
    LocationUnavailable(#[source] LocationError),
    #[error("fetch failed")]
    FetchFailed(#[source] FetchError),
    #[error("malformed comparison response")]
    MalformedResponse(#[source] FetchError),
    #[error("chart rendering failed")]
    Render(#[source] RenderError),
}

/// Failure inside a charting collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("i/o error writing chart: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize chart data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("container '{0}' is not a plain file name")]
    InvalidContainer(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_body_for_status_error() {
        let err = FetchError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.raw_body(), Some("boom"));
        assert_eq!(err.to_string(), "server returned status 500: boom");
    }

    #[test]
    fn test_raw_body_absent_for_malformed() {
        let err = FetchError::Malformed("expected an object".to_string());
        assert!(err.raw_body().is_none());
    }
}
