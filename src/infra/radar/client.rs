use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::FetchError;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::location::Coordinates;
use crate::response::ComparisonResponse;
use crate::services::stats_api::{CrimeStatsApi, Endpoint};

/// HTTP client for the crime statistics service.
pub struct RadarClient<C> {
    http: C,
    base_url: String,
    year: Option<u16>,
    precision: Option<u8>,
}

impl RadarClient<BasicClient> {
    /// Client over a real connection, honoring the configured timeouts.
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        let http = BasicClient::with_timeouts(settings.timeout, settings.connect_timeout)?;
        Ok(Self::with_http(http, settings))
    }
}

impl<C: HttpClient> RadarClient<C> {
    pub fn with_http(http: C, settings: &Settings) -> Self {
        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            year: settings.year,
            precision: settings.precision,
        }
    }

    /// Full request url, with `year` / `precision` appended when configured.
    pub fn url_for(&self, endpoint: Endpoint, coords: Coordinates) -> String {
        let mut url = format!("{}{}", self.base_url, endpoint.path(coords));

        let mut params = Vec::new();
        if let Some(year) = self.year {
            params.push(format!("year={year}"));
        }
        if let Some(precision) = self.precision {
            params.push(format!("precision={precision}"));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }

        url
    }
}

#[async_trait]
impl<C: HttpClient> CrimeStatsApi for RadarClient<C> {
    #[tracing::instrument(skip(self, coords), fields(coords = %coords))]
    async fn compare(
        &self,
        endpoint: Endpoint,
        coords: Coordinates,
    ) -> Result<ComparisonResponse, FetchError> {
        let url = self.url_for(endpoint, coords);
        info!(url = %url, "Requesting comparison");

        let value = fetch_json(&self.http, &url).await?;
        let response = ComparisonResponse::from_value(value)?;
        debug!(kind = response.kind(), "Comparison payload validated");

        Ok(response)
    }
}
