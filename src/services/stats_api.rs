//! Trait and endpoint description for the crime statistics service.

use crate::error::FetchError;
use crate::location::Coordinates;
use crate::response::ComparisonResponse;

/// The two comparison views the service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Percentage difference per crime type against the city average.
    CompareLocation,
    /// Location sums and city averages side by side.
    CompareToCityAverage,
}

impl Endpoint {
    /// Path below the service root for `coords`.
    pub fn path(&self, coords: Coordinates) -> String {
        match self {
            Endpoint::CompareLocation => format!(
                "/api/v1.0/crimes/compare_location/{}/{}",
                coords.longitude, coords.latitude
            ),
            Endpoint::CompareToCityAverage => format!(
                "/api/v1.0/crimes/compare/{}/{}/to/city-average/",
                coords.longitude, coords.latitude
            ),
        }
    }
}

/// Abstraction over the statistics service.
#[async_trait::async_trait]
pub trait CrimeStatsApi: Send + Sync {
    /// Fetches and validates the comparison for `coords`.
    async fn compare(
        &self,
        endpoint: Endpoint,
        coords: Coordinates,
    ) -> Result<ComparisonResponse, FetchError>;
}
