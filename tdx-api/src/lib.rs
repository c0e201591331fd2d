pub mod auth;
mod error;
pub mod fids;

pub use crate::auth::{AccessToken, TokenClient};
pub use crate::error::TdxApiError;
pub use crate::fids::{ArrivalFlight, DepartureFlight, Direction, FidsFlight, FlightQuery};

use std::time::Duration;

const FIDS_AIRPORT_URL: &str = "https://tdx.transportdata.tw/api/basic/v2/Air/FIDS/Airport";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the TDX FIDS REST API.
///
/// Callers supply the bearer token on each request; token acquisition and
/// caching live in [`TokenClient`] and whatever lifecycle the caller wraps
/// around it.
pub struct Client {
    http_client: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new() -> Self {
        Self::with_base_url(FIDS_AIRPORT_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url,
        }
    }

    /// Fetch the FIDS board for one airport and direction.
    ///
    /// When `bearer` is `None` the request is sent unauthenticated and the
    /// upstream rejection surfaces as [`TdxApiError::Status`].
    pub async fn fids_airport(
        &self,
        bearer: Option<&str>,
        query: &FlightQuery,
    ) -> Result<Vec<FidsFlight>, TdxApiError> {
        let url = format!("{}/{}/{}", self.base_url, query.direction, query.airport);

        let mut request = self
            .http_client
            .get(&url)
            .query(&fids::FidsQueryParams::from(query));

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TdxApiError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
