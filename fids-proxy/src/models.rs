use serde::{Deserialize, Serialize};

// GET /api/flights
//
// Parameter names follow the upstream FIDS convention so existing callers of
// the original proxy keep working unchanged.
#[derive(Debug, Deserialize)]
pub struct FlightsParams {
    #[serde(rename = "FlightDate")]
    pub flight_date: Option<String>,

    #[serde(rename = "Ad")]
    pub ad: Option<String>,

    #[serde(rename = "Airport")]
    pub airport: Option<String>,
}

// Health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
