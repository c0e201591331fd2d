use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tdx_api::{ArrivalFlight, DepartureFlight, Direction, FlightQuery};
use tracing::Instrument;

use crate::{error::ServerError, models::FlightsParams, AppState};

pub async fn list_flights(
    State(state): State<AppState>,
    Query(params): Query<FlightsParams>,
) -> Result<Response, ServerError> {
    let (date, ad, airport) = match (params.flight_date, params.ad, params.airport) {
        (Some(date), Some(ad), Some(airport)) => (date, ad, airport),
        _ => {
            return Err(ServerError::BadRequest(
                "Missing required query parameters".to_string(),
            ))
        }
    };

    let direction: Direction = ad
        .parse()
        .map_err(|e| ServerError::BadRequest(format!("{}", e)))?;

    // The span is attached with `instrument` rather than an enter guard so
    // it stays scoped to this request across await points.
    let span = tracing::info_span!(
        "list_flights",
        direction = %direction,
        airport = %airport,
        date = %date
    );

    async move {
        // Freshness check first: refresh if needed, then call with whatever
        // token is currently held.
        let bearer = state.token_provider.bearer().await;

        let query = FlightQuery::new(date, direction, airport);
        let flights = state
            .tdx_client
            .fids_airport(bearer.as_deref(), &query)
            .await?;

        tracing::info!(count = flights.len(), "Fetched flight data");

        let response = match direction {
            Direction::Arrive => {
                let board: Vec<ArrivalFlight> = flights.iter().map(ArrivalFlight::from).collect();
                Json(board).into_response()
            }
            Direction::Depart => {
                let board: Vec<DepartureFlight> =
                    flights.iter().map(DepartureFlight::from).collect();
                Json(board).into_response()
            }
        };

        Ok(response)
    }
    .instrument(span)
    .await
}
