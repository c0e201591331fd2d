pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Configuration;
pub use error::ServerError;

use axum::{routing::get, Router};
use services::TokenProvider;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub token_provider: Arc<TokenProvider>,
    pub tdx_client: Arc<tdx_api::Client>,
}

impl AppState {
    pub fn new(configuration: &Configuration) -> Result<Self, ServerError> {
        let token_client = tdx_api::TokenClient::with_token_url(
            configuration.tdx.client_id.clone(),
            configuration.tdx.client_secret.clone(),
            configuration.tdx.token_url.clone(),
        )
        .map_err(|e| ServerError::Configuration(e.to_string()))?;

        Ok(Self {
            token_provider: Arc::new(TokenProvider::new(token_client)),
            tdx_client: Arc::new(tdx_api::Client::with_base_url(
                configuration.tdx.api_url.clone(),
            )),
        })
    }
}

/// Build the proxy router. Kept out of `main` so integration tests can drive
/// the service directly.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/flights", get(handlers::list_flights))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
