use chrono::{DateTime, Duration, Utc};
use oauth2::{
    basic::BasicClient, ClientId, ClientSecret, HttpRequest, HttpResponse, TokenResponse, TokenUrl,
};

use crate::error::TdxApiError;

const TDX_TOKEN_URL: &str =
    "https://tdx.transportdata.tw/auth/realms/TDXConnect/protocol/openid-connect/token";

// Refresh slightly early so an in-flight FIDS call never races the expiry
const EXPIRY_BUFFER: Duration = Duration::minutes(5);

// Simple async HTTP client for OAuth2
async fn http_client(request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
    let client = reqwest::Client::new();
    let mut builder = client
        .request(request.method().clone(), request.uri().to_string())
        .body(request.body().clone());

    for (name, value) in request.headers() {
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?.to_vec();

    let mut http_response = HttpResponse::new(body);
    *http_response.status_mut() = status;

    Ok(http_response)
}

/// A bearer token and the instant it stops being usable.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= (Utc::now() + EXPIRY_BUFFER)
    }
}

/// Performs the OAuth2 client-credentials exchange against the TDX identity
/// endpoint.
pub struct TokenClient {
    client_id: String,
    client_secret: String,
    token_url: TokenUrl,
}

impl TokenClient {
    pub fn new(client_id: String, client_secret: String) -> Result<Self, TdxApiError> {
        Self::with_token_url(client_id, client_secret, TDX_TOKEN_URL.to_string())
    }

    pub fn with_token_url(
        client_id: String,
        client_secret: String,
        token_url: String,
    ) -> Result<Self, TdxApiError> {
        let token_url = TokenUrl::new(token_url)
            .map_err(|e| TdxApiError::Configuration(format!("Invalid token URL: {}", e)))?;

        Ok(Self {
            client_id,
            client_secret,
            token_url,
        })
    }

    /// Request a fresh access token.
    ///
    /// Expiration is computed as now + the provider-supplied lifetime.
    pub async fn request_token(&self) -> Result<AccessToken, TdxApiError> {
        let token_result = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_token_uri(self.token_url.clone())
            .exchange_client_credentials()
            .request_async(&http_client)
            .await?;

        let secret = token_result.access_token().secret().to_string();

        let expires_in = token_result
            .expires_in()
            .ok_or_else(|| TdxApiError::Token("No expiration time in response".to_string()))?;

        let expires_at = Utc::now() + expires_in;

        tracing::debug!("Obtained access token, expires_at: {}", expires_at);

        Ok(AccessToken { secret, expires_at })
    }
}
