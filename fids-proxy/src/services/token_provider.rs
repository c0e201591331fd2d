use tdx_api::{AccessToken, TokenClient};
use tokio::sync::Mutex;

/// Process-wide bearer token cache.
///
/// The cached token sits behind a `Mutex` that stays held for the duration of
/// a refresh, so concurrent requests arriving after expiry wait for a single
/// exchange instead of each firing their own.
pub struct TokenProvider {
    token_client: TokenClient,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(token_client: TokenClient) -> Self {
        Self {
            token_client,
            cached: Mutex::new(None),
        }
    }

    /// Return a bearer secret to use for the next upstream call.
    ///
    /// Refreshes when no token is held or the held one has expired. A failed
    /// refresh is logged and the previously held secret is returned as-is,
    /// even if stale; the upstream call decides whether it still works.
    pub async fn bearer(&self) -> Option<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Some(token.secret.clone());
            }
        }

        match self.token_client.request_token().await {
            Ok(token) => {
                tracing::info!("Access token refreshed, expires_at: {}", token.expires_at);
                let secret = token.secret.clone();
                *cached = Some(token);
                Some(secret)
            }
            Err(e) => {
                tracing::warn!("Failed to refresh access token: {}", e);
                cached.as_ref().map(|token| token.secret.clone())
            }
        }
    }

    /// Fetch a token at startup so the first request doesn't pay for the
    /// exchange. Failure is non-fatal.
    pub async fn warm_up(&self) {
        if self.bearer().await.is_none() {
            tracing::warn!("Starting without an access token; will retry on first request");
        }
    }
}
