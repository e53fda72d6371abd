//! HTTP client for the override store and the weekly configuration source.
//!
//! Wraps `reqwest` with storefront-specific error handling and typed
//! deserialization. Override-state reads are shape-tolerant; weekly-config
//! reads are strict because the storefront cannot render without them.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::warn;

use crate::error::DataError;
use crate::overrides::OverrideState;
use picks_core::WeeklyConfig;

/// Credentials attached to override-store writes.
#[derive(Debug, Clone)]
pub enum AdminCredentials {
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl AdminCredentials {
    /// `Authorization` header value for this credential.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                let encoded = BASE64.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
            Self::Bearer { token } => format!("Bearer {token}"),
        }
    }
}

/// Response envelope from a successful `PUT /api/state`.
#[derive(Debug, Clone, Deserialize)]
pub struct PutStateResponse {
    pub ok: bool,
    /// `"saved"` when file-backed, `"saved_in_memory_only"` otherwise.
    pub mode: String,
    pub state: OverrideState,
}

/// Client for the override store's `/api/state` endpoint.
///
/// Use [`StateClient::new`] with the deployed store URL, or point it at a
/// mock server in tests. Reads need no credentials; writes require
/// [`StateClient::with_credentials`].
pub struct StateClient {
    client: Client,
    base_url: Url,
    credentials: Option<AdminCredentials>,
}

impl StateClient {
    /// Creates a read-only client for the override store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DataError::Validation`] if `base_url` is
    /// not a valid URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("picks/0.1 (storefront-data)")
            .build()?;

        // Normalise: exactly one trailing slash so joined paths extend the
        // base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| DataError::Validation(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            credentials: None,
        })
    }

    /// Attaches admin credentials for writes.
    #[must_use]
    pub fn with_credentials(mut self, credentials: AdminCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn state_url(&self) -> Result<Url, DataError> {
        self.base_url
            .join("api/state")
            .map_err(|e| DataError::Validation(format!("invalid state URL: {e}")))
    }

    /// Fetches the current override document.
    ///
    /// Parsing is lossy: malformed sub-documents fall back to defaults and
    /// are logged, so a corrupt stored value degrades to base data instead
    /// of failing the load.
    ///
    /// # Errors
    ///
    /// - [`DataError::Http`] on network failure or non-2xx status.
    /// - [`DataError::Deserialize`] if the body is not JSON at all.
    pub async fn fetch_state(&self) -> Result<OverrideState, DataError> {
        let url = self.state_url()?;
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| DataError::Deserialize {
                context: "GET /api/state".to_string(),
                source: e,
            })?;

        let (state, discarded) = OverrideState::from_value_lossy(&value);
        if !discarded.is_empty() {
            warn!(fields = ?discarded, "discarded malformed override fields");
        }
        Ok(state)
    }

    /// Fetches the weekly configuration from `url` (typically a static JSON
    /// file served alongside the storefront).
    ///
    /// # Errors
    ///
    /// - [`DataError::WeeklyConfigStatus`] on any non-success HTTP status.
    /// - [`DataError::Http`] on network failure.
    /// - [`DataError::Deserialize`] if the body does not match the expected
    ///   shape.
    pub async fn fetch_weekly_config(&self, url: &str) -> Result<WeeklyConfig, DataError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DataError::WeeklyConfigStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let mut config: WeeklyConfig =
            serde_json::from_str(&body).map_err(|e| DataError::Deserialize {
                context: format!("weekly config ({url})"),
                source: e,
            })?;
        config.normalize();
        Ok(config)
    }

    /// Replaces the stored override document wholesale.
    ///
    /// # Errors
    ///
    /// - [`DataError::StoreRejected`] on any non-success status (401/403 on
    ///   auth failure, 400 on a body the store cannot parse). The response
    ///   body text is carried as the detail.
    /// - [`DataError::Http`] on network failure.
    /// - [`DataError::Deserialize`] if the success body does not match
    ///   [`PutStateResponse`].
    pub async fn put_state(&self, state: &OverrideState) -> Result<PutStateResponse, DataError> {
        let url = self.state_url()?;
        let mut request = self.client.put(url).json(state);
        if let Some(credentials) = &self.credentials {
            request = request.header(reqwest::header::AUTHORIZATION, credentials.header_value());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DataError::StoreRejected {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DataError::Deserialize {
            context: "PUT /api/state".to_string(),
            source: e,
        })
    }
}

impl std::fmt::Debug for StateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}
