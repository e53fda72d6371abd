use thiserror::Error;

/// Errors surfaced by the data layer and admin flows.
#[derive(Debug, Error)]
pub enum DataError {
    /// An accessor was called before `load()` resolved.
    #[error("data layer not loaded; call load() first")]
    NotLoaded,

    /// The weekly configuration source returned a non-success status.
    /// This is fatal to `load()`; there is no storefront without it.
    #[error("failed to load weekly config: HTTP {status}")]
    WeeklyConfigStatus { status: u16 },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// An admin save was rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// The override store refused a write (auth failure, bad request, ...).
    /// Local editor state is left untouched so the operator can retry.
    #[error("override store rejected write (HTTP {status}): {detail}")]
    StoreRejected { status: u16, detail: String },
}

impl From<picks_core::ModelError> for DataError {
    fn from(err: picks_core::ModelError) -> Self {
        DataError::Validation(err.to_string())
    }
}
