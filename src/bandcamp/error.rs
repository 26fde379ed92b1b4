//! Error types for Bandcamp API calls.

/// Result type used throughout the `bandcamp` module.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or IO failure reaching the server
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response that is not JSON, usually an HTML error page
    #[error("bad response: {}", .0.canonical_reason().unwrap_or("Unknown"))]
    Status(reqwest::StatusCode),

    /// `{"error": true, "error_message": ...}` envelope from the API
    #[error("{0}")]
    Api(String),

    /// Well-formed response missing a required field or holding a malformed value
    #[error("decode error: {0}")]
    Decode(String),

    /// A response fragment has no entry for an item's key
    #[error("item {item} missing {fragment}")]
    Correlation { item: String, fragment: &'static str },

    /// Target currency absent from the rate table
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// Unusable site URL given to the client
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn decode(message: impl std::fmt::Display) -> Self {
        Self::Decode(message.to_string())
    }

    pub(crate) fn missing(item: impl std::fmt::Display, fragment: &'static str) -> Self {
        Self::Correlation {
            item: item.to_string(),
            fragment,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err)
    }
}
