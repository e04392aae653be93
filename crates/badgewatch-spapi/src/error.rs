use thiserror::Error;

/// Errors returned by the SP-API clients.
#[derive(Debug, Error)]
pub enum SpapiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The LWA token endpoint rejected the credential exchange.
    #[error("LWA token exchange rejected (HTTP {status}): {body}")]
    TokenRejected { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A client was constructed with an unparseable base URL.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
