use serde::Deserialize;

/// Successful response from the LWA token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Token lifetime in seconds (LWA issues 3600 s tokens).
    pub expires_in: i64,
}
