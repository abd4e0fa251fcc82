//! Error types for courier-client.

use thiserror::Error;

/// Errors that can occur when talking to the Courier API.
#[derive(Debug, Error)]
pub enum CourierError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the API.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Success response without a request id.
    #[error("No request id in response")]
    MissingRequestId,
}
