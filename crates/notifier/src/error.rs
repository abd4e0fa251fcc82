//! Error types for notifier.

use thiserror::Error;

/// Errors that can occur while sending a notification job.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Courier API error.
    #[error("Courier error: {0}")]
    Courier(#[from] courier_client::CourierError),

    /// Message sending failed.
    #[error("Send failed: {0}")]
    SendFailed(String),
}
