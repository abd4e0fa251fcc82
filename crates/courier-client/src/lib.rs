//! Courier notification API client library.
//!
//! This crate provides a Rust client for the Courier `/send` endpoint. It
//! supports:
//!
//! - Sending template-based email notifications
//! - Sending template-based SMS notifications
//! - Bearer-token authentication
//!
//! # Example
//!
//! ```no_run
//! use courier_client::{CourierClient, CourierConfig};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct AlertData {
//!     level: String,
//!     id: i64,
//! }
//!
//! # async fn example() -> Result<(), courier_client::CourierError> {
//! let config = CourierConfig::new("pk_test_123", "email-tmpl", "sms-tmpl");
//! let client = CourierClient::new(config)?;
//!
//! let data = AlertData { level: "Red".to_string(), id: 42 };
//! let request_id = client.send_email("kim@example.com", &data).await?;
//! println!("Accepted as {request_id}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::CourierClient;
pub use config::CourierConfig;
pub use error::CourierError;
pub use types::{Recipient, SendResponse};
