//! Geofenced alert matching and notification fan-out.
//!
//! Given a newly stored event and a snapshot of subscribed users, this
//! crate decides who is in range and delivers one email (and optionally
//! one SMS) per matched user through an [`AlertSender`]. Jobs run
//! concurrently; a failing job is logged and counted without disturbing
//! the rest.
//!
//! # Example
//!
//! ```no_run
//! use notifier::{notify_matching, CourierSender, NotifierError};
//! use courier_client::{CourierClient, CourierConfig};
//!
//! # async fn example(event: database::Event, users: Vec<database::User>) -> Result<(), NotifierError> {
//! let config = CourierConfig::new("pk_test_123", "email-tmpl", "sms-tmpl");
//! let sender = CourierSender::new(CourierClient::new(config)?);
//!
//! let report = notify_matching(&event, &users, &sender).await;
//! println!("{} sent, {} failed", report.sent, report.failed);
//! # Ok(())
//! # }
//! ```

pub mod courier;
pub mod dispatch;
pub mod error;
pub mod matching;
pub mod sender;

pub use courier::CourierSender;
pub use dispatch::{jobs_for, notify_matching, DispatchReport};
pub use error::NotifierError;
pub use matching::{distance_to_user, is_in_range};
pub use sender::{AlertSender, Channel, LoggingSender, NoOpSender, NotificationJob};
