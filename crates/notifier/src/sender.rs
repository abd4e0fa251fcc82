//! Alert sender trait and implementations.

use async_trait::async_trait;
use database::Event;

use crate::error::NotifierError;

/// Delivery channel for one notification job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
}

/// One notification to one recipient over one channel.
///
/// Ephemeral: produced per matching user per new event and handed straight
/// to a sender. There is no retry queue behind this.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationJob {
    pub channel: Channel,
    pub recipient: String,
    pub event: Event,
    /// Distance from the event to the user's subscribed location.
    pub distance_km: f64,
}

/// Trait for delivering notification jobs.
///
/// Abstracted to support different providers (Courier, tests, etc.)
#[async_trait]
pub trait AlertSender: Send + Sync {
    /// Deliver a single job.
    async fn send(&self, job: &NotificationJob) -> Result<(), NotifierError>;
}

/// A no-op sender for testing that discards all jobs.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl AlertSender for NoOpSender {
    async fn send(&self, _job: &NotificationJob) -> Result<(), NotifierError> {
        Ok(())
    }
}

/// A logging sender that records jobs instead of delivering them.
///
/// Used when the process runs without provider credentials.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl AlertSender for LoggingSender {
    async fn send(&self, job: &NotificationJob) -> Result<(), NotifierError> {
        tracing::info!(
            "[{:?}] Would notify {} about {} ({:.1} km away)",
            job.channel,
            job.recipient,
            job.event.source_link,
            job.distance_km
        );
        Ok(())
    }
}
