//! Live event stream for connected subscribers.
//!
//! This crate fans newly stored events out to whatever real-time
//! transport the process fronts with. The ingestion side only sees the
//! [`LiveBroadcast`] trait; the transport side attaches through
//! [`ChannelBroadcaster::attach`] and receives a backlog of recent events
//! followed by live [`StreamEvent`]s.
//!
//! # Example
//!
//! ```no_run
//! use broadcaster::{ChannelBroadcaster, LiveBroadcast};
//! use database::Database;
//!
//! # async fn example(event: database::Event) -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:alerts.db?mode=rwc").await?;
//! let broadcaster = ChannelBroadcaster::new(db, chrono::Duration::days(7));
//!
//! // Transport side: replay the backlog, then stream live events.
//! let mut subscription = broadcaster.attach().await?;
//! println!("{:?}", subscription.opening_message());
//!
//! // Ingestion side: push a newly stored event.
//! broadcaster.publish(&event).await;
//! println!("{:?}", subscription.receiver.recv().await?);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use database::{event, Database, DatabaseError, Event};

/// Buffered messages per subscriber before a slow one starts lagging.
const CHANNEL_CAPACITY: usize = 256;

/// Errors that can occur during broadcast operations.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// Backlog lookup failed.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// One message on the live stream, named as the transport emits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum StreamEvent {
    /// Backlog replay sent to a newly attached subscriber.
    AllEntries(Vec<Event>),
    /// A newly stored event.
    NewEntry(Event),
    /// An event removed by admin tooling.
    DeleteEntry(i64),
}

/// Trait for pushing newly stored events to live subscribers.
///
/// Best-effort by contract: having no subscribers is not an error, and
/// implementations swallow transport hiccups rather than surface them to
/// the ingestion cycle.
#[async_trait]
pub trait LiveBroadcast: Send + Sync {
    /// Push one newly stored event.
    async fn publish(&self, event: &Event);
}

/// A live subscriber's view of the stream.
#[derive(Debug)]
pub struct Subscription {
    /// Events stored within the backlog window, newest first.
    pub backlog: Vec<Event>,
    /// Live stream of everything published after the attach.
    pub receiver: broadcast::Receiver<StreamEvent>,
}

impl Subscription {
    /// Opening message for this subscriber: the backlog replay.
    pub fn opening_message(&self) -> StreamEvent {
        StreamEvent::AllEntries(self.backlog.clone())
    }
}

/// Broadcaster backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct ChannelBroadcaster {
    db: Database,
    tx: broadcast::Sender<StreamEvent>,
    backlog_window: Duration,
}

impl ChannelBroadcaster {
    /// Create a broadcaster that replays `backlog_window` worth of events
    /// to each new subscriber.
    pub fn new(db: Database, backlog_window: Duration) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            db,
            tx,
            backlog_window,
        }
    }

    /// Attach a new subscriber.
    ///
    /// The receiver is subscribed before the backlog is read, so an event
    /// stored concurrently shows up in one or the other, never neither.
    pub async fn attach(&self) -> Result<Subscription, BroadcastError> {
        let receiver = self.tx.subscribe();
        let since = Utc::now() - self.backlog_window;
        let backlog = event::list_recent(self.db.pool(), since).await?;

        debug!("Subscriber attached with {} backlog events", backlog.len());

        Ok(Subscription { backlog, receiver })
    }

    /// Announce an event deleted by admin tooling.
    pub fn publish_delete(&self, event_id: i64) {
        match self.tx.send(StreamEvent::DeleteEntry(event_id)) {
            Ok(count) => debug!("Delete of event {} sent to {} subscribers", event_id, count),
            Err(_) => debug!("Delete of event {} had no subscribers", event_id),
        }
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl LiveBroadcast for ChannelBroadcaster {
    async fn publish(&self, event: &Event) {
        match self.tx.send(StreamEvent::NewEntry(event.clone())) {
            Ok(count) => debug!("New entry {} sent to {} subscribers", event.id, count),
            Err(_) => debug!("New entry {} had no subscribers", event.id),
        }
    }
}
