//! The recurring ingestion cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use broadcaster::LiveBroadcast;
use database::{event, user, Database, InsertOutcome};
use feed::{FeedError, FeedSource};
use notifier::AlertSender;

/// Counters for one ingestion cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Candidates the feed produced.
    pub candidates: usize,
    /// Candidates stored for the first time.
    pub inserted: usize,
    /// Candidates already in the store.
    pub duplicates: usize,
    /// Notification jobs delivered.
    pub notified: usize,
    /// Notification jobs that failed.
    pub notify_failed: usize,
}

/// Drives fetch, normalize, dedup, broadcast and notify on a fixed interval.
pub struct Scheduler {
    db: Database,
    source: Arc<dyn FeedSource>,
    broadcast: Arc<dyn LiveBroadcast>,
    sender: Arc<dyn AlertSender>,
    poll_interval: Duration,
}

impl Scheduler {
    pub fn new(
        db: Database,
        source: Arc<dyn FeedSource>,
        broadcast: Arc<dyn LiveBroadcast>,
        sender: Arc<dyn AlertSender>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            db,
            source,
            broadcast,
            sender,
            poll_interval,
        }
    }

    /// Main loop. Runs cycles until `shutdown` broadcasts `true`.
    ///
    /// Cycles never overlap: the loop awaits each cycle before taking the
    /// next tick, and ticks that came due during a slow cycle are skipped.
    /// Shutdown is observed between cycles and takes priority over a due
    /// tick, so an in-flight cycle always finishes first.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Ingestion scheduler started ({}s interval)",
            self.poll_interval.as_secs()
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // A shutdown that arrived during a cycle must win over a
                // tick that came due at the same time.
                biased;

                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Ingestion scheduler shutting down");
                        break;
                    }
                }
                _ = interval.tick() => {
                    match self.run_cycle().await {
                        Ok(stats) if stats.inserted > 0 => {
                            info!(
                                candidates = stats.candidates,
                                inserted = stats.inserted,
                                duplicates = stats.duplicates,
                                notified = stats.notified,
                                notify_failed = stats.notify_failed,
                                "Ingestion cycle complete"
                            );
                        }
                        Ok(stats) => {
                            debug!(candidates = stats.candidates, "Ingestion cycle found nothing new");
                        }
                        Err(e) => warn!("Ingestion cycle failed: {}", e),
                    }
                }
            }
        }
    }

    /// One fetch, normalize, dedup, broadcast, notify pass.
    ///
    /// A fetch or parse failure abandons the whole cycle. Everything after
    /// that is per-candidate: a store error or duplicate skips just that
    /// candidate, and only genuinely new events reach the broadcast and
    /// notification steps.
    pub async fn run_cycle(&self) -> Result<CycleStats, FeedError> {
        let raw = self.source.fetch().await?;
        let candidates = feed::parse_feed(&raw)?;

        let mut stats = CycleStats {
            candidates: candidates.len(),
            ..CycleStats::default()
        };

        // Point-in-time subscriber snapshot for this cycle.
        let users = match user::list_users(self.db.pool()).await {
            Ok(users) => users,
            Err(e) => {
                error!("Could not load users, skipping notifications: {}", e);
                Vec::new()
            }
        };

        for candidate in candidates {
            let stored = match event::insert_if_new(self.db.pool(), &candidate).await {
                Ok(InsertOutcome::Inserted(event)) => event,
                Ok(InsertOutcome::AlreadyExists) => {
                    stats.duplicates += 1;
                    continue;
                }
                Err(e) => {
                    error!("Could not store {}: {}", candidate.source_link, e);
                    continue;
                }
            };
            stats.inserted += 1;
            info!("New event stored: {} ({})", stored.source_link, stored.title);

            self.broadcast.publish(&stored).await;

            let report = notifier::notify_matching(&stored, &users, self.sender.as_ref()).await;
            stats.notified += report.sent;
            stats.notify_failed += report.failed;
        }

        Ok(stats)
    }
}
