//! Disaster alert ingestion daemon.
//!
//! Polls the GDACS feed, stores new events, streams them to live
//! subscribers, and notifies users in range by email and SMS.

mod config;
mod scheduler;

use std::sync::Arc;
use std::time::Duration;

use broadcaster::ChannelBroadcaster;
use courier_client::{CourierClient, CourierConfig};
use database::Database;
use feed::HttpFeedSource;
use notifier::{AlertSender, CourierSender, LoggingSender};
use tracing::{info, warn};

use crate::config::Config;
use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(feed = %config.feed_url, "Starting alert daemon");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Notification sender: Courier when configured, log-only otherwise
    let sender: Arc<dyn AlertSender> = match &config.courier {
        Some(settings) => {
            let mut courier_config = CourierConfig::new(
                &settings.api_key,
                &settings.email_template,
                &settings.sms_template,
            );
            if let Some(base_url) = &settings.base_url {
                courier_config = courier_config.with_base_url(base_url);
            }
            Arc::new(CourierSender::new(CourierClient::new(courier_config)?))
        }
        None => {
            warn!("COURIER_API_KEY not set; notifications will only be logged");
            Arc::new(LoggingSender)
        }
    };

    // Live stream for connected subscribers
    let broadcaster = Arc::new(ChannelBroadcaster::new(
        db.clone(),
        chrono::Duration::days(config.backlog_days),
    ));

    let source = Arc::new(HttpFeedSource::with_timeout(
        &config.feed_url,
        Duration::from_secs(config.fetch_timeout_secs),
    )?);
    let scheduler = Scheduler::new(
        db.clone(),
        source,
        broadcaster,
        sender,
        Duration::from_secs(config.poll_interval_secs),
    );

    // Run until Ctrl-C; an in-flight cycle finishes before we close up.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let engine = tokio::spawn(scheduler.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    let _ = shutdown_tx.send(true);
    let _ = engine.await;

    db.close().await;
    Ok(())
}
