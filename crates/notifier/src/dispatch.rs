//! Notification fan-out with per-job failure isolation.

use database::{Event, User};
use futures::future;
use tracing::{info, warn};

use crate::matching;
use crate::sender::{AlertSender, Channel, NotificationJob};

/// Outcome of one event's fan-out, produced after every job has settled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Users whose geofence matched the event.
    pub matched: usize,
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Plan the jobs for one event against a snapshot of users.
///
/// Every matched user gets one email job, addressed per
/// [`User::notification_email`]; users with an SMS address get an SMS job
/// as well.
pub fn jobs_for(event: &Event, users: &[User]) -> Vec<NotificationJob> {
    let mut jobs = Vec::new();

    for user in users {
        if !matching::is_in_range(event, user) {
            continue;
        }
        let distance_km = match matching::distance_to_user(event, user) {
            Some(distance) => distance,
            None => continue,
        };

        jobs.push(NotificationJob {
            channel: Channel::Email,
            recipient: user.notification_email().to_string(),
            event: event.clone(),
            distance_km,
        });

        if let Some(sms) = &user.alert_sms {
            jobs.push(NotificationJob {
                channel: Channel::Sms,
                recipient: sms.clone(),
                event: event.clone(),
                distance_km,
            });
        }
    }

    jobs
}

/// Fan out one event to every user in range.
///
/// All jobs run concurrently and the report is returned only once each
/// has settled. A failed job is logged and counted, never retried, and
/// never stops the other jobs.
pub async fn notify_matching(
    event: &Event,
    users: &[User],
    sender: &dyn AlertSender,
) -> DispatchReport {
    let jobs = jobs_for(event, users);
    // One email job per matched user, so this counts users.
    let matched = jobs.iter().filter(|j| j.channel == Channel::Email).count();

    let results = future::join_all(jobs.iter().map(|job| sender.send(job))).await;

    let mut sent = 0;
    let mut failed = 0;
    let mut errors = Vec::new();

    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(()) => sent += 1,
            Err(err) => {
                failed += 1;
                errors.push(format!("{}: {}", job.recipient, err));
                warn!(
                    recipient = %job.recipient,
                    channel = ?job.channel,
                    link = %job.event.source_link,
                    error = %err,
                    "Notification failed"
                );
            }
        }
    }

    if matched > 0 {
        info!(matched, sent, failed, "Notification fan-out complete");
    }

    DispatchReport {
        matched,
        sent,
        failed,
        errors,
    }
}
