//! Courier-backed alert sender.

use async_trait::async_trait;
use courier_client::CourierClient;
use serde::Serialize;
use tracing::info;

use crate::error::NotifierError;
use crate::sender::{AlertSender, Channel, NotificationJob};

/// Template data for the email notification.
#[derive(Debug, Serialize)]
struct EmailData<'a> {
    level: &'a str,
    distance: f64,
    id: i64,
    #[serde(rename = "type")]
    alert_type: &'a str,
}

/// Template data for the SMS notification.
#[derive(Debug, Serialize)]
struct SmsData<'a> {
    level: &'a str,
    id: i64,
    #[serde(rename = "type")]
    alert_type: &'a str,
}

/// Sender that delivers jobs through the Courier API.
#[derive(Debug, Clone)]
pub struct CourierSender {
    client: CourierClient,
}

impl CourierSender {
    /// Wrap a configured Courier client.
    pub fn new(client: CourierClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AlertSender for CourierSender {
    async fn send(&self, job: &NotificationJob) -> Result<(), NotifierError> {
        match job.channel {
            Channel::Email => {
                let data = EmailData {
                    level: &job.event.alert_level,
                    distance: job.distance_km,
                    id: job.event.id,
                    alert_type: job.event.type_label(),
                };
                let request_id = self.client.send_email(&job.recipient, &data).await?;
                info!("Email sent with request ID: {}", request_id);
            }
            Channel::Sms => {
                let data = SmsData {
                    level: &job.event.alert_level,
                    id: job.event.id,
                    alert_type: job.event.type_label(),
                };
                let request_id = self.client.send_sms(&job.recipient, &data).await?;
                info!("SMS sent with request ID: {}", request_id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_data_uses_the_wire_field_names() {
        let email = EmailData {
            level: "Red",
            distance: 12.25,
            id: 7,
            alert_type: "Flood",
        };
        assert_eq!(
            serde_json::to_value(&email).unwrap(),
            serde_json::json!({
                "level": "Red",
                "distance": 12.25,
                "id": 7,
                "type": "Flood",
            })
        );

        let sms = SmsData {
            level: "Red",
            id: 7,
            alert_type: "Flood",
        };
        assert_eq!(
            serde_json::to_value(&sms).unwrap(),
            serde_json::json!({
                "level": "Red",
                "id": 7,
                "type": "Flood",
            })
        );
    }
}
