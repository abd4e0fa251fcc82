//! Courier API HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::CourierConfig;
use crate::error::CourierError;
use crate::types::{Recipient, SendResponse};

/// Body of a `/send` call.
#[derive(Debug, Serialize)]
struct SendRequest<'a, T: Serialize> {
    message: SendMessage<'a, T>,
}

/// The message envelope Courier expects.
#[derive(Debug, Serialize)]
struct SendMessage<'a, T: Serialize> {
    to: Recipient,
    template: &'a str,
    data: &'a T,
}

/// Client for sending notifications through Courier.
#[derive(Debug, Clone)]
pub struct CourierClient {
    http: Client,
    config: CourierConfig,
}

impl CourierClient {
    /// Create a client with the given configuration.
    pub fn new(config: CourierConfig) -> Result<Self, CourierError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(CourierError::Http)?;

        Ok(Self { http, config })
    }

    /// Send an email notification using the configured email template.
    ///
    /// Returns the request id Courier assigned to the accepted send.
    pub async fn send_email<T: Serialize>(
        &self,
        email: &str,
        data: &T,
    ) -> Result<String, CourierError> {
        let to = Recipient::Email {
            email: email.to_string(),
        };
        self.send(to, &self.config.email_template, data).await
    }

    /// Send an SMS notification using the configured SMS template.
    pub async fn send_sms<T: Serialize>(
        &self,
        phone_number: &str,
        data: &T,
    ) -> Result<String, CourierError> {
        let to = Recipient::Sms {
            phone_number: phone_number.to_string(),
        };
        self.send(to, &self.config.sms_template, data).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &CourierConfig {
        &self.config
    }

    /// Make a `/send` call.
    async fn send<T: Serialize>(
        &self,
        to: Recipient,
        template: &str,
        data: &T,
    ) -> Result<String, CourierError> {
        let url = self.config.send_url();
        let request = SendRequest {
            message: SendMessage { to, template, data },
        };

        debug!("Send: {} (template={})", url, template);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(CourierError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CourierError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let sent: SendResponse = response.json().await.map_err(CourierError::Http)?;
        sent.request_id.ok_or(CourierError::MissingRequestId)
    }
}
