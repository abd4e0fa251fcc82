//! Configuration types for courier-client.

/// Configuration for the Courier API.
#[derive(Debug, Clone)]
pub struct CourierConfig {
    /// Base URL of the Courier API (e.g., "https://api.courier.com").
    pub base_url: String,
    /// Bearer token for the Authorization header.
    pub api_key: String,
    /// Template id used for email notifications.
    pub email_template: String,
    /// Template id used for SMS notifications.
    pub sms_template: String,
}

impl CourierConfig {
    /// Create a new configuration against the production API.
    pub fn new(
        api_key: impl Into<String>,
        email_template: impl Into<String>,
        sms_template: impl Into<String>,
    ) -> Self {
        Self {
            base_url: "https://api.courier.com".to_string(),
            api_key: api_key.into(),
            email_template: email_template.into(),
            sms_template: sms_template.into(),
        }
    }

    /// Override the base URL (mock servers, regional endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get the send endpoint URL.
    pub fn send_url(&self) -> String {
        format!("{}/send", self.base_url)
    }
}
