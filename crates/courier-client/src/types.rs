//! Types for the Courier `/send` API.

use serde::{Deserialize, Serialize};

/// Recipient address for a send request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Recipient {
    /// Deliver to an email address.
    Email { email: String },
    /// Deliver to a phone number.
    Sms { phone_number: String },
}

/// Response from a successful `/send` call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    /// Id assigned by Courier to the accepted send.
    #[serde(default)]
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_serializes_to_bare_address_objects() {
        let email = Recipient::Email {
            email: "kim@example.com".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&email).unwrap(),
            serde_json::json!({"email": "kim@example.com"})
        );

        let sms = Recipient::Sms {
            phone_number: "+61400000000".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&sms).unwrap(),
            serde_json::json!({"phone_number": "+61400000000"})
        );
    }

    #[test]
    fn send_response_reads_camel_case_request_id() {
        let parsed: SendResponse =
            serde_json::from_str(r#"{"requestId": "1-abc"}"#).unwrap();
        assert_eq!(parsed.request_id.as_deref(), Some("1-abc"));

        let empty: SendResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.request_id.is_none());
    }
}
