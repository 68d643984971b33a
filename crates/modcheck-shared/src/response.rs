//! Standardized API error/status messages.
//!
//! Every terminal admission response and every caller-input error uses one of
//! the fixed status/message pairs below. Internal error detail never reaches
//! the wire - only these constants do.

use serde::{Deserialize, Serialize};

/// A simple struct to respond some JSON: a machine-readable status tag plus a
/// human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// The status key.
    pub status: String,
    /// A human-readable message.
    pub message: String,
}

impl ApiMessage {
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }

    /// The client should provide authentication details.
    pub fn unauthorized() -> Self {
        Self::new(
            "authorization_required",
            "Please provide a HTTP header called Api-Key.",
        )
    }

    /// We cannot parse the given JSON payload.
    pub fn invalid_json() -> Self {
        Self::new("invalid_json", "Cannot decode the given JSON payload.")
    }

    /// The payload decoded but the account fields have unexpected lengths.
    pub fn invalid_bank_account() -> Self {
        Self::new(
            "invalid_bank_account",
            "Expected a 6 digits sort code and an account number between 6 and 10 digits.",
        )
    }

    /// The caller is over the rate limit.
    pub fn rate_exceeded() -> Self {
        Self::new("rate_exceeded", "API rate exceeded. Too many requests.")
    }

    /// We got an error contacting the counter store.
    pub fn server_error() -> Self {
        Self::new("server_error", "Trouble contacting Redis. Aborting.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_status_and_message_keys() {
        let json = serde_json::to_value(ApiMessage::rate_exceeded()).unwrap();
        assert_eq!(json["status"], "rate_exceeded");
        assert_eq!(json["message"], "API rate exceeded. Too many requests.");
    }

    #[test]
    fn test_unauthorized_message_is_stable() {
        let msg = ApiMessage::unauthorized();
        assert_eq!(msg.status, "authorization_required");
        assert_eq!(msg.message, "Please provide a HTTP header called Api-Key.");
    }
}
