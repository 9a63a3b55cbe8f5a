//! The response envelope every endpoint returns.

use serde::{Deserialize, Serialize};

/// JSON envelope: `{success, response, message}`.
///
/// `response` is `null` on failure; the HTTP status mirrors the semantic
/// outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub response: Option<T>,
    pub message: String,
}

impl<T> Envelope<T> {
    /// Builds a success envelope with a payload.
    pub fn ok(response: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            response: Some(response),
            message: message.into(),
        }
    }

    /// Builds a failure envelope. The payload is always null.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_has_null_response() {
        let envelope: Envelope<String> = Envelope::error("Not found");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], false);
        assert!(json["response"].is_null());
        assert_eq!(json["message"], "Not found");
    }
}
