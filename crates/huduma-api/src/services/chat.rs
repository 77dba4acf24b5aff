//! Chat echo. No model, no history.

use huduma_core::AppError;
use serde_json::Value;

pub const MESSAGE_REQUIRED: &str = "Message is required and must be a string";

const REPLY_PREFIX: &str = "You said: ";

pub struct ChatEchoService;

impl ChatEchoService {
    /// `"You said: " + message`. Empty messages are rejected; whitespace is echoed as-is.
    pub fn respond(message: &str) -> Result<String, AppError> {
        if message.is_empty() {
            return Err(AppError::InvalidInput(MESSAGE_REQUIRED.to_string()));
        }
        Ok(format!("{}{}", REPLY_PREFIX, message))
    }

    /// Like [`respond`](Self::respond) for an untyped JSON field: anything other than a
    /// string is rejected.
    pub fn respond_value(message: Option<&Value>) -> Result<String, AppError> {
        match message {
            Some(Value::String(text)) => Self::respond(text),
            _ => Err(AppError::InvalidInput(MESSAGE_REQUIRED.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn echoes_message() {
        assert_eq!(ChatEchoService::respond("hello").unwrap(), "You said: hello");
        assert_eq!(ChatEchoService::respond("  ").unwrap(), "You said:   ");
    }

    #[test]
    fn rejects_empty_and_non_string() {
        for value in [
            None,
            Some(json!("")),
            Some(json!(42)),
            Some(json!(null)),
            Some(json!(["hi"])),
        ] {
            let err = ChatEchoService::respond_value(value.as_ref()).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(ref m) if m == MESSAGE_REQUIRED));
        }
    }
}
