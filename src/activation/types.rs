//! Request and response types for the verification collaborators. These carry
//! OTP codes, registration payloads and session tokens, so none of them print
//! their secret fields through `Debug`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub verified: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendOtpResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
    #[serde(default)]
    pub user: Value,
}

impl fmt::Debug for RegisterResponse {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RegisterResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Account details collected by the signup form, held until the email is
/// verified. The contents are opaque to this crate and may include a password.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationPayload(Map<String, Value>);

impl RegistrationPayload {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for RegistrationPayload {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(format!(
                "registration payload must be a JSON object, got {}",
                json_kind(&other)
            )),
        }
    }
}

impl fmt::Debug for RegistrationPayload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "RegistrationPayload({} fields)", self.0.len())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Session token issued by registration. Process-wide once stored.
#[derive(Clone, Debug)]
pub struct SessionToken(SecretString);

impl SessionToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Authenticated user as seen by the role gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub identifier: String,
    #[serde(default)]
    pub role: String,
}

impl AuthUser {
    #[must_use]
    pub fn new(identifier: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            role: role.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_requires_object() {
        assert!(RegistrationPayload::try_from(json!({"name": "Ada"})).is_ok());
        let err = RegistrationPayload::try_from(json!(["Ada"])).err();
        assert_eq!(
            err.as_deref(),
            Some("registration payload must be a JSON object, got an array")
        );
    }

    #[test]
    fn payload_debug_hides_values() -> anyhow::Result<()> {
        let payload =
            RegistrationPayload::try_from(json!({"email": "a@b.co", "password": "hunter2"}))
                .map_err(anyhow::Error::msg)?;
        assert_eq!(format!("{payload:?}"), "RegistrationPayload(2 fields)");
        Ok(())
    }

    #[test]
    fn payload_serializes_transparently() -> anyhow::Result<()> {
        let payload = RegistrationPayload::try_from(json!({"name": "Ada"}))
            .map_err(anyhow::Error::msg)?;
        assert_eq!(serde_json::to_value(&payload)?, json!({"name": "Ada"}));
        Ok(())
    }

    #[test]
    fn register_response_debug_hides_token() -> anyhow::Result<()> {
        let response: RegisterResponse =
            serde_json::from_value(json!({"token": "tok-secret", "user": {"id": 1}}))?;
        assert!(!format!("{response:?}").contains("tok-secret"));
        Ok(())
    }

    #[test]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("tok-secret");
        assert_eq!(token.expose(), "tok-secret");
        assert!(!format!("{token:?}").contains("tok-secret"));
    }

    #[test]
    fn verify_response_message_is_optional() -> anyhow::Result<()> {
        let response: VerifyOtpResponse = serde_json::from_value(json!({"verified": true}))?;
        assert_eq!(
            response,
            VerifyOtpResponse {
                verified: true,
                message: None
            }
        );
        Ok(())
    }
}
