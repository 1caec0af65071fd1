use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument};

use super::config::ClientConfig;
use crate::activation::errors::RemoteError;
use crate::activation::gateway::ApiGateway;
use crate::activation::types::{
    RegisterResponse, RegistrationPayload, ResendOtpRequest, ResendOtpResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};

pub const VERIFY_OTP_PATH: &str = "/auth/verify-otp";
pub const RESEND_OTP_PATH: &str = "/auth/resend-otp";
pub const REGISTER_PATH: &str = "/auth/register";

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    config: ClientConfig,
}

impl HttpGateway {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// Posts JSON and returns the raw body of a successful response.
    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String, RemoteError> {
        let url = self.config.endpoint(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_request_error)?;
        debug!(path, status = status.as_u16(), "API response");

        if status.is_success() {
            Ok(text)
        } else {
            Err(RemoteError::Rejected {
                status: status.as_u16(),
                message: sanitize_body(&text),
            })
        }
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    #[instrument(skip_all)]
    async fn verify_otp(&self, email: &str, code: &str) -> Result<VerifyOtpResponse, RemoteError> {
        let request = VerifyOtpRequest {
            email: email.to_string(),
            otp: code.to_string(),
        };
        let body = self.post(VERIFY_OTP_PATH, &request).await?;
        decode(&body)
    }

    #[instrument(skip_all)]
    async fn resend_otp(&self, email: &str) -> Result<ResendOtpResponse, RemoteError> {
        let request = ResendOtpRequest {
            email: email.to_string(),
        };
        let body = self.post(RESEND_OTP_PATH, &request).await?;
        if body.trim().is_empty() {
            return Ok(ResendOtpResponse::default());
        }
        decode(&body)
    }

    #[instrument(skip_all)]
    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegisterResponse, RemoteError> {
        let body = self.post(REGISTER_PATH, payload).await?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, RemoteError> {
    serde_json::from_str(body)
        .map_err(|err| RemoteError::Parse(format!("Failed to decode response: {err}")))
}

/// Maps transport errors into `RemoteError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout
    } else if err.is_builder() {
        RemoteError::Serialization(format!("Failed to build request: {err}"))
    } else if err.is_decode() {
        RemoteError::Parse(format!("Failed to read response: {err}"))
    } else {
        RemoteError::Network(format!("Unable to reach the server: {err}"))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Sanitizes HTTP error bodies for user-facing messages: a JSON `message` or
/// `error` field wins, otherwise the trimmed text truncated.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "Request failed.".to_string();
    }

    let structured = serde_json::from_str::<ErrorBody>(trimmed)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty());

    structured
        .as_deref()
        .unwrap_or(trimmed)
        .chars()
        .take(MAX_ERROR_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_prefers_json_message() {
        assert_eq!(
            sanitize_body(r#"{"message": "Invalid or expired OTP."}"#),
            "Invalid or expired OTP."
        );
        assert_eq!(
            sanitize_body(r#"{"error": "Email already registered."}"#),
            "Email already registered."
        );
    }

    #[test]
    fn sanitize_falls_back_to_text() {
        assert_eq!(sanitize_body("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(sanitize_body(r#"{"message": "  "}"#), r#"{"message": "  "}"#);
        assert_eq!(sanitize_body(""), "Request failed.");
    }

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        assert_eq!(sanitize_body(&body).chars().count(), MAX_ERROR_CHARS);
    }

    #[test]
    fn decode_reports_parse_errors() {
        let result: Result<VerifyOtpResponse, RemoteError> = decode("<html>");
        assert!(matches!(result, Err(RemoteError::Parse(_))));
    }
}
