//! Error taxonomy for the verification flow.
//!
//! `RemoteError` is what collaborators report; `FlowError` is what the screen
//! shows. Every `FlowError` is recoverable and displays as its inline message.

use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please enter the complete 6-digit code.";
pub const VERIFY_FALLBACK: &str = "Verification failed. Please try again.";
pub const REGISTER_FALLBACK: &str = "Registration failed. Please try again.";
pub const NETWORK_FALLBACK: &str = "Unable to reach the server. Please try again.";
pub const RESEND_FALLBACK: &str = "Failed to resend OTP. Please try again.";

/// Failure reported by a collaborator call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Request failed ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl RemoteError {
    /// Message supplied by the server, if the server answered at all.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// The request never got an answer from the server.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}

/// Failure surfaced inline on the verification screen.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Incomplete local input; never reaches a collaborator.
    #[error("{0}")]
    Validation(String),
    /// The code was invalid or expired.
    #[error("{0}")]
    Verification(String),
    /// Registration was rejected after the code was accepted.
    #[error("{0}")]
    Registration(String),
    /// A collaborator could not be reached.
    #[error("{0}")]
    Network(String),
}

impl FlowError {
    #[must_use]
    pub fn incomplete_code() -> Self {
        Self::Validation(VALIDATION_MESSAGE.to_string())
    }

    /// Verify answered `verified: false`.
    #[must_use]
    pub fn rejected_code(message: Option<String>) -> Self {
        Self::Verification(non_empty(message).unwrap_or_else(|| VERIFY_FALLBACK.to_string()))
    }

    /// Verify failed without `verified: false`. Only an unreachable server
    /// gets the network message; a garbled answer is still a failed verify.
    #[must_use]
    pub fn from_verify(err: &RemoteError) -> Self {
        match err.server_message() {
            Some(message) => Self::Verification(message.to_string()),
            None if err.is_unreachable() => Self::network(),
            None => Self::Verification(VERIFY_FALLBACK.to_string()),
        }
    }

    #[must_use]
    pub fn from_register(err: &RemoteError) -> Self {
        match err.server_message() {
            Some(message) => Self::Registration(message.to_string()),
            None if err.is_unreachable() => Self::network(),
            None => Self::Registration(REGISTER_FALLBACK.to_string()),
        }
    }

    /// Resend failures reuse the network variant; the message is the server's
    /// when present.
    #[must_use]
    pub fn from_resend(err: &RemoteError) -> Self {
        match err.server_message() {
            Some(message) => Self::Network(message.to_string()),
            None if err.is_unreachable() => Self::network(),
            None => Self::Network(RESEND_FALLBACK.to_string()),
        }
    }

    fn network() -> Self {
        Self::Network(NETWORK_FALLBACK.to_string())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::Verification(message)
            | Self::Registration(message)
            | Self::Network(message) => message,
        }
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}
