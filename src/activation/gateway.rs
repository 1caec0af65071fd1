//! Collaborator contracts consumed by the verification flow and the role gate.
//! Implementations own transport and routing; this crate only sequences calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::RemoteError;
use super::types::{RegisterResponse, RegistrationPayload, ResendOtpResponse, VerifyOtpResponse};

/// REST operations behind the verification screen.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Checks `code` for `email`. Must never log the code.
    async fn verify_otp(&self, email: &str, code: &str) -> Result<VerifyOtpResponse, RemoteError>;

    /// Asks the server to issue and send a fresh code.
    async fn resend_otp(&self, email: &str) -> Result<ResendOtpResponse, RemoteError>;

    /// Creates the account. Must never log the payload.
    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegisterResponse, RemoteError>;
}

/// State carried along with a navigation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// One-off message for the destination screen to show.
    pub message: Option<String>,
    /// Location to return to afterwards.
    pub from: Option<String>,
}

impl NavigationState {
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            from: None,
        }
    }

    #[must_use]
    pub fn from_location(location: impl Into<String>) -> Self {
        Self {
            message: None,
            from: Some(location.into()),
        }
    }
}

/// Transitions the active screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str, state: NavigationState);
}
