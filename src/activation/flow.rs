//! Verify-then-register orchestration.
//!
//! `VerificationFlow` owns one `VerificationSession` and the collaborators the
//! screen talks to. The session lock is only held inside transitions, never
//! across a network call, so a second `submit` issued while the first is in
//! flight observes a busy status and returns immediately.

use anyhow::{bail, Result};
use regex::Regex;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use super::cooldown::DEFAULT_COOLDOWN_SECONDS;
use super::digits::Key;
use super::errors::{FlowError, REGISTER_FALLBACK};
use super::gateway::{ApiGateway, NavigationState, Navigator};
use super::session::{Status, VerificationSession};
use super::store::SessionStore;
use super::types::{RegistrationPayload, SessionToken};

/// Message handed to the landing screen after activation.
pub const SUCCESS_MESSAGE: &str = "Email verified. Your account is ready.";
/// Message handed to the login screen when the account exists but the token
/// could not be kept.
pub const SIGN_IN_MESSAGE: &str = "Account created. Please sign in.";

#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// How long the success indicator shows before registration starts.
    pub success_delay: Duration,
    pub cooldown_seconds: u32,
    pub landing_path: String,
    pub login_path: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            success_delay: Duration::from_millis(1000),
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            landing_path: "/".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A sequence was already running or the flow had finished.
    Ignored,
    /// The account was created and the screen navigated away.
    Completed,
}

pub struct VerificationFlow {
    session: Mutex<VerificationSession>,
    gateway: Arc<dyn ApiGateway>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    config: FlowConfig,
}

impl VerificationFlow {
    /// Creates the flow for a freshly mounted screen.
    ///
    /// # Errors
    /// Returns an error if `email` is not a plausible address.
    pub fn new(
        email: &str,
        payload: RegistrationPayload,
        gateway: Arc<dyn ApiGateway>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        config: FlowConfig,
    ) -> Result<Self> {
        let email = normalize_email(email);
        if !valid_email(&email) {
            bail!("invalid email address");
        }

        Ok(Self {
            session: Mutex::new(VerificationSession::new(email, payload)),
            gateway,
            store,
            navigator,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> VerificationSession {
        self.with_session(|session| session.clone())
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.with_session(|session| session.status())
    }

    pub fn set_digit(&self, index: usize, raw: &str) -> bool {
        self.with_session(|session| session.set_digit(index, raw))
    }

    pub fn handle_key(&self, index: usize, key: Key) {
        self.with_session(|session| session.handle_key(index, key));
    }

    /// Runs verify, the success delay, registration, token persistence and
    /// navigation, in that order.
    ///
    /// # Errors
    /// Returns the `FlowError` shown inline; the flow is `Idle` again.
    #[instrument(skip_all)]
    pub async fn submit(&self) -> Result<SubmitOutcome, FlowError> {
        let Some(code) = self.with_session(VerificationSession::begin_verify)? else {
            return Ok(SubmitOutcome::Ignored);
        };
        let email = self.with_session(|session| session.email().to_string());

        match self.gateway.verify_otp(&email, &code).await {
            Ok(response) if response.verified => {
                self.with_session(VerificationSession::verify_succeeded);
                info!("verification code accepted");
            }
            Ok(response) => {
                return Err(self.verify_failed(FlowError::rejected_code(response.message)));
            }
            Err(err) => {
                warn!("verify call failed: {err}");
                return Err(self.verify_failed(FlowError::from_verify(&err)));
            }
        }

        sleep(self.config.success_delay).await;

        let Some(payload) = self.with_session(VerificationSession::begin_registration) else {
            return Ok(SubmitOutcome::Ignored);
        };

        let response = match self.gateway.register(&payload).await {
            Ok(response) if !response.token.trim().is_empty() => response,
            Ok(_) => {
                error!("register call returned an empty token");
                return Err(
                    self.registration_failed(FlowError::Registration(REGISTER_FALLBACK.to_string()))
                );
            }
            Err(err) => {
                warn!("register call failed: {err}");
                return Err(self.registration_failed(FlowError::from_register(&err)));
            }
        };

        self.with_session(VerificationSession::registration_succeeded);
        info!("account registered");

        match self.store.set(SessionToken::new(response.token)) {
            Ok(()) => self.navigator.navigate(
                &self.config.landing_path,
                NavigationState::with_message(SUCCESS_MESSAGE),
            ),
            Err(err) => {
                error!("Failed to persist session token: {err:#}");
                self.navigator.navigate(
                    &self.config.login_path,
                    NavigationState::with_message(SIGN_IN_MESSAGE),
                );
            }
        }

        Ok(SubmitOutcome::Completed)
    }

    /// Requests a fresh code. Returns `Ok(false)` without calling the server
    /// while a verify or register sequence, or another resend, is running.
    ///
    /// # Errors
    /// Returns the `FlowError` shown inline; the current code is kept.
    #[instrument(skip_all)]
    pub async fn resend_code(&self) -> Result<bool, FlowError> {
        if !self.with_session(VerificationSession::begin_resend) {
            return Ok(false);
        }
        let email = self.with_session(|session| session.email().to_string());

        match self.gateway.resend_otp(&email).await {
            Ok(_) => {
                self.with_session(|session| session.resend_finished(None));
                info!("verification code re-sent");
                Ok(true)
            }
            Err(err) => {
                warn!("resend call failed: {err}");
                let err = FlowError::from_resend(&err);
                self.with_session(|session| session.resend_finished(Some(&err)));
                Err(err)
            }
        }
    }

    fn verify_failed(&self, err: FlowError) -> FlowError {
        self.with_session(|session| session.verify_failed(&err));
        err
    }

    fn registration_failed(&self, err: FlowError) -> FlowError {
        self.with_session(|session| session.registration_failed(&err));
        err
    }

    fn with_session<T>(&self, apply: impl FnOnce(&mut VerificationSession) -> T) -> T {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut session)
    }
}

/// Normalize an email before it is sent anywhere.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}
