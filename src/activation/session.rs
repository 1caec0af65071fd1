//! Verification session state and its named transitions.
//!
//! `VerificationSession` is the single writer of screen state. Every mutation
//! goes through a transition method that checks the current status first, so
//! the session can be driven and asserted on without a renderer or a network.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::digits::{DigitInput, Key};
use super::errors::FlowError;
use super::types::RegistrationPayload;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Idle,
    Verifying,
    Verified,
    RegistrationPending,
    Complete,
    Failed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationSession {
    email: String,
    #[serde(skip)]
    payload: RegistrationPayload,
    status: Status,
    input: DigitInput,
    error: Option<String>,
    success: bool,
    otp_consumed: bool,
    #[serde(default)]
    resending: bool,
}

impl VerificationSession {
    #[must_use]
    pub fn new(email: impl Into<String>, payload: RegistrationPayload) -> Self {
        Self {
            email: email.into(),
            payload,
            status: Status::Idle,
            input: DigitInput::new(),
            error: None,
            success: false,
            otp_consumed: false,
            resending: false,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn input(&self) -> &DigitInput {
        &self.input
    }

    /// Inline error text, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the "verified" indicator is showing.
    #[must_use]
    pub fn success_shown(&self) -> bool {
        self.success
    }

    /// True once the server has accepted the current code. A registration
    /// failure after that point leaves the flow `Idle` with a spent code; only a
    /// resend clears this.
    #[must_use]
    pub fn otp_consumed(&self) -> bool {
        self.otp_consumed
    }

    /// A resend request is waiting for the server.
    #[must_use]
    pub fn is_resending(&self) -> bool {
        self.resending
    }

    /// Submit and resend are enabled only while idle with no resend pending.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.status == Status::Idle && !self.resending
    }

    /// Forwards a raw cell value to the digit input. Ignored unless idle.
    pub fn set_digit(&mut self, index: usize, raw: &str) -> bool {
        if self.status != Status::Idle {
            return false;
        }
        let accepted = self.input.set_digit(index, raw);
        if accepted {
            self.error = None;
        }
        accepted
    }

    pub fn handle_key(&mut self, index: usize, key: Key) {
        self.input.handle_key(index, key);
    }

    /// `Idle -> Verifying`. Returns the code to verify, or `None` when a
    /// sequence or a resend is already running.
    ///
    /// # Errors
    /// Returns `FlowError::Validation` when the buffer is not six digits; the
    /// status stays `Idle`.
    pub fn begin_verify(&mut self) -> Result<Option<String>, FlowError> {
        if !self.can_submit() {
            debug!(status = ?self.status, resending = self.resending, "submit ignored while busy");
            return Ok(None);
        }
        let Some(code) = self.input.buffer().code() else {
            let err = FlowError::incomplete_code();
            self.error = Some(err.message().to_string());
            return Err(err);
        };
        self.error = None;
        self.status = Status::Verifying;
        Ok(Some(code))
    }

    /// `Verifying -> Verified`, showing the success indicator.
    pub fn verify_succeeded(&mut self) -> bool {
        if !self.in_status(Status::Verifying) {
            return false;
        }
        self.status = Status::Verified;
        self.success = true;
        self.otp_consumed = true;
        true
    }

    /// `Verifying -> Failed -> Idle`, clearing the buffer and refocusing the
    /// first cell.
    pub fn verify_failed(&mut self, err: &FlowError) -> bool {
        if !self.in_status(Status::Verifying) {
            return false;
        }
        self.input.reset();
        self.fail(err);
        true
    }

    /// `Verified -> RegistrationPending`, handing out the held payload.
    pub fn begin_registration(&mut self) -> Option<RegistrationPayload> {
        if !self.in_status(Status::Verified) {
            return None;
        }
        self.status = Status::RegistrationPending;
        Some(self.payload.clone())
    }

    /// `RegistrationPending -> Complete`.
    pub fn registration_succeeded(&mut self) -> bool {
        if !self.in_status(Status::RegistrationPending) {
            return false;
        }
        self.status = Status::Complete;
        true
    }

    /// `RegistrationPending -> Failed -> Idle`, revoking the success indicator.
    /// The spent code is not replaced.
    pub fn registration_failed(&mut self, err: &FlowError) -> bool {
        if !self.in_status(Status::RegistrationPending) {
            return false;
        }
        self.success = false;
        self.fail(err);
        true
    }

    /// Shows an error that does not change status, such as a failed resend.
    pub fn report_error(&mut self, err: &FlowError) {
        self.error = Some(err.message().to_string());
    }

    /// Marks a resend as in flight. Returns `false` when a sequence or
    /// another resend is running.
    pub fn begin_resend(&mut self) -> bool {
        if !self.can_submit() {
            debug!(status = ?self.status, resending = self.resending, "resend ignored while busy");
            return false;
        }
        self.resending = true;
        true
    }

    /// Settles the pending resend: on success the new code replaces whatever
    /// was typed, on failure the error is shown and the cells are kept.
    pub fn resend_finished(&mut self, failure: Option<&FlowError>) {
        if !self.resending {
            warn!("ignoring resend result with no resend pending");
            return;
        }
        self.resending = false;
        match failure {
            None => self.code_reissued(),
            Some(err) => self.report_error(err),
        }
    }

    fn code_reissued(&mut self) {
        self.input.reset();
        self.error = None;
        self.otp_consumed = false;
    }

    fn fail(&mut self, err: &FlowError) {
        self.status = Status::Failed;
        self.error = Some(err.message().to_string());
        debug!(error = %err, "verification step failed");
        self.status = Status::Idle;
    }

    fn in_status(&self, status: Status) -> bool {
        if self.status == status {
            return true;
        }
        warn!(expected = ?status, actual = ?self.status, "ignoring out-of-order transition");
        false
    }
}
