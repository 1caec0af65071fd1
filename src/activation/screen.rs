//! The verification screen: the flow plus its resend cooldown.
//!
//! Mounting starts the cooldown. Dropping the screen (or calling `teardown`)
//! cancels the pending tick; an in-flight `submit` future is dropped with it.

use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info};

use super::cooldown::{CooldownTimer, ResendState};
use super::digits::Key;
use super::errors::FlowError;
use super::flow::{SubmitOutcome, VerificationFlow};
use super::session::VerificationSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResendOutcome {
    /// A new code was requested and the cooldown restarted.
    Sent,
    /// The cooldown has not elapsed yet.
    CoolingDown,
    /// A verify or register sequence, or another resend, is running.
    Busy,
}

pub struct VerifyScreen {
    flow: VerificationFlow,
    timer: Mutex<CooldownTimer>,
}

impl VerifyScreen {
    /// Mounts the screen and starts the resend cooldown. Must be called inside
    /// a tokio runtime.
    #[must_use]
    pub fn mount(flow: VerificationFlow) -> Self {
        let timer = CooldownTimer::start(flow.config().cooldown_seconds);
        info!("verification screen mounted");
        Self {
            flow,
            timer: Mutex::new(timer),
        }
    }

    #[must_use]
    pub fn flow(&self) -> &VerificationFlow {
        &self.flow
    }

    #[must_use]
    pub fn snapshot(&self) -> VerificationSession {
        self.flow.snapshot()
    }

    #[must_use]
    pub fn resend_state(&self) -> ResendState {
        self.with_timer(|timer| timer.state())
    }

    #[must_use]
    pub fn subscribe_cooldown(&self) -> watch::Receiver<ResendState> {
        self.with_timer(|timer| timer.subscribe())
    }

    pub fn set_digit(&self, index: usize, raw: &str) -> bool {
        self.flow.set_digit(index, raw)
    }

    pub fn handle_key(&self, index: usize, key: Key) {
        self.flow.handle_key(index, key);
    }

    /// # Errors
    /// See [`VerificationFlow::submit`].
    pub async fn submit(&self) -> Result<SubmitOutcome, FlowError> {
        self.flow.submit().await
    }

    /// Requests a new code once the cooldown allows it. On success the cells
    /// are cleared and the cooldown restarts; on failure the cooldown is left
    /// as it was.
    ///
    /// # Errors
    /// Returns the inline `FlowError` when the resend call fails.
    pub async fn resend(&self) -> Result<ResendOutcome, FlowError> {
        if !self.resend_state().can_resend() {
            debug!("resend ignored during cooldown");
            return Ok(ResendOutcome::CoolingDown);
        }
        if !self.flow.resend_code().await? {
            return Ok(ResendOutcome::Busy);
        }
        self.with_timer(CooldownTimer::reset);
        Ok(ResendOutcome::Sent)
    }

    /// Unmounts the screen, cancelling the cooldown tick.
    pub fn teardown(self) {
        self.with_timer(CooldownTimer::stop);
        info!("verification screen torn down");
    }

    fn with_timer<T>(&self, apply: impl FnOnce(&mut CooldownTimer) -> T) -> T {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut timer)
    }
}
