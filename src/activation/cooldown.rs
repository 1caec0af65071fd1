//! Resend cooldown.
//!
//! `ResendState` is the pure countdown; `CooldownTimer` drives it from a tokio
//! task ticking once per second and publishes every change on a watch channel.
//! The task is aborted on `reset`, `stop` and drop, so a torn-down screen never
//! sees another tick.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// Seconds a user waits before another code may be requested.
pub const DEFAULT_COOLDOWN_SECONDS: u32 = 60;

const TICK: Duration = Duration::from_secs(1);

/// `can_resend` is true exactly when `cooldown_seconds` is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendState {
    cooldown_seconds: u32,
    can_resend: bool,
}

impl ResendState {
    #[must_use]
    pub fn started(seconds: u32) -> Self {
        Self {
            cooldown_seconds: seconds,
            can_resend: seconds == 0,
        }
    }

    #[must_use]
    pub fn cooldown_seconds(&self) -> u32 {
        self.cooldown_seconds
    }

    #[must_use]
    pub fn can_resend(&self) -> bool {
        self.can_resend
    }

    /// Advances the countdown by one second. Returns `true` while more ticks
    /// are needed.
    pub fn tick(&mut self) -> bool {
        self.cooldown_seconds = self.cooldown_seconds.saturating_sub(1);
        if self.cooldown_seconds == 0 {
            self.can_resend = true;
            return false;
        }
        true
    }
}

impl Default for ResendState {
    fn default() -> Self {
        Self::started(DEFAULT_COOLDOWN_SECONDS)
    }
}

/// Cancellable one-second countdown. Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct CooldownTimer {
    seconds: u32,
    state: Arc<watch::Sender<ResendState>>,
    task: Option<JoinHandle<()>>,
}

impl CooldownTimer {
    /// Starts counting down from `seconds`.
    #[must_use]
    pub fn start(seconds: u32) -> Self {
        let (sender, _) = watch::channel(ResendState::started(seconds));
        let mut timer = Self {
            seconds,
            state: Arc::new(sender),
            task: None,
        };
        timer.spawn_ticker();
        timer
    }

    #[must_use]
    pub fn state(&self) -> ResendState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResendState> {
        self.state.subscribe()
    }

    /// Restarts the full cooldown, cancelling any pending tick.
    pub fn reset(&mut self) {
        self.stop();
        self.state.send_replace(ResendState::started(self.seconds));
        self.spawn_ticker();
        debug!(seconds = self.seconds, "resend cooldown restarted");
    }

    /// Cancels the pending tick; the published state is frozen.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn spawn_ticker(&mut self) {
        if self.state().can_resend() {
            return;
        }
        let state = Arc::clone(&self.state);
        self.task = Some(tokio::spawn(async move {
            loop {
                sleep(TICK).await;
                let mut running = true;
                state.send_modify(|current| running = current.tick());
                if !running {
                    debug!("resend cooldown elapsed");
                    break;
                }
            }
        }));
    }
}

impl Drop for CooldownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
