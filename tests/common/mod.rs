//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use activation::activation::{
    ApiGateway, FlowConfig, MemorySessionStore, NavigationState, Navigator, RegisterResponse,
    RegistrationPayload, RemoteError, ResendOtpResponse, SessionStore, SessionToken,
    VerificationFlow, VerifyOtpResponse,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;
use tokio::time::Instant;

pub const EMAIL: &str = "ada@example.com";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Verify { email: String, code: String },
    Resend { email: String },
    Register,
}

/// Gateway answering from scripted results and recording every call.
pub struct MockGateway {
    verify: Mutex<Result<VerifyOtpResponse, RemoteError>>,
    resend: Mutex<Result<ResendOtpResponse, RemoteError>>,
    register: Mutex<Result<RegisterResponse, RemoteError>>,
    verify_gate: Option<Arc<Notify>>,
    resend_gate: Option<Arc<Notify>>,
    register_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<(Call, Instant)>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            verify: Mutex::new(Ok(VerifyOtpResponse {
                verified: true,
                message: None,
            })),
            resend: Mutex::new(Ok(ResendOtpResponse::default())),
            register: Mutex::new(Ok(register_ok("tok"))),
            verify_gate: None,
            resend_gate: None,
            register_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verify(self, result: Result<VerifyOtpResponse, RemoteError>) -> Self {
        *lock(&self.verify) = result;
        self
    }

    pub fn with_resend(self, result: Result<ResendOtpResponse, RemoteError>) -> Self {
        *lock(&self.resend) = result;
        self
    }

    pub fn with_register(self, result: Result<RegisterResponse, RemoteError>) -> Self {
        *lock(&self.register) = result;
        self
    }

    /// Verify calls block until `gate` is notified.
    pub fn gate_verify(mut self, gate: Arc<Notify>) -> Self {
        self.verify_gate = Some(gate);
        self
    }

    pub fn gate_resend(mut self, gate: Arc<Notify>) -> Self {
        self.resend_gate = Some(gate);
        self
    }

    pub fn gate_register(mut self, gate: Arc<Notify>) -> Self {
        self.register_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).iter().map(|(call, _)| call.clone()).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Call, Instant)> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push((call, Instant::now()));
    }
}

#[async_trait]
impl ApiGateway for MockGateway {
    async fn verify_otp(&self, email: &str, code: &str) -> Result<VerifyOtpResponse, RemoteError> {
        self.record(Call::Verify {
            email: email.to_string(),
            code: code.to_string(),
        });
        wait(self.verify_gate.as_ref()).await;
        lock(&self.verify).clone()
    }

    async fn resend_otp(&self, email: &str) -> Result<ResendOtpResponse, RemoteError> {
        self.record(Call::Resend {
            email: email.to_string(),
        });
        wait(self.resend_gate.as_ref()).await;
        lock(&self.resend).clone()
    }

    async fn register(
        &self,
        _payload: &RegistrationPayload,
    ) -> Result<RegisterResponse, RemoteError> {
        self.record(Call::Register);
        wait(self.register_gate.as_ref()).await;
        lock(&self.register).clone()
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<(String, NavigationState)>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<(String, NavigationState)> {
        lock(&self.visits).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &str, state: NavigationState) {
        lock(&self.visits).push((destination.to_string(), state));
    }
}

/// Store that refuses every write.
pub struct FailingStore;

impl SessionStore for FailingStore {
    fn set(&self, _token: SessionToken) -> Result<()> {
        Err(anyhow!("disk full"))
    }

    fn get(&self) -> Result<Option<SessionToken>> {
        Ok(None)
    }

    fn clear(&self) -> Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub gateway: Arc<MockGateway>,
    pub store: Arc<MemorySessionStore>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub fn new(gateway: MockGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            store: Arc::new(MemorySessionStore::new()),
            navigator: Arc::new(RecordingNavigator::default()),
        }
    }

    pub fn flow(&self) -> Result<VerificationFlow> {
        VerificationFlow::new(
            EMAIL,
            payload(),
            self.gateway.clone(),
            self.store.clone(),
            self.navigator.clone(),
            FlowConfig::default(),
        )
    }

    pub fn stored_token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get()?
            .map(|token| token.expose().to_string()))
    }
}

pub fn payload() -> RegistrationPayload {
    RegistrationPayload::try_from(json!({
        "name": "Ada Lovelace",
        "email": EMAIL,
        "password": "correct horse battery staple"
    }))
    .unwrap_or_default()
}

pub fn register_ok(token: &str) -> RegisterResponse {
    RegisterResponse {
        token: token.to_string(),
        user: json!({"identifier": EMAIL, "role": "user"}),
    }
}

pub fn rejected(status: u16, message: &str) -> RemoteError {
    RemoteError::Rejected {
        status,
        message: message.to_string(),
    }
}

async fn wait(gate: Option<&Arc<Notify>>) {
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
