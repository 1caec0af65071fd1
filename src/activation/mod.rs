//! OTP verification and account activation.
//!
//! Flow Overview: the screen is mounted with the email and the pending
//! registration payload. The user fills six digits and submits; the code is
//! verified, a success indicator is shown for a fixed delay, then the account
//! is registered with the held payload. The returned token is persisted and
//! the screen navigates away. Any failure returns the flow to `Idle` with an
//! inline message.
//!
//! Codes, payloads and tokens are secrets: nothing in this module logs them.

pub mod cooldown;
pub mod digits;
pub mod errors;
pub mod flow;
pub mod gateway;
pub mod screen;
pub mod session;
pub mod store;
pub mod types;

pub use cooldown::{CooldownTimer, ResendState};
pub use digits::{DigitInput, FocusRegistry, Key, OtpBuffer, OTP_LENGTH};
pub use errors::{FlowError, RemoteError};
pub use flow::{FlowConfig, SubmitOutcome, VerificationFlow};
pub use gateway::{ApiGateway, NavigationState, Navigator};
pub use screen::{ResendOutcome, VerifyScreen};
pub use session::{Status, VerificationSession};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use types::{
    AuthUser, RegisterResponse, RegistrationPayload, ResendOtpResponse, SessionToken,
    VerifyOtpResponse,
};
