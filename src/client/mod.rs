//! REST client for the verification endpoints.
//!
//! `HttpGateway` is the production [`ApiGateway`](crate::activation::ApiGateway):
//! JSON over HTTP with one timeout policy and sanitized error bodies. It never
//! logs request bodies, which carry codes and registration payloads.

mod api;
mod config;

pub use api::{HttpGateway, REGISTER_PATH, RESEND_OTP_PATH, VERIFY_OTP_PATH};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
