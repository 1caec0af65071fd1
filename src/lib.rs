//! Email verification and account activation for the course catalog front end.
//!
//! The [`activation`] module owns the OTP entry screen: the six-cell digit
//! input, the resend cooldown, and the verify-then-register state machine.
//! The [`gate`] module decides whether protected routes may render for the
//! current session. [`client`] talks to the REST API and [`cli`] wires it all
//! into a terminal driver.

pub mod activation;
pub mod cli;
pub mod client;
pub mod gate;
