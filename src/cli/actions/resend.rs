use crate::activation::flow::{normalize_email, valid_email};
use crate::activation::{ApiGateway, FlowError};
use crate::client::{ClientConfig, HttpGateway};
use anyhow::{bail, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub client: ClientConfig,
    pub email: String,
}

/// Requests a fresh code outside the interactive screen. No cooldown applies
/// here; the server enforces its own limits.
/// # Errors
/// Returns an error if the email is invalid or the request fails.
pub async fn execute(args: Args) -> Result<()> {
    let email = normalize_email(&args.email);
    if !valid_email(&email) {
        bail!("invalid email address");
    }

    let gateway = HttpGateway::new(args.client)?;
    let response = gateway
        .resend_otp(&email)
        .await
        .map_err(|err| FlowError::from_resend(&err))?;

    info!("verification code re-sent");
    println!(
        "{}",
        response
            .message
            .as_deref()
            .unwrap_or("A new code is on the way.")
    );

    Ok(())
}
