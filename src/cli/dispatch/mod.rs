use crate::cli::actions::{resend, verify, Action};
use crate::cli::commands::DEFAULT_SESSION_FILE;
use crate::cli::globals::GlobalArgs;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .context("missing required argument: --api-url")?;

    let mut globals = GlobalArgs::new(api_url);
    if let Some(timeout) = matches.get_one::<u64>("timeout").copied() {
        globals.set_timeout(timeout);
    }
    let client = globals
        .client_config()
        .context("invalid ACTIVATION_API_URL")?;

    // Closure to return subcommand arguments
    let required = |sub_m: &clap::ArgMatches, name: &str| -> Result<String> {
        sub_m
            .get_one::<String>(name)
            .cloned()
            .with_context(|| format!("missing required argument: --{name}"))
    };

    match matches.subcommand() {
        Some(("verify", sub_m)) => Ok(Action::Verify(verify::Args {
            client,
            email: required(sub_m, "email")?,
            payload: PathBuf::from(required(sub_m, "payload")?),
            session_file: PathBuf::from(
                sub_m
                    .get_one::<String>("session-file")
                    .map_or(DEFAULT_SESSION_FILE, String::as_str),
            ),
        })),
        Some(("resend", sub_m)) => Ok(Action::Resend(resend::Args {
            client,
            email: required(sub_m, "email")?,
        })),
        _ => bail!("missing subcommand"),
    }
}
