use crate::activation::{
    FileSessionStore, FlowConfig, NavigationState, Navigator, RegistrationPayload,
    ResendOutcome, SubmitOutcome, VerificationFlow, VerifyScreen, OTP_LENGTH,
};
use crate::client::{ClientConfig, HttpGateway};
use anyhow::{anyhow, bail, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub client: ClientConfig,
    pub email: String,
    pub payload: PathBuf,
    pub session_file: PathBuf,
}

/// Prints where the web app would go next.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, destination: &str, state: NavigationState) {
        info!(destination, "navigate");
        if let Some(message) = state.message {
            println!("{message}");
        }
        println!("Continue at {destination}");
    }
}

/// Runs the interactive verification screen on stdin.
/// # Errors
/// Returns an error if the payload cannot be loaded, the input closes before
/// activation, or the terminal cannot be written.
pub async fn execute(args: Args) -> Result<()> {
    let payload = load_payload(&args.payload)?;
    let gateway = Arc::new(HttpGateway::new(args.client)?);
    let store = Arc::new(FileSessionStore::new(args.session_file));

    let flow = VerificationFlow::new(
        &args.email,
        payload,
        gateway,
        store,
        Arc::new(TerminalNavigator),
        FlowConfig::default(),
    )?;
    let screen = VerifyScreen::mount(flow);

    let result = run(&screen, tokio::io::stdin(), &mut std::io::stdout()).await;
    screen.teardown();
    result
}

/// Reads the registration details saved by the signup form.
/// # Errors
/// Returns an error if the file is unreadable or not a JSON object.
pub fn load_payload(path: &Path) -> Result<RegistrationPayload> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("invalid JSON in {}", path.display()))?;
    RegistrationPayload::try_from(value).map_err(|err| anyhow!("{}: {err}", path.display()))
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Quit,
    Resend,
    Digits(String),
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "quit" | "exit" => Input::Quit,
        "resend" => Input::Resend,
        other => Input::Digits(other.chars().filter(|c| !c.is_whitespace()).collect()),
    }
}

/// Drives `screen` from line-based input until the account is activated.
/// A full code is pasted from the first cell; shorter input continues at the
/// focused cell.
/// # Errors
/// Returns an error if the input closes early or the output cannot be written.
pub async fn run<R, W>(screen: &VerifyScreen, input: R, output: &mut W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    writeln!(
        output,
        "Enter the {OTP_LENGTH}-digit code sent to {} (\"resend\" for a new code, \"quit\" to stop).",
        screen.snapshot().email()
    )?;

    let mut lines = BufReader::new(input).lines();
    loop {
        write_prompt(screen, output)?;
        let Some(line) = lines.next_line().await? else {
            bail!("input closed before the account was activated");
        };

        match parse_input(&line) {
            Input::Quit => {
                writeln!(output, "Verification cancelled.")?;
                return Ok(());
            }
            Input::Resend => match screen.resend().await {
                Ok(ResendOutcome::Sent) => writeln!(output, "A new code is on the way.")?,
                Ok(ResendOutcome::CoolingDown) => writeln!(
                    output,
                    "You can request a new code in {}s.",
                    screen.resend_state().cooldown_seconds()
                )?,
                Ok(ResendOutcome::Busy) => writeln!(output, "Please wait for the current request.")?,
                Err(err) => writeln!(output, "{err}")?,
            },
            Input::Digits(digits) if digits.is_empty() => {}
            Input::Digits(digits) => {
                let start = if digits.len() >= OTP_LENGTH {
                    0
                } else {
                    screen.snapshot().input().focused()
                };
                if !screen.set_digit(start, &digits) {
                    writeln!(output, "Digits only, please.")?;
                    continue;
                }
                match screen.submit().await {
                    Ok(SubmitOutcome::Completed) => {
                        writeln!(output, "Account activated.")?;
                        return Ok(());
                    }
                    Ok(SubmitOutcome::Ignored) => {}
                    Err(err) => writeln!(output, "{err}")?,
                }
            }
        }
    }
}

fn write_prompt<W: Write>(screen: &VerifyScreen, output: &mut W) -> Result<()> {
    let cells: String = screen
        .snapshot()
        .input()
        .buffer()
        .cells()
        .iter()
        .map(|cell| cell.unwrap_or('_'))
        .collect();
    let resend = screen.resend_state();
    if resend.can_resend() {
        write!(output, "[{cells}] code> ")?;
    } else {
        write!(output, "[{cells}] (resend in {}s) code> ", resend.cooldown_seconds())?;
    }
    output.flush()?;
    Ok(())
}
