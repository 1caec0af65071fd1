mod common;

use activation::activation::errors::VALIDATION_MESSAGE;
use activation::activation::{Status, VerifyScreen};
use activation::cli::actions::verify::run;
use anyhow::Result;
use common::{Harness, MockGateway};

/// Runs the terminal loop over `input`; the loop's own result is returned
/// alongside the transcript so tests can assert on failures too.
async fn drive(harness: &Harness, input: &str) -> Result<(Result<()>, String, VerifyScreen)> {
    let screen = VerifyScreen::mount(harness.flow()?);
    let mut output = Vec::new();
    let result = run(&screen, input.as_bytes(), &mut output).await;
    Ok((result, String::from_utf8_lossy(&output).into_owned(), screen))
}

#[tokio::test(start_paused = true)]
async fn partial_input_continues_at_the_focused_cell() -> Result<()> {
    let harness = Harness::new(MockGateway::new());
    let (result, output, screen) = drive(&harness, "12\n3456\n").await?;

    result?;
    assert!(output.contains(VALIDATION_MESSAGE));
    assert!(output.contains("[12____]"));
    assert!(output.contains("Account activated."));
    assert_eq!(screen.snapshot().status(), Status::Complete);
    assert_eq!(harness.stored_token()?, Some("tok".to_string()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn resend_reports_the_remaining_cooldown() -> Result<()> {
    let harness = Harness::new(MockGateway::new());
    let (result, output, _screen) = drive(&harness, "resend\nquit\n").await?;

    result?;
    assert!(output.contains("You can request a new code in 60s."));
    assert!(output.contains("Verification cancelled."));
    assert!(harness.gateway.calls().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn non_digits_are_refused() -> Result<()> {
    let harness = Harness::new(MockGateway::new());
    let (result, output, _screen) = drive(&harness, "12ab56\nquit\n").await?;

    result?;
    assert!(output.contains("Digits only, please."));
    assert!(harness.gateway.calls().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn closed_input_is_an_error() -> Result<()> {
    let harness = Harness::new(MockGateway::new());
    let (result, _output, screen) = drive(&harness, "").await?;

    assert!(result.is_err());
    assert_eq!(screen.snapshot().status(), Status::Idle);
    Ok(())
}
