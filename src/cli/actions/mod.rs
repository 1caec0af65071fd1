pub mod resend;
pub mod verify;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

#[derive(Debug)]
pub enum Action {
    Verify(verify::Args),
    Resend(resend::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
