use crate::cli::{actions::Action, commands, dispatch::handler, telemetry};
use anyhow::Result;

/// Start the CLI
///
/// # Errors
/// Returns an error if logging cannot be initialised or the arguments are invalid.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let verbosity = matches
        .get_one::<u8>(commands::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0);
    telemetry::init(telemetry::level_from_verbosity(verbosity))?;

    let action = handler(&matches)?;

    Ok(action)
}
