use clap::{builder::ValueParser, Arg, ArgAction, Command};

use crate::cli::telemetry::verbosity_from_str;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Accepts the names and indexes that `telemetry::LEVELS` knows about.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        verbosity_from_str(level).ok_or_else(|| {
            format!("invalid log level '{level}', use error|warn|info|debug|trace or 0-4")
        })
    })
}

/// Adds the global `-v` counter, also settable through `ACTIVATION_LOG_LEVEL`.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity: -v WARN, -vv INFO, -vvv DEBUG, -vvvv TRACE (default: ERROR)")
            .env("ACTIVATION_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
