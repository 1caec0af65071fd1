mod logging;

pub use logging::ARG_VERBOSITY;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const DEFAULT_SESSION_FILE: &str = ".activation/session.json";

fn email_arg() -> Arg {
    Arg::new("email")
        .short('e')
        .long("email")
        .help("Email address the code was sent to")
        .env("ACTIVATION_EMAIL")
        .required(true)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("activation")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .short('a')
                .long("api-url")
                .help("Base URL of the REST API, example: https://api.example.com/v1")
                .env("ACTIVATION_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .help("Request timeout in seconds, 0 disables it")
                .default_value("10")
                .env("ACTIVATION_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .subcommand(
            Command::new("verify")
                .about("Enter the emailed code and activate the account")
                .arg(email_arg())
                .arg(
                    Arg::new("payload")
                        .short('p')
                        .long("payload")
                        .help("JSON file with the registration details")
                        .env("ACTIVATION_PAYLOAD")
                        .required(true),
                )
                .arg(
                    Arg::new("session-file")
                        .long("session-file")
                        .help("Where the session token is stored")
                        .default_value(DEFAULT_SESSION_FILE)
                        .env("ACTIVATION_SESSION_FILE"),
                ),
        )
        .subcommand(
            Command::new("resend")
                .about("Request a new verification code")
                .arg(email_arg()),
        );

    logging::with_args(command)
}
