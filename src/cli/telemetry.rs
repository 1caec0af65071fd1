use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Tracing levels indexed by verbosity, quietest first.
pub const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

/// Maps the `-v` count (or `ACTIVATION_LOG_LEVEL`) to a tracing level.
/// Counts past the end stay at `TRACE`.
#[must_use]
pub fn level_from_verbosity(verbosity: u8) -> Level {
    LEVELS
        .get(usize::from(verbosity))
        .copied()
        .unwrap_or(Level::TRACE)
}

/// Parses a level name (`info`) or index (`2`) into a verbosity.
#[must_use]
pub fn verbosity_from_str(level: &str) -> Option<u8> {
    let level = level.trim();
    let index = match level.parse::<usize>() {
        Ok(index) => index,
        Err(_) => LEVELS
            .iter()
            .position(|candidate| candidate.as_str().eq_ignore_ascii_case(level))?,
    };
    if index < LEVELS.len() {
        u8::try_from(index).ok()
    } else {
        None
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default level.
///
/// # Errors
/// Returns an error if a global subscriber is already set.
pub fn init(verbosity_level: Level) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false);

    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy();

    let subscriber = Registry::default().with(fmt_layer).with(env_filter);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
