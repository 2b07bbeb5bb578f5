//! Simulate command implementation.

use mountain_climber::expedition::{SessionConfig, run_session};
use std::path::Path;
use super::output::format_session_text;
use super::{CliError, OutputFormat, load_config, resolve_seed};

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the rules file is invalid or the session fails.
pub(crate) fn execute(
    seed: Option<u64>,
    segments: usize,
    climbers: usize,
    turns: u32,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let rules = load_config(config)?;
    let seed = resolve_seed(seed);

    let session = SessionConfig {
        climbers,
        segments,
        max_turns: turns,
        ..SessionConfig::default()
    };

    let result = run_session(seed, &session, &rules)?;

    match format {
        OutputFormat::Text => print!("{}", format_session_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
