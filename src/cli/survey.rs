//! Survey command implementation.

// Throughput is reported as a floating point rate.
#![allow(clippy::cast_precision_loss)]

use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use mountain_climber::expedition::{SessionConfig, run_session};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use super::output::{JsonSurveyResult, SurveyStats, format_survey_csv, format_survey_text};
use super::{CliError, SurveyFormat, load_config, resolve_seed};

fn progress_bar(sessions: u64) -> Result<ProgressBar, CliError> {
    let style = ProgressStyle::default_bar()
        .template(concat!(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] ",
            "{pos}/{len} sessions ({per_sec})",
        ))
        .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
        .progress_chars("=>-");
    let pb = ProgressBar::new(sessions);
    pb.set_style(style);
    Ok(pb)
}

/// Execute the survey command.
///
/// # Errors
///
/// Returns an error if the rules file is invalid or output fails.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    sessions: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    segments: usize,
    climbers: usize,
    config: Option<&Path>,
    format: SurveyFormat,
    progress: bool,
) -> Result<(), CliError> {
    let rules = load_config(config)?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);
    let session = SessionConfig {
        climbers,
        segments,
        ..SessionConfig::default()
    };

    let pb = if progress {
        Some(progress_bar(sessions)?)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread accumulates into its own SurveyStats, merged at the end
    let stats = (0..sessions)
        .into_par_iter()
        .fold(SurveyStats::default, |mut local, i| {
            match run_session(base_seed.wrapping_add(i), &session, &rules) {
                Ok(result) => local.add_result(&result),
                Err(e) => {
                    warn!("session {} failed: {e}", base_seed.wrapping_add(i));
                    local.add_failure();
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SurveyStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let sessions_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.sessions as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        SurveyFormat::Text => {
            println!();
            print!("{}", format_survey_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} sessions/sec)",
                duration.as_secs_f64(),
                sessions_per_sec
            );
        }
        SurveyFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&JsonSurveyResult::from_stats(&stats))?
            );
        }
        SurveyFormat::Csv => print!("{}", format_survey_csv(&stats)),
    }

    if stats.failed > 0 && stats.sessions == 0 {
        return Err(CliError::new(format!("all {} sessions failed", stats.failed)));
    }
    Ok(())
}
