//! Output formatting utilities for CLI.

// Statistics are reported as floating point ratios.
#![allow(clippy::cast_precision_loss)]

use mountain_climber::expedition::SessionResult;
use mountain_climber::registry::ClimberId;
use serde::Serialize;

/// Format a session result as human-readable text.
pub(super) fn format_session_text(result: &SessionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Session Result (seed: {})\n", result.seed));
    output.push_str(&format!(
        "  Route: {} segments, {} hazards crossed\n",
        result.route_length, result.hazards_crossed
    ));
    output.push_str(&format!("  Turns: {}\n\n", result.turns_played));

    if result.summit_order.is_empty() {
        output.push_str("  Nobody reached the summit.\n");
    } else {
        output.push_str("  Summit order:\n");
        for (i, id) in result.summit_order.iter().enumerate() {
            output.push_str(&format!("    {}. {id}\n", i + 1));
        }
    }
    if !result.exhausted.is_empty() {
        let names: Vec<&str> = result.exhausted.iter().map(ClimberId::as_str).collect();
        output.push_str(&format!("  Exhausted: {}\n", names.join(", ")));
    }
    output.push('\n');

    output.push_str("  Leaderboard:\n");
    for id in &result.leaderboard {
        if let Some(c) = result.climbers.iter().find(|c| c.id == *id) {
            output.push_str(&format!(
                "    {} ({}): {} points, {} stamina, {} moves\n",
                c.name, c.id, c.score, c.stamina, c.moves
            ));
        }
    }
    if result.violations > 0 {
        output.push_str(&format!(
            "\n  WARNING: {} invariant violations\n",
            result.violations
        ));
    }

    output
}

/// Survey statistics for aggregated results.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct SurveyStats {
    /// Total sessions played.
    pub(super) sessions: u64,
    /// Sessions that failed to run.
    pub(super) failed: u64,
    /// Sessions where every climber summited.
    pub(super) completed: u64,
    /// Climbers across all sessions.
    climbers: u64,
    /// Climbers that reached the summit.
    summits: u64,
    /// Climbers that ran out of stamina.
    exhaustions: u64,
    /// Total turns across all sessions.
    total_turns: u64,
    /// Turn sum of squares for std dev calculation.
    turn_sq_sum: f64,
    /// Hazards crossed across all sessions.
    hazards: u64,
    /// Sum of the top score of each session.
    top_scores: f64,
    /// Invariant violations across all sessions.
    pub(super) violations: u64,
}

impl SurveyStats {
    /// Add a session result to the stats.
    pub(super) fn add_result(&mut self, result: &SessionResult) {
        self.sessions += 1;
        if result.all_summited() {
            self.completed += 1;
        }
        self.climbers += result.climbers.len() as u64;
        self.summits += result.summit_order.len() as u64;
        self.exhaustions += result.exhausted.len() as u64;
        self.total_turns += u64::from(result.turns_played);
        self.turn_sq_sum += f64::from(result.turns_played) * f64::from(result.turns_played);
        self.hazards += result.hazards_crossed;
        self.top_scores += result
            .climbers
            .iter()
            .map(|c| c.score)
            .max()
            .unwrap_or(0) as f64;
        self.violations += result.violations as u64;
    }

    /// Record a session that returned an error.
    pub(super) fn add_failure(&mut self) {
        self.failed += 1;
    }

    /// Fold another thread's stats into these.
    pub(super) fn merge(&mut self, other: &Self) {
        self.sessions += other.sessions;
        self.failed += other.failed;
        self.completed += other.completed;
        self.climbers += other.climbers;
        self.summits += other.summits;
        self.exhaustions += other.exhaustions;
        self.total_turns += other.total_turns;
        self.turn_sq_sum += other.turn_sq_sum;
        self.hazards += other.hazards;
        self.top_scores += other.top_scores;
        self.violations += other.violations;
    }

    fn per_session(&self, total: f64) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        total / self.sessions as f64
    }

    /// Fraction of climbers that reached the summit (0.0-1.0).
    pub(super) fn summit_rate(&self) -> f64 {
        if self.climbers == 0 {
            return 0.0;
        }
        self.summits as f64 / self.climbers as f64
    }

    /// Fraction of climbers that ran out of stamina (0.0-1.0).
    pub(super) fn exhaustion_rate(&self) -> f64 {
        if self.climbers == 0 {
            return 0.0;
        }
        self.exhaustions as f64 / self.climbers as f64
    }

    /// Fraction of sessions where everyone summited (0.0-1.0).
    pub(super) fn completion_rate(&self) -> f64 {
        self.per_session(self.completed as f64)
    }

    /// Average session length.
    pub(super) fn avg_turns(&self) -> f64 {
        self.per_session(self.total_turns as f64)
    }

    /// Session length standard deviation.
    pub(super) fn turns_std_dev(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        let mean = self.avg_turns();
        let variance = self.per_session(self.turn_sq_sum) - mean * mean;
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Average hazards crossed per session.
    pub(super) fn avg_hazards(&self) -> f64 {
        self.per_session(self.hazards as f64)
    }

    /// Average winning score.
    pub(super) fn avg_top_score(&self) -> f64 {
        self.per_session(self.top_scores)
    }
}

/// JSON-serializable survey result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSurveyResult {
    sessions: u64,
    failed: u64,
    summit_rate: f64,
    exhaustion_rate: f64,
    completion_rate: f64,
    avg_turns: f64,
    turns_std_dev: f64,
    avg_hazards: f64,
    avg_top_score: f64,
    violations: u64,
}

impl JsonSurveyResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &SurveyStats) -> Self {
        Self {
            sessions: stats.sessions,
            failed: stats.failed,
            summit_rate: stats.summit_rate(),
            exhaustion_rate: stats.exhaustion_rate(),
            completion_rate: stats.completion_rate(),
            avg_turns: stats.avg_turns(),
            turns_std_dev: stats.turns_std_dev(),
            avg_hazards: stats.avg_hazards(),
            avg_top_score: stats.avg_top_score(),
            violations: stats.violations,
        }
    }
}

/// Format survey stats as human-readable text.
pub(super) fn format_survey_text(stats: &SurveyStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Survey Results ({} sessions)\n", stats.sessions));
    output.push_str("========================================\n\n");

    output.push_str(&format!("  Summit rate:     {:.1}%\n", stats.summit_rate() * 100.0));
    output.push_str(&format!("  Exhaustion rate: {:.1}%\n", stats.exhaustion_rate() * 100.0));
    output.push_str(&format!("  Completed:       {:.1}%\n\n", stats.completion_rate() * 100.0));

    output.push_str(&format!(
        "  Average length:  {:.1} turns (+/- {:.1})\n",
        stats.avg_turns(),
        stats.turns_std_dev()
    ));
    output.push_str(&format!("  Hazards/session: {:.2}\n", stats.avg_hazards()));
    output.push_str(&format!("  Winning score:   {:.1}\n", stats.avg_top_score()));

    if stats.failed > 0 {
        output.push_str(&format!("\n  Failed sessions: {}\n", stats.failed));
    }
    if stats.violations > 0 {
        output.push_str(&format!("  WARNING: {} invariant violations\n", stats.violations));
    }

    output
}

/// Format survey stats as CSV.
pub(super) fn format_survey_csv(stats: &SurveyStats) -> String {
    let mut output = String::new();

    output.push_str(concat!(
        "sessions,failed,summit_rate,exhaustion_rate,completion_rate,",
        "avg_turns,turns_std_dev,avg_hazards,avg_top_score,violations\n",
    ));
    output.push_str(&format!(
        "{},{},{:.4},{:.4},{:.4},{:.2},{:.2},{:.2},{:.2},{}\n",
        stats.sessions,
        stats.failed,
        stats.summit_rate(),
        stats.exhaustion_rate(),
        stats.completion_rate(),
        stats.avg_turns(),
        stats.turns_std_dev(),
        stats.avg_hazards(),
        stats.avg_top_score(),
        stats.violations
    ));

    output
}
