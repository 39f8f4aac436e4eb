use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::finder::{Outcome, ProbeResult};

/// Receives results as the workers produce them.
pub trait Reporter {
    /// Called once, right before the first path is requested.
    fn start(&mut self) {}

    fn report(&mut self, result: &ProbeResult);

    fn finish(&mut self) {}
}

/// Collects everything; used by library callers and tests.
impl Reporter for Vec<ProbeResult> {
    fn report(&mut self, result: &ProbeResult) {
        self.push(result.clone());
    }
}

// prints hits to stdout above a progress bar drawn on stderr
pub struct TerminalReporter {
    pb: ProgressBar,
    verbose: u8,
}

impl TerminalReporter {
    pub fn new(total: u64, verbose: u8) -> Result<Self, String> {
        // stays hidden until `start` so nothing is drawn during the liveness check
        let pb = ProgressBar::with_draw_target(Some(total.max(1)), ProgressDrawTarget::hidden());
        pb.set_style(
            ProgressStyle::with_template(
                ":: Progress: [{pos}/{len}] :: {per_sec} :: Duration: [{elapsed_precise}] :: {msg}",
            )
            .map_err(|e| format!("failed to build progress bar style: {e}"))?
            .progress_chars(r#"#>-"#),
        );
        Ok(Self { pb, verbose })
    }

    fn print(&self, line: String) {
        self.pb.suspend(|| println!("{line}"));
    }
}

impl Reporter for TerminalReporter {
    fn start(&mut self) {
        self.pb.set_draw_target(ProgressDrawTarget::stderr());
        self.pb.enable_steady_tick(Duration::from_millis(200));
    }

    fn report(&mut self, result: &ProbeResult) {
        self.pb.inc(1);
        self.pb.set_message(result.path.clone());
        if let Some(line) = format_result_line(result, self.verbose) {
            self.print(line);
        }
    }

    fn finish(&mut self) {
        self.pb.finish_and_clear();
    }
}

/// The line printed for a result, or `None` when the verbosity hides it.
pub fn format_result_line(result: &ProbeResult, verbose: u8) -> Option<String> {
    match &result.outcome {
        Outcome::Hit(status) => Some(format!(
            "{}{}{} {} {}",
            "[".bold().white(),
            "+".bold().green(),
            "]".bold().white(),
            status.to_string().bold().green(),
            result.url.bold().cyan(),
        )),
        Outcome::Miss(status) if verbose > 0 => Some(format!(
            "{} {} {}",
            "[-]".dimmed(),
            status.to_string().dimmed(),
            result.url.dimmed(),
        )),
        Outcome::Error(message) if verbose > 0 => Some(format!(
            "{}{}{} {}",
            "[".bold().white(),
            "!".bold().red(),
            "]".bold().white(),
            message.red(),
        )),
        _ => None,
    }
}
