//! Live per-package progress display
//!
//! Every package gets one line: a spinner while its pipeline runs, then a
//! bullet telling how it ended, followed by the details of its results.
//! Errors of failed packages are printed below their line.

use crate::action::{ActionResult, ActionStatus};
use crate::orchestrator::RunObserver;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const RESULT_SEPARATOR: &str = ", ";

/// How a finished package ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    /// The very first step had nothing to do
    Skipped,
}

/// Display state of one package
#[derive(Debug, Clone)]
pub struct PackageDisplay {
    name: String,
    details: Vec<String>,
    statuses: Vec<ActionStatus>,
    error: Option<String>,
    finished: bool,
}

impl PackageDisplay {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: Vec::new(),
            statuses: Vec::new(),
            error: None,
            finished: false,
        }
    }

    pub fn add_result(&mut self, result: ActionResult) {
        if !result.detail().is_empty() {
            self.details.push(result.detail().to_string());
        }
        if let Some(error) = result.error() {
            self.error = Some(error.to_string());
        }
        self.statuses.push(result.status());
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// `None` while the pipeline is still running
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.finished {
            return None;
        }
        Some(match self.statuses.as_slice() {
            [.., ActionStatus::Failed] => Outcome::Failed,
            [ActionStatus::Skipped] => Outcome::Skipped,
            _ => Outcome::Succeeded,
        })
    }

    /// Name and result details, shown next to the spinner
    pub fn message(&self) -> String {
        let mut details = self.details.clone();
        if !self.finished {
            details.push("...".to_string());
        }
        format!("{}: {}", self.name, details.join(RESULT_SEPARATOR))
    }

    /// Final line, with the error below it for failed packages
    pub fn render(&self) -> String {
        let bullet = match self.outcome() {
            Some(Outcome::Succeeded) => "✓".green(),
            Some(Outcome::Failed) => "✗".red(),
            Some(Outcome::Skipped) => "∅".blue(),
            None => "…".yellow(),
        };
        let mut line = format!("{} {}", bullet, self.message());

        if let (Some(Outcome::Failed), Some(error)) = (self.outcome(), &self.error) {
            line.push('\n');
            line.push_str(&format_error(error).red().to_string());
        }
        line
    }
}

/// Indent an error message, marking its first line with `⤷`
fn format_error(error: &str) -> String {
    error
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("  ⤷ {}", line)
            } else {
                format!("    {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Spinner lines for a list of packages, updated as events arrive
pub struct ProgressDisplay {
    _multi: MultiProgress,
    bars: Vec<ProgressBar>,
    packages: Vec<PackageDisplay>,
}

impl ProgressDisplay {
    /// Create one line per package name. Nothing is drawn unless `enabled`.
    pub fn new(names: impl IntoIterator<Item = String>, enabled: bool) -> Self {
        let target = if enabled {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        };
        let multi = MultiProgress::with_draw_target(target);

        let packages: Vec<PackageDisplay> = names.into_iter().map(PackageDisplay::new).collect();
        let bars = packages
            .iter()
            .map(|pkg| {
                let bar = multi.add(ProgressBar::new_spinner());
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                        .template("{spinner:.yellow} {msg}")
                        .expect("Invalid template"),
                );
                bar.set_message(pkg.message());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            })
            .collect();

        Self {
            _multi: multi,
            bars,
            packages,
        }
    }

    pub fn packages(&self) -> &[PackageDisplay] {
        &self.packages
    }

    /// Whether any finished package failed
    pub fn has_failures(&self) -> bool {
        self.packages
            .iter()
            .any(|pkg| pkg.outcome() == Some(Outcome::Failed))
    }
}

impl RunObserver for ProgressDisplay {
    fn on_result(&mut self, index: usize, result: ActionResult) {
        let pkg = &mut self.packages[index];
        pkg.add_result(result);
        self.bars[index].set_message(pkg.message());
    }

    fn on_finished(&mut self, index: usize) {
        let pkg = &mut self.packages[index];
        pkg.finish();
        let bar = &self.bars[index];
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{msg}")
                .expect("Invalid template"),
        );
        bar.finish_with_message(pkg.render());
    }
}
