//! # Run Report
//!
//! [`RunReport`] is the value a reconciliation run produces. It carries the
//! plan that was executed, every action outcome in the order actions were
//! issued, the failures and warnings gathered along the way, and the log
//! file location. The binary decides its exit status from
//! [`RunReport::has_failures`]; rendering is a pure function of the report so
//! it can be tested without a terminal.

use std::fmt;
use std::path::PathBuf;

use console::style;
use log::error;
use serde::Serialize;

use crate::output::{emoji, OutputConfig};
use crate::plan::ReconciliationPlan;
use crate::process::ActionOutcome;

/// The four phases of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Initialize,
    Remove,
    Add,
    Update,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initialize => "initialize",
            Phase::Remove => "remove",
            Phase::Add => "add",
            Phase::Update => "update",
        };
        f.write_str(name)
    }
}

/// A failed action together with the phase and submodule it belonged to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub phase: Phase,
    /// Submodule path the action targeted; `None` for repository-wide actions.
    pub path: Option<String>,
    pub outcome: ActionOutcome,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error running command: {}", self.outcome.command)?;
        let detail = self.outcome.stderr.trim();
        if detail.is_empty() {
            write!(f, "\n\texit status: {}", self.outcome.status_text())
        } else {
            write!(f, "\n\t{}", detail)
        }
    }
}

/// A non-fatal condition that did not fail an action but deserves attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub phase: Phase,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.phase, self.path, self.message)
    }
}

/// Everything a reconciliation run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub plan: ReconciliationPlan,
    /// Every action issued, in order.
    pub outcomes: Vec<ActionOutcome>,
    pub failures: Vec<Failure>,
    pub warnings: Vec<Warning>,
    /// Where the audit trail for this run was written.
    pub log_file: Option<PathBuf>,
}

impl RunReport {
    /// Returns true if any action failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Write the failure summary to the log.
    pub fn log_summary(&self) {
        if !self.has_failures() {
            return;
        }
        match &self.log_file {
            Some(path) => error!("Errors occurred. Please check the logs: {}", path.display()),
            None => error!("Errors occurred."),
        }
        error!("Error Summary:");
        for failure in &self.failures {
            error!("{}", failure);
        }
    }

    /// Render the closing summary shown to the user.
    pub fn render_summary(&self, out: &OutputConfig) -> String {
        let mut text = String::new();

        for warning in &self.warnings {
            let line = format!("{} Warning: {}", emoji(out, "⚠️", "[WARN]"), warning);
            text.push_str(&paint(out, &line, Tone::Warning));
            text.push('\n');
        }

        if !self.has_failures() {
            let line = format!(
                "{} All submodules updated successfully",
                emoji(out, "✅", "[OK]")
            );
            text.push_str(&paint(out, &line, Tone::Success));
            text.push('\n');
            return text;
        }

        let headline = match &self.log_file {
            Some(path) => format!(
                "{} Errors occurred. Please check the logs: {}",
                emoji(out, "❌", "[ERR]"),
                path.display()
            ),
            None => format!("{} Errors occurred.", emoji(out, "❌", "[ERR]")),
        };
        text.push_str(&paint(out, &headline, Tone::Error));
        text.push_str("\nError Summary:\n");
        for (index, failure) in self.failures.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", index + 1, failure));
        }
        text
    }
}

enum Tone {
    Success,
    Warning,
    Error,
}

fn paint(out: &OutputConfig, text: &str, tone: Tone) -> String {
    if !out.use_color {
        return text.to_string();
    }
    let styled = match tone {
        Tone::Success => style(text).green(),
        Tone::Warning => style(text).yellow(),
        Tone::Error => style(text).red(),
    };
    styled.force_styling(true).to_string()
}
