//! Workflow stages and the progress narrative

use chrono::Local;
use colored::Colorize;
use std::time::Instant;

/// The stages a workflow run moves through, in order. Not every flow
/// visits every stage: the golden-image flow skips DNS and certificates,
/// the client flow skips stop/power-off/capture/cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Selecting,
    Creating,
    WaitingReachable,
    Bootstrapping,
    ConfiguringDns,
    IssuingCert,
    StartingService,
    StoppingService,
    PoweringOff,
    CapturingImage,
    CleaningUp,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Selecting => "Selecting region",
            Self::Creating => "Creating server",
            Self::WaitingReachable => "Waiting for SSH",
            Self::Bootstrapping => "Running bootstrap",
            Self::ConfiguringDns => "Configuring DNS",
            Self::IssuingCert => "Issuing certificate",
            Self::StartingService => "Starting service",
            Self::StoppingService => "Stopping service",
            Self::PoweringOff => "Powering off",
            Self::CapturingImage => "Capturing snapshot",
            Self::CleaningUp => "Cleaning up",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Prints the human-readable stage narrative for one workflow run.
pub struct StageLogger {
    flow: &'static str,
    start: Instant,
}

impl StageLogger {
    pub fn new(flow: &'static str) -> Self {
        println!("{} {}", "●".cyan(), format!("{flow} workflow").bold());
        Self {
            flow,
            start: Instant::now(),
        }
    }

    fn timestamp() -> String {
        Local::now().format("%H:%M:%S").to_string()
    }

    /// Announce a stage transition
    pub fn stage(&self, stage: Stage) {
        println!(
            "[{}] {} {}",
            Self::timestamp().dimmed(),
            "▶".cyan(),
            stage.name()
        );
    }

    /// Stage-level detail worth surfacing to the operator
    pub fn note(&self, message: &str) {
        println!("[{}]   {}", Self::timestamp().dimmed(), message);
    }

    pub fn warn(&self, message: &str) {
        println!(
            "[{}] {} {}",
            Self::timestamp().dimmed(),
            "!".yellow(),
            message.yellow()
        );
    }

    /// Terminal summary line
    pub fn finish(&self, outcome: &str) {
        let elapsed = self.start.elapsed();
        println!(
            "[{}] {} {} finished in {:.0?}: {}",
            Self::timestamp().dimmed(),
            "✓".green(),
            self.flow,
            elapsed,
            outcome
        );
    }

    pub fn fail(&self, error: &str) {
        let elapsed = self.start.elapsed();
        println!(
            "[{}] {} {} aborted after {:.0?}: {}",
            Self::timestamp().dimmed(),
            "✗".red(),
            self.flow,
            elapsed,
            error.red()
        );
    }
}
