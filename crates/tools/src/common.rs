//! Common utilities for the errsim tools

use anyhow::Result;
use clap::Args;
use errsim_sim::{Outcome, SimulationState};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOpts {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

impl GlobalOpts {
    /// Maximum tracing level implied by the flags
    pub fn log_level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::DEBUG
        } else if self.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }

    /// Install the global tracing subscriber
    pub fn init_logging(&self) -> Result<()> {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
    }
}

/// Plain-text view of one snapshot
pub fn render_state(state: &SimulationState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", state.current_step, state.explanation_text);

    let rows = [
        ("original", &state.original_message),
        ("encoded", &state.encoded_message),
        ("transmitted", &state.transmitted_message),
        ("corrected", &state.corrected_message),
        ("recovered", &state.recovered_message),
    ];
    for (label, bits) in rows {
        if !bits.is_empty() {
            let _ = writeln!(out, "  {:<12} {}", label, bits);
        }
    }

    if !state.error_positions.is_empty() {
        let _ = writeln!(out, "  {:<12} {:?}", "flips", state.error_positions);
    }
    if let Some(outcome) = state.outcome() {
        let _ = writeln!(out, "  {:<12} {}", "outcome", outcome);
    }

    out
}

#[derive(Serialize)]
struct StepRecord<'a> {
    #[serde(flatten)]
    state: &'a SimulationState,
    outcome: Option<Outcome>,
}

/// Writes each snapshot of a run as text blocks or JSON lines
pub struct StepReporter<W: Write> {
    writer: W,
    json: bool,
    reported: usize,
}

impl<W: Write> StepReporter<W> {
    /// Create a new reporter
    pub fn new(writer: W, json: bool) -> Self {
        Self {
            writer,
            json,
            reported: 0,
        }
    }

    /// Report one snapshot
    pub fn report(&mut self, state: &SimulationState) -> Result<()> {
        if self.json {
            let record = StepRecord {
                state,
                outcome: state.outcome(),
            };
            serde_json::to_writer(&mut self.writer, &record)?;
            writeln!(self.writer)?;
        } else {
            if self.reported > 0 {
                writeln!(self.writer)?;
            }
            write!(self.writer, "{}", render_state(state))?;
        }

        self.reported += 1;
        Ok(())
    }

    /// Number of snapshots written so far
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}
