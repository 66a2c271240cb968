//! Drives a simulation engine from start to finish in real time

use crate::common::StepReporter;
use anyhow::{Context, Result};
use errsim_codecs::Method;
use errsim_sim::{SimulationEngine, SimulationState, SimulationStep};
use std::io::Write;
use std::thread;
use tracing::{debug, info};

/// Upper bound on transitions in one run; a full run takes six
const MAX_TRANSITIONS: usize = 32;

/// Steps an engine through one message, reporting every snapshot
pub struct Runner<W: Write> {
    engine: SimulationEngine,
    reporter: StepReporter<W>,
}

impl<W: Write> Runner<W> {
    /// Create a new runner
    pub fn new(engine: SimulationEngine, reporter: StepReporter<W>) -> Self {
        Self { engine, reporter }
    }

    /// Send `message` through the engine until the run completes.
    ///
    /// In manual mode the runner calls `next_step` whenever nothing is
    /// pending; with auto-advance on it only waits and polls.
    pub fn run(&mut self, message: &str, method: Method) -> Result<SimulationState> {
        self.engine
            .set_message(message, method)
            .context("Cannot start simulation")?;
        self.reporter.report(self.engine.state())?;

        let auto = self.engine.config().auto_advance;
        info!(%method, auto, "running simulation");

        let mut transitions = 0;
        while self.engine.state().current_step != SimulationStep::Complete {
            if transitions >= MAX_TRANSITIONS {
                anyhow::bail!(
                    "Simulation did not complete after {} transitions",
                    transitions
                );
            }

            match self.engine.time_until_next() {
                Some(wait) => {
                    if !wait.is_zero() {
                        debug!(?wait, "waiting for pending transition");
                        thread::sleep(wait);
                    }
                    if !self.engine.poll() {
                        continue;
                    }
                }
                None if auto && transitions > 0 => {
                    anyhow::bail!(
                        "Auto-advance stalled at step {}",
                        self.engine.state().current_step
                    );
                }
                None => self.engine.next_step(),
            }

            transitions += 1;
            self.reporter.report(self.engine.state())?;
        }

        Ok(self.engine.state().clone())
    }

    /// Engine being driven
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Consume the runner and return its reporter
    pub fn into_reporter(self) -> StepReporter<W> {
        self.reporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errsim_sim::prelude::*;

    fn runner(flips: Vec<usize>, auto: bool) -> Runner<Vec<u8>> {
        let config = SimulationConfig::new(auto, 1).unwrap();
        let engine = SimulationEngine::with_parts(
            config,
            Box::new(ScriptedChannel::new(vec![flips])),
            Box::new(SystemClock::new()),
        )
        .unwrap();
        Runner::new(engine, StepReporter::new(Vec::new(), false))
    }

    #[test]
    fn test_manual_run_hamming_corrects() {
        let mut runner = runner(vec![4], false);
        let state = runner.run("1011", Method::Hamming).unwrap();

        assert_eq!(state.current_step, SimulationStep::Complete);
        assert_eq!(state.outcome(), Some(Outcome::Corrected));
        assert_eq!(state.recovered_message.to_string(), "1011");

        let reporter = runner.into_reporter();
        // input plus encoding, transmission, corruption, detection, correction, complete
        assert_eq!(reporter.reported(), 7);
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("[correction]"));
        assert!(output.contains("[complete]"));
    }

    #[test]
    fn test_clean_run_skips_correction() {
        let mut runner = runner(vec![], false);
        let state = runner.run("110", Method::Crc).unwrap();

        assert_eq!(state.outcome(), Some(Outcome::Clean));
        let output = String::from_utf8(runner.into_reporter().into_inner()).unwrap();
        assert!(!output.contains("[correction]"));
    }

    #[test]
    fn test_auto_run_completes() {
        let mut runner = runner(vec![0], true);
        let state = runner.run("1011", Method::Parity).unwrap();

        assert_eq!(state.outcome(), Some(Outcome::RetransmissionRequired));
        assert_eq!(runner.into_reporter().reported(), 7);
    }

    #[test]
    fn test_invalid_message() {
        let mut runner = runner(vec![], false);
        assert!(runner.run("10a1", Method::Parity).is_err());
        assert!(runner.engine().state().is_initial());
    }
}
