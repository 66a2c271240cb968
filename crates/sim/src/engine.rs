//! Step state machine driving one simulation run
//!
//! ```text
//! Input -> Encoding -> Transmission ~> Corruption -> Detection -> Correction ~> Complete
//!                                                           \-> Complete (nothing detected)
//! ```
//!
//! `->` transitions run synchronously inside [`SimulationEngine::next_step`].
//! `~>` transitions are paced: they are parked in the [`Timer`] and fire from
//! [`SimulationEngine::poll`] once the step delay has elapsed. While one of
//! them is pending, `next_step` is ignored. Advancing from `Correction` with
//! nothing pending, or from `Complete`, resets the run.

use crate::channel::{Channel, NoisyChannel};
use crate::clock::{Clock, SystemClock};
use crate::config::SimulationConfig;
use crate::explain;
use crate::state::{SimulationState, SimulationStep};
use crate::timer::{PendingTransition, Timer};
use crate::{Result, SimError};
use errsim_codecs::{Correction, Detection, Method};
use errsim_core::BitString;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Owns the simulation state and every transition that mutates it
pub struct SimulationEngine {
    state: SimulationState,
    config: SimulationConfig,
    channel: Box<dyn Channel>,
    clock: Box<dyn Clock>,
    timer: Timer,
}

impl SimulationEngine {
    /// Create an engine with a random channel and the system clock
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_parts(
            config,
            Box::new(NoisyChannel::from_entropy()),
            Box::new(SystemClock::new()),
        )
    }

    /// Create an engine from explicit collaborators
    pub fn with_parts(
        config: SimulationConfig,
        channel: Box<dyn Channel>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            state: SimulationState::default(),
            config,
            channel,
            clock,
            timer: Timer::new(),
        })
    }

    /// Current state snapshot
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Transition waiting on the timer, if any
    pub fn pending_transition(&self) -> Option<PendingTransition> {
        self.timer.pending()
    }

    /// Time left until the pending transition is due
    pub fn time_until_next(&self) -> Option<Duration> {
        self.timer
            .deadline()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    /// Load a message and method, discarding any run in progress.
    ///
    /// Fails with [`SimError::InvalidInput`] on an empty or non-binary
    /// message, leaving the current state untouched.
    pub fn set_message(&mut self, message: &str, method: Method) -> Result<()> {
        let bits = BitString::parse(message).map_err(|e| SimError::InvalidInput {
            msg: e.to_string(),
        })?;

        self.timer.cancel();
        let explanation = explain::message_set(&bits, method);
        self.state = SimulationState::with_message(bits, method, explanation);
        info!(bits = message, %method, "message set");
        Ok(())
    }

    /// Advance the state machine by one step. Never fails.
    pub fn next_step(&mut self) {
        match self.timer.pending() {
            Some(pending) if pending.is_pacing() => {
                warn!(
                    ?pending,
                    step = %self.state.current_step,
                    "next_step ignored while a delayed transition is pending"
                );
                return;
            }
            Some(_) => {
                self.timer.cancel();
            }
            None => {}
        }

        self.advance();
        self.arm_auto_advance();
    }

    /// Return to the empty initial state, cancelling any pending transition
    pub fn reset_simulation(&mut self) {
        self.timer.cancel();
        self.state = SimulationState::default();
        info!("simulation reset");
    }

    /// Turn auto-advance on or off.
    ///
    /// Turning it off cancels a pending auto-advance; paced transitions
    /// still complete.
    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.config.auto_advance = enabled;
        if enabled {
            self.arm_auto_advance();
        } else {
            self.timer.cancel_auto_advance();
        }
    }

    /// Change the delay used for transitions scheduled from now on
    pub fn set_step_delay(&mut self, milliseconds: u64) -> Result<()> {
        let config = SimulationConfig::new(self.config.auto_advance, milliseconds)?;
        self.config = config;
        Ok(())
    }

    /// Fire the pending transition if its deadline has passed.
    ///
    /// Returns whether a transition ran.
    pub fn poll(&mut self) -> bool {
        let transition = match self.timer.take_due(self.clock.now()) {
            Some(transition) => transition,
            None => return false,
        };

        match transition {
            PendingTransition::FinishTransmission => self.finish_transmission(),
            PendingTransition::FinishCorrection => self.finish_correction(),
            PendingTransition::AutoAdvance => self.advance(),
        }
        self.arm_auto_advance();
        true
    }

    fn advance(&mut self) {
        match self.state.current_step {
            SimulationStep::Input => self.encode(),
            SimulationStep::Encoding => self.transmit(),
            SimulationStep::Corruption => self.detect(),
            SimulationStep::Detection => self.correct(),
            SimulationStep::Correction | SimulationStep::Complete => self.reset_simulation(),
            SimulationStep::Transmission => {
                debug!(step = %self.state.current_step, "nothing to advance");
            }
        }
    }

    fn schedule(&mut self, transition: PendingTransition) {
        let due = self.clock.now() + self.config.step_delay();
        self.timer.schedule(transition, due);
    }

    fn arm_auto_advance(&mut self) {
        let step = self.state.current_step;
        let active = !matches!(step, SimulationStep::Input | SimulationStep::Complete);
        if self.config.auto_advance && active && self.timer.is_idle() {
            self.schedule(PendingTransition::AutoAdvance);
        }
    }

    fn enter(&mut self, step: SimulationStep, explanation: String) {
        info!(from = %self.state.current_step, to = %step, "step");
        self.state.current_step = step;
        self.state.explanation_text = explanation;
    }

    fn encode(&mut self) {
        if self.state.original_message.is_empty() {
            debug!("no message to encode");
            return;
        }

        let method = self.state.detection_method;
        let encoded = method.code().encode(&self.state.original_message);
        debug!(%encoded, "encoded");

        let explanation = explain::encoded(method, &self.state.original_message, &encoded);
        self.state.encoded_message = encoded;
        self.enter(SimulationStep::Encoding, explanation);
    }

    fn transmit(&mut self) {
        let transmission = self.channel.transmit(&self.state.encoded_message);
        debug!(
            received = %transmission.received,
            positions = ?transmission.error_positions,
            "transmitted"
        );

        let explanation = explain::transmitting(&transmission.error_positions);
        self.state.transmitted_message = transmission.received;
        self.state.error_positions = transmission.error_positions;
        self.enter(SimulationStep::Transmission, explanation);
        self.schedule(PendingTransition::FinishTransmission);
    }

    fn finish_transmission(&mut self) {
        if self.state.current_step != SimulationStep::Transmission {
            warn!(step = %self.state.current_step, "stale transmission timer");
            return;
        }

        let explanation = explain::arrived(&self.state.error_positions);
        self.enter(SimulationStep::Corruption, explanation);
    }

    fn detect(&mut self) {
        let (detection, recovered) = match self.inspect_received() {
            Ok(result) => result,
            Err(e) => {
                error!("detection failed: {}", e);
                return;
            }
        };
        debug!(?detection, "detected");

        let explanation = explain::detection(&detection, self.state.transmitted_message.len());
        self.state.detected_error = detection.error_found;
        self.state.corrected_message = self.state.transmitted_message.clone();
        self.state.recovered_message = recovered;
        self.enter(SimulationStep::Detection, explanation);
    }

    fn inspect_received(&self) -> errsim_codecs::Result<(Detection, BitString)> {
        let code = self.state.detection_method.code();
        let received = &self.state.transmitted_message;
        let detection = code.detect(received)?;
        let recovered = code.extract_data(received)?;
        Ok((detection, recovered))
    }

    fn correct(&mut self) {
        if !self.state.detected_error {
            self.enter(SimulationStep::Complete, explain::no_correction_needed());
            return;
        }

        let method = self.state.detection_method;
        let correction = match method.code().correct(&self.state.transmitted_message) {
            Ok(correction) => correction,
            Err(e) => {
                error!("correction failed: {}", e);
                return;
            }
        };
        debug!(?correction, "correction");

        let explanation = explain::correction(method, &correction);
        if let Correction::Corrected { output, data } = correction {
            self.state.corrected_message = output;
            self.state.recovered_message = data;
            self.state.correction_applied = true;
        }
        self.enter(SimulationStep::Correction, explanation);
        self.schedule(PendingTransition::FinishCorrection);
    }

    fn finish_correction(&mut self) {
        if self.state.current_step != SimulationStep::Correction {
            warn!(step = %self.state.current_step, "stale correction timer");
            return;
        }

        let explanation = explain::complete(self.state.detection_method, self.state.classify());
        self.enter(SimulationStep::Complete, explanation);
    }
}
