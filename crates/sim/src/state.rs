//! Simulation state snapshot

use errsim_codecs::Method;
use errsim_core::BitString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps of a simulation run, in forward order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStep {
    #[default]
    Input,
    Encoding,
    Transmission,
    Corruption,
    Detection,
    Correction,
    Complete,
}

impl SimulationStep {
    /// Stable lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            SimulationStep::Input => "input",
            SimulationStep::Encoding => "encoding",
            SimulationStep::Transmission => "transmission",
            SimulationStep::Corruption => "corruption",
            SimulationStep::Detection => "detection",
            SimulationStep::Correction => "correction",
            SimulationStep::Complete => "complete",
        }
    }
}

impl fmt::Display for SimulationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a finished run turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing changed in transit and nothing was flagged
    Clean,
    /// An error was flagged and the original message recovered
    Corrected,
    /// An error was flagged but could not be repaired
    RetransmissionRequired,
    /// Bits changed in transit and the check passed anyway
    Undetected,
    /// Correction ran but produced the wrong message
    Miscorrected,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Clean => "clean",
            Outcome::Corrected => "corrected",
            Outcome::RetransmissionRequired => "retransmission required",
            Outcome::Undetected => "undetected corruption",
            Outcome::Miscorrected => "miscorrected",
        };
        f.write_str(text)
    }
}

/// Everything a viewer needs to render the current step.
///
/// Fields are filled in as the run progresses and cleared on reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    pub original_message: BitString,
    pub detection_method: Method,
    pub encoded_message: BitString,
    pub transmitted_message: BitString,
    /// Flip events applied by the channel, duplicates included
    pub error_positions: Vec<usize>,
    pub detected_error: bool,
    pub corrected_message: BitString,
    /// Message bits recovered from the corrected word
    pub recovered_message: BitString,
    pub correction_applied: bool,
    pub current_step: SimulationStep,
    pub explanation_text: String,
}

impl SimulationState {
    /// Fresh state holding a message that is ready to encode
    pub fn with_message(message: BitString, method: Method, explanation: String) -> Self {
        Self {
            original_message: message,
            detection_method: method,
            explanation_text: explanation,
            ..Self::default()
        }
    }

    /// Check if this is the empty initial state
    pub fn is_initial(&self) -> bool {
        self.current_step == SimulationStep::Input && self.original_message.is_empty()
    }

    /// Indices whose bit actually differs between sent and received words
    pub fn net_error_positions(&self) -> Vec<usize> {
        self.transmitted_message
            .diff_positions(&self.encoded_message)
            .unwrap_or_default()
    }

    /// Outcome of a finished run; `None` before the run completes
    pub fn outcome(&self) -> Option<Outcome> {
        if self.current_step != SimulationStep::Complete {
            return None;
        }

        Some(self.classify())
    }

    // Classification of the fields as they stand, whatever the step.
    pub(crate) fn classify(&self) -> Outcome {
        if !self.detected_error {
            if self.net_error_positions().is_empty() {
                Outcome::Clean
            } else {
                Outcome::Undetected
            }
        } else if !self.correction_applied {
            Outcome::RetransmissionRequired
        } else if self.recovered_message == self.original_message {
            Outcome::Corrected
        } else {
            Outcome::Miscorrected
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            original_message: BitString::new(),
            detection_method: Method::default(),
            encoded_message: BitString::new(),
            transmitted_message: BitString::new(),
            error_positions: Vec::new(),
            detected_error: false,
            corrected_message: BitString::new(),
            recovered_message: BitString::new(),
            correction_applied: false,
            current_step: SimulationStep::Input,
            explanation_text: crate::explain::initial(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        BitString::parse(s).unwrap()
    }

    fn finished(encoded: &str, transmitted: &str) -> SimulationState {
        SimulationState {
            original_message: bits("1011"),
            encoded_message: bits(encoded),
            transmitted_message: bits(transmitted),
            current_step: SimulationStep::Complete,
            ..SimulationState::default()
        }
    }

    #[test]
    fn test_default_state() {
        let state = SimulationState::default();
        assert!(state.is_initial());
        assert_eq!(state.detection_method, Method::Parity);
        assert!(state.error_positions.is_empty());
        assert!(state.outcome().is_none());
        assert!(!state.explanation_text.is_empty());
    }

    #[test]
    fn test_outcome_clean_and_undetected() {
        let clean = finished("10111", "10111");
        assert_eq!(clean.outcome(), Some(Outcome::Clean));

        let undetected = finished("10111", "01111");
        assert_eq!(undetected.net_error_positions(), vec![0, 1]);
        assert_eq!(undetected.outcome(), Some(Outcome::Undetected));
    }

    #[test]
    fn test_outcome_after_detection() {
        let mut state = finished("10111", "00111");
        state.detected_error = true;
        assert_eq!(state.outcome(), Some(Outcome::RetransmissionRequired));

        state.correction_applied = true;
        state.recovered_message = bits("1011");
        assert_eq!(state.outcome(), Some(Outcome::Corrected));

        state.recovered_message = bits("0011");
        assert_eq!(state.outcome(), Some(Outcome::Miscorrected));
    }

    #[test]
    fn test_state_serializes_as_text() {
        let state = finished("10111", "10111");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["encoded_message"], "10111");
        assert_eq!(json["current_step"], "complete");
        assert_eq!(json["detection_method"], "parity");
    }
}
