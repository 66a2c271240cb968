//! Human readable narration of each transition

use crate::state::Outcome;
use errsim_codecs::{Correction, Detection, DetectionDetails, Method};
use errsim_core::BitString;

pub fn initial() -> String {
    "Enter a binary message to begin the simulation.".to_string()
}

pub fn message_set(message: &BitString, method: Method) -> String {
    format!(
        "Message \"{}\" will be protected with {}. Step forward to encode it.",
        message,
        method.display_name()
    )
}

pub fn encoded(method: Method, message: &BitString, encoded: &BitString) -> String {
    let added = encoded.len().saturating_sub(message.len());
    let tail = |n: usize| {
        encoded
            .slice(encoded.len().saturating_sub(n)..encoded.len())
            .map(|b| b.to_string())
            .unwrap_or_default()
    };

    match method {
        Method::Parity => format!(
            "Appended parity bit {} so the word holds an even number of 1s.",
            tail(1)
        ),
        Method::Checksum => format!(
            "Appended the 8-bit checksum {}, the one's complement of the sum of 8-bit blocks.",
            tail(8)
        ),
        Method::Hamming => format!(
            "Inserted {} parity bits at the power-of-two positions; the code word is {} bits long.",
            added,
            encoded.len()
        ),
        Method::Crc => format!(
            "Appended the CRC remainder {} from dividing by the generator 1011.",
            tail(3)
        ),
        Method::Repetition => {
            "Repeated every bit three times so each group can be decoded by majority vote."
                .to_string()
        }
    }
}

pub fn transmitting(error_positions: &[usize]) -> String {
    if error_positions.is_empty() {
        "The message is in transit and arriving intact.".to_string()
    } else {
        "The message is in transit and some bits are being corrupted on the way.".to_string()
    }
}

fn one_based(positions: &[usize]) -> String {
    positions
        .iter()
        .map(|p| (p + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn arrived(error_positions: &[usize]) -> String {
    if error_positions.is_empty() {
        "The message arrived without any corruption.".to_string()
    } else {
        format!(
            "The message arrived with flips at position(s) {}.",
            one_based(error_positions)
        )
    }
}

pub fn detection(detection: &Detection, word_len: usize) -> String {
    match (&detection.details, detection.error_found) {
        (DetectionDetails::Parity { received, computed }, true) => format!(
            "Error detected: received parity bit {} does not match the computed {}.",
            received, computed
        ),
        (DetectionDetails::Parity { .. }, false) => {
            "No error detected: the parity check passed.".to_string()
        }
        (DetectionDetails::Checksum { received, computed }, true) => format!(
            "Error detected: received checksum {} does not match the computed {}.",
            received, computed
        ),
        (DetectionDetails::Checksum { .. }, false) => {
            "No error detected: the checksum matches.".to_string()
        }
        (DetectionDetails::Hamming { syndrome, .. }, true) if *syndrome > word_len => format!(
            "Error detected: the syndrome is {}, past the end of the {}-bit word, so the error cannot be located.",
            syndrome, word_len
        ),
        (DetectionDetails::Hamming { syndrome, .. }, true) => format!(
            "Error detected: the syndrome is {}, pointing at position {}.",
            syndrome, syndrome
        ),
        (DetectionDetails::Hamming { .. }, false) => {
            "No error detected: every Hamming parity check passed.".to_string()
        }
        (DetectionDetails::Crc { received, computed, .. }, true) => format!(
            "Error detected: the computed remainder {} does not match the received {}.",
            computed, received
        ),
        (DetectionDetails::Crc { .. }, false) => {
            "No error detected: the word divides evenly by the generator.".to_string()
        }
        (DetectionDetails::Repetition { corrupted_groups }, true) => format!(
            "Errors detected in {} group(s) of three whose bits disagree.",
            corrupted_groups.len()
        ),
        (DetectionDetails::Repetition { .. }, false) => {
            "No error detected: every group of three agrees.".to_string()
        }
    }
}

pub fn no_correction_needed() -> String {
    "No errors were detected, so no correction is needed.".to_string()
}

pub fn correction(method: Method, correction: &Correction) -> String {
    match correction {
        Correction::Unsupported => format!(
            "{} can only detect errors, not correct them; the receiver must request retransmission.",
            method.display_name()
        ),
        Correction::Unlocatable { syndrome } => format!(
            "The syndrome {} points past the end of the word, so more than one bit flipped; retransmission is required.",
            syndrome
        ),
        Correction::Corrected { .. } => match method {
            Method::Hamming => {
                "Flipped the bit at the syndrome position to restore the code word.".to_string()
            }
            _ => "Decoded every group of three by majority vote.".to_string(),
        },
    }
}

pub fn complete(method: Method, outcome: Outcome) -> String {
    let name = method.display_name();
    match outcome {
        Outcome::Corrected => {
            format!("Simulation complete: {} detected and corrected the errors.", name)
        }
        Outcome::Miscorrected => format!(
            "Simulation complete: {} attempted a correction, but too many bits flipped and the recovered message is wrong.",
            name
        ),
        Outcome::RetransmissionRequired => format!(
            "Simulation complete: {} detected the errors but could not correct them; a real link would retransmit.",
            name
        ),
        Outcome::Undetected => format!(
            "Simulation complete: bits changed in transit but {} did not notice.",
            name
        ),
        Outcome::Clean => "Simulation complete.".to_string(),
    }
}
