//! errsim Sim - Transmission simulation engine
//!
//! This crate sequences a message through encode, transmit, corrupt,
//! detect and correct as an explicit step state machine. Randomness comes
//! from an injectable [`channel::Channel`] and time from an injectable
//! [`clock::Clock`], so every run can be replayed deterministically.

pub mod channel;
pub mod clock;
pub mod timer;
pub mod state;
pub mod explain;
pub mod config;
pub mod engine;
pub mod error;

pub use engine::SimulationEngine;
pub use error::{Result, SimError};
pub use state::{Outcome, SimulationState, SimulationStep};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        channel::{Channel, NoisyChannel, ScriptedChannel, Transmission},
        clock::{Clock, ManualClock, SystemClock},
        config::SimulationConfig,
        engine::SimulationEngine,
        error::{Result, SimError},
        state::{Outcome, SimulationState, SimulationStep},
        timer::{PendingTransition, Timer},
    };
    pub use errsim_codecs::Method;
    pub use errsim_core::BitString;
}
