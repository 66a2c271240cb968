//! errsim Tools library

pub mod common;
pub mod config;
pub mod run;

pub use common::{render_state, GlobalOpts, StepReporter};
pub use config::RunConfig;
pub use run::Runner;
