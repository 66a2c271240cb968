//! Simulation pacing configuration

use crate::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default pause before delayed and auto-advanced transitions
pub const DEFAULT_STEP_DELAY_MS: u64 = 2000;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Advance automatically after each step delay
    pub auto_advance: bool,
    /// Delay in milliseconds, must be positive
    pub step_delay_ms: u64,
}

impl SimulationConfig {
    /// Create a new configuration
    pub fn new(auto_advance: bool, step_delay_ms: u64) -> Result<Self> {
        let config = Self {
            auto_advance,
            step_delay_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.step_delay_ms == 0 {
            return Err(SimError::InvalidConfig {
                msg: "step delay must be greater than 0 ms".to_string(),
            });
        }
        Ok(())
    }

    /// Step delay as a duration
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            auto_advance: false,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SimulationConfig::default();
        assert!(!config.auto_advance);
        assert_eq!(config.step_delay(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_delay_rejected() {
        assert!(SimulationConfig::new(true, 0).is_err());
        assert!(SimulationConfig::new(true, 1).is_ok());
    }

    #[test]
    fn test_partial_deserialization() {
        let config: SimulationConfig = serde_json::from_str(r#"{"auto_advance": true}"#).unwrap();
        assert!(config.auto_advance);
        assert_eq!(config.step_delay_ms, DEFAULT_STEP_DELAY_MS);
    }
}
