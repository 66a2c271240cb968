//! Run configuration for the errsim CLI

use anyhow::{Context, Result};
use errsim_codecs::Method;
use errsim_sim::config::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to drive one simulation from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Binary message to send
    pub message: String,
    pub method: Method,
    /// Seed for the noisy channel; entropy when absent
    pub seed: Option<u64>,
    /// Explicit flip positions, replacing the random channel
    pub flips: Option<Vec<usize>>,
    pub simulation: SimulationConfig,
}

impl RunConfig {
    /// Load configuration from a JSON or TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        // Try JSON first, then TOML
        let config: Self = match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(_) => toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?,
        };

        config
            .simulation
            .validate()
            .context("Invalid simulation settings")?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_serialization() {
        let config = RunConfig {
            message: "1011".to_string(),
            method: Method::Hamming,
            seed: Some(42),
            flips: Some(vec![4]),
            simulation: SimulationConfig::new(true, 250).unwrap(),
        };

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to_file(&path).unwrap();
        let loaded = RunConfig::from_file(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "message = \"110\"\nmethod = \"crc\"").unwrap();

        let loaded = RunConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.message, "110");
        assert_eq!(loaded.method, Method::Crc);
        assert_eq!(loaded.seed, None);
        assert_eq!(loaded.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_json_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"{{"message": "01", "method": "repetition", "simulation": {{"step_delay_ms": 10}}}}"#
        )
        .unwrap();

        let loaded = RunConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.method, Method::Repetition);
        assert_eq!(loaded.simulation.step_delay_ms, 10);
        assert!(!loaded.simulation.auto_advance);
    }

    #[test]
    fn test_zero_delay_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[simulation]\nstep_delay_ms = 0").unwrap();

        assert!(RunConfig::from_file(temp_file.path()).is_err());
    }
}
