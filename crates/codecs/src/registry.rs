//! Registry describing the available error-control methods

use crate::{CodecError, Method, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Information about a method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub method: Method,
    pub can_correct: bool,
    pub redundancy: String,
}

/// Registry for the built-in methods
pub struct MethodRegistry {
    methods: BTreeMap<String, MethodInfo>,
}

impl MethodRegistry {
    /// Create a new method registry
    pub fn new() -> Self {
        let mut registry = Self {
            methods: BTreeMap::new(),
        };

        registry.register_builtin_methods();
        registry
    }

    /// Register built-in methods
    fn register_builtin_methods(&mut self) {
        for method in Method::ALL {
            let (description, redundancy) = match method {
                Method::Parity => (
                    "Single even-parity bit; detects any odd number of flipped bits",
                    "1 bit",
                ),
                Method::Checksum => (
                    "One's complement of the modulo-256 sum of 8-bit blocks",
                    "8 bits",
                ),
                Method::Hamming => (
                    "Parity bits at power-of-two positions; locates and repairs one flipped bit",
                    "p bits, smallest p with 2^p >= k + p + 1",
                ),
                Method::Crc => (
                    "Remainder of polynomial division by the generator 1011",
                    "3 bits",
                ),
                Method::Repetition => (
                    "Every bit sent three times and decoded by majority vote",
                    "2 bits per message bit",
                ),
            };

            let info = MethodInfo {
                id: method.id().to_string(),
                name: method.display_name().to_string(),
                description: description.to_string(),
                method,
                can_correct: method.can_correct(),
                redundancy: redundancy.to_string(),
            };
            self.methods.insert(info.id.clone(), info);
        }
    }

    /// Get information about a method by id
    pub fn get(&self, id: &str) -> Option<&MethodInfo> {
        self.methods.get(&id.to_ascii_lowercase())
    }

    /// List all methods in presentation order
    pub fn list(&self) -> Vec<&MethodInfo> {
        Method::ALL
            .iter()
            .filter_map(|m| self.methods.get(m.id()))
            .collect()
    }

    /// List the methods that can repair errors
    pub fn list_correcting(&self) -> Vec<&MethodInfo> {
        self.list().into_iter().filter(|info| info.can_correct).collect()
    }

    /// Code word length for each method given a message length
    pub fn encoded_lengths(&self, message_len: usize) -> Vec<(Method, usize)> {
        self.list()
            .into_iter()
            .map(|info| (info.method, info.method.code().encoded_len(message_len)))
            .collect()
    }

    /// Export method registry to JSON
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.list())
            .map_err(|e| CodecError::Serialization {
                msg: format!("Failed to serialize registry: {}", e),
            })
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}
