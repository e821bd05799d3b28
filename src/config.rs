//! Generic key/value configuration consumed by option builders

use std::collections::HashMap;

/// Configuration key for the input character encoding
pub const INPUT_ENCODING_KEY: &str = "schemascan.encoding.input";
/// Configuration key for the output character encoding
pub const OUTPUT_ENCODING_KEY: &str = "schemascan.encoding.output";

/// A flat string map of configuration properties
#[derive(Debug, Clone, Default)]
pub struct Config {
    properties: HashMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    /// Value for a key, or the default when absent or blank.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.properties.get(key) {
            Some(value) if !value.trim().is_empty() => value.clone(),
            _ => default.to_string(),
        }
    }
}
