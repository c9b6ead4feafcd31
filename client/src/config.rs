use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OctopusConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for OctopusConfig {
    fn default() -> Self {
        Self {
            base_url: "http://octopus.dac.local".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl OctopusConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with http:// or https://".to_string());
        }

        if self.api_key.is_empty() {
            return Err(
                "API key cannot be empty, pass --api-key or set OCTOPUS_API_KEY".to_string(),
            );
        }

        if self.timeout.is_zero() {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
