use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Collaborator endpoints and throttling policy, loadable from a TOML file.
/// Everything has a sensible default so the file is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generator: GeneratorSettings,
    pub lookup: LookupSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key; the key itself never lives
    /// in the settings file.
    pub api_key_env: String,
    /// Caller-imposed deadline on the generation call.
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    pub endpoint: String,
    pub concurrent_lookups: usize,
    /// Courtesy pacing between lookup calls, for the collaborator's rate
    /// limit. Zero disables the delay.
    pub delay_ms: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "DECKWEAVER_API_KEY".to_string(),
            timeout_seconds: 60,
        }
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.scryfall.com".to_string(),
            concurrent_lookups: 5,
            delay_ms: 100,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generator: GeneratorSettings::default(),
            lookup: LookupSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Settings> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("generator.endpoint", &self.generator.endpoint)?;
        validate_non_empty_string("generator.model", &self.generator.model)?;
        validate_non_empty_string("generator.api_key_env", &self.generator.api_key_env)?;
        validate_range("generator.timeout_seconds", self.generator.timeout_seconds, 1, 600)?;
        validate_url("lookup.endpoint", &self.lookup.endpoint)?;
        validate_positive_number("lookup.concurrent_lookups", self.lookup.concurrent_lookups, 1)?;
        validate_range("lookup.delay_ms", self.lookup.delay_ms, 0, 10_000)?;
        Ok(())
    }
}
