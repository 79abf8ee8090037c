use crate::error::{KsError, Result};
use crate::rules::keyword;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    /// Keywords left out of the keyword table; rules using them fail to load
    #[serde(default)]
    pub disabled_keywords: Vec<String>,
    /// Reject rules that use keywords this engine does not implement
    #[serde(default = "default_true")]
    pub strict_options: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            disabled_keywords: Vec::new(),
            strict_options: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            KsError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(KsError::ConfigError(
                "Log level cannot be empty".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "full" | "compact" | "json") {
            return Err(KsError::ConfigError(format!(
                "Unknown log format '{}' (expected full, compact or json)",
                self.logging.format
            )));
        }

        for name in &self.detection.disabled_keywords {
            if !keyword::is_builtin(name) {
                return Err(KsError::ConfigError(format!(
                    "Cannot disable unknown rule keyword '{}'",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn default_config() -> Self {
        Self::default()
    }
}
