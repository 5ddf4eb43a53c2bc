use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub ai: AiConfig,
    pub ocr: OcrConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AiConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub owner: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            ocr: OcrConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".into(),
            api_key: None,
            model: "gpt-4".into(),
            timeout_secs: 30,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            poll_attempts: 10,
            poll_interval_ms: 1000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/analyses.db".into(),
            owner: "local".into(),
        }
    }
}

impl Config {
    /// Load config from a TOML file. Falls back to defaults if file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Config loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/jobradar.toml");
        assert_eq!(config.ai.model, "gpt-4");
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.database.owner, "local");
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let config: Config = toml::from_str(
            "[database]\npath = \"/tmp/test.db\"\n",
        )
        .unwrap();
        assert_eq!(config.database.path, "/tmp/test.db");
        assert_eq!(config.database.owner, "local");
        assert_eq!(config.ocr.poll_attempts, 10);
    }
}
