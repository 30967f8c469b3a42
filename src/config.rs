use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const SERPER_API_KEY: &str = "SERPER_API_KEY";

/// Default directory holding `config.json`
pub const DEFAULT_CONFIG_DIR: &str = ".taskcrew";

/// Language model connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
    /// Never read from or written to config files
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".into(),
            base_url: "https://api.openai.com/v1".into(),
            temperature: None,
            timeout_secs: 600,
            api_key: None,
        }
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &redacted(&self.api_key))
            .finish()
    }
}

/// Web search (Serper) settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://google.serper.dev".into(),
            timeout_secs: 60,
            api_key: None,
        }
    }
}

impl fmt::Debug for SearchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSettings")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &redacted(&self.api_key))
            .finish()
    }
}

fn redacted(key: &Option<String>) -> &'static str {
    match key {
        Some(_) => "<redacted>",
        None => "<unset>",
    }
}

/// Everything a kickoff needs from the outside world, passed by value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub search: SearchSettings,
    /// Tool turns an agent may take before it must answer
    pub max_iterations: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            search: SearchSettings::default(),
            max_iterations: 15,
        }
    }
}

impl Settings {
    /// Load from `<config_dir>/config.json`, falling back to defaults
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.json");
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Fill credentials from the process environment.
    ///
    /// Absent keys are left unset; the provider that needs one reports it
    /// when it is first called.
    pub fn with_env_credentials(self) -> Self {
        self.with_credentials(
            std::env::var(OPENAI_API_KEY).ok(),
            std::env::var(SERPER_API_KEY).ok(),
        )
    }

    pub fn with_credentials(mut self, openai: Option<String>, serper: Option<String>) -> Self {
        self.llm.api_key = openai.filter(|k| !k.trim().is_empty());
        self.search.api_key = serper.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.llm.model = model.into();
        self
    }
}

/// Load `.env` from the working directory without overriding set variables
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring unreadable .env: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gpt-4");
        assert_eq!(settings.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(settings.search.base_url, "https://google.serper.dev");
        assert_eq!(settings.max_iterations, 15);
        assert!(settings.llm.api_key.is_none());
        assert!(settings.search.api_key.is_none());
    }

    #[test]
    fn test_load_returns_default_when_no_config() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(temp_dir.path()).unwrap();
        assert_eq!(settings.llm.model, "gpt-4");
    }

    #[test]
    fn test_load_from_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_json = r#"{
            "llm": { "model": "gpt-4o", "temperature": 0.2, "api_key": "ignored" },
            "max_iterations": 3
        }"#;
        std::fs::write(temp_dir.path().join("config.json"), config_json).unwrap();

        let settings = Settings::load(temp_dir.path()).unwrap();
        assert_eq!(settings.llm.model, "gpt-4o");
        assert_eq!(settings.llm.temperature, Some(0.2));
        // Unspecified fields keep their defaults
        assert_eq!(settings.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(settings.search.base_url, "https://google.serper.dev");
        assert_eq!(settings.max_iterations, 3);
        // Credentials never come from the file
        assert!(settings.llm.api_key.is_none());
    }

    #[test]
    fn test_load_invalid_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.json"), "{ not json").unwrap();
        assert!(Settings::load(temp_dir.path()).is_err());
    }

    #[test]
    fn test_with_credentials_ignores_blank_keys() {
        let settings =
            Settings::default().with_credentials(Some("sk-123".into()), Some("  ".into()));
        assert_eq!(settings.llm.api_key.as_deref(), Some("sk-123"));
        assert!(settings.search.api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let settings =
            Settings::default().with_credentials(Some("sk-secret".into()), Some("serp".into()));
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("serp\""));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_serialize_omits_keys() {
        let settings = Settings::default().with_credentials(Some("sk-secret".into()), None);
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_with_model() {
        let settings = Settings::default().with_model("gpt-4o-mini");
        assert_eq!(settings.llm.model, "gpt-4o-mini");
    }
}
