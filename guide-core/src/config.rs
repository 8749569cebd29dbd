use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, env, fs, path::PathBuf};

use crate::provider::ServiceId;

/// Default language code for API payloads (OpenWeather style).
pub const DEFAULT_LANGUAGE: &str = "pt_br";

/// Configuration for a single external service (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional payload language, e.g. "pt_br" or "en". Weather descriptions
    /// come back in this language; the encyclopedia edition is derived from it.
    pub language: Option<String>,

    /// Example TOML:
    /// [services.openweather]
    /// api_key = "..."
    pub services: HashMap<String, ServiceConfig>,
}

impl Config {
    /// Language code sent to the weather service.
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Encyclopedia edition subdomain, derived from the language code
    /// ("pt_br" -> "pt").
    pub fn wiki_language(&self) -> &str {
        let lang = self.language();
        lang.split(['_', '-']).next().unwrap_or(lang)
    }

    pub fn has_service(&self, id: ServiceId) -> bool {
        self.services.contains_key(id.as_str())
    }

    pub fn service_config(&self, id: ServiceId) -> Option<&ServiceConfig> {
        self.services.get(id.as_str())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "city-guide", "guide-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Convenience helper: set/replace a service API key.
    pub fn upsert_service_api_key(&mut self, id: ServiceId, api_key: String) {
        self.services.insert(id.as_str().to_string(), ServiceConfig { api_key });
    }

    /// Returns the API key for a service, if present. The environment
    /// variable takes precedence over the config file so keys can be
    /// injected at deploy time without touching the file.
    pub fn service_api_key(&self, id: ServiceId) -> Option<String> {
        if let Ok(key) = env::var(id.env_var()) {
            if !key.is_empty() {
                return Some(key);
            }
        }
        self.services.get(id.as_str()).map(|cfg| cfg.api_key.clone())
    }

    pub fn is_service_configured(&self, id: ServiceId) -> bool {
        self.service_api_key(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ServiceId;

    #[test]
    fn language_defaults_and_overrides() {
        let cfg = Config::default();
        assert_eq!(cfg.language(), "pt_br");
        assert_eq!(cfg.wiki_language(), "pt");

        let cfg = Config {
            language: Some("en".into()),
            ..Default::default()
        };
        assert_eq!(cfg.language(), "en");
        assert_eq!(cfg.wiki_language(), "en");
    }

    #[test]
    fn missing_service_key_is_none() {
        let cfg = Config::default();
        assert_eq!(cfg.service_api_key(ServiceId::OpenWeather), None);
        assert!(!cfg.is_service_configured(ServiceId::OpenWeather));
    }

    #[test]
    fn set_api_key_for_service() {
        let mut cfg = Config::default();

        cfg.upsert_service_api_key(ServiceId::OpenWeather, "OPEN_KEY".into());

        let key = cfg.service_api_key(ServiceId::OpenWeather);
        assert_eq!(key.as_deref(), Some("OPEN_KEY"));
        assert!(cfg.is_service_configured(ServiceId::OpenWeather));
    }

    #[test]
    fn upsert_replaces_existing_key() {
        let mut cfg = Config::default();

        cfg.upsert_service_api_key(ServiceId::OpenWeather, "FIRST".into());
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "SECOND".into());

        let key = cfg.service_api_key(ServiceId::OpenWeather);
        assert_eq!(key.as_deref(), Some("SECOND"));
    }

    #[test]
    fn env_var_overrides_config_file() {
        let mut cfg = Config::default();
        cfg.upsert_service_api_key(ServiceId::GooglePlaces, "FILE_KEY".into());

        // SAFETY: single mutation of a test-only variable; no other test in
        // this binary reads GOOGLE_MAPS_API_KEY.
        unsafe { env::set_var("GOOGLE_MAPS_API_KEY", "ENV_KEY") };
        let key = cfg.service_api_key(ServiceId::GooglePlaces);
        unsafe { env::remove_var("GOOGLE_MAPS_API_KEY") };

        assert_eq!(key.as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.language = Some("en".into());
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "OPEN_KEY".into());

        let serialized = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&serialized).expect("parse");

        assert_eq!(parsed.language(), "en");
        assert_eq!(
            parsed.service_api_key(ServiceId::OpenWeather).as_deref(),
            Some("OPEN_KEY")
        );
    }
}
