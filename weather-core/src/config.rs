use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::provider::ProviderId;

/// Configuration for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Overrides the provider's public endpoint, e.g. for a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [providers.accuweather]
    /// api_key = "..."
    ///
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-agg", "weather-agg")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace a provider API key, keeping any base URL override.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .and_modify(|cfg| cfg.api_key = api_key.clone())
            .or_insert(ProviderConfig {
                api_key,
                base_url: None,
            });
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }

    /// Providers that still need an API key before aggregation can run.
    pub fn missing_providers(&self) -> Vec<ProviderId> {
        ProviderId::all()
            .iter()
            .copied()
            .filter(|id| !self.is_provider_configured(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_config_is_missing_both_providers() {
        let cfg = Config::default();

        assert_eq!(
            cfg.missing_providers(),
            vec![ProviderId::AccuWeather, ProviderId::OpenWeather]
        );
    }

    #[test]
    fn set_api_key_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::AccuWeather, "ACCU_KEY".into());

        let key = cfg.provider_api_key(ProviderId::AccuWeather);
        assert_eq!(key, Some("ACCU_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::AccuWeather));
        assert_eq!(cfg.missing_providers(), vec![ProviderId::OpenWeather]);
    }

    #[test]
    fn upsert_keeps_base_url_override() {
        let mut cfg = Config::default();
        cfg.providers.insert(
            "openweather".into(),
            ProviderConfig {
                api_key: "OLD".into(),
                base_url: Some("http://localhost:9000".into()),
            },
        );

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "NEW".into());

        let provider = cfg.provider_config(ProviderId::OpenWeather).unwrap();
        assert_eq!(provider.api_key, "NEW");
        assert_eq!(provider.base_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn parses_toml_with_optional_base_url() {
        let cfg: Config = toml::from_str(
            r#"
            [providers.accuweather]
            api_key = "A"

            [providers.openweather]
            api_key = "B"
            base_url = "http://127.0.0.1:8080"
            "#,
        )
        .expect("valid config");

        assert!(cfg.missing_providers().is_empty());
        assert_eq!(cfg.provider_config(ProviderId::AccuWeather).unwrap().base_url, None);
        assert_eq!(
            cfg.provider_config(ProviderId::OpenWeather).unwrap().base_url.as_deref(),
            Some("http://127.0.0.1:8080")
        );
    }

    #[test]
    fn missing_file_loads_as_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let cfg = Config::load_from(&path).expect("missing file is not an error");
        assert!(cfg.providers.is_empty());
    }

    #[test]
    fn save_then_load_preserves_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::AccuWeather, "A".into());
        cfg.save_to(&path).expect("save creates parent directories");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.provider_api_key(ProviderId::AccuWeather), Some("A"));
        assert!(!loaded.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn malformed_file_is_reported_with_its_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "providers = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
