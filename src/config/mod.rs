use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub hosted: HostedConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which auth backend the application talks to
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    /// Use the hosted identity/profile services instead of the in-memory mock
    #[serde(default)]
    pub use_hosted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostedConfig {
    /// Project endpoint, e.g. https://project.example.co
    pub url: Option<String>,
    /// Publishable API key, sent as the `apikey` header
    pub anon_key: Option<String>,
    /// Table holding ranger profile rows
    #[serde(default = "default_profile_table")]
    pub profile_table: String,
    /// Bucket holding report photos
    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            profile_table: default_profile_table(),
            storage_bucket: default_storage_bucket(),
        }
    }
}

fn default_profile_table() -> String {
    "rangers".to_string()
}

fn default_storage_bucket() -> String {
    "report-photos".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.backend.use_hosted);
        assert!(config.hosted.url.is_none());
        assert_eq!(config.hosted.profile_table, "rangers");
        assert_eq!(config.hosted.storage_bucket, "report-photos");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [backend]
            use_hosted = true

            [hosted]
            url = "https://project.example.co"
            anon_key = "publishable-key"
            profile_table = "ranger_profiles"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.backend.use_hosted);
        assert_eq!(
            config.hosted.url.as_deref(),
            Some("https://project.example.co")
        );
        assert_eq!(config.hosted.profile_table, "ranger_profiles");
        // Unset fields keep their defaults
        assert_eq!(config.hosted.storage_bucket, "report-photos");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_sections_fall_back() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.backend.use_hosted);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/safarimap.toml")).unwrap();
        assert!(!config.backend.use_hosted);
    }
}
