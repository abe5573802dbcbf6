use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::notify::validate_endpoint;
use crate::core::sources::cost_explorer::DEFAULT_REGION;

pub const ENV_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
pub const ENV_REGION: &str = "BILLING_REGION";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostExplorerConfig {
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Default for CostExplorerConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Slack incoming-webhook URL
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub cost_explorer: CostExplorerConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("billing-notifier").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `SLACK_WEBHOOK_URL` and `BILLING_REGION` over file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(ENV_WEBHOOK_URL).ok(),
            std::env::var(ENV_REGION).ok(),
        )
    }

    /// Replace the endpoint and region when given. Empty strings are ignored.
    pub fn with_overrides(mut self, endpoint_url: Option<String>, region: Option<String>) -> Self {
        if let Some(url) = endpoint_url.filter(|u| !u.is_empty()) {
            self.notifier.endpoint_url = Some(url);
        }
        if let Some(region) = region.filter(|r| !r.is_empty()) {
            self.cost_explorer.region = region;
        }
        self
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        if self.cost_explorer.region.trim().is_empty() {
            issues.push("cost_explorer.region must not be empty".to_string());
        }
        if let Some(url) = &self.notifier.endpoint_url {
            if let Err(e) = validate_endpoint(url) {
                issues.push(format!("notifier.endpoint_url: {}", e));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let config = AppConfig::default();
        let issues = config.validate();
        assert!(
            issues.is_empty(),
            "Default config should be valid, got: {:?}",
            issues
        );
    }

    #[test]
    fn default_region_is_us_east_1() {
        assert_eq!(AppConfig::default().cost_explorer.region, "us-east-1");
    }

    #[test]
    fn default_has_no_endpoint() {
        assert!(AppConfig::default().notifier.endpoint_url.is_none());
    }

    #[test]
    fn validate_catches_invalid_format() {
        let mut config = AppConfig::default();
        config.settings.default_format = "xml".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("default_format")));
    }

    #[test]
    fn validate_catches_invalid_color() {
        let mut config = AppConfig::default();
        config.settings.color = "blue".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("color")));
    }

    #[test]
    fn validate_catches_empty_region() {
        let mut config = AppConfig::default();
        config.cost_explorer.region = "  ".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("region")));
    }

    #[test]
    fn validate_catches_http_endpoint() {
        let mut config = AppConfig::default();
        config.notifier.endpoint_url = Some("http://hooks.slack.com/services/x".to_string());
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("must use HTTPS")));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = AppConfig::default().with_overrides(
            Some("https://hooks.slack.com/services/a".to_string()),
            Some("ap-northeast-1".to_string()),
        );
        assert_eq!(
            config.notifier.endpoint_url.as_deref(),
            Some("https://hooks.slack.com/services/a")
        );
        assert_eq!(config.cost_explorer.region, "ap-northeast-1");
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let mut config = AppConfig::default();
        config.notifier.endpoint_url = Some("https://hooks.slack.com/services/file".to_string());
        let config = config.with_overrides(Some(String::new()), Some(String::new()));
        assert_eq!(
            config.notifier.endpoint_url.as_deref(),
            Some("https://hooks.slack.com/services/file")
        );
        assert_eq!(config.cost_explorer.region, "us-east-1");
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[settings]
default_format = "json"
color = "never"

[cost_explorer]
region = "us-west-2"

[notifier]
endpoint_url = "https://hooks.slack.com/services/T/B/X"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.settings.default_format, "json");
        assert_eq!(config.settings.color, "never");
        assert_eq!(config.cost_explorer.region, "us-west-2");
        assert_eq!(
            config.notifier.endpoint_url.as_deref(),
            Some("https://hooks.slack.com/services/T/B/X")
        );
    }

    #[test]
    fn parse_empty_toml_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.settings.default_format, "text");
        assert_eq!(config.settings.color, "auto");
        assert_eq!(config.cost_explorer.region, "us-east-1");
        assert!(config.notifier.endpoint_url.is_none());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.cost_explorer.region, "us-east-1");
    }

    #[test]
    fn config_path_uses_xdg_when_set() {
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/test_xdg_config");
        let path = AppConfig::config_path();
        std::env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(
            path,
            PathBuf::from("/tmp/test_xdg_config/billing-notifier/config.toml")
        );
    }

    #[test]
    fn env_overrides_apply_and_cli_values_win() {
        std::env::set_var(ENV_WEBHOOK_URL, "https://hooks.slack.com/services/env");
        std::env::set_var(ENV_REGION, "eu-west-1");
        let from_env = AppConfig::default().with_env_overrides();
        std::env::remove_var(ENV_WEBHOOK_URL);
        std::env::remove_var(ENV_REGION);

        assert_eq!(
            from_env.notifier.endpoint_url.as_deref(),
            Some("https://hooks.slack.com/services/env")
        );
        assert_eq!(from_env.cost_explorer.region, "eu-west-1");

        let from_cli = from_env.with_overrides(
            Some("https://hooks.slack.com/services/cli".to_string()),
            Some("ap-northeast-1".to_string()),
        );
        assert_eq!(
            from_cli.notifier.endpoint_url.as_deref(),
            Some("https://hooks.slack.com/services/cli")
        );
        assert_eq!(from_cli.cost_explorer.region, "ap-northeast-1");
    }
}
