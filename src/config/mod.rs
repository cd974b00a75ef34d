// ABOUTME: Configuration types and parsing for barua.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and platform connection settings.

mod env_value;
mod init;

pub use env_value::EnvValue;
pub use init::init_config;

use crate::error::{Error, Result};
use crate::platform::StoreConfig;
use crate::types::{ContentItem, JourneyId};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "barua.yml";
pub const CONFIG_FILENAME_ALT: &str = "barua.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".barua/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Journey this project publishes.
    pub journey: JourneyId,

    pub platform: PlatformSection,

    /// The journey's touchpoints, in delivery order.
    pub items: NonEmpty<ContentItem>,

    /// Where deployment records and locks live. Defaults to
    /// `$HOME/.local/state/barua`.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Override the built-in spam-trigger phrase list.
    #[serde(default)]
    pub spam_phrases: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformSection {
    /// Base URL of the template store API.
    pub base_url: String,

    /// Bearer credential; usually an env reference.
    pub token: EnvValue,

    /// Account/location identifier.
    pub location: EnvValue,

    /// Minimum delay before each request. The platform allows ~4 req/s.
    #[serde(default = "default_request_delay", with = "humantime_serde")]
    pub request_delay: Duration,

    /// Per-request timeout.
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

fn default_request_delay() -> Duration {
    Duration::from_millis(250)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    /// Find and parse the config file in `dir`.
    ///
    /// Checks `barua.yml`, then `barua.yaml`, then `.barua/config.yml`.
    pub fn discover(dir: &Path) -> Result<Self> {
        for candidate in [CONFIG_FILENAME, CONFIG_FILENAME_ALT, CONFIG_FILENAME_DIR] {
            let path = dir.join(candidate);
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.platform.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "platform.base_url must not be empty".to_string(),
            ));
        }
        if !self.platform.base_url.starts_with("http") {
            return Err(Error::InvalidConfig(format!(
                "platform.base_url must be an http(s) URL, got '{}'",
                self.platform.base_url
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate item id '{}'",
                    item.id
                )));
            }
        }
        Ok(())
    }

    /// Resolve env references into concrete connection settings.
    pub fn store_config(&self) -> Result<StoreConfig> {
        Ok(StoreConfig {
            base_url: self.platform.base_url.clone(),
            token: self.platform.token.resolve()?,
            location: self.platform.location.resolve()?,
            request_delay: self.platform.request_delay,
            request_timeout: self.platform.request_timeout,
        })
    }

    /// Items as a plain slice for the publisher API.
    pub fn items(&self) -> Vec<ContentItem> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
journey: welcome-sequence
platform:
  base_url: https://api.crm.example/v1
  token: literal-token
  location: loc_1
items:
  - id: welcome-email
    name: Welcome Email
    type: email
    subject: Welcome!
    body: "<p>Hello</p>"
"#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config: Config = serde_yaml::from_str(MINIMAL).unwrap();
        assert_eq!(config.journey.as_str(), "welcome-sequence");
        assert_eq!(config.platform.request_delay, Duration::from_millis(250));
        assert_eq!(config.platform.request_timeout, Duration::from_secs(30));
        assert_eq!(config.items.len(), 1);
    }

    #[test]
    fn humantime_durations_parse() {
        let yaml = MINIMAL.replace(
            "  location: loc_1",
            "  location: loc_1\n  request_delay: 500ms\n  request_timeout: 10s",
        );
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.platform.request_delay, Duration::from_millis(500));
        assert_eq!(config.platform.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn empty_items_list_is_rejected() {
        let yaml = MINIMAL.split("items:").next().unwrap().to_string() + "items: []\n";
        assert!(serde_yaml::from_str::<Config>(&yaml).is_err());
    }

    #[test]
    fn invalid_journey_id_is_rejected() {
        let yaml = MINIMAL.replace("welcome-sequence", "Has Spaces");
        assert!(serde_yaml::from_str::<Config>(&yaml).is_err());
    }

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            "{MINIMAL}  - id: welcome-email\n    name: Dup\n    type: sms\n    message: hi\n"
        );
        let path = dir.path().join("barua.yml");
        std::fs::write(&path, yaml).unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn discover_finds_yml_then_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));

        std::fs::create_dir_all(dir.path().join(".barua")).unwrap();
        std::fs::write(dir.path().join(".barua/config.yml"), MINIMAL).unwrap();
        assert!(Config::discover(dir.path()).is_ok());

        std::fs::write(dir.path().join("barua.yml"), MINIMAL).unwrap();
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn store_config_resolves_env_token() {
        let yaml = MINIMAL.replace("token: literal-token", "token:\n    env: BARUA_CFG_TOKEN");
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        temp_env::with_var("BARUA_CFG_TOKEN", Some("from-env"), || {
            let store = config.store_config().unwrap();
            assert_eq!(store.token, "from-env");
        });
    }
}
