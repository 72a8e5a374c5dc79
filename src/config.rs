use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::tools::ToolKind;

pub const MAX_RETRY_LIMIT: u32 = 10;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the agent service
    pub api_url: String,

    /// Attempts per message, first one included
    pub max_retries: u32,

    /// Per-request timeout of the HTTP transport
    pub request_timeout_secs: u64,

    /// Fixed user id; a fresh one is generated per run when absent
    pub user_id: Option<String>,

    /// Tool tag used when a reply does not name a known tool
    pub tool_kind: String,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: "http://localhost:1789".to_string(),
            max_retries: 1,
            request_timeout_secs: 60,
            user_id: None,
            tool_kind: ToolKind::Search.tag().to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// `~/.aipfs/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".aipfs").join("config.toml"))
    }

    /// Load the config file (or defaults) and apply environment overrides.
    ///
    /// Not validated yet: callers layer CLI overrides on top and then call
    /// [`Config::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        Self::load_layered(&path, |key| std::env::var(key).ok())
    }

    /// File values, then `AIPFS_*` overrides from `lookup`
    pub fn load_layered(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::load_from(path)?;
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Apply command line overrides, which win over file and environment
    pub fn apply_overrides(&mut self, api_url: Option<String>, max_retries: Option<u32>) {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(max_retries) = max_retries {
            self.max_retries = max_retries;
        }
    }

    /// Read a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply `AIPFS_*` overrides looked up through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("AIPFS_API_URL") {
            self.api_url = url;
        }
        if let Some(retries) = lookup("AIPFS_MAX_RETRIES") {
            self.max_retries = retries
                .trim()
                .parse()
                .with_context(|| format!("AIPFS_MAX_RETRIES is not a number: {}", retries))?;
        }
        if let Some(user_id) = lookup("AIPFS_USER_ID") {
            self.user_id = Some(user_id);
        }
        if let Some(level) = lookup("AIPFS_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            bail!("api_url must not be empty");
        }
        if !(1..=MAX_RETRY_LIMIT).contains(&self.max_retries) {
            bail!(
                "max_retries must be between 1 and {}, got {}",
                MAX_RETRY_LIMIT,
                self.max_retries
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        if self.tool_kind.trim().is_empty() {
            bail!("tool_kind must not be empty");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.tool_kind, "search");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"https://agent.example\"\nmax_retries = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://agent.example");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            user_id: Some("u1".into()),
            max_retries: 2,
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn env_overrides_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("AIPFS_API_URL", "http://10.0.0.2:1789"),
            ("AIPFS_MAX_RETRIES", " 3 "),
            ("AIPFS_USER_ID", "alice"),
        ]);
        let mut config = Config::default();
        config
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_url, "http://10.0.0.2:1789");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.user_id.as_deref(), Some("alice"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn bad_retry_override_is_an_error() {
        let mut config = Config::default();
        assert!(config
            .apply_env(|key| (key == "AIPFS_MAX_RETRIES").then(|| "many".to_string()))
            .is_err());
    }

    #[test]
    fn retries_must_be_bounded() {
        let zero = Config {
            max_retries: 0,
            ..Config::default()
        };
        assert!(zero.validate().is_err());

        let too_many = Config {
            max_retries: MAX_RETRY_LIMIT + 1,
            ..Config::default()
        };
        assert!(too_many.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn cli_wins_over_env_which_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_url = \"http://file:1789\"\nmax_retries = 0\nrequest_timeout_secs = 5\n",
        )
        .unwrap();
        let vars = HashMap::from([("AIPFS_API_URL", "http://env:1789")]);

        let mut config =
            Config::load_layered(&path, |key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_url, "http://env:1789");
        assert_eq!(config.max_retries, 0);
        assert!(config.validate().is_err());

        config.apply_overrides(Some("http://cli:1789".into()), Some(2));
        config.validate().unwrap();
        assert_eq!(config.api_url, "http://cli:1789");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn invalid_env_retries_can_be_overridden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::load_layered(&path, |key| {
            (key == "AIPFS_MAX_RETRIES").then(|| "0".to_string())
        })
        .unwrap();

        config.apply_overrides(None, Some(3));
        config.validate().unwrap();
        assert_eq!(config.max_retries, 3);
    }
}
