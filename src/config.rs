use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Import configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ImportConfig {
    /// Page fetch timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Value of the User-Agent header sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Directory holding `units.<lang>.json` and `notes_rules.<lang>.json`.
    /// The embedded rule tables are used when unset.
    #[serde(default)]
    pub rules_dir: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            rules_dir: None,
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Recipeer/0.1 (+educational-parser)".to_string()
}

impl ImportConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPEER__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPEER__TIMEOUT, RECIPEER__RULES_DIR
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn rules_path(&self) -> Option<PathBuf> {
        self.rules_dir.as_ref().map(PathBuf::from)
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<ImportConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested keys: RECIPEER__RULES_DIR
        .add_source(
            Environment::with_prefix("RECIPEER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
