use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_USER_AGENT: &str = "FishySearch Aggregator/0.1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub fetcher: FetcherConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Shop configuration document (JSON)
    pub config_path: PathBuf,
    /// Directory holding the dated result files
    pub results_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    pub user_agent: String,
    /// Seconds; 0 leaves requests unbounded
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Loads settings from defaults, an optional settings file and `FISHY_*` variables.
    ///
    /// When `settings_file` is given it must exist; otherwise `fishysearch.{toml,json,yaml}`
    /// in the working directory is picked up if present.
    pub fn load(settings_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match settings_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("fishysearch").required(false),
        };

        let s = Config::builder()
            .set_default("paths.config_path", "config/config.json")?
            .set_default("paths.results_dir", "results")?
            .set_default("fetcher.user_agent", DEFAULT_USER_AGENT)?
            .set_default("fetcher.request_timeout", 30)?
            .set_default("logging.filter", "fishysearch=info")?
            .add_source(file_source)
            // Environment variables with prefix "FISHY_", e.g. FISHY_PATHS__RESULTS_DIR
            .add_source(Environment::with_prefix("FISHY").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.config_path.as_os_str().is_empty() {
            return Err(ConfigError::Message("paths.config_path must not be empty".into()));
        }

        if self.paths.results_dir.as_os_str().is_empty() {
            return Err(ConfigError::Message("paths.results_dir must not be empty".into()));
        }

        if self.fetcher.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("fetcher.user_agent must not be empty".into()));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Message("logging.filter must not be empty".into()));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                config_path: PathBuf::from("config/config.json"),
                results_dir: PathBuf::from("results"),
            },
            fetcher: FetcherConfig::default(),
            logging: LoggingConfig {
                filter: "fishysearch=info".to_string(),
                directory: None,
            },
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: 30,
        }
    }
}
