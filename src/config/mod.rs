use crate::constants::{DEFAULT_DATA_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECONDS, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Primary base URL the data files are fetched from. Should include
    /// the https:// prefix.
    pub data_base_url: String,
    /// Secondary base URL tried when the primary fails. If not specified,
    /// only the primary source is attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_base_url: Option<String>,
    /// Path to the log file. If not specified, logs are written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for resource requests. Defaults to 30 seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_base_url: DEFAULT_DATA_BASE_URL.to_string(),
            fallback_base_url: None,
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing config file yields the built-in defaults (published data
    /// host, no fallback). Environment variables override file values.
    ///
    /// # Environment Variables
    /// - `CASTAWAY_DATA_URL` - Override primary data base URL
    /// - `CASTAWAY_FALLBACK_URL` - Override fallback base URL
    /// - `CASTAWAY_LOG_FILE` - Override log file path
    /// - `CASTAWAY_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded or defaulted configuration
    /// * `Err(AppError)` - Error occurred during load or validation
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // Override with environment variables if present
        if let Ok(base_url) = std::env::var(env_vars::DATA_BASE_URL) {
            config.data_base_url = base_url;
        }

        if let Ok(fallback) = std::env::var(env_vars::FALLBACK_BASE_URL) {
            config.fallback_base_url = Some(fallback);
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            config.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.http_timeout_seconds = timeout;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(
            &self.data_base_url,
            &self.fallback_base_url,
            &self.log_file_path,
        )
    }

    /// Base URLs in the order they should be attempted, trailing slashes
    /// trimmed so resource paths join cleanly.
    pub fn sources(&self) -> Vec<String> {
        let mut sources = vec![self.data_base_url.trim_end_matches('/').to_string()];
        if let Some(fallback) = &self.fallback_base_url {
            sources.push(fallback.trim_end_matches('/').to_string());
        }
        sources
    }

    /// Saves current configuration to the default config file location.
    ///
    /// # Notes
    /// - Creates config directory if it doesn't exist
    /// - Uses TOML format for storage
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Notes
    /// - Shows config file location and current settings
    /// - Handles case when no config file exists
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("Data Base URL:");
            println!("{}", config.data_base_url);
            println!("────────────────────────────────────");
            println!("Fallback Base URL:");
            match &config.fallback_base_url {
                Some(fallback) => println!("{fallback}"),
                None => println!("(none)"),
            }
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            println!("{} seconds", config.http_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/castaway_tracker.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
            println!("Built-in defaults are in effect.");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and ensures the
    /// primary base URL carries an https:// prefix.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - Error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let data_base_url = if !self.data_base_url.starts_with("https://") {
            format!(
                "https://{}",
                self.data_base_url.trim_start_matches("http://")
            )
        } else {
            self.data_base_url.clone()
        };
        let content = toml::to_string_pretty(&Config {
            data_base_url,
            fallback_base_url: self.fallback_base_url.clone(),
            log_file_path: self.log_file_path.clone(),
            http_timeout_seconds: self.http_timeout_seconds,
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path (for testing).
    #[allow(dead_code)] // Used in tests
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
