use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_REQUEST_TIMEOUT_SECS, DICTIONARY_PATH};
use crate::error::{PdpError, Result};
use crate::pipeline::normalize::analysis::AnalysisPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_FILE_STORE_URL: &str = "WEBDAV_URL";
pub const ENV_FILE_STORE_USER: &str = "WEBDAV_USERNAME";
pub const ENV_FILE_STORE_PASSWORD: &str = "WEBDAV_PASSWORD";
pub const ENV_API_BASE_URL: &str = "SALSIFY_API_URL";
pub const ENV_API_KEY: &str = "SALSIFY_API_KEY";

/// Credentials and endpoints for the two upstream collaborators.
#[derive(Clone)]
pub struct Config {
    pub file_store_url: String,
    pub file_store_user: String,
    pub file_store_password: String,
    pub api_base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("file_store_url", &self.file_store_url)
            .field("file_store_user", &self.file_store_user)
            .field("file_store_password", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Reads every required option from the process environment. A `.env` file is
    /// picked up first when one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PdpError::Config(format!("environment variable {key} is not set")))
        };

        Ok(Self {
            file_store_url: required(ENV_FILE_STORE_URL)?,
            file_store_user: required(ENV_FILE_STORE_USER)?,
            file_store_password: required(ENV_FILE_STORE_PASSWORD)?,
            api_base_url: required(ENV_API_BASE_URL)?,
            api_key: required(ENV_API_KEY)?,
        })
    }
}

/// Tunables for a run, optionally loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub dictionary_path: String,
    pub request_timeout_secs: u64,
    pub strict_analysis: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            dictionary_path: DICTIONARY_PATH.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            strict_analysis: false,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PdpError::Config(format!("Failed to read settings file '{}': {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn analysis_policy(&self) -> AnalysisPolicy {
        if self.strict_analysis {
            AnalysisPolicy::Strict
        } else {
            AnalysisPolicy::Lenient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (ENV_FILE_STORE_URL, "https://dav.example.com".to_string()),
            (ENV_FILE_STORE_USER, "reader".to_string()),
            (ENV_FILE_STORE_PASSWORD, "hunter2".to_string()),
            (ENV_API_BASE_URL, "https://api.example.com/v1/orgs/acme".to_string()),
            (ENV_API_KEY, "secret-key".to_string()),
        ])
    }

    #[test]
    fn test_config_from_complete_environment() {
        let env = full_env();
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.file_store_url, "https://dav.example.com");
        assert_eq!(config.api_key, "secret-key");
    }

    #[test]
    fn test_config_names_missing_variable() {
        let mut env = full_env();
        env.remove(ENV_API_KEY);
        let err = Config::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_API_KEY));
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let env = full_env();
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("secret-key"));
    }

    #[test]
    fn test_settings_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str("strict_analysis = true\noutput_dir = \"out\"").unwrap();
        assert!(settings.strict_analysis);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(settings.dictionary_path, DICTIONARY_PATH);
        assert_eq!(settings.request_timeout(), Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        assert_eq!(settings.analysis_policy(), AnalysisPolicy::Strict);
    }
}
