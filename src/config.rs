//! Provider configuration.
//!
//! Settings come from CLI flags (with environment fallbacks handled by clap)
//! and an optional JSON config file. Explicit flags win over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::poll::{DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL, PollConfig};

pub const DEFAULT_STATE_FILE: &str = "terraform.tfstate";
const STATE_DIR: &str = "pcc-policy";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{0}'")]
    Missing(&'static str),

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config file '{path}' is invalid: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Partially specified settings from a single source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    pub console_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub project: Option<String>,
    pub skip_cert_verification: Option<bool>,
    /// Seconds between visibility checks after create.
    pub poll_interval_secs: Option<u64>,
    pub poll_attempts: Option<u32>,
}

impl ProviderSettings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Fills unset fields of `self` from `fallback`.
    pub fn or(self, fallback: ProviderSettings) -> Self {
        Self {
            console_url: self.console_url.or(fallback.console_url),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
            project: self.project.or(fallback.project),
            skip_cert_verification: self
                .skip_cert_verification
                .or(fallback.skip_cert_verification),
            poll_interval_secs: self.poll_interval_secs.or(fallback.poll_interval_secs),
            poll_attempts: self.poll_attempts.or(fallback.poll_attempts),
        }
    }

    pub fn resolve(self) -> Result<ProviderConfig, ConfigError> {
        let console_url = self
            .console_url
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("console_url"))?;
        let username = self
            .username
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("username"))?;
        let password = self
            .password
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("password"))?;

        Ok(ProviderConfig {
            console_url: console_url.trim_end_matches('/').to_string(),
            username,
            password,
            project: self.project.filter(|s| !s.is_empty()),
            skip_cert_verification: self.skip_cert_verification.unwrap_or(false),
            poll: PollConfig {
                interval: self
                    .poll_interval_secs
                    .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs),
                max_attempts: self.poll_attempts.unwrap_or(DEFAULT_POLL_ATTEMPTS),
            },
        })
    }
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub console_url: String,
    pub username: String,
    pub password: String,
    pub project: Option<String>,
    pub skip_cert_verification: bool,
    pub poll: PollConfig,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("console_url", &self.console_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("project", &self.project)
            .field("skip_cert_verification", &self.skip_cert_verification)
            .field("poll", &self.poll)
            .finish()
    }
}

/// `$XDG_DATA_HOME/pcc-policy/terraform.tfstate`, or the working directory
/// when no data directory is known.
pub fn default_state_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(STATE_DIR).join(DEFAULT_STATE_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> ProviderSettings {
        ProviderSettings {
            console_url: Some("https://console.example.com/".to_string()),
            username: Some("admin".to_string()),
            password: Some("hunter2".to_string()),
            project: None,
            skip_cert_verification: None,
            poll_interval_secs: None,
            poll_attempts: None,
        }
    }

    #[test]
    fn test_resolve_trims_trailing_slash() {
        let config = full().resolve().unwrap();
        assert_eq!(config.console_url, "https://console.example.com");
        assert!(!config.skip_cert_verification);
        assert!(config.project.is_none());
        assert_eq!(config.poll, PollConfig::default());
    }

    #[test]
    fn test_resolve_poll_overrides() {
        let settings = ProviderSettings {
            poll_interval_secs: Some(5),
            poll_attempts: Some(4),
            ..full()
        };
        let config = settings.resolve().unwrap();
        assert_eq!(config.poll.interval, Duration::from_secs(5));
        assert_eq!(config.poll.max_attempts, 4);
    }

    #[test]
    fn test_resolve_missing_password() {
        let settings = ProviderSettings {
            password: None,
            ..full()
        };
        let err = settings.resolve().unwrap_err();
        assert_eq!(err.to_string(), "missing required setting 'password'");
    }

    #[test]
    fn test_resolve_treats_empty_as_missing() {
        let settings = ProviderSettings {
            console_url: Some(String::new()),
            ..full()
        };
        assert!(matches!(
            settings.resolve(),
            Err(ConfigError::Missing("console_url"))
        ));
    }

    #[test]
    fn test_flags_take_precedence_over_file() {
        let flags = ProviderSettings {
            username: Some("flag_user".to_string()),
            ..Default::default()
        };
        let merged = flags.or(full());
        assert_eq!(merged.username.as_deref(), Some("flag_user"));
        assert_eq!(merged.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(
            &path,
            r#"{"console_url": "https://c", "username": "u", "password": "p", "project": "Central Console", "skip_cert_verification": true, "poll_attempts": 10}"#,
        )
        .unwrap();

        let settings = ProviderSettings::from_file(&path).unwrap();
        assert_eq!(settings.project.as_deref(), Some("Central Console"));
        assert_eq!(settings.skip_cert_verification, Some(true));
        assert_eq!(settings.poll_attempts, Some(10));
        assert!(settings.poll_interval_secs.is_none());
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(&path, r#"{"consoleurl": "https://c"}"#).unwrap();
        assert!(matches!(
            ProviderSettings::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let err = ProviderSettings::from_file(Path::new("/nonexistent/creds.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_debug_does_not_expose_password() {
        let config = full().resolve().unwrap();
        let debug_output = format!("{:?}", config);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_default_state_path_file_name() {
        let path = default_state_path();
        assert!(path.ends_with(DEFAULT_STATE_FILE));
    }
}
