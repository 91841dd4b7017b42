//! Task service and local profile settings.

use std::path::PathBuf;

use crate::config::env_var;

pub const API_URL_VAR: &str = "TASKDASH_API_URL";
pub const PROFILE_DIR_VAR: &str = "TASKDASH_PROFILE_DIR";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Base URL of the task service, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `TASKDASH_API_URL`, defaulting to `http://localhost:8000`.
    pub fn from_env() -> Self {
        Self::new(env_var(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Directory holding the durable credential entry.
///
/// `TASKDASH_PROFILE_DIR`, else `$HOME/.taskdash`, else `./.taskdash`.
pub fn profile_dir_from_env() -> PathBuf {
    if let Some(dir) = env_var(PROFILE_DIR_VAR) {
        return PathBuf::from(dir);
    }
    env_var("HOME")
        .map(|home| PathBuf::from(home).join(".taskdash"))
        .unwrap_or_else(|| PathBuf::from(".taskdash"))
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::path::PathBuf;

    use serial_test::serial;

    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ApiConfig::new("https://api.example.com/");
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.url("/todos"), "https://api.example.com/todos");
    }

    #[test]
    #[serial]
    fn test_api_url_default_and_override() {
        env::remove_var(API_URL_VAR);
        assert_eq!(ApiConfig::from_env().base_url, DEFAULT_API_URL);

        env::set_var(API_URL_VAR, "http://tasks.internal:9000/");
        assert_eq!(ApiConfig::from_env().base_url, "http://tasks.internal:9000");

        env::remove_var(API_URL_VAR);
    }

    #[test]
    #[serial]
    fn test_profile_dir_override() {
        env::set_var(PROFILE_DIR_VAR, "/tmp/taskdash-profile");
        assert_eq!(profile_dir_from_env(), PathBuf::from("/tmp/taskdash-profile"));
        env::remove_var(PROFILE_DIR_VAR);
    }
}
