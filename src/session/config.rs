use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Run Chrome without a visible window (default: false)
    pub headless: bool,

    /// Proxy server URL passed to Chrome, e.g. `http://127.0.0.1:8080`
    pub proxy: Option<String>,

    /// Chrome user-data directory holding a persistent login
    pub user_data_dir: Option<PathBuf>,

    /// Profile directory inside the user-data directory, e.g. `Default`
    pub profile_name: Option<String>,

    /// Page the session authenticates against
    pub home_url: String,

    /// Substring of the location that means "not logged in"
    pub login_marker: String,

    /// Wait after reloading with cookies, in seconds (default: 5)
    pub login_settle_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: false,
            proxy: None,
            user_data_dir: None,
            profile_name: None,
            home_url: "https://www.facebook.com/".to_string(),
            login_marker: "login".to_string(),
            login_settle_secs: 5,
        }
    }
}

impl SessionConfig {
    pub fn login_settle(&self) -> Duration {
        Duration::from_secs(self.login_settle_secs)
    }

    /// The user-data directory to launch with, if a persistent identity was
    /// asked for. A bare profile name falls back to the platform's Chrome
    /// directory.
    pub fn identity_dir(&self) -> Option<PathBuf> {
        match (&self.user_data_dir, &self.profile_name) {
            (Some(dir), _) => Some(dir.clone()),
            (None, Some(_)) => default_chrome_data_dir(),
            (None, None) => None,
        }
    }
}

/// Where Chrome keeps its profiles on this platform
pub fn default_chrome_data_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir().map(|d| d.join("Google").join("Chrome").join("User Data"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir().map(|d| d.join("Google").join("Chrome"))
    } else {
        dirs::config_dir().map(|d| d.join("google-chrome"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert!(!config.headless);
        assert_eq!(config.login_marker, "login");
        assert_eq!(config.login_settle(), Duration::from_secs(5));
        assert!(config.identity_dir().is_none());
    }

    #[test]
    fn test_explicit_user_data_dir_wins() {
        let config = SessionConfig {
            user_data_dir: Some(PathBuf::from("/tmp/chrome")),
            profile_name: Some("Profile 1".to_string()),
            ..Default::default()
        };
        assert_eq!(config.identity_dir(), Some(PathBuf::from("/tmp/chrome")));
    }

    #[test]
    fn test_partial_toml() {
        let config: SessionConfig = toml::from_str("headless = true\nproxy = \"http://p:1\"").unwrap();
        assert!(config.headless);
        assert_eq!(config.proxy.as_deref(), Some("http://p:1"));
        assert_eq!(config.home_url, "https://www.facebook.com/");
    }
}
