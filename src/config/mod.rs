//! Configuration management for gleaner.
//!
//! Configuration is read from `~/.config/gleaner/config.toml` unless another
//! path is given. If the default file doesn't exist, one with comments is
//! created. Missing fields use default values.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::engine::{CollectConfig, Timeouts};
use crate::session::SessionConfig;
use crate::surface::Selectors;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub collect: CollectConfig,
    pub timeouts: Timeouts,
    pub files: FilesConfig,
    pub selectors: Selectors,
}

/// Input and output file locations. Relative paths resolve against the
/// working directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// JSON array of session cookies
    pub cookies: PathBuf,

    /// Newline-delimited link substrings to skip
    pub denylist: PathBuf,

    /// Newline-delimited search keywords
    pub keywords: PathBuf,

    /// SQLite database; defaults to the platform data directory
    pub database: Option<PathBuf>,

    /// Log file written next to the console output; empty disables it
    pub log_file: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            cookies: PathBuf::from("facebook_cookies.json"),
            denylist: PathBuf::from("white_list.txt"),
            keywords: PathBuf::from("keywords.txt"),
            database: None,
            log_file: PathBuf::from("scraper.log"),
        }
    }
}

impl FilesConfig {
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => {
                let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
                Ok(data_dir.join("gleaner").join("posts.db"))
            }
        }
    }

    pub fn log_path(&self) -> Option<&Path> {
        if self.log_file.as_os_str().is_empty() {
            None
        } else {
            Some(&self.log_file)
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// An explicit path must exist. The default path is created with
    /// commented defaults on first use.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail once the browser is up
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.session.home_url).map_err(|e| ConfigError::InvalidUrl {
            value: self.session.home_url.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Get the default config file path: `~/.config/gleaner/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("gleaner").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# gleaner configuration
#
# Every value below is the built-in default; delete what you don't change.

[session]
# Run Chrome without a visible window
headless = false

# Proxy server passed to Chrome, e.g. "http://127.0.0.1:8080"
# proxy = ""

# Reuse a logged-in Chrome profile instead of (or as well as) cookies
# user_data_dir = "/path/to/chrome/user-data"
# profile_name = "Default"

home_url = "https://www.facebook.com/"

# A location containing this after login means the cookies didn't work
login_marker = "login"
login_settle_secs = 5

[collect]
# Posts collected per keyword
max_posts = 15

# Each keyword gets max_posts * secs_per_post seconds in total
secs_per_post = 5

# Consecutive scrolls that load nothing before giving up on a keyword
max_stalled_scrolls = 5

# Posts written to the database at a time
batch_size = 5

poll_interval_ms = 250
scroll_settle_ms = 500

[timeouts]
# Upper bounds in seconds for each wait on the page
search_input_secs = 10
location_change_secs = 15
results_secs = 20
captcha_secs = 5
expand_secs = 5
viewport_secs = 10
tooltip_secs = 10
permalink_secs = 15
ready_state_secs = 15
back_secs = 10
scroll_growth_secs = 10

[files]
cookies = "facebook_cookies.json"
denylist = "white_list.txt"
keywords = "keywords.txt"
# database = "posts.db"
log_file = "scraper.log"

# [selectors]
# CSS selectors for the results page. Override single entries when the
# site's markup changes, e.g.
# post_container = "div.x1yztbdb.x1n2onr6.xh8yej3.x1ja2u2z"
# see_more_labels = ["See more", "Xem thêm"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to read/write file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.collect.max_posts, 15);
        assert_eq!(config.timeouts.results_secs, 20);
        assert_eq!(config.files.keywords, PathBuf::from("keywords.txt"));
        assert_eq!(config.session.home_url, "https://www.facebook.com/");
        assert_eq!(config.selectors.see_more_labels, vec!["See more", "Xem thêm"]);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[collect]
max_posts = 40

[selectors]
see_more_labels = ["Ver más"]
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.collect.max_posts, 40);
        assert_eq!(config.collect.batch_size, 5);
        assert_eq!(config.selectors.see_more_labels, vec!["Ver más"]);
        assert_eq!(config.selectors.captcha, "iframe[title*=\"CAPTCHA\"]");
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.collect.max_stalled_scrolls, 5);
        assert!(!config.session.headless);
    }

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gleaner.toml");

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));

        fs::write(&path, "[session]\nheadless = true\n").unwrap();
        assert!(Config::load(Some(&path)).unwrap().session.headless);

        fs::write(&path, "[session]\nhome_url = \"not a url\"\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::InvalidUrl { .. })
        ));

        fs::write(&path, "[session\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_file_paths() {
        let files = FilesConfig {
            database: Some(PathBuf::from("/tmp/posts.db")),
            log_file: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(files.database_path().unwrap(), PathBuf::from("/tmp/posts.db"));
        assert!(files.log_path().is_none());
        assert_eq!(
            FilesConfig::default().log_path(),
            Some(Path::new("scraper.log"))
        );
    }
}
