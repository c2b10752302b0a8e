use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// A cookie as exported by browser extensions or a WebDriver session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(default)]
    pub http_only: Option<bool>,
    /// Expiry in seconds since the epoch
    #[serde(default, alias = "expiry", alias = "expirationDate")]
    pub expires: Option<f64>,
    #[serde(default)]
    pub same_site: Option<String>,
}

/// Read a JSON array of cookies.
///
/// A missing or malformed file yields no cookies; the session then simply
/// stays unauthenticated.
pub fn load_cookies(path: &Path) -> Vec<StoredCookie> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!("Cookie file {} not found: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<StoredCookie>>(&content) {
        Ok(cookies) => {
            info!("Cookies loaded from {}", path.display());
            cookies
        }
        Err(e) => {
            error!("Cookie file {} is invalid: {}", path.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_no_cookies() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_cookies(&dir.path().join("absent.json")).is_empty());
    }

    #[test]
    fn test_malformed_file_yields_no_cookies() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(load_cookies(file.path()).is_empty());
    }

    #[test]
    fn test_webdriver_export_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "c_user", "value": "42", "domain": ".facebook.com", "path": "/",
                  "secure": true, "httpOnly": false, "expiry": 1900000000, "sameSite": "None"}},
                {{"name": "xs", "value": "abc"}}
            ]"#
        )
        .unwrap();

        let cookies = load_cookies(file.path());
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].domain.as_deref(), Some(".facebook.com"));
        assert_eq!(cookies[0].http_only, Some(false));
        assert_eq!(cookies[0].expires, Some(1_900_000_000.0));
        assert_eq!(cookies[0].same_site.as_deref(), Some("None"));
        assert_eq!(cookies[1].domain, None);
    }
}
