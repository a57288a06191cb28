//! Credential file discovery and loading.
//!
//! The credential file is a JSON object with two required string keys:
//!
//! ```json
//! { "api_key": "...", "api_url": "https://api.example.com/v1" }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;

/// Credential file path relative to the working directory.
pub const DEFAULT_CREDENTIALS_PATH: &str = "assets/credentials.json";

/// API credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API key sent with every request.
    pub api_key: String,
    /// API base URL.
    pub api_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Deserialize)]
struct RawCredentials {
    api_key: Option<String>,
    api_url: Option<String>,
}

impl Credentials {
    /// Loads credentials from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let raw: RawCredentials =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let api_key = required(raw.api_key, "api_key", path)?;
        let api_url = required(raw.api_url, "api_url", path)?;

        info!(path = %path.display(), "Loaded credentials");
        Ok(Self { api_key, api_url })
    }

    /// Locates the credential file and loads it.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = locate(explicit)?;
        Self::load_from(&path)
    }
}

fn required(value: Option<String>, key: &'static str, path: &Path) -> Result<String, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::MissingKey {
        key,
        path: path.to_path_buf(),
    })?;

    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key,
            path: path.to_path_buf(),
            reason: "value is empty".to_string(),
        });
    }
    Ok(value)
}

/// Returns the user-level credential file path.
///
/// - Linux: `~/.config/outagesync/credentials.json`
/// - macOS: `~/Library/Application Support/outagesync/credentials.json`
pub fn user_credentials_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("outagesync").join("credentials.json"))
}

/// Candidate paths in lookup order.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => std::iter::once(PathBuf::from(DEFAULT_CREDENTIALS_PATH))
            .chain(user_credentials_path())
            .collect(),
    }
}

/// Finds the credential file.
///
/// An explicit path is used as-is and must exist. Otherwise the working
/// directory's `assets/credentials.json` is tried, then the user config dir.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let candidates = candidate_paths(explicit);

    for path in &candidates {
        if path.is_file() {
            debug!(path = %path.display(), "Using credential file");
            return Ok(path.clone());
        }
        debug!(path = %path.display(), "Credential file not present");
    }

    Err(ConfigError::NotFound {
        searched: candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"{"api_key": "abc123", "api_url": "https://api.example.com/v1"}"#,
        );

        let creds = Credentials::load_from(&path).unwrap();

        assert_eq!(creds.api_key, "abc123");
        assert_eq!(creds.api_url, "https://api.example.com/v1");
    }

    #[test]
    fn test_extra_keys_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"{"api_key": "k", "api_url": "https://x", "comment": "staging"}"#,
        );

        assert!(Credentials::load_from(&path).is_ok());
    }

    #[test]
    fn test_missing_api_key_names_key_and_path() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"api_url": "https://api.example.com"}"#);

        let err = Credentials::load_from(&path).unwrap_err();

        assert!(matches!(err, ConfigError::MissingKey { key: "api_key", .. }));
        let msg = err.to_string();
        assert!(msg.contains("'api_key' is required"));
        assert!(msg.contains(&path.display().to_string()));
    }

    #[test]
    fn test_missing_api_url() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"api_key": "abc"}"#);

        let err = Credentials::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { key: "api_url", .. }));
    }

    #[test]
    fn test_empty_value_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"api_key": " ", "api_url": "https://x"}"#);

        let err = Credentials::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "api_key", .. }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "{not json");

        let err = Credentials::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_wrong_value_type() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"api_key": 42, "api_url": "https://x"}"#);

        assert!(matches!(
            Credentials::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");

        assert!(matches!(
            Credentials::load_from(&path),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_locate_explicit_path_only() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");

        match locate(Some(&missing)) {
            Err(ConfigError::NotFound { searched }) => assert_eq!(searched, vec![missing]),
            other => panic!("Expected NotFound, got: {other:?}"),
        }

        let present = write(&dir, "{}");
        assert_eq!(locate(Some(&present)).unwrap(), present);
    }

    #[test]
    fn test_default_candidates_start_with_assets() {
        let candidates = candidate_paths(None);
        assert_eq!(candidates[0], PathBuf::from(DEFAULT_CREDENTIALS_PATH));
    }

    #[test]
    fn test_debug_redacts_key() {
        let creds = Credentials {
            api_key: "super-secret".to_string(),
            api_url: "https://x".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("super-secret"));
    }
}
