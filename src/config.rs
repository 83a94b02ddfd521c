use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::documentation::DEFAULT_DOCUMENTATION_BASE_URL;
use crate::version::comparator::VersionOrdering;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolution configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolutionConfig {
    pub version_ordering: VersionOrdering,
    pub selector_cache: SelectorCacheConfig,
    pub documentation: DocumentationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectorCacheConfig {
    pub enabled: bool,
}

impl Default for SelectorCacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentationConfig {
    pub base_url: String,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DOCUMENTATION_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Log file path; logs go to stderr when unset
    pub file: Option<PathBuf>,
}

impl ResolutionConfig {
    /// Load the configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    /// A missing default file yields the default configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = config_path();
                if path.exists() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Returns the path to the config directory for version-resolution.
/// Uses $XDG_CONFIG_HOME/version-resolution if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/version-resolution,
/// or ./version-resolution if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("version-resolution")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn resolution_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<ResolutionConfig>(json!({
            "versionOrdering": "extended"
        }))
        .unwrap();

        assert_eq!(result.version_ordering, VersionOrdering::Extended);
        assert_eq!(result.selector_cache, SelectorCacheConfig::default());
        assert_eq!(result.documentation.base_url, DEFAULT_DOCUMENTATION_BASE_URL);
    }

    #[test]
    fn resolution_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<ResolutionConfig>(json!({
            "versionOrdering": "standard",
            "selectorCache": { "enabled": false },
            "documentation": { "baseUrl": "https://example.com/docs" },
            "logging": { "format": "json", "file": "/tmp/resolution.log" }
        }))
        .unwrap();

        assert_eq!(
            result,
            ResolutionConfig {
                version_ordering: VersionOrdering::Standard,
                selector_cache: SelectorCacheConfig { enabled: false },
                documentation: DocumentationConfig {
                    base_url: "https://example.com/docs".to_string()
                },
                logging: LoggingConfig {
                    format: LogFormat::Json,
                    file: Some(PathBuf::from("/tmp/resolution.log")),
                },
            }
        );
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "selectorCache": {{ "enabled": false }} }}"#).unwrap();

        let config = ResolutionConfig::load(file.path()).unwrap();

        assert!(!config.selector_cache.enabled);
    }

    #[test]
    fn load_reports_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = ResolutionConfig::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = ResolutionConfig::load(&dir.path().join("missing.json")).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn config_dir_with_env_uses_xdg_config_home_when_set() {
        let path = config_dir_with_env(
            Some("/tmp/test-config".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-config/version-resolution"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_home_config() {
        let path = config_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.config/version-resolution"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = config_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./version-resolution"));
    }
}
