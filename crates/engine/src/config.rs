//! Content manager configuration via `folio.toml`
//!
//! Holds the defaults a `ContentManager` applies when the caller does not
//! choose: which version `get` resolves, which state `create` produces, and
//! how many results a query page holds. A default `folio.toml` can be
//! written next to the application data; edit it to change settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use folio_core::{FolioError, FolioResult, VersionOptions};

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "folio.toml";

/// Content manager configuration loaded from `folio.toml`.
///
/// # Example
///
/// ```toml
/// # Version requested by get() when the caller does not specify one
/// default_get = "published"
/// # Version state given to create() when the caller does not specify one
/// default_create = "published"
/// # Page size used by ContentQuery::page
/// page_size = 50
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Options used by `get_default`, e.g. `"published"` or `"latest"`.
    #[serde(default = "default_published")]
    pub default_get: String,
    /// Options used by `create_default`: `"published"`, `"draft"` or `"number:<n>"`.
    #[serde(default = "default_published")]
    pub default_create: String,
    /// Number of items per query page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_published() -> String {
    "published".to_string()
}

fn default_page_size() -> usize {
    50
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            default_get: default_published(),
            default_create: default_published(),
            page_size: default_page_size(),
        }
    }
}

impl FolioConfig {
    /// Parse `default_get` into `VersionOptions`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a recognized option, or is `"all"`.
    pub fn default_get_options(&self) -> FolioResult<VersionOptions> {
        let options: VersionOptions = self.default_get.parse().map_err(|e: FolioError| {
            FolioError::config(format!("Invalid default_get in folio.toml: {}", e))
        })?;
        if options == VersionOptions::AllVersions {
            return Err(FolioError::config(
                "Invalid default_get 'all' in folio.toml. A single get resolves one version.",
            ));
        }
        Ok(options)
    }

    /// Parse `default_create` into `VersionOptions`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the string is `"published"`, `"draft"` or
    /// `"number:<n>"`.
    pub fn default_create_options(&self) -> FolioResult<VersionOptions> {
        let options: VersionOptions = self.default_create.parse().map_err(|e: FolioError| {
            FolioError::config(format!("Invalid default_create in folio.toml: {}", e))
        })?;
        match options {
            VersionOptions::Published | VersionOptions::Draft | VersionOptions::Number(_) => {
                Ok(options)
            }
            other => Err(FolioError::config(format!(
                "Invalid default_create '{}' in folio.toml. Expected \"published\", \"draft\" or \"number:<n>\".",
                other
            ))),
        }
    }

    /// Check every setting.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> FolioResult<()> {
        self.default_get_options()?;
        self.default_create_options()?;
        if self.page_size == 0 {
            return Err(FolioError::config(
                "Invalid page_size 0 in folio.toml. Expected a positive number.",
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Folio content manager configuration
#
# Version requested by get() when the caller does not specify one:
#   "published" (default), "latest", "draft", "draft-required", "number:<n>"
default_get = "published"

# Version state given to create() when the caller does not specify one:
#   "published" (default), "draft", "number:<n>"
default_create = "published"

# Page size used by ContentQuery::page (default: 50)
page_size = 50
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> FolioResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FolioError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: FolioConfig = toml::from_str(&content).map_err(|e| {
            FolioError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> FolioResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                FolioError::internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> FolioResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FolioError::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            FolioError::internal(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_published() {
        let config = FolioConfig::default();
        assert_eq!(config.default_get_options().unwrap(), VersionOptions::Published);
        assert_eq!(
            config.default_create_options().unwrap(),
            VersionOptions::Published
        );
        assert_eq!(config.page_size, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_latest_and_draft() {
        let config: FolioConfig =
            toml::from_str("default_get = \"latest\"\ndefault_create = \"draft\"").unwrap();
        assert_eq!(config.default_get_options().unwrap(), VersionOptions::Latest);
        assert_eq!(config.default_create_options().unwrap(), VersionOptions::Draft);
    }

    #[test]
    fn parse_numbered_create() {
        let config: FolioConfig = toml::from_str("default_create = \"number:3\"").unwrap();
        assert_eq!(
            config.default_create_options().unwrap(),
            VersionOptions::Number(3)
        );
    }

    #[test]
    fn create_rejects_latest() {
        let config: FolioConfig = toml::from_str("default_create = \"latest\"").unwrap();
        let err = config.default_create_options().unwrap_err();
        assert_eq!(err.error_code(), "Config");
    }

    #[test]
    fn get_rejects_all() {
        let config: FolioConfig = toml::from_str("default_get = \"all\"").unwrap();
        assert!(config.default_get_options().is_err());
    }

    #[test]
    fn parse_invalid_option_returns_error() {
        let config: FolioConfig = toml::from_str("default_get = \"newest\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config: FolioConfig = toml::from_str("page_size = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_toml_parses_correctly() {
        let config: FolioConfig = toml::from_str(FolioConfig::default_toml()).unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        FolioConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = FolioConfig::from_file(&path).unwrap();
        assert_eq!(config.default_get, "published");
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "default_get = \"latest\"\n").unwrap();
        FolioConfig::write_default_if_missing(&path).unwrap();

        let config = FolioConfig::from_file(&path).unwrap();
        assert_eq!(config.default_get, "latest");
    }

    #[test]
    fn from_file_with_missing_field_uses_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "").unwrap();

        let config = FolioConfig::from_file(&path).unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn from_file_rejects_invalid_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "page_size = 0\n").unwrap();

        assert!(FolioConfig::from_file(&path).is_err());
    }

    #[test]
    fn write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = FolioConfig {
            default_get: "latest".to_string(),
            default_create: "draft".to_string(),
            page_size: 10,
        };

        config.write_to_file(&path).unwrap();
        let parsed = FolioConfig::from_file(&path).unwrap();
        assert_eq!(parsed, config);
    }
}
