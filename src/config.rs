use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::aliases::{AliasError, AliasTable, CustomAlias};
use crate::naming::{FeaturingMode, Layout, ParseOptions, Parser, ReleaseBound};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Application configuration loaded from TOML config file.
/// Every field has a default, so the config file is optional.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Which side of " - " holds the artists.
    pub layout: Layout,
    /// Only accept "(ft. ...)" clauses and reject unclosed ones.
    pub strict_featuring: bool,
    /// Reproduce the old release-tag search window.
    pub legacy_release_bound: bool,
    /// Artist names containing delimiters (merged after the built-in aliases).
    pub aliases: Vec<CustomAlias>,
}

impl AppConfig {
    /// Load config from `~/.config/trackname/config.toml`.
    /// A missing file means defaults; an unreadable or invalid one is logged
    /// and also falls back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path().filter(|p| p.exists()) else {
            log::debug!("No config file found, using defaults");
            return Self::default();
        };
        Self::read(&path).unwrap_or_else(|e| {
            log::warn!("{}. Using defaults.", e);
            Self::default()
        })
    }

    /// Read and parse one config file.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            layout: self.layout,
            featuring: if self.strict_featuring {
                FeaturingMode::Strict
            } else {
                FeaturingMode::Tolerant
            },
            release_bound: if self.legacy_release_bound {
                ReleaseBound::Legacy
            } else {
                ReleaseBound::Independent
            },
        }
    }

    /// Build the parser described by this config.
    pub fn parser(&self) -> Result<Parser, AliasError> {
        let aliases = AliasTable::with_custom(&self.aliases)?;
        log::debug!("Alias table has {} entries", aliases.len());
        Ok(Parser::new(aliases, self.parse_options()))
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn full_config_parses() {
        let config = AppConfig::from_toml(
            r#"
            layout = "title-first"
            strict_featuring = true
            legacy_release_bound = true

            [[aliases]]
            name = "Camo & Krooked"

            [[aliases]]
            name = "Dimension x Sub Focus"
            placeholder = "__dim_subfocus__"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.parse_options(),
            ParseOptions {
                layout: Layout::TitleFirst,
                featuring: FeaturingMode::Strict,
                release_bound: ReleaseBound::Legacy,
            }
        );
        assert_eq!(config.aliases.len(), 2);
        assert_eq!(config.aliases[1].placeholder.as_deref(), Some("__dim_subfocus__"));
    }

    #[test]
    fn unknown_layout_is_an_error() {
        assert!(AppConfig::from_toml(r#"layout = "sideways""#).is_err());
    }

    #[test]
    fn parser_uses_custom_aliases() {
        let config = AppConfig::from_toml(
            r#"
            [[aliases]]
            name = "Camo & Krooked"
            "#,
        )
        .unwrap();
        let parser = config.parser().unwrap();
        let r = parser.parse("camo & krooked & Other - Song").unwrap();
        assert_eq!(r.artists, vec!["Camo & Krooked", "Other"]);
    }

    #[test]
    fn read_reports_missing_and_invalid_files() {
        let dir = std::env::temp_dir().join(format!("trackname-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("missing.toml");
        assert!(matches!(AppConfig::read(&missing), Err(ConfigError::Read { .. })));

        let invalid = dir.join("invalid.toml");
        std::fs::write(&invalid, "strict_featuring = \"yes\"").unwrap();
        assert!(matches!(AppConfig::read(&invalid), Err(ConfigError::Parse { .. })));

        let valid = dir.join("valid.toml");
        std::fs::write(&valid, "strict_featuring = true").unwrap();
        let config = AppConfig::read(&valid).unwrap();
        assert!(config.strict_featuring);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bad_placeholder_is_reported() {
        let config = AppConfig::from_toml(
            r#"
            [[aliases]]
            name = "A & B"
            placeholder = "a & b"
            "#,
        )
        .unwrap();
        assert!(config.parser().is_err());
    }
}
