//! Library configuration

use arbor_parser::DebugLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`LibraryConfig`]
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Library configuration
///
/// ```toml
/// root_dir = "assets/ai"
/// debug_level = 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory file references are resolved against
    pub root_dir: PathBuf,
    /// Parser diagnostic verbosity
    pub debug_level: DebugLevel,
}

impl LibraryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With root directory
    #[inline]
    #[must_use]
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// With parser debug level
    #[inline]
    #[must_use]
    pub fn with_debug_level(mut self, debug_level: DebugLevel) -> Self {
        self.debug_level = debug_level;
        self
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] if the text is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Toml`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            debug_level: DebugLevel::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LibraryConfig::new();
        assert_eq!(config.root_dir, PathBuf::from("."));
        assert_eq!(config.debug_level, DebugLevel::NONE);
    }

    #[test]
    fn builder_methods() {
        let config = LibraryConfig::new()
            .with_root_dir("assets/ai")
            .with_debug_level(DebugLevel::LOW);
        assert_eq!(config.root_dir, PathBuf::from("assets/ai"));
        assert_eq!(config.debug_level, DebugLevel::LOW);
    }

    #[test]
    fn parses_partial_toml() {
        let config = LibraryConfig::from_toml_str("debug_level = 2").unwrap();
        assert_eq!(config.debug_level, DebugLevel::HIGH);
        assert_eq!(config.root_dir, PathBuf::from("."));
    }

    #[test]
    fn rejects_unknown_types() {
        let err = LibraryConfig::from_toml_str("debug_level = \"loud\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arbor.toml");
        std::fs::write(&path, "root_dir = \"trees\"\ndebug_level = 1\n").unwrap();

        let config = LibraryConfig::load(&path).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("trees"));
        assert_eq!(config.debug_level, DebugLevel::LOW);

        assert!(matches!(
            LibraryConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
