//! Renderer configuration
//!
//! Settings live in TOML or RON files; the file extension picks the format.
//! Values are checked with [`RenderConfig::validate`] before a render feature
//! accepts them.

mod render_config;

use std::path::Path;

pub use render_config::{GBufferConfig, RenderConfig, ShadowConfig};
pub use serde::{Deserialize, Serialize};

/// File formats a configuration can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format implied by the extension of `path`
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Serde-backed settings that can be read from and written to disk
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read settings from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Write settings to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Errors reading, writing or checking a configuration
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid for the format
    #[error("Parse error: {0}")]
    Parse(String),

    /// Settings could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Extension is neither `.toml` nor `.ron`
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Settings parsed but hold values the renderer cannot use
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("render.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("dir/render.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("render")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let path = std::env::temp_dir().join("deferred_engine_missing_config.toml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(RenderConfig::load_from_file(&path), Err(ConfigError::Io(_))));
    }
}
