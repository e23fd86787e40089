//! Client configuration loaded from TOML.
//!
//! ```toml
//! query = "golang"
//!
//! [search]
//! deadline_ms = 50
//! replicas = 3
//! abandon = "cancel"
//!
//! [[search.sources]]
//! category = "Web"
//! payload = "web pages"
//! ```

use scatter_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ScatterError};

/// Query used when none is given on the command line or in the file.
pub const DEFAULT_QUERY: &str = "golang";

/// Top-level configuration for the scatter client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    /// Query sent when none is given on the command line.
    pub query: String,
    /// Aggregation settings.
    pub search: SearchConfig,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_owned(),
            search: SearchConfig::default(),
        }
    }
}

impl ScatterConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ScatterError::Config(e.to_string()))?;
        config.search.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from the default path if it exists,
    /// else fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be loaded.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    tracing::debug!(path = %default_path.display(), "loading default config");
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ScatterError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/scatter/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("scatter").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("scatter")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/scatter-config/config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scatter_search::AbandonPolicy;

    #[test]
    fn default_query_is_golang() {
        assert_eq!(ScatterConfig::default().query, "golang");
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = ScatterConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ScatterError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let result = ScatterConfig::from_file(&path);
        assert!(matches!(result, Err(ScatterError::Config(_))));
    }

    #[test]
    fn from_file_rejects_invalid_search_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("zero.toml");
        std::fs::write(&path, "[search]\nreplicas = 0\n").expect("write");

        let err = ScatterConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("replicas"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "query = \"rust\"\n[search]\ndeadline_ms = 20\nabandon = \"cancel\"\n",
        )
        .expect("write");

        let config = ScatterConfig::from_file(&path).expect("load");
        assert_eq!(config.query, "rust");
        assert_eq!(config.search.deadline_ms, 20);
        assert_eq!(config.search.abandon, AbandonPolicy::Cancel);
        assert_eq!(config.search.replicas, 3);
        assert_eq!(config.search.sources.len(), 3);
    }

    #[test]
    fn custom_sources_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sources.toml");
        std::fs::write(
            &path,
            "[[search.sources]]\ncategory = \"News\"\npayload = \"headlines\"\n\n\
             [[search.sources]]\ncategory = \"Maps\"\npayload = \"places\"\n",
        )
        .expect("write");

        let config = ScatterConfig::from_file(&path).expect("load");
        let categories: Vec<&str> = config
            .search
            .sources
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(categories, ["News", "Maps"]);
    }

    #[test]
    fn save_and_reload_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let mut config = ScatterConfig::default();
        config.search.seed = Some(9);
        config.search.abandon = AbandonPolicy::Cancel;

        config.save_to_file(&path).expect("save");
        let loaded = ScatterConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_with_explicit_missing_path_errors() {
        let result = ScatterConfig::load(Some(Path::new("/nonexistent/scatter.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = ScatterConfig::default_config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
