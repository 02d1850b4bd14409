//! Configuration for a diff run
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (openapi-diff.toml)
//! - Environment variables (OPENAPI_DIFF__*)
//!
//! ## Example config file (openapi-diff.toml):
//! ```toml
//! include_examples = false
//! exclude_description = true
//! path_filter = "^/users"
//! filter_extension = "x-internal"
//! excluded_extensions = ["x-codegen-hint"]
//! deprecation_days = 30
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options for a single diff run. Read-only once a run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Compare `example` values
    #[serde(default)]
    pub include_examples: bool,

    /// Skip description, summary and title facets
    #[serde(default)]
    pub exclude_description: bool,

    /// Only report paths matching this regular expression
    #[serde(default)]
    pub path_filter: Option<String>,

    /// Ignore paths whose path item carries an extension key matching this expression
    #[serde(default)]
    pub filter_extension: Option<String>,

    /// Extension keys never reported by the extensions comparator
    #[serde(default)]
    pub excluded_extensions: Vec<String>,

    /// Minimum deprecation window, in days, checked against `x-sunset` (0 disables)
    #[serde(default)]
    pub deprecation_days: i64,

    /// Deepest schema nesting the comparator will descend into
    #[serde(default = "default_max_schema_depth")]
    pub max_schema_depth: usize,
}

fn default_max_schema_depth() -> usize {
    64
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            include_examples: false,
            exclude_description: false,
            path_filter: None,
            filter_extension: None,
            excluded_extensions: Vec::new(),
            deprecation_days: 0,
            max_schema_depth: default_max_schema_depth(),
        }
    }
}

impl DiffConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "openapi-diff.toml",
            ".openapi-diff.toml",
            "config/openapi-diff.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "openapi-diff") {
            let xdg_config = config_dir.config_dir().join("openapi-diff.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("OPENAPI_DIFF")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiffConfig::default();
        assert!(!config.include_examples);
        assert!(config.path_filter.is_none());
        assert_eq!(config.deprecation_days, 0);
        assert_eq!(config.max_schema_depth, 64);
    }

    #[test]
    fn test_serialize_config() {
        let config = DiffConfig {
            excluded_extensions: vec!["x-codegen".to_string()],
            ..DiffConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("include_examples = false"));
        assert!(toml_str.contains("x-codegen"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diff.toml");
        std::fs::write(
            &path,
            "include_examples = true\npath_filter = \"^/users\"\ndeprecation_days = 30\n",
        )
        .unwrap();

        let config = DiffConfig::load_from(path.to_str()).unwrap();
        assert!(config.include_examples);
        assert_eq!(config.path_filter.as_deref(), Some("^/users"));
        assert_eq!(config.deprecation_days, 30);
        assert_eq!(config.max_schema_depth, 64);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let config = DiffConfig {
            exclude_description: true,
            ..DiffConfig::default()
        };
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = DiffConfig::load_from(path.to_str()).unwrap();
        assert!(loaded.exclude_description);
    }
}
