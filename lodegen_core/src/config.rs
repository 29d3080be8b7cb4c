//! Run configuration loaded from TOML.
//!
//! ```toml
//! inputs = ["prov-o.rdf", "test"]
//! target_directory = "target/docs"
//! target_file_names = ["prov-o.html", "test.html"]
//! catalog = "catalog-v001.xml"
//! resource_path = ["src/main/resources"]
//!
//! [options]
//! language = "en"
//! use_owlapi = true
//!
//! [command]
//! program = "lode"
//! args = ["--quiet"]
//! ```

use crate::error::{Error, Result};
use crate::transform::{CommandTransformer, TransformOptions};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// External transformer program.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandConfig {
    pub fn transformer(&self) -> CommandTransformer {
        CommandTransformer::new(self.program.clone(), self.args.clone())
    }
}

/// Settings for one generation run. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Top-level input addresses.
    pub inputs: Vec<String>,
    /// Directory generated documents are written below.
    pub target_directory: Option<PathBuf>,
    /// Output names, none or one per input.
    pub target_file_names: Vec<String>,
    /// Ontology catalog address.
    pub catalog: Option<String>,
    /// Directories and archives searched for relative addresses.
    pub resource_path: Vec<PathBuf>,
    pub options: TransformOptions,
    /// Use an external transformer instead of the built-in preview.
    pub command: Option<CommandConfig>,
}

impl GeneratorConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GeneratorConfig::parse("").unwrap();
        assert!(config.inputs.is_empty());
        assert_eq!(config.options, TransformOptions::default());
        assert!(config.command.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = GeneratorConfig::parse(
            r#"
            inputs = ["prov-o.rdf", "jar:file:/m.jar!/test2/"]
            target_directory = "out"
            target_file_names = ["prov-o.html", "test2.html"]
            catalog = "catalog-v001.xml"
            resource_path = ["res", "deps.jar"]

            [options]
            language = "fr"
            use_reasoner = true
            deep_import = false

            [command]
            program = "lode"
            "#,
        )
        .unwrap();

        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.target_directory, Some(PathBuf::from("out")));
        assert_eq!(config.resource_path[1], PathBuf::from("deps.jar"));
        assert_eq!(config.options.language, "fr");
        assert!(config.options.use_reasoner);
        assert!(!config.options.deep_import);
        // Unspecified options keep their defaults
        assert!(config.options.css_location.is_some());

        let command = config.command.unwrap();
        assert_eq!(command.program, "lode");
        assert!(command.args.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            GeneratorConfig::parse("target_dir = \"out\""),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = GeneratorConfig::load(&temp_dir.path().join("lodegen.toml"));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
