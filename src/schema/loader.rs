//! YAML loading and parsing for model files.
//!
//! Loading is split into two stages so callers can tell a broken file apart
//! from a well-formed file that fails schema validation: [`load_yaml`] handles
//! I/O, YAML syntax, and the root-mapping check; [`parse_model`] then applies
//! the typed schema with all its normalizations.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::Model;

/// Errors from loading or validating a model document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The path does not exist.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The path exists but is not a regular file.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not syntactically valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[source] serde_yaml::Error),

    /// The document root is a scalar or sequence instead of a mapping.
    #[error("expected a YAML mapping at the document root")]
    RootNotMapping,

    /// The document is well-formed YAML but does not satisfy the model
    /// schema.
    #[error("schema validation failed: {0}")]
    Validation(#[source] serde_yaml::Error),
}

/// Load a YAML file and return the raw document value.
///
/// An empty document is treated as an empty mapping.
pub fn load_yaml(path: &Path) -> Result<serde_yaml::Value, SchemaError> {
    if !path.exists() {
        return Err(SchemaError::FileNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(SchemaError::NotAFile(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    value_from_str(&text)
}

/// Load and parse a YAML file into a [`Model`].
pub fn parse_model(path: &Path) -> Result<Model, SchemaError> {
    let value = load_yaml(path)?;
    serde_yaml::from_value(value).map_err(SchemaError::Validation)
}

/// Parse a YAML string into a [`Model`].
pub fn parse_model_str(yaml: &str) -> Result<Model, SchemaError> {
    let value = value_from_str(yaml)?;
    serde_yaml::from_value(value).map_err(SchemaError::Validation)
}

fn value_from_str(text: &str) -> Result<serde_yaml::Value, SchemaError> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(SchemaError::Yaml)?;
    match value {
        serde_yaml::Value::Null => Ok(serde_yaml::Value::Mapping(Default::default())),
        serde_yaml::Value::Mapping(_) => Ok(value),
        _ => Err(SchemaError::RootNotMapping),
    }
}
