//! Value structures for the declarative dataloader description document.
//!
//! The description binds a contract-variant name and an implementation
//! reference (`"<path>::<symbol>"`) to argument, schema and dependency
//! metadata. Pulling the document from a source and installing declared
//! dependencies are the source registry's responsibility; this module only
//! defines the target structure and a yaml reader for it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use batchflow_core::BatchFlowError;

/// Keyword arguments passed to a dataloader constructor.
pub type Kwargs = BTreeMap<String, serde_json::Value>;

/// The declarative description of one dataloader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataLoaderDescription {
    /// Declared contract-variant name, e.g. `"Dataset"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Implementation reference formatted as `"<path>::<symbol>"`.
    pub defined_as: String,
    /// Declared constructor arguments. Must match the implementation's
    /// parameter names exactly.
    #[serde(default)]
    pub args: BTreeMap<String, DataLoaderArgument>,
    #[serde(default)]
    pub info: Info,
    /// Structural description of the produced batches.
    #[serde(default)]
    pub output_schema: serde_json::Value,
    /// Declared software dependencies; installing them is the registry's
    /// concern.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Post-processing plugin declarations, opaque at this layer.
    #[serde(default)]
    pub postprocessing: BTreeMap<String, serde_json::Value>,
}

/// Description of a single constructor argument.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataLoaderArgument {
    #[serde(default)]
    pub doc: String,
    /// Example value, collected into the factory's `example_kwargs`.
    #[serde(default)]
    pub example: Option<serde_json::Value>,
    #[serde(default)]
    pub optional: bool,
}

/// General information about the dataloader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DataLoaderDescription {
    /// Reads a description document from a yaml file.
    pub fn from_path(path: &Path) -> Result<Self, BatchFlowError> {
        let text = std::fs::read_to_string(path).map_err(|e| BatchFlowError::SpecError {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        serde_yaml::from_str(&text).map_err(|e| BatchFlowError::SpecError {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "spec_test.rs"]
mod tests;
