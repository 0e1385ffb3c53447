//! Workflow configuration discovery and loading
//!
//! A workflow is nothing more than a `<name>.yaml` file in the configuration
//! directory. The files are listed on every render and parsed fresh on every
//! request; nothing is cached and no schema is enforced.

use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;
use log::{debug, trace};
use serde_yaml::Value;

use crate::constants::WORKFLOW_EXTENSION;
use crate::errors::{
    config_parsing_error, file_operation_error, generic_error, workflow_not_found_error, Result,
};

/// Parsed contents of a workflow configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    name: String,
    value: Value,
}

impl WorkflowConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw YAML value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Top-level keys of the configuration, if it is a mapping
    pub fn keys(&self) -> Vec<String> {
        match &self.value {
            Value::Mapping(mapping) => mapping
                .keys()
                .map(|key| match key {
                    Value::String(s) => s.clone(),
                    other => serde_yaml::to_string(other)
                        .map(|s| s.trim_end().to_string())
                        .unwrap_or_default(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Render the configuration back to YAML for display
    pub fn to_yaml_string(&self) -> String {
        serde_yaml::to_string(&self.value).unwrap_or_default()
    }
}

/// Lists workflow names in `directory`
///
/// Every regular file with a `.yaml` extension contributes one name, which is
/// the file name without its extension. Names are returned sorted.
///
/// # Errors
/// Returns an error if the directory cannot be read
pub fn list_workflows(directory: &Path) -> Result<Vec<String>> {
    if !directory.is_dir() {
        return Err(file_operation_error(
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            directory.to_path_buf(),
            "list",
        ));
    }

    let directory_str = directory.to_str().ok_or_else(|| {
        generic_error(&format!(
            "Path is not valid unicode: {}",
            directory.display()
        ))
    })?;
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(directory_str),
        WORKFLOW_EXTENSION
    );

    let entries = glob(&pattern)
        .map_err(|e| generic_error(&format!("Invalid glob pattern {pattern}: {e}")))?;

    let mut workflows = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            file_operation_error(e.into(), path, "access")
        })?;
        if !path.is_file() {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            trace!("Found workflow configuration {}", path.display());
            workflows.push(stem.to_string());
        }
    }

    workflows.sort();
    debug!(
        "Discovered {} workflow(s) in {}",
        workflows.len(),
        directory.display()
    );
    Ok(workflows)
}

/// Path of the configuration file for `name`
///
/// # Errors
/// Returns an error if `name` could escape the configuration directory
pub fn workflow_path(directory: &Path, name: &str) -> Result<PathBuf> {
    let is_plain = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains('\0');
    if !is_plain {
        return Err(workflow_not_found_error(name, directory.to_path_buf()));
    }
    Ok(directory.join(format!("{name}.{WORKFLOW_EXTENSION}")))
}

/// Loads and parses the configuration of workflow `name`
///
/// # Errors
/// Returns an error if the file does not exist, cannot be read or is not valid YAML
pub fn load_config(directory: &Path, name: &str) -> Result<WorkflowConfig> {
    let path = workflow_path(directory, name)?;
    if !path.is_file() {
        return Err(workflow_not_found_error(name, directory.to_path_buf()));
    }

    let content =
        fs::read_to_string(&path).map_err(|e| file_operation_error(e, path.clone(), "read"))?;
    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| config_parsing_error(e, path.clone()))?;

    debug!("Loaded configuration for workflow '{name}'");
    Ok(WorkflowConfig {
        name: name.to_string(),
        value,
    })
}
