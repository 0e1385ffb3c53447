use std::fs::create_dir_all;

use crate::constants::{APPLICATION, ORGANIZATION, QUALIFIER};
use crate::errors::{file_operation_error, generic_error, Result};
use directories::ProjectDirs;
use shellexpand::{full, tilde};

/// Expand `~` and environment variables in a path
///
/// Unknown variables leave the path untouched apart from the tilde.
pub fn expand_path(path: &str) -> String {
    match full(path) {
        Ok(expanded) => expanded.to_string(),
        Err(_) => tilde(path).to_string(),
    }
}

pub(crate) fn find_project_folder() -> Result<ProjectDirs> {
    let folder = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| generic_error("Failed to determine project directories"))?;

    if !folder.config_dir().exists() {
        create_dir_all(folder.config_dir()).map_err(|e| {
            file_operation_error(e, folder.config_dir().to_path_buf(), "create directory")
        })?;
    }
    Ok(folder)
}
