use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::CategoryCollection;

/// The parsed input document: a flat settings map plus the categories to lay out.
///
/// Both fields default to empty so that a document missing one of them surfaces as a
/// validation error (missing setting / empty collection) rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputDocument {
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default)]
    pub categories: CategoryCollection,
}

impl InputDocument {
    pub fn from_json_str(path: &Path, json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(|source| AppError::MalformedInput {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Reads and parses the input document at `path`.
pub fn read_input_file(path: &Path) -> Result<InputDocument, AppError> {
    debug!("Reading input file {}", path.display());
    let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::InputNotFound(path.to_path_buf()),
        _ => AppError::Io(e),
    })?;

    let document = InputDocument::from_json_str(path, &json)?;
    info!(
        categories = document.categories.len(),
        settings = document.settings.len(),
        "Loaded input document {}",
        path.display()
    );
    Ok(document)
}
