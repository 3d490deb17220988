//! Reading candidate objects from disk
//!
//! A file holds one JSON value or an array of them. Directories are walked
//! for `*.json` files in file-name order; other files in a directory are
//! skipped.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::candidate::Candidate;
use crate::error::{CheckError, Result};

/// One object read from disk
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File path, with `[i]` appended for elements of an array file
    pub label: String,
    pub value: Value,
}

impl Candidate for Document {
    fn field(&self, key: &str) -> Option<&Value> {
        self.value.field(key)
    }
}

/// Read every document under `paths`, in the order given
pub fn collect_documents(paths: &[PathBuf]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(std::io::Error::from)?;
                let file = entry.path();
                if file.is_file() && file.extension().is_some_and(|e| e == "json") {
                    read_documents(file, &mut documents)?;
                }
            }
        } else {
            read_documents(path, &mut documents)?;
        }
    }

    debug!("Collected {} documents", documents.len());
    Ok(documents)
}

fn read_documents(path: &Path, documents: &mut Vec<Document>) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|e| CheckError::InvalidDocument {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Array(items) => {
            for (i, item) in items.into_iter().enumerate() {
                if !item.is_object() {
                    warn!("{}[{}] is not an object", path.display(), i);
                }
                documents.push(Document {
                    label: format!("{}[{}]", path.display(), i),
                    value: item,
                });
            }
        }
        value => {
            if !value.is_object() {
                warn!("{} is not an object", path.display());
            }
            documents.push(Document {
                label: path.display().to_string(),
                value,
            });
        }
    }

    Ok(())
}
