//! Document loading from files and strings.

use std::path::Path;

use crate::document::Document;
use crate::error::Error;

/// Load a document from a file path.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file doesn't exist,
/// or `Error::Json` if the file isn't a valid document.
pub fn load_document(path: &Path) -> Result<Document, Error> {
    load_document_str(&read_file(path)?)
}

/// Load a document from a JSON string.
///
/// # Errors
///
/// Returns `Error::Json` if the string isn't a valid document.
pub fn load_document_str(content: &str) -> Result<Document, Error> {
    Document::parse(content)
}

/// Read a file as a generic JSON value, for structural checks that must see
/// documents the typed model would reject.
pub fn load_json(path: &Path) -> Result<serde_json::Value, Error> {
    Ok(serde_json::from_str(&read_file(path)?)?)
}

fn read_file(path: &Path) -> Result<String, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| Error::ReadError {
        path: path.to_path_buf(),
        source,
    })
}
