//! Structural validation of documents.
//!
//! Checks the wire shape of a document against a JSON Schema before it is
//! handed to the unmarshal visitor, collecting every problem instead of
//! stopping at the first one.

use serde_json::{json, Value};

use crate::error::{Error, Issue, ValidateError};

/// Wire shape of a JSON:API document.
fn document_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["data"],
        "properties": {
            "data": {
                "type": ["object", "array", "null"],
                "$ref": "#/$defs/resource",
                "items": {"type": ["object", "null"], "$ref": "#/$defs/resource"}
            },
            "included": {
                "type": "array",
                "items": {"type": "object", "$ref": "#/$defs/resource"}
            },
            "links": {"$ref": "#/$defs/links"},
            "meta": {"type": "object"}
        },
        "$defs": {
            "resource": {
                "required": ["type"],
                "properties": {
                    "type": {"type": "string", "minLength": 1},
                    "id": {"type": "string"},
                    "client-id": {"type": "string"},
                    "attributes": {"type": "object"},
                    "relationships": {
                        "type": "object",
                        "additionalProperties": {"$ref": "#/$defs/relationship"}
                    },
                    "links": {"$ref": "#/$defs/links"},
                    "meta": {"type": "object"}
                }
            },
            "relationship": {
                "type": "object",
                "properties": {
                    "data": {
                        "type": ["object", "array", "null"],
                        "$ref": "#/$defs/resource",
                        "items": {"type": "object", "$ref": "#/$defs/resource"}
                    },
                    "links": {"$ref": "#/$defs/links"},
                    "meta": {"type": "object"}
                }
            },
            "links": {
                "type": ["object", "null"],
                "additionalProperties": {"$ref": "#/$defs/link"}
            },
            "link": {
                "type": ["string", "object"],
                "required": ["href"],
                "properties": {
                    "href": {"type": "string"},
                    "meta": {"type": ["object", "null"]}
                }
            }
        }
    })
}

/// Validate the structure of a document.
///
/// # Errors
///
/// Returns `ValidateError::Invalid` listing every structural issue found, or
/// `ValidateError::Decode` if the document schema fails to compile.
pub fn validate_document(document: &Value) -> Result<(), ValidateError> {
    let issues = document_issues(document)?;

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { issues })
    }
}

/// Collect structural issues without failing on them.
///
/// The root of the document is reported as `/`.
pub fn document_issues(document: &Value) -> Result<Vec<Issue>, Error> {
    let schema = document_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| Error::InvalidSchema {
        message: e.to_string(),
    })?;

    let issues: Vec<Issue> = validator
        .iter_errors(document)
        .map(|e| {
            let path = e.instance_path.to_string();
            Issue {
                path: if path.is_empty() { "/".to_string() } else { path },
                message: e.to_string(),
            }
        })
        .collect();

    if !issues.is_empty() {
        tracing::debug!(issues = issues.len(), "document failed structural validation");
    }
    Ok(issues)
}
