//! Structural validation of model documents.
//!
//! A model document is checked against an embedded JSON Schema before it is
//! deserialized, so shape errors are reported with JSON Pointer paths instead
//! of a single serde message.

use serde_json::Value;

use crate::error::{LoadError, SchemaError, ValidateError};

/// JSON Schema describing `{ "types": [...], "controllers": [...] }`.
pub const MODEL_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "apidoc type model",
  "type": "object",
  "properties": {
    "types": { "type": "array", "items": { "$ref": "#/$defs/type" } },
    "controllers": { "type": "array", "items": { "$ref": "#/$defs/controller" } }
  },
  "$defs": {
    "name": { "type": "string", "minLength": 1 },
    "typeRef": { "type": "string", "minLength": 1 },
    "doc": { "type": "string" },
    "marker": {
      "oneOf": [
        { "type": "string", "minLength": 1 },
        {
          "type": "object",
          "required": ["name"],
          "properties": {
            "name": { "$ref": "#/$defs/name" },
            "attributes": { "type": "object", "additionalProperties": { "type": "string" } }
          }
        }
      ]
    },
    "markers": { "type": "array", "items": { "$ref": "#/$defs/marker" } },
    "field": {
      "type": "object",
      "required": ["name", "type"],
      "properties": {
        "name": { "$ref": "#/$defs/name" },
        "type": { "$ref": "#/$defs/typeRef" },
        "markers": { "$ref": "#/$defs/markers" },
        "doc": { "$ref": "#/$defs/doc" },
        "comment": { "$ref": "#/$defs/doc" },
        "static": { "type": "boolean" }
      }
    },
    "type": {
      "type": "object",
      "required": ["name"],
      "properties": {
        "name": { "$ref": "#/$defs/name" },
        "type_params": { "type": "array", "items": { "$ref": "#/$defs/name" } },
        "fields": { "type": "array", "items": { "$ref": "#/$defs/field" } },
        "supertype": { "$ref": "#/$defs/typeRef" },
        "doc": { "$ref": "#/$defs/doc" }
      }
    },
    "parameter": {
      "type": "object",
      "required": ["name", "type"],
      "properties": {
        "name": { "$ref": "#/$defs/name" },
        "type": { "$ref": "#/$defs/typeRef" },
        "markers": { "$ref": "#/$defs/markers" },
        "doc": { "$ref": "#/$defs/doc" }
      }
    },
    "method": {
      "type": "object",
      "required": ["name"],
      "properties": {
        "name": { "$ref": "#/$defs/name" },
        "doc": { "$ref": "#/$defs/doc" },
        "markers": { "$ref": "#/$defs/markers" },
        "params": { "type": "array", "items": { "$ref": "#/$defs/parameter" } },
        "return_type": { "$ref": "#/$defs/typeRef" }
      }
    },
    "controller": {
      "type": "object",
      "required": ["name"],
      "properties": {
        "name": { "$ref": "#/$defs/name" },
        "doc": { "$ref": "#/$defs/doc" },
        "markers": { "$ref": "#/$defs/markers" },
        "methods": { "type": "array", "items": { "$ref": "#/$defs/method" } }
      }
    }
  }
}"##;

/// Parsed form of [`MODEL_SCHEMA`].
pub fn model_schema() -> Result<Value, LoadError> {
    serde_json::from_str(MODEL_SCHEMA).map_err(|e| LoadError::InvalidSchema {
        message: e.to_string(),
    })
}

/// Validate a raw model document against [`MODEL_SCHEMA`].
///
/// # Errors
///
/// Returns `ValidateError::Invalid` with every violation found, or
/// `ValidateError::Load` if the embedded schema cannot be compiled.
pub fn validate_model_document(document: &Value) -> Result<(), ValidateError> {
    validate_against_schema(&model_schema()?, document)
}

/// Validate an instance against an arbitrary JSON Schema.
pub fn validate_against_schema(schema: &Value, instance: &Value) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| {
        ValidateError::Load(LoadError::InvalidSchema {
            message: e.to_string(),
        })
    })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(instance)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
