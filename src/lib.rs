//! API Document Schema Generator
//!
//! Turns a type model (types, their fields and markers, and controller
//! endpoint signatures) into flat, depth-annotated field lists, and renders
//! those lists as Markdown parameter tables, JSON templates and complete
//! endpoint pages.
//!
//! # Example
//!
//! ```
//! use apidoc_schema::{
//!     generate_json_template, generate_parameter_table, load_model_str, ExclusionPolicy,
//!     Extractor, TypeRef,
//! };
//!
//! let model = load_model_str(r#"{
//!     "types": [
//!         { "name": "com.acme.Result", "type_params": ["T"], "fields": [
//!             { "name": "code", "type": "int" },
//!             { "name": "message", "type": "String" },
//!             { "name": "data", "type": "T" }
//!         ]},
//!         { "name": "com.acme.User", "fields": [
//!             { "name": "id", "type": "Long", "markers": ["NotNull"], "doc": "primary key" },
//!             { "name": "name", "type": "String" }
//!         ]}
//!     ]
//! }"#).unwrap();
//!
//! let policy = ExclusionPolicy::new();
//! let ty = TypeRef::parse("com.acme.Result<com.acme.User>").unwrap();
//! let fields = Extractor::new(&model, &policy).extract(&ty);
//!
//! // The envelope's payload is inlined at the envelope's level.
//! let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
//! assert_eq!(names, ["code", "message", "id", "name"]);
//!
//! let table = generate_parameter_table(&fields);
//! assert_eq!(table.lines().nth(2), Some("|id|yes|Long|primary key|"));
//! assert!(generate_json_template(&fields).contains("\"id\" : \"Long\", //primary key"));
//! ```
//!
//! # Field Lists
//!
//! | Source | Output |
//! |--------|--------|
//! | Scalar field | one field, no children |
//! | Struct field | the field, then the struct's fields one level deeper |
//! | `List<S>` / `S[]` field | type `List` / `Array`, element fields one level deeper |
//! | Map field | type `Object`, no children |
//! | Envelope payload (`Result<T>`) | the payload's fields at the envelope's level |
//!
//! # Exclusions
//!
//! ```text
//! com.acme.User:password,salt;AuditInfo:*
//! ```
//!
//! `*` or an empty list hides every field of the class. Fields excluded on a
//! class stay hidden when they are declared on its ancestors.

mod assembler;
mod classifier;
mod doc;
mod error;
mod exclusion;
mod extractor;
mod linter;
mod loader;
mod model;
mod settings;
mod table;
mod template;
mod tree;
mod types;
mod validator;

pub use assembler::{
    combine_path, content_type, controller_endpoints, controller_name, enumerate_endpoints,
    http_method, is_endpoint, join_documents, mapping_path, method_title, request_url, Assembler,
    ContentType, Endpoint, EndpointDoc, PAGE_SEPARATOR,
};
pub use classifier::{
    classify, element_type, example_literal, is_envelope_name, is_framework_param, scalar_name,
    Classification, ENVELOPE_MARKERS,
};
pub use doc::{summary as doc_summary, title as doc_title};
pub use error::{LoadError, SchemaError, TypeRefError, ValidateError};
pub use exclusion::{entry_matches, ExclusionPolicy, ExclusionSpec};
pub use extractor::{extract_request_fields, extract_response_fields, is_required, Extractor};
pub use linter::{
    lint_model, Diagnostic, ItemResult, ItemStatus, LintResult, Severity, EXCLUSIONS_ITEM,
};
pub use loader::{
    is_url, load_json, load_json_auto, load_json_str, load_model, load_model_auto,
    load_model_str, model_from_value,
};
pub use model::{
    simple_name, Binding, Controller, FieldDecl, Marker, Markers, MethodSignature, ModelDocument,
    Parameter, TypeDescriptor, TypeModel, TypeRef, TypeResolver, ROOT_OBJECT,
};
pub use settings::DocSettings;
pub use table::{generate_parameter_table, TABLE_HEADER};
pub use template::{generate_json_template, generate_json_template_with};
pub use tree::{build_tree, flatten, FieldNode};
pub use types::{Field, Kind, TemplateOptions, ValueStyle, DEPTH_MARKER};
pub use validator::{
    model_schema, validate_against_schema, validate_model_document, MODEL_SCHEMA,
};

#[cfg(feature = "remote")]
pub use loader::{load_json_url, load_model_url};
