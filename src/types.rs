//! Core output types shared by the extractor and the renderers.

use serde::{Deserialize, Serialize};

/// Token repeated once per nesting level in the legacy flat encoding.
pub const DEPTH_MARKER: &str = "--";

/// One row of an extracted request or response shape.
///
/// Nesting is implied by order: a field at depth `d` is followed by its
/// children at depth `d + 1` before any field at depth `<= d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, after alias renaming.
    pub name: String,
    /// Canonical document type name (`Long`, `String`, `List`, `User`, ...).
    pub type_name: String,
    pub required: bool,
    /// May be empty.
    pub description: String,
    pub depth: usize,
}

impl Field {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
            description: String::new(),
            depth,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Legacy depth encoding: [`DEPTH_MARKER`] repeated `depth` times.
    pub fn prefix(&self) -> String {
        DEPTH_MARKER.repeat(self.depth)
    }

    /// Whether this field renders as a JSON array.
    pub fn is_array_like(&self) -> bool {
        self.type_name == "List" || self.type_name == "Array"
    }
}

/// Category of a type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Scalar,
    Collection,
    Map,
    Array,
    /// Generic wrapper whose payload is inlined (`Result<T>`, `Page<T>`).
    Envelope,
    /// Type with its own declared fields.
    Struct,
}

impl Kind {
    /// Whether the extractor walks the fields of this kind.
    pub fn is_structured(&self) -> bool {
        matches!(self, Kind::Envelope | Kind::Struct)
    }
}

/// How childless fields render in a JSON template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStyle {
    /// Quoted document type name: `"id" : "Long"`.
    #[default]
    TypeName,
    /// Example literal for scalars: `"id" : 0`.
    Example,
}

/// Options for JSON template rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateOptions {
    pub value_style: ValueStyle,
    /// Append `//<description>` after leaf values.
    pub comments: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            value_style: ValueStyle::TypeName,
            comments: true,
        }
    }
}

impl TemplateOptions {
    pub fn new(value_style: ValueStyle) -> Self {
        Self {
            value_style,
            ..Self::default()
        }
    }

    pub fn comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_repeats_marker_per_level() {
        assert_eq!(Field::new("id", "Long", 0).prefix(), "");
        assert_eq!(Field::new("id", "Long", 2).prefix(), "----");
    }

    #[test]
    fn array_like_types() {
        assert!(Field::new("items", "List", 0).is_array_like());
        assert!(Field::new("codes", "Array", 0).is_array_like());
        assert!(!Field::new("meta", "Object", 0).is_array_like());
    }

    #[test]
    fn structured_kinds() {
        assert!(Kind::Struct.is_structured());
        assert!(Kind::Envelope.is_structured());
        assert!(!Kind::Collection.is_structured());
        assert!(!Kind::Map.is_structured());
    }
}
