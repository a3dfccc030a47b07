//! JSON template rendering.
//!
//! Output is JSON-shaped documentation, not strict JSON: leaf values may be
//! followed by `//description` comments.

use crate::classifier::example_literal;
use crate::tree::{build_tree, FieldNode};
use crate::types::{Field, TemplateOptions, ValueStyle};

const INDENT: &str = "   ";

/// Render fields as an indented JSON template with default options.
pub fn generate_json_template(fields: &[Field]) -> String {
    generate_json_template_with(fields, &TemplateOptions::default())
}

/// Render fields as an indented JSON template.
///
/// `List`/`Array` fields become an array holding one object built from their
/// children (`[]` without children), other fields with children become nested
/// objects, and childless fields become a literal.
pub fn generate_json_template_with(fields: &[Field], options: &TemplateOptions) -> String {
    let tree = build_tree(fields);
    let mut out = String::new();
    write_object(&tree, 0, options, &mut out);
    out
}

fn write_object(nodes: &[FieldNode], depth: usize, options: &TemplateOptions, out: &mut String) {
    out.push_str("{\n");
    let indent = INDENT.repeat(depth + 1);
    for (i, node) in nodes.iter().enumerate() {
        let separator = if i + 1 < nodes.len() { "," } else { "" };
        out.push_str(&indent);
        out.push_str(&quote(&node.field.name));
        out.push_str(" : ");

        if node.field.is_array_like() {
            if node.children.is_empty() {
                out.push_str("[]");
            } else {
                out.push('[');
                write_object(&node.children, depth + 1, options, out);
                out.push(']');
            }
            out.push_str(separator);
        } else if !node.children.is_empty() {
            write_object(&node.children, depth + 1, options, out);
            out.push_str(separator);
        } else {
            out.push_str(&leaf_value(&node.field, options.value_style));
            out.push_str(separator);
            if options.comments {
                out.push_str(&comment(&node.field.description));
            }
        }
        out.push('\n');
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
}

fn leaf_value(field: &Field, style: ValueStyle) -> String {
    match style {
        ValueStyle::TypeName => quote(&field.type_name),
        ValueStyle::Example => example_literal(&field.type_name)
            .map(str::to_string)
            .unwrap_or_else(|| quote(&field.type_name)),
    }
}

fn comment(description: &str) -> String {
    let text = description.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        String::new()
    } else {
        format!(" //{}", text)
    }
}

fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}
