//! Explicit tree view of a flat field list.

use crate::types::Field;

/// A field with its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub field: Field,
    pub children: Vec<FieldNode>,
}

/// Rebuild the nesting implied by field order and depth.
///
/// A field's children are the run of deeper fields that follows it, up to the
/// next field at its depth or shallower. A field deeper than its predecessor
/// allows is attached one level below that predecessor rather than dropped.
pub fn build_tree(fields: &[Field]) -> Vec<FieldNode> {
    // Leading fields deeper than 0 have no parent and become roots.
    build_level(fields, &mut 0, 0)
}

fn build_level(fields: &[Field], pos: &mut usize, level: usize) -> Vec<FieldNode> {
    let mut nodes = Vec::new();
    while let Some(field) = fields.get(*pos) {
        if field.depth < level {
            break;
        }
        *pos += 1;
        let children = match fields.get(*pos) {
            Some(next) if next.depth > field.depth => build_level(fields, pos, level + 1),
            _ => Vec::new(),
        };
        nodes.push(FieldNode {
            field: field.clone(),
            children,
        });
    }
    nodes
}

/// Pre-order flattening; inverse of [`build_tree`] for well-formed lists.
pub fn flatten(nodes: &[FieldNode]) -> Vec<Field> {
    let mut out = Vec::new();
    flatten_into(nodes, &mut out);
    out
}

fn flatten_into(nodes: &[FieldNode], out: &mut Vec<Field>) {
    for node in nodes {
        out.push(node.field.clone());
        flatten_into(&node.children, out);
    }
}
