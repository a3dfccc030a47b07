//! Field extraction - walks a resolved type graph into a flat field list.
//!
//! The walk is depth-first. Own fields come before inherited ones, envelope
//! payloads are inlined at the envelope's level, collections descend into
//! their element type one level deeper, and each branch carries its own copy
//! of the set of classes already on the path so self-references stop after
//! one level without affecting siblings.
//!
//! Nothing here fails: a type the resolver does not know drops the branch
//! that needed it and the walk carries on.

use std::collections::{BTreeSet, HashSet};

use crate::classifier::{classify, element_type, is_framework_param};
use crate::doc;
use crate::exclusion::{ExclusionPolicy, ExclusionSpec};
use crate::model::{
    Binding, FieldDecl, Markers, MethodSignature, Parameter, TypeRef, TypeResolver, ROOT_OBJECT,
};
use crate::types::{Field, Kind};

/// Markers meaning "must be present".
const REQUIRED_MARKERS: &[&str] = &["NotNull", "NotEmpty", "NotBlank"];

/// Binding markers carrying a `required` flag.
const BINDING_REQUIRED_MARKERS: &[&str] = &["RequestParam", "RequestBody", "PathVariable"];

/// Markers carrying a description, with the attributes checked in order.
const DESCRIPTION_MARKERS: &[(&str, &[&str])] = &[
    ("ApiModelProperty", &["value", "notes"]),
    ("Schema", &["description", "title"]),
    ("ApiParam", &["value"]),
    ("Parameter", &["description"]),
];

/// Markers renaming a field in its serialized form.
const ALIAS_MARKERS: &[&str] = &["JsonProperty", "JSONField", "SerializedName"];

type Visited = HashSet<String>;

/// Walks types from a resolver under an exclusion policy.
///
/// Both collaborators are borrowed for the extractor's lifetime, so a walk
/// always sees one consistent policy.
pub struct Extractor<'a, R: ?Sized> {
    resolver: &'a R,
    policy: &'a ExclusionPolicy,
}

impl<R: ?Sized> Clone for Extractor<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ?Sized> Copy for Extractor<'_, R> {}

impl<'a, R: TypeResolver + ?Sized> Extractor<'a, R> {
    pub fn new(resolver: &'a R, policy: &'a ExclusionPolicy) -> Self {
        Self { resolver, policy }
    }

    /// Fields of a type, rooted at depth 0.
    ///
    /// Structured types yield their fields, collections and arrays yield the
    /// fields of their element type, scalars and maps yield nothing.
    pub fn extract(&self, ty: &TypeRef) -> Vec<Field> {
        let mut out = Vec::new();
        self.walk_type(ty, 0, &Visited::new(), &mut out);
        out
    }

    /// Fields of an endpoint's response; empty for no or `void` return type.
    pub fn extract_response_fields(&self, return_type: Option<&TypeRef>) -> Vec<Field> {
        match return_type {
            Some(ty) if !ty.is_void() => self.extract(ty),
            _ => Vec::new(),
        }
    }

    /// Fields of an endpoint's request, parameter by parameter.
    pub fn extract_request_fields(&self, method: &MethodSignature) -> Vec<Field> {
        let mut out = Vec::new();
        for param in &method.params {
            if is_framework_param(&param.ty) {
                tracing::trace!(param = %param.name, ty = %param.ty, "skipping framework parameter");
                continue;
            }

            let class = classify(&param.ty);
            if class.kind.is_structured() {
                self.walk_type(&param.ty, 0, &Visited::new(), &mut out);
                continue;
            }

            let (name, required) = match Binding::of(&param.markers) {
                Binding::Body => (param.name.clone(), is_required(&param.markers)),
                Binding::Query | Binding::Path => (
                    explicit_param_name(param).unwrap_or_else(|| param.name.clone()),
                    is_required(&param.markers),
                ),
                // Request attributes are populated server-side (auth context etc.).
                Binding::Attribute => continue,
                Binding::Unbound => (param.name.clone(), false),
            };

            out.push(Field {
                name,
                type_name: class.type_name,
                required,
                description: param_description(param),
                depth: 0,
            });
            // Collections carry their element's fields one level down.
            self.walk_type(&param.ty, 1, &Visited::new(), &mut out);
        }
        out
    }

    fn walk_type(&self, ty: &TypeRef, depth: usize, visited: &Visited, out: &mut Vec<Field>) {
        match classify(ty).kind {
            Kind::Struct | Kind::Envelope => {
                self.walk_class(ty, depth, visited, &BTreeSet::new(), out)
            }
            Kind::Collection | Kind::Array => {
                if let Some(element) = element_type(ty) {
                    self.walk_type(&element, depth, visited, out);
                }
            }
            Kind::Scalar | Kind::Map => {}
        }
    }

    /// Own fields of `ty`, then its ancestors' fields at the same depth.
    ///
    /// `inherited` holds field names excluded by more-derived classes.
    fn walk_class(
        &self,
        ty: &TypeRef,
        depth: usize,
        visited: &Visited,
        inherited: &BTreeSet<String>,
        out: &mut Vec<Field>,
    ) {
        let Some(name) = ty.name() else {
            return;
        };
        let Some(descriptor) = self.resolver.resolve(name) else {
            tracing::debug!(ty = %ty, "type not resolvable, branch omitted");
            return;
        };
        let qualified = descriptor.name.as_str();
        if visited.contains(qualified) {
            tracing::trace!(ty = qualified, depth, "cycle, branch truncated");
            return;
        }

        let mut excluded = inherited.clone();
        match self.policy.excluded_fields_for(qualified) {
            Some(ExclusionSpec::All) => {
                tracing::debug!(ty = qualified, "class excluded");
                return;
            }
            Some(ExclusionSpec::Fields(names)) => excluded.extend(names.iter().cloned()),
            None => {}
        }

        let mut visited = visited.clone();
        visited.insert(qualified.to_string());

        let bindings = descriptor.bindings(ty.args());
        let envelope = classify(ty).kind == Kind::Envelope;

        for decl in descriptor.fields.iter().filter(|f| !f.is_static) {
            if excluded.contains(&decl.name) {
                continue;
            }

            let resolved = decl.ty.substitute(&bindings);
            let class = classify(&resolved);

            if envelope && descriptor.is_type_param(&decl.ty) && class.kind.is_structured() {
                // Payload of a wrapper: its fields stand in for the payload field.
                self.walk_type(&resolved, depth, &visited, out);
                continue;
            }

            out.push(Field {
                name: field_name(decl),
                type_name: class.type_name,
                required: is_required(&decl.markers),
                description: field_description(decl),
                depth,
            });
            self.walk_type(&resolved, depth + 1, &visited, out);
        }

        if let Some(supertype) = &descriptor.supertype {
            if supertype.name() != Some(ROOT_OBJECT) {
                let supertype = supertype.substitute(&bindings);
                self.walk_class(&supertype, depth, &visited, &excluded, out);
            }
        }
    }
}

/// Request fields of `method`.
pub fn extract_request_fields<R: TypeResolver + ?Sized>(
    resolver: &R,
    policy: &ExclusionPolicy,
    method: &MethodSignature,
) -> Vec<Field> {
    Extractor::new(resolver, policy).extract_request_fields(method)
}

/// Response fields for `return_type`.
pub fn extract_response_fields<R: TypeResolver + ?Sized>(
    resolver: &R,
    policy: &ExclusionPolicy,
    return_type: Option<&TypeRef>,
) -> Vec<Field> {
    Extractor::new(resolver, policy).extract_response_fields(return_type)
}

/// Required-ness from markers.
///
/// A binding marker decides on its own (`required` defaults to true);
/// otherwise any "must be present" marker makes the value required.
pub fn is_required(markers: &Markers) -> bool {
    for name in BINDING_REQUIRED_MARKERS {
        if let Some(marker) = markers.find(name) {
            return marker
                .attr("required")
                .and_then(parse_flag)
                .unwrap_or(true);
        }
    }
    REQUIRED_MARKERS.iter().any(|name| markers.has(name))
}

fn parse_flag(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("false") || text.ends_with(".FALSE") {
        Some(false)
    } else if text.eq_ignore_ascii_case("true") || text.ends_with(".TRUE") {
        Some(true)
    } else {
        None
    }
}

fn marker_description(markers: &Markers) -> Option<String> {
    DESCRIPTION_MARKERS.iter().find_map(|(name, keys)| {
        let marker = markers.find(name)?;
        keys.iter().find_map(|key| marker.text_attr(key))
    })
}

fn field_name(decl: &FieldDecl) -> String {
    ALIAS_MARKERS
        .iter()
        .filter_map(|name| decl.markers.find(name))
        .find_map(|marker| marker.text_attr("value").or_else(|| marker.text_attr("name")))
        .unwrap_or_else(|| decl.name.clone())
}

fn field_description(decl: &FieldDecl) -> String {
    marker_description(&decl.markers)
        .or_else(|| {
            decl.doc
                .as_deref()
                .map(doc::summary)
                .filter(|s| !s.is_empty())
        })
        .or_else(|| {
            decl.comment
                .as_deref()
                .map(|c| c.trim().trim_start_matches("//").trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_default()
}

fn param_description(param: &Parameter) -> String {
    param
        .doc
        .as_deref()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .or_else(|| marker_description(&param.markers))
        .unwrap_or_default()
}

fn explicit_param_name(param: &Parameter) -> Option<String> {
    let marker = param
        .markers
        .find("RequestParam")
        .or_else(|| param.markers.find("PathVariable"))?;
    marker
        .text_attr("value")
        .or_else(|| marker.text_attr("name"))
}
