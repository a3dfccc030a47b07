//! Resolved type model consumed by the extractor.
//!
//! The extractor never looks at source code. It walks whatever a
//! [`TypeResolver`] hands back: qualified type names mapped to declared
//! fields, an optional supertype, generic parameters and metadata markers.
//! [`TypeModel`] is the data-driven resolver deserialized from a model
//! document (see [`crate::load_model`]).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeRefError;

/// Qualified name of the implicit root of every class hierarchy.
pub const ROOT_OBJECT: &str = "java.lang.Object";

/// Source of type descriptors for the extractor.
pub trait TypeResolver {
    /// Look up a type by name. `None` means the type is unknown and the branch
    /// that needed it is silently dropped.
    fn resolve(&self, name: &str) -> Option<&TypeDescriptor>;
}

impl<R: TypeResolver + ?Sized> TypeResolver for &R {
    fn resolve(&self, name: &str) -> Option<&TypeDescriptor> {
        (**self).resolve(name)
    }
}

/// A reference to a type as written at a use site.
///
/// Serialized as source text, e.g. `com.acme.Result<java.util.List<com.acme.User>>`
/// or `int[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// A class, interface, primitive or type variable with generic arguments.
    Named { name: String, args: Vec<TypeRef> },
    /// An array of the element type.
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// A reference without generic arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A reference with generic arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args,
        }
    }

    /// Parse a reference from source text.
    pub fn parse(text: &str) -> Result<Self, TypeRefError> {
        let mut parser = Parser::new(text);
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos < parser.chars.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(parsed)
    }

    /// Qualified name, `None` for arrays.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            TypeRef::Array(_) => None,
        }
    }

    /// Generic arguments in declaration order. Arrays have none.
    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            TypeRef::Array(_) => &[],
        }
    }

    /// Name after the last `.`, without generic arguments.
    pub fn simple_name(&self) -> Option<&str> {
        self.name().map(simple_name)
    }

    pub fn is_void(&self) -> bool {
        matches!(self.name(), Some("void" | "java.lang.Void" | "Void"))
    }

    /// Replace type variables bound in `bindings`.
    ///
    /// A type variable is a named reference without arguments whose name is a
    /// key of `bindings`. Unbound variables are left as they are.
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeRef {
        if bindings.is_empty() {
            return self.clone();
        }
        match self {
            TypeRef::Named { name, args } if args.is_empty() => bindings
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeRef::Named { name, args } => TypeRef::Named {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeRef::Array(element) => TypeRef::Array(Box::new(element.substitute(bindings))),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRef::Array(element) => write!(f, "{}[]", element),
        }
    }
}

impl FromStr for TypeRef {
    type Err = TypeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

/// Name after the last `.` of a qualified name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

struct Parser<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: &str) -> TypeRefError {
        TypeRefError {
            text: self.text.to_string(),
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_whitespace();
        if self.chars.get(self.pos) == Some(&c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> String {
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '$' | '?') {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeRefError> {
        let mut name = self.identifier();
        if name.is_empty() {
            return Err(self.error("expected a type name"));
        }

        // Wildcards: `?` is Object, `? extends X` / `? super X` is X.
        if name == "?" {
            let save = self.pos;
            let keyword = self.identifier();
            if keyword == "extends" || keyword == "super" {
                return self.parse_type();
            }
            self.pos = save;
            name = ROOT_OBJECT.to_string();
        }

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected ',' or '>'"));
            }
        }

        let mut parsed = TypeRef::Named { name, args };
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            parsed = TypeRef::Array(Box::new(parsed));
        }
        Ok(parsed)
    }
}

/// A metadata marker (annotation) attached to a field, parameter or method.
///
/// Accepts the shorthand `"NotNull"` or the full
/// `{ "name": "RequestParam", "attributes": { "required": "false" } }` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MarkerRepr")]
pub struct Marker {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MarkerRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
    },
}

impl From<MarkerRepr> for Marker {
    fn from(repr: MarkerRepr) -> Self {
        match repr {
            MarkerRepr::Name(name) => Marker {
                name,
                attributes: BTreeMap::new(),
            },
            MarkerRepr::Full { name, attributes } => Marker { name, attributes },
        }
    }
}

impl Marker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Raw attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute value with quotes stripped and whitespace trimmed; `None` when empty.
    pub fn text_attr(&self, key: &str) -> Option<String> {
        let text = self.attr(key)?.replace('"', "");
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Whether this marker is `simple` by simple or qualified name.
    pub fn is(&self, simple: &str) -> bool {
        self.name == simple || self.name.ends_with(&format!(".{}", simple))
    }
}

/// Ordered set of markers on one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markers(pub Vec<Marker>);

impl Markers {
    /// First marker matching `simple`.
    pub fn find(&self, simple: &str) -> Option<&Marker> {
        self.0.iter().find(|m| m.is(simple))
    }

    pub fn has(&self, simple: &str) -> bool {
        self.find(simple).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.0.iter()
    }
}

impl From<Vec<Marker>> for Markers {
    fn from(markers: Vec<Marker>) -> Self {
        Markers(markers)
    }
}

/// A field declared on a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "is_empty_markers")]
    pub markers: Markers,
    /// Documentation comment text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Trailing same-line comment, without the comment token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, rename = "static", skip_serializing_if = "is_false")]
    pub is_static: bool,
}

/// A type as the resolver sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Qualified name.
    pub name: String,
    /// Generic type parameter names, e.g. `["T"]` for `Result<T>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    /// Own fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertype: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl TypeDescriptor {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Bind type parameters to the arguments of a use site.
    ///
    /// Missing arguments leave the parameter unbound; extra ones are ignored.
    pub fn bindings(&self, args: &[TypeRef]) -> HashMap<String, TypeRef> {
        self.type_params
            .iter()
            .zip(args)
            .map(|(param, arg)| (param.clone(), arg.clone()))
            .collect()
    }

    /// Whether `ty` is one of this type's own parameters.
    pub fn is_type_param(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Named { name, args } => args.is_empty() && self.type_params.contains(name),
            TypeRef::Array(_) => false,
        }
    }
}

/// A parameter of an endpoint method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "is_empty_markers")]
    pub markers: Markers,
    /// `@param` text from the method's documentation comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// How a parameter's value is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Body,
    Query,
    Path,
    Attribute,
    Unbound,
}

impl Binding {
    /// Marker simple name that selects this binding.
    pub fn marker_name(&self) -> Option<&'static str> {
        match self {
            Binding::Body => Some("RequestBody"),
            Binding::Query => Some("RequestParam"),
            Binding::Path => Some("PathVariable"),
            Binding::Attribute => Some("RequestAttribute"),
            Binding::Unbound => None,
        }
    }

    /// Binding selected by a parameter's markers.
    pub fn of(markers: &Markers) -> Self {
        [
            Binding::Body,
            Binding::Query,
            Binding::Path,
            Binding::Attribute,
        ]
        .into_iter()
        .find(|b| b.marker_name().is_some_and(|m| markers.has(m)))
        .unwrap_or(Binding::Unbound)
    }
}

/// An endpoint method: parameters, return type and mapping markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "is_empty_markers")]
    pub markers: Markers,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
}

/// A class exposing endpoint methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "is_empty_markers")]
    pub markers: Markers,
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

/// On-disk shape of a model document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
    #[serde(default)]
    pub controllers: Vec<Controller>,
}

/// In-memory resolver over a model document.
///
/// Lookups are by qualified name; a simple name resolves when exactly one
/// type carries it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "ModelDocument")]
pub struct TypeModel {
    types: Vec<TypeDescriptor>,
    controllers: Vec<Controller>,
    by_name: HashMap<String, usize>,
    // None marks an ambiguous simple name.
    by_simple_name: HashMap<String, Option<usize>>,
}

impl TypeModel {
    pub fn new(types: Vec<TypeDescriptor>, controllers: Vec<Controller>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_simple_name: HashMap<String, Option<usize>> = HashMap::new();
        for (index, ty) in types.iter().enumerate() {
            // Later duplicates of a qualified name win.
            by_name.insert(ty.name.clone(), index);
            by_simple_name
                .entry(ty.simple_name().to_string())
                .and_modify(|slot| {
                    if *slot != Some(index) {
                        *slot = None;
                    }
                })
                .or_insert(Some(index));
        }
        Self {
            types,
            controllers,
            by_name,
            by_simple_name,
        }
    }

    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    /// Find a controller by qualified or simple name.
    pub fn controller(&self, name: &str) -> Option<&Controller> {
        self.controllers
            .iter()
            .find(|c| c.name == name || simple_name(&c.name) == name)
    }
}

impl From<ModelDocument> for TypeModel {
    fn from(doc: ModelDocument) -> Self {
        TypeModel::new(doc.types, doc.controllers)
    }
}

impl TypeResolver for TypeModel {
    fn resolve(&self, name: &str) -> Option<&TypeDescriptor> {
        if let Some(&index) = self.by_name.get(name) {
            return self.types.get(index);
        }
        if name.contains('.') {
            return None;
        }
        self.by_simple_name
            .get(name)
            .copied()
            .flatten()
            .and_then(|index| self.types.get(index))
    }
}

fn is_empty_markers(markers: &Markers) -> bool {
    markers.0.is_empty()
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_nested_generics() {
        let ty = TypeRef::parse("com.acme.Result<java.util.List<com.acme.User>>").unwrap();
        assert_eq!(ty.name(), Some("com.acme.Result"));
        assert_eq!(ty.args().len(), 1);
        assert_eq!(ty.args()[0].name(), Some("java.util.List"));
        assert_eq!(ty.args()[0].args()[0].simple_name(), Some("User"));
    }

    #[test]
    fn parse_arrays_and_maps() {
        let ty = TypeRef::parse("int[][]").unwrap();
        assert_eq!(
            ty,
            TypeRef::Array(Box::new(TypeRef::Array(Box::new(TypeRef::named("int")))))
        );

        let ty = TypeRef::parse("Map< String , List<Long> >").unwrap();
        assert_eq!(ty.to_string(), "Map<String, List<Long>>");
    }

    #[test]
    fn parse_wildcards() {
        let ty = TypeRef::parse("List<? extends com.acme.User>").unwrap();
        assert_eq!(ty.args()[0], TypeRef::named("com.acme.User"));

        let ty = TypeRef::parse("List<?>").unwrap();
        assert_eq!(ty.args()[0], TypeRef::named(ROOT_OBJECT));
    }

    #[test]
    fn parse_errors() {
        assert!(TypeRef::parse("").is_err());
        assert!(TypeRef::parse("List<String").is_err());
        assert!(TypeRef::parse("int[").is_err());
        assert!(TypeRef::parse("List<String>>").is_err());
    }

    #[test]
    fn substitute_binds_variables_only() {
        let bindings: HashMap<_, _> = [("T".to_string(), TypeRef::named("com.acme.User"))]
            .into_iter()
            .collect();
        let ty = TypeRef::parse("java.util.List<T>").unwrap();
        assert_eq!(
            ty.substitute(&bindings).to_string(),
            "java.util.List<com.acme.User>"
        );
        // A generic named `T` is not a variable.
        let ty = TypeRef::parse("T<String>").unwrap();
        assert_eq!(ty.substitute(&bindings), ty);
    }

    #[test]
    fn marker_shorthand_and_full_form() {
        let markers: Markers = serde_json::from_value(json!([
            "javax.validation.constraints.NotNull",
            { "name": "RequestParam", "attributes": { "required": "false", "value": "\"q\"" } }
        ]))
        .unwrap();
        assert!(markers.has("NotNull"));
        assert!(!markers.has("Null"));
        let param = markers.find("RequestParam").unwrap();
        assert_eq!(param.attr("required"), Some("false"));
        assert_eq!(param.text_attr("value").as_deref(), Some("q"));
    }

    #[test]
    fn binding_from_markers() {
        let markers = Markers(vec![Marker::new("org.springframework.web.bind.annotation.RequestBody")]);
        assert_eq!(Binding::of(&markers), Binding::Body);
        assert_eq!(Binding::of(&Markers::default()), Binding::Unbound);
    }

    #[test]
    fn model_resolves_simple_names_when_unambiguous() {
        let model: TypeModel = serde_json::from_value(json!({
            "types": [
                { "name": "com.a.User", "fields": [] },
                { "name": "com.a.Item", "fields": [] },
                { "name": "com.b.Item", "fields": [] }
            ]
        }))
        .unwrap();
        assert_eq!(model.resolve("User").unwrap().name, "com.a.User");
        assert!(model.resolve("Item").is_none());
        assert_eq!(model.resolve("com.b.Item").unwrap().name, "com.b.Item");
        assert!(model.resolve("com.c.User").is_none());
    }
}
