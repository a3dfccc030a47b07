//! Type classification - maps type references to document categories.
//!
//! Every decision here is made on names alone. The extractor asks for a
//! [`Classification`] before deciding whether to walk a type's fields,
//! descend into an element type, or stop.

use crate::model::{simple_name, TypeRef, ROOT_OBJECT};
use crate::types::Kind;

/// Source type name to canonical document type name.
const SCALAR_TYPES: &[(&str, &str)] = &[
    ("int", "Integer"),
    ("long", "Long"),
    ("double", "Double"),
    ("float", "Float"),
    ("boolean", "Boolean"),
    ("byte", "Byte"),
    ("short", "Short"),
    ("char", "Character"),
    ("java.lang.Integer", "Integer"),
    ("java.lang.Long", "Long"),
    ("java.lang.Double", "Double"),
    ("java.lang.Float", "Float"),
    ("java.lang.Boolean", "Boolean"),
    ("java.lang.Byte", "Byte"),
    ("java.lang.Short", "Short"),
    ("java.lang.Character", "Character"),
    ("java.lang.String", "String"),
    ("java.util.Date", "DateTime"),
    ("java.time.LocalDateTime", "DateTime"),
    ("java.time.LocalDate", "Date"),
    ("java.time.LocalTime", "Time"),
    ("java.math.BigDecimal", "BigDecimal"),
    ("java.math.BigInteger", "BigInteger"),
    ("Integer", "Integer"),
    ("Long", "Long"),
    ("Double", "Double"),
    ("Float", "Float"),
    ("Boolean", "Boolean"),
    ("Byte", "Byte"),
    ("Short", "Short"),
    ("Character", "Character"),
    ("String", "String"),
    ("Date", "DateTime"),
    ("LocalDateTime", "DateTime"),
    ("LocalDate", "Date"),
    ("LocalTime", "Time"),
    ("BigDecimal", "BigDecimal"),
    ("BigInteger", "BigInteger"),
];

/// Canonical scalar type name to JSON example literal.
const EXAMPLE_LITERALS: &[(&str, &str)] = &[
    ("Integer", "0"),
    ("Long", "0"),
    ("Double", "0.0"),
    ("Float", "0.0"),
    ("Boolean", "false"),
    ("Byte", "0"),
    ("Short", "0"),
    ("Character", "\"\""),
    ("String", "\"String\""),
    ("DateTime", "\"DateTime\""),
    ("Date", "\"Date\""),
    ("Time", "\"Time\""),
    ("BigDecimal", "0"),
    ("BigInteger", "0"),
];

/// Simple-name substrings that mark a generic wrapper type.
pub const ENVELOPE_MARKERS: &[&str] = &[
    "Result",
    "Response",
    "Page",
    "PageInfo",
    "PageResult",
    "ApiResult",
    "CommonResult",
    "RestResult",
    "BaseResult",
];

const COLLECTION_SUFFIXES: &[&str] = &["List", "Set", "Collection"];

/// Parameter types supplied by the web framework rather than the caller.
const FRAMEWORK_PARAM_TYPES: &[&str] = &[
    "javax.servlet.http.HttpServletRequest",
    "jakarta.servlet.http.HttpServletRequest",
    "javax.servlet.http.HttpServletResponse",
    "jakarta.servlet.http.HttpServletResponse",
    "javax.servlet.http.HttpSession",
    "jakarta.servlet.http.HttpSession",
    "org.springframework.ui.Model",
    "org.springframework.ui.ModelMap",
    "org.springframework.validation.Errors",
];

/// Result of classifying a type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: Kind,
    /// Canonical document type name.
    pub type_name: String,
}

impl Classification {
    fn new(kind: Kind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
        }
    }

    /// Example literal for scalar classifications.
    pub fn example(&self) -> Option<&'static str> {
        match self.kind {
            Kind::Scalar => example_literal(&self.type_name),
            _ => None,
        }
    }
}

/// Classify a type reference.
pub fn classify(ty: &TypeRef) -> Classification {
    let (name, args) = match ty {
        TypeRef::Array(_) => return Classification::new(Kind::Array, "Array"),
        TypeRef::Named { name, args } => (name.as_str(), args.as_slice()),
    };

    if let Some(canonical) = scalar_name(name) {
        return Classification::new(Kind::Scalar, canonical);
    }

    let simple = simple_name(name);
    if is_collection_name(name, !args.is_empty()) {
        return Classification::new(Kind::Collection, "List");
    }
    if name.starts_with("java.util.Map") || simple.ends_with("Map") {
        return Classification::new(Kind::Map, "Object");
    }
    // Remaining platform types (Object, Number, Void...) have no fields to show.
    if name.starts_with("java.lang.") {
        return Classification::new(Kind::Scalar, simple);
    }
    if is_envelope_name(simple) {
        return Classification::new(Kind::Envelope, simple);
    }
    Classification::new(Kind::Struct, simple)
}

/// Canonical document name for a scalar source type.
pub fn scalar_name(name: &str) -> Option<&'static str> {
    SCALAR_TYPES
        .iter()
        .find(|(source, _)| *source == name)
        .map(|(_, canonical)| *canonical)
}

/// Example JSON literal for a canonical scalar type name.
pub fn example_literal(type_name: &str) -> Option<&'static str> {
    EXAMPLE_LITERALS
        .iter()
        .find(|(canonical, _)| *canonical == type_name)
        .map(|(_, literal)| *literal)
}

/// Element type of a collection or array; `None` for anything else.
///
/// A raw collection yields `java.lang.Object`.
pub fn element_type(ty: &TypeRef) -> Option<TypeRef> {
    match ty {
        TypeRef::Array(element) => Some((**element).clone()),
        TypeRef::Named { args, .. } if classify(ty).kind == Kind::Collection => Some(
            args.first()
                .cloned()
                .unwrap_or_else(|| TypeRef::named(ROOT_OBJECT)),
        ),
        TypeRef::Named { .. } => None,
    }
}

/// Whether a simple type name looks like a response/page wrapper.
pub fn is_envelope_name(simple: &str) -> bool {
    ENVELOPE_MARKERS.iter().any(|marker| simple.contains(marker))
}

/// Whether a parameter type is injected by the framework and not part of the request.
pub fn is_framework_param(ty: &TypeRef) -> bool {
    let Some(name) = ty.name() else {
        return false;
    };
    FRAMEWORK_PARAM_TYPES.contains(&name)
        || name.ends_with("BindingResult")
        || name.ends_with("RedirectAttributes")
        || name.contains("MultipartFile")
        || name.starts_with("org.springframework.web.")
}

fn is_collection_name(name: &str, has_args: bool) -> bool {
    let simple = simple_name(name);
    if name.starts_with("java.util.") {
        return COLLECTION_SUFFIXES.iter().any(|s| simple.ends_with(s));
    }
    if COLLECTION_SUFFIXES.contains(&simple) {
        return true;
    }
    has_args && COLLECTION_SUFFIXES.iter().any(|s| simple.ends_with(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_str(text: &str) -> Classification {
        classify(&TypeRef::parse(text).unwrap())
    }

    #[test]
    fn scalar_defaults() {
        let c = classify_str("long");
        assert_eq!((c.kind, c.type_name.as_str()), (Kind::Scalar, "Long"));
        assert_eq!(c.example(), Some("0"));

        let c = classify_str("boolean");
        assert_eq!(c.type_name, "Boolean");
        assert_eq!(c.example(), Some("false"));

        let c = classify_str("java.lang.String");
        assert_eq!(c.type_name, "String");
        assert_eq!(c.example(), Some("\"String\""));
    }

    #[test]
    fn date_time_variants() {
        assert_eq!(classify_str("java.util.Date").type_name, "DateTime");
        assert_eq!(classify_str("java.time.LocalDate").type_name, "Date");
        assert_eq!(classify_str("java.time.LocalTime").type_name, "Time");
        assert_eq!(example_literal("DateTime"), Some("\"DateTime\""));
    }

    #[test]
    fn collections_and_arrays() {
        let c = classify_str("java.util.List<com.acme.User>");
        assert_eq!((c.kind, c.type_name.as_str()), (Kind::Collection, "List"));
        assert_eq!(classify_str("java.util.HashSet<String>").kind, Kind::Collection);
        assert_eq!(classify_str("com.acme.UserList<X>").kind, Kind::Collection);
        // Without generic arguments a *List class is an ordinary struct.
        assert_eq!(classify_str("com.acme.WaitList").kind, Kind::Struct);

        let c = classify_str("com.acme.User[]");
        assert_eq!((c.kind, c.type_name.as_str()), (Kind::Array, "Array"));
    }

    #[test]
    fn maps_render_as_object() {
        let c = classify_str("java.util.Map<String, Object>");
        assert_eq!((c.kind, c.type_name.as_str()), (Kind::Map, "Object"));
        assert_eq!(classify_str("java.util.LinkedHashMap<String, Long>").kind, Kind::Map);
    }

    #[test]
    fn envelopes_by_simple_name() {
        assert_eq!(classify_str("com.acme.Result<com.acme.User>").kind, Kind::Envelope);
        assert_eq!(classify_str("com.acme.PageInfo<T>").kind, Kind::Envelope);
        assert_eq!(classify_str("com.acme.UserResponse").kind, Kind::Envelope);
        // Package segments do not count.
        assert_eq!(classify_str("com.acme.result.User").kind, Kind::Struct);
    }

    #[test]
    fn structs_use_simple_name() {
        let c = classify_str("com.acme.Address");
        assert_eq!((c.kind, c.type_name.as_str()), (Kind::Struct, "Address"));
        assert_eq!(c.example(), None);
    }

    #[test]
    fn platform_types_are_opaque() {
        let c = classify_str("java.lang.Object");
        assert_eq!((c.kind, c.type_name.as_str()), (Kind::Scalar, "Object"));
    }

    #[test]
    fn element_types() {
        let list = TypeRef::parse("java.util.List<com.acme.User>").unwrap();
        assert_eq!(element_type(&list), Some(TypeRef::named("com.acme.User")));

        let raw = TypeRef::parse("java.util.List").unwrap();
        assert_eq!(element_type(&raw), Some(TypeRef::named(ROOT_OBJECT)));

        let array = TypeRef::parse("int[]").unwrap();
        assert_eq!(element_type(&array), Some(TypeRef::named("int")));

        assert_eq!(element_type(&TypeRef::named("com.acme.User")), None);
    }

    #[test]
    fn framework_params() {
        for name in [
            "javax.servlet.http.HttpServletRequest",
            "org.springframework.validation.BindingResult",
            "org.springframework.web.multipart.MultipartFile",
            "org.springframework.web.context.request.WebRequest",
        ] {
            assert!(is_framework_param(&TypeRef::named(name)), "{}", name);
        }
        assert!(!is_framework_param(&TypeRef::named("com.acme.RequestContext")));
    }
}
