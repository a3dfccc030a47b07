//! Endpoint documents.
//!
//! Every controller method carrying a `*Mapping` marker is an endpoint. Each
//! endpoint renders to one Markdown page: title, call location, request URL,
//! HTTP method and content type, then parameter tables and JSON templates for
//! the request and the response.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::doc;
use crate::exclusion::ExclusionPolicy;
use crate::extractor::Extractor;
use crate::model::{
    simple_name, Binding, Controller, Marker, Markers, MethodSignature, TypeModel, TypeResolver,
};
use crate::settings::DocSettings;
use crate::table::{generate_parameter_table, TABLE_HEADER};
use crate::template::generate_json_template_with;
use crate::types::Field;

/// Separator placed after each page when pages are joined.
pub const PAGE_SEPARATOR: &str = "\n---\n\n";

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Used when a method mapping names no verb.
const ANY_METHOD: &str = "GET/POST";

/// A controller method exposed over HTTP.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub controller: &'a Controller,
    pub method: &'a MethodSignature,
}

impl<'a> Endpoint<'a> {
    pub fn new(controller: &'a Controller, method: &'a MethodSignature) -> Self {
        Self { controller, method }
    }

    pub fn title(&self) -> String {
        method_title(self.method)
    }

    /// Controller and method mapping paths combined.
    pub fn path(&self) -> String {
        combine_path(
            &mapping_path(&self.controller.markers),
            &mapping_path(&self.method.markers),
        )
    }

    pub fn http_method(&self) -> String {
        http_method(&self.method.markers)
    }

    pub fn content_type(&self) -> ContentType {
        content_type(self.method)
    }
}

/// How the request payload is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentType {
    #[serde(rename = "JSON")]
    Json,
    FormData,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Json => write!(f, "JSON"),
            ContentType::FormData => write!(f, "FormData"),
        }
    }
}

/// A rendered endpoint page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDoc {
    pub title: String,
    pub http_method: String,
    pub url: String,
    pub content: String,
}

/// Endpoints of every controller in the model, in declaration order.
pub fn enumerate_endpoints(model: &TypeModel) -> Vec<Endpoint<'_>> {
    model
        .controllers()
        .iter()
        .flat_map(controller_endpoints)
        .collect()
}

/// Endpoints of one controller, in declaration order.
pub fn controller_endpoints(controller: &Controller) -> Vec<Endpoint<'_>> {
    controller
        .methods
        .iter()
        .filter(|method| is_endpoint(method))
        .map(|method| Endpoint::new(controller, method))
        .collect()
}

/// Whether a method carries a request mapping.
pub fn is_endpoint(method: &MethodSignature) -> bool {
    mapping_marker(&method.markers).is_some()
}

fn mapping_marker(markers: &Markers) -> Option<&Marker> {
    markers
        .iter()
        .find(|marker| simple_name(&marker.name).contains("Mapping"))
}

/// Path declared by a mapping marker, or `""`.
///
/// Takes `value`, else `path`. For a list such as `{"/a", "/b"}` only the
/// first entry is used.
pub fn mapping_path(markers: &Markers) -> String {
    let Some(marker) = mapping_marker(markers) else {
        return String::new();
    };
    let Some(text) = marker.attr("value").or_else(|| marker.attr("path")) else {
        return String::new();
    };
    let text = text.trim();
    let text = match text.strip_prefix('{') {
        Some(list) => {
            let list = list.strip_suffix('}').unwrap_or(list);
            list.split(',').next().unwrap_or("")
        }
        None => text,
    };
    text.replace('"', "").trim().to_string()
}

/// Join a controller path and a method path with exactly one `/` between
/// them and a leading `/`.
pub fn combine_path(class_path: &str, method_path: &str) -> String {
    let lead = |path: &str| {
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        }
    };
    if class_path.is_empty() {
        return lead(method_path);
    }
    if method_path.is_empty() {
        return lead(class_path);
    }
    let class_path = lead(class_path);
    match (class_path.ends_with('/'), method_path.starts_with('/')) {
        (true, true) => format!("{}{}", &class_path[..class_path.len() - 1], method_path),
        (false, false) => format!("{}/{}", class_path, method_path),
        _ => format!("{}{}", class_path, method_path),
    }
}

/// HTTP verb(s) of a method mapping.
///
/// `GetMapping` and friends name their verb. `RequestMapping` lists verbs in
/// its `method` attribute, joined with `/` when there are several; without
/// one, or for any other mapping, the result is `GET/POST`.
pub fn http_method(markers: &Markers) -> String {
    let Some(marker) = mapping_marker(markers) else {
        return ANY_METHOD.to_string();
    };
    let simple = simple_name(&marker.name);
    for verb in ["Get", "Post", "Put", "Delete", "Patch"] {
        if simple.starts_with(verb) && simple.ends_with("Mapping") {
            return verb.to_uppercase();
        }
    }
    if marker.is("RequestMapping") {
        if let Some(verbs) = marker.attr("method").map(parse_request_methods) {
            if !verbs.is_empty() {
                return verbs;
            }
        }
    }
    ANY_METHOD.to_string()
}

/// `{RequestMethod.GET, RequestMethod.POST}` to `GET/POST`.
fn parse_request_methods(text: &str) -> String {
    let mut verbs: Vec<String> = Vec::new();
    for part in text.replace(['{', '}'], "").split(',') {
        let part = part.trim();
        let token = part.rsplit('.').next().unwrap_or(part);
        let token: String = token
            .chars()
            .filter(char::is_ascii_alphabetic)
            .collect::<String>()
            .to_uppercase();
        if HTTP_METHODS.contains(&token.as_str()) && !verbs.contains(&token) {
            verbs.push(token);
        }
    }
    verbs.join("/")
}

/// `JSON` when a parameter is bound to the request body, else `FormData`.
pub fn content_type(method: &MethodSignature) -> ContentType {
    if method
        .params
        .iter()
        .any(|param| Binding::of(&param.markers) == Binding::Body)
    {
        ContentType::Json
    } else {
        ContentType::FormData
    }
}

/// First line of the method's documentation, else the method name.
pub fn method_title(method: &MethodSignature) -> String {
    method
        .doc
        .as_deref()
        .and_then(doc::title)
        .unwrap_or_else(|| method.name.clone())
}

/// Display name of a controller.
///
/// The documentation summary when there is one, else the simple class name
/// without its `Controller` suffix.
pub fn controller_name(controller: &Controller) -> String {
    if let Some(summary) = controller.doc.as_deref().map(doc::summary) {
        if !summary.is_empty() {
            return summary;
        }
    }
    let simple = simple_name(&controller.name);
    match simple.strip_suffix("Controller") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => simple.to_string(),
    }
}

/// Request URL: the application segment, if any, followed by the path.
pub fn request_url(application: &str, path: &str) -> String {
    let application = application.trim_matches('/');
    if application.is_empty() {
        path.to_string()
    } else {
        format!("/{}{}", application, path)
    }
}

/// Renders endpoint pages from a resolver, an exclusion policy and settings.
pub struct Assembler<'a, R: ?Sized> {
    extractor: Extractor<'a, R>,
    settings: &'a DocSettings,
}

impl<'a, R: TypeResolver + ?Sized> Assembler<'a, R> {
    pub fn new(resolver: &'a R, policy: &'a ExclusionPolicy, settings: &'a DocSettings) -> Self {
        Self {
            extractor: Extractor::new(resolver, policy),
            settings,
        }
    }

    /// Render one endpoint page.
    pub fn render(&self, endpoint: &Endpoint<'_>) -> EndpointDoc {
        let title = endpoint.title();
        let url = request_url(&self.settings.application, &endpoint.path());
        let http_method = endpoint.http_method();
        debug!(controller = %endpoint.controller.name, method = %endpoint.method.name, %url, "rendering endpoint");

        let request = self.extractor.extract_request_fields(endpoint.method);
        let response = self
            .extractor
            .extract_response_fields(endpoint.method.return_type.as_ref());

        let mut content = format!("# {}\n\n", title);
        if self.settings.show_call_location {
            content.push_str("**Call location:**\n");
            content.push_str(&format!(
                "- {} -> {}\n\n",
                controller_name(endpoint.controller),
                title
            ));
        }
        content.push_str("**Request URL:**\n");
        content.push_str(&format!("- `{}`\n\n", url));
        content.push_str("**Request method:**\n");
        content.push_str(&format!("- {}\n- {}\n\n", http_method, endpoint.content_type()));

        self.push_table(&mut content, "Request parameters", &request);
        if self.settings.show_request_json {
            self.push_template(&mut content, "Request JSON", &request);
        }
        self.push_table(&mut content, "Response parameters", &response);
        if self.settings.show_response_json {
            self.push_template(&mut content, "Response JSON", &response);
        }

        EndpointDoc {
            title,
            http_method,
            url,
            content,
        }
    }

    /// Render pages for `endpoints`, in order.
    pub fn render_all(&self, endpoints: &[Endpoint<'_>]) -> Vec<EndpointDoc> {
        endpoints.iter().map(|e| self.render(e)).collect()
    }

    fn push_table(&self, content: &mut String, heading: &str, fields: &[Field]) {
        content.push_str(&format!("### {}\n\n", heading));
        content.push_str(TABLE_HEADER);
        content.push_str(&generate_parameter_table(fields));
        content.push('\n');
    }

    fn push_template(&self, content: &mut String, heading: &str, fields: &[Field]) {
        content.push_str(&format!("### {}\n\n```json\n", heading));
        content.push_str(&generate_json_template_with(
            fields,
            &self.settings.template_options(),
        ));
        content.push_str("\n```\n\n");
    }
}

/// Concatenate pages, each followed by [`PAGE_SEPARATOR`].
pub fn join_documents(docs: &[EndpointDoc]) -> String {
    docs.iter()
        .map(|doc| format!("{}{}", doc.content, PAGE_SEPARATOR))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Parameter, TypeRef};

    fn markers(list: Vec<Marker>) -> Markers {
        Markers::from(list)
    }

    fn method(name: &str, mapping: Marker) -> MethodSignature {
        MethodSignature {
            name: name.into(),
            doc: None,
            markers: markers(vec![mapping]),
            params: Vec::new(),
            return_type: None,
        }
    }

    #[test]
    fn combine_paths() {
        assert_eq!(combine_path("", "users"), "/users");
        assert_eq!(combine_path("api", ""), "/api");
        assert_eq!(combine_path("/api/", "/users"), "/api/users");
        assert_eq!(combine_path("/api", "users"), "/api/users");
        assert_eq!(combine_path("api", "/users"), "/api/users");
        assert_eq!(combine_path("", ""), "/");
    }

    #[test]
    fn mapping_path_variants() {
        let m = markers(vec![Marker::new("GetMapping").with_attr("value", "\"/one\"")]);
        assert_eq!(mapping_path(&m), "/one");

        let m = markers(vec![Marker::new("RequestMapping").with_attr("path", "{\"/a\", \"/b\"}")]);
        assert_eq!(mapping_path(&m), "/a");

        let m = markers(vec![Marker::new("PostMapping")]);
        assert_eq!(mapping_path(&m), "");

        let m = markers(vec![Marker::new("NotNull")]);
        assert_eq!(mapping_path(&m), "");
    }

    #[test]
    fn http_verbs() {
        let verb = |marker: Marker| http_method(&markers(vec![marker]));
        assert_eq!(verb(Marker::new("GetMapping")), "GET");
        assert_eq!(
            verb(Marker::new("org.springframework.web.bind.annotation.DeleteMapping")),
            "DELETE"
        );
        assert_eq!(verb(Marker::new("RequestMapping")), "GET/POST");
        assert_eq!(
            verb(Marker::new("RequestMapping").with_attr("method", "RequestMethod.PUT")),
            "PUT"
        );
        assert_eq!(
            verb(Marker::new("RequestMapping").with_attr(
                "method",
                "{RequestMethod.GET, RequestMethod.POST, RequestMethod.GET}"
            )),
            "GET/POST"
        );
        assert_eq!(
            verb(Marker::new("RequestMapping").with_attr("method", "{}")),
            "GET/POST"
        );
    }

    #[test]
    fn content_type_from_body_binding() {
        let mut m = method("save", Marker::new("PostMapping"));
        assert_eq!(content_type(&m), ContentType::FormData);
        m.params.push(Parameter {
            name: "req".into(),
            ty: TypeRef::named("com.acme.SaveRequest"),
            markers: markers(vec![Marker::new("RequestBody")]),
            doc: None,
        });
        assert_eq!(content_type(&m), ContentType::Json);
        assert_eq!(content_type(&m).to_string(), "JSON");
    }

    #[test]
    fn titles_and_controller_names() {
        let mut m = method("listUsers", Marker::new("GetMapping"));
        assert_eq!(method_title(&m), "listUsers");
        m.doc = Some("/**\n * List users\n * Paged.\n */".into());
        assert_eq!(method_title(&m), "List users");

        let mut controller = Controller {
            name: "com.acme.UserController".into(),
            doc: None,
            markers: Markers::default(),
            methods: Vec::new(),
        };
        assert_eq!(controller_name(&controller), "User");
        controller.doc = Some("User management".into());
        assert_eq!(controller_name(&controller), "User management");
    }

    #[test]
    fn endpoints_need_mapping_marker() {
        let controller = Controller {
            name: "OrderController".into(),
            doc: None,
            markers: markers(vec![Marker::new("RequestMapping").with_attr("value", "\"/order\"")]),
            methods: vec![
                method("get", Marker::new("GetMapping").with_attr("value", "\"/get\"")),
                method("helper", Marker::new("Override")),
            ],
        };
        let endpoints = controller_endpoints(&controller);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path(), "/order/get");
    }

    #[test]
    fn request_url_with_and_without_application() {
        assert_eq!(request_url("shop", "/order/get"), "/shop/order/get");
        assert_eq!(request_url("/shop/", "/order/get"), "/shop/order/get");
        assert_eq!(request_url("", "/order/get"), "/order/get");
    }

    #[test]
    fn empty_model_has_no_endpoints() {
        assert!(enumerate_endpoints(&TypeModel::default()).is_empty());
        assert_eq!(join_documents(&[]), "");
    }
}
