//! Model document loading from files, strings and HTTP URLs.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{LoadError, ValidateError};
use crate::model::TypeModel;
use crate::validator::validate_model_document;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "read document");

    load_json_str(&content)
}

/// Parse a JSON document from a string.
pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Fetch a JSON document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, the server
/// answers with an error status, or the body isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_json_url(url: &str) -> Result<Value, LoadError> {
    let network = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network)?;

    debug!(url, "fetching document");
    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a JSON document from a file path or URL.
///
/// URL loading requires the `remote` feature.
pub fn load_json_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_json_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_json(Path::new(source))
    }
}

/// Validate a raw document and build a [`TypeModel`] from it.
///
/// # Errors
///
/// Returns `ValidateError::Invalid` when the document doesn't match the
/// model schema, or `LoadError::MalformedModel` (wrapped) when a value
/// passes the schema but cannot be interpreted, such as an unparsable type
/// reference.
pub fn model_from_value(document: Value) -> Result<TypeModel, ValidateError> {
    validate_model_document(&document)?;
    let model: TypeModel = serde_json::from_value(document)
        .map_err(|source| LoadError::MalformedModel { source })?;
    debug!(
        types = model.types().len(),
        controllers = model.controllers().len(),
        "loaded type model"
    );
    Ok(model)
}

/// Load a type model from a file path.
pub fn load_model(path: &Path) -> Result<TypeModel, ValidateError> {
    model_from_value(load_json(path)?)
}

/// Load a type model from a JSON string.
pub fn load_model_str(content: &str) -> Result<TypeModel, ValidateError> {
    model_from_value(load_json_str(content)?)
}

/// Load a type model from an HTTP/HTTPS URL.
#[cfg(feature = "remote")]
pub fn load_model_url(url: &str) -> Result<TypeModel, ValidateError> {
    model_from_value(load_json_url(url)?)
}

/// Load a type model from a file path or URL.
pub fn load_model_auto(source: &str) -> Result<TypeModel, ValidateError> {
    model_from_value(load_json_auto(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeResolver;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MODEL: &str = r#"{
        "types": [{ "name": "com.acme.User", "fields": [{ "name": "id", "type": "Long" }] }],
        "controllers": []
    }"#;

    #[test]
    fn load_json_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"types": []}}"#).unwrap();

        let doc = load_json(file.path()).unwrap();
        assert!(doc["types"].is_array());
    }

    #[test]
    fn load_json_file_not_found() {
        let result = load_json(Path::new("/nonexistent/model.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_json_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let result = load_json(file.path());
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn is_url_detection() {
        assert!(is_url("https://example.com/model.json"));
        assert!(is_url("http://example.com/model.json"));
        assert!(!is_url("/path/to/model.json"));
        assert!(!is_url("./model.json"));
        assert!(!is_url("model.json"));
    }

    #[test]
    fn load_model_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", MODEL).unwrap();

        let model = load_model(file.path()).unwrap();
        assert!(model.resolve("com.acme.User").is_some());
        assert!(model.resolve("User").is_some());
    }

    #[test]
    fn load_model_auto_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", MODEL).unwrap();

        let model = load_model_auto(file.path().to_str().unwrap()).unwrap();
        assert_eq!(model.types().len(), 1);
    }

    #[test]
    fn load_model_rejects_schema_violation() {
        let result = load_model_str(r#"{"types": [{"fields": []}]}"#);
        assert!(matches!(result, Err(ValidateError::Invalid { .. })));
    }

    #[test]
    fn load_model_rejects_bad_type_reference() {
        let result = load_model_str(
            r#"{"types": [{"name": "User", "fields": [{"name": "x", "type": "List<"}]}]}"#,
        );
        assert!(matches!(
            result,
            Err(ValidateError::Load(LoadError::MalformedModel { .. }))
        ));
    }

    #[test]
    fn load_model_invalid_json_exit_code() {
        let err = load_model_str("{").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;

        #[test]
        fn load_model_url_valid() {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/model.json")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(MODEL)
                .create();

            let model = load_model_url(&format!("{}/model.json", server.url())).unwrap();
            assert!(model.resolve("com.acme.User").is_some());
            mock.assert();
        }

        #[test]
        fn load_json_url_404() {
            let mut server = mockito::Server::new();
            let _mock = server.mock("GET", "/missing.json").with_status(404).create();

            let result = load_json_url(&format!("{}/missing.json", server.url()));
            assert!(matches!(result, Err(LoadError::NetworkError { .. })));
        }

        #[test]
        fn load_json_url_invalid_body() {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/model.json")
                .with_status(200)
                .with_body("not json")
                .create();

            let result = load_json_url(&format!("{}/model.json", server.url()));
            assert!(matches!(result, Err(LoadError::NetworkError { .. })));
        }

        #[test]
        fn load_model_auto_url() {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/model.json")
                .with_status(200)
                .with_body(MODEL)
                .create();

            let model = load_model_auto(&format!("{}/model.json", server.url())).unwrap();
            assert_eq!(model.types().len(), 1);
        }
    }
}
