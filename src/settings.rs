//! Document generation settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::exclusion::ExclusionPolicy;
use crate::loader::load_json;
use crate::types::{TemplateOptions, ValueStyle};

/// Settings read from a JSON config file. Every key is optional.
///
/// ```json
/// {
///   "application": "shop",
///   "excluded_classes": "BaseEntity",
///   "excluded_fields": "com.acme.User:password;AuditInfo:*",
///   "show_response_json": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocSettings {
    /// Path segment placed in front of every request URL.
    pub application: String,
    /// Emit the `Controller -> title` line.
    pub show_call_location: bool,
    pub show_request_json: bool,
    pub show_response_json: bool,
    /// Append field descriptions as `//` comments in JSON templates.
    pub show_json_comments: bool,
    /// Render placeholder literals (`0`, `false`) instead of type names.
    pub example_values: bool,
    /// Comma-separated classes whose fields are never listed.
    pub excluded_classes: String,
    /// `class:field1,field2;class2:*` exclusion map.
    pub excluded_fields: String,
}

impl Default for DocSettings {
    fn default() -> Self {
        Self {
            application: String::new(),
            show_call_location: true,
            show_request_json: true,
            show_response_json: true,
            show_json_comments: true,
            example_values: false,
            excluded_classes: String::new(),
            excluded_fields: String::new(),
        }
    }
}

impl DocSettings {
    /// Read settings from a JSON file.
    ///
    /// # Errors
    ///
    /// IO and JSON syntax errors as for [`load_json`]; unknown value types
    /// surface as `LoadError::InvalidSettings`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let value = load_json(path)?;
        serde_json::from_value(value).map_err(|source| LoadError::InvalidSettings { source })
    }

    /// Exclusion policy combining the field map and the excluded classes.
    pub fn exclusion_policy(&self) -> ExclusionPolicy {
        ExclusionPolicy::parse(&self.excluded_fields).with_excluded_classes(&self.excluded_classes)
    }

    /// Options for JSON template sections.
    pub fn template_options(&self) -> TemplateOptions {
        let style = if self.example_values {
            ValueStyle::Example
        } else {
            ValueStyle::TypeName
        };
        TemplateOptions::new(style).comments(self.show_json_comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionSpec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_for_missing_keys() {
        let settings: DocSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, DocSettings::default());
        assert!(settings.show_request_json);
        assert!(settings.exclusion_policy().is_empty());
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"application": "shop", "example_values": true, "show_json_comments": false}}"#
        )
        .unwrap();

        let settings = DocSettings::load(file.path()).unwrap();
        assert_eq!(settings.application, "shop");
        let options = settings.template_options();
        assert_eq!(options.value_style, ValueStyle::Example);
        assert!(!options.comments);
    }

    #[test]
    fn wrong_value_type_is_invalid_settings() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"show_request_json": "yes"}}"#).unwrap();

        let err = DocSettings::load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidSettings { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn policy_merges_classes_and_fields() {
        let settings = DocSettings {
            excluded_classes: "BaseEntity".into(),
            excluded_fields: "User:password".into(),
            ..DocSettings::default()
        };
        let policy = settings.exclusion_policy();
        assert_eq!(
            policy.excluded_fields_for("com.acme.BaseEntity"),
            Some(&ExclusionSpec::All)
        );
        assert!(policy.is_field_excluded("com.acme.User", "password"));
        assert!(!policy.is_field_excluded("com.acme.User", "name"));
    }
}
