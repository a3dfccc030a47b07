//! Model linting - static analysis of a loaded type model.
//!
//! The extractor silently drops whatever it cannot resolve. The linter
//! reports those gaps up front:
//! - Supertypes that are not in the model (E001)
//! - Qualified type names declared more than once (E002)
//! - Field, parameter and return types that are not in the model (W001)
//! - Exclusion entries matching no type (W002) or naming no field (W003)
//! - Controllers without endpoints (W004)

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::assembler::is_endpoint;
use crate::classifier::{classify, element_type, is_framework_param};
use crate::exclusion::{entry_matches, ExclusionPolicy, ExclusionSpec};
use crate::model::{TypeDescriptor, TypeModel, TypeRef, TypeResolver};
use crate::types::Kind;

/// Item name used for diagnostics about the exclusion policy.
pub const EXCLUSIONS_ITEM: &str = "exclusions";

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    /// Type or controller the diagnostic belongs to.
    pub item: String,
    /// JSON path into the model document (e.g., "/types/0/fields/2/type")
    pub path: String,
    pub message: String,
}

/// Diagnostics for one type, controller or the exclusion policy.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    pub item: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a model.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub types_checked: usize,
    pub controllers_checked: usize,
    pub endpoints_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Items with at least one diagnostic.
    pub results: Vec<ItemResult>,
}

impl LintResult {
    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }

    /// Like [`is_ok`](Self::is_ok), with warnings counting as errors when
    /// `strict` is set.
    pub fn passes(&self, strict: bool) -> bool {
        self.is_ok() && !(strict && self.warnings > 0)
    }

    /// All diagnostics, item by item.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.results.iter().flat_map(|r| r.diagnostics.iter())
    }
}

/// Lint a model together with the exclusion policy that will be applied to it.
pub fn lint_model(model: &TypeModel, policy: &ExclusionPolicy) -> LintResult {
    let mut results = Vec::new();
    let mut seen = HashSet::new();

    for (index, ty) in model.types().iter().enumerate() {
        let mut lint = ItemLint::new(model, &ty.name);
        let base = format!("/types/{}", index);

        if !seen.insert(ty.name.as_str()) {
            lint.push(
                Severity::Error,
                "E002",
                &base,
                format!("duplicate type name \"{}\", later declaration wins", ty.name),
            );
        }

        for (i, field) in ty.fields.iter().enumerate() {
            lint.check_ref(
                &field.ty,
                &ty.type_params,
                &format!("{}/fields/{}/type", base, i),
                &format!("field \"{}\"", field.name),
            );
        }

        if let Some(supertype) = &ty.supertype {
            lint.check_supertype(supertype, ty, &format!("{}/supertype", base));
        }

        results.extend(lint.finish());
    }

    let mut endpoints_checked = 0;
    for (index, controller) in model.controllers().iter().enumerate() {
        let mut lint = ItemLint::new(model, &controller.name);
        let base = format!("/controllers/{}", index);
        let mut endpoints = 0;

        for (m, method) in controller.methods.iter().enumerate() {
            if !is_endpoint(method) {
                continue;
            }
            endpoints += 1;
            let method_base = format!("{}/methods/{}", base, m);
            for (p, param) in method.params.iter().enumerate() {
                if is_framework_param(&param.ty) {
                    continue;
                }
                lint.check_ref(
                    &param.ty,
                    &[],
                    &format!("{}/params/{}/type", method_base, p),
                    &format!("parameter \"{}\" of {}", param.name, method.name),
                );
            }
            if let Some(return_type) = &method.return_type {
                lint.check_ref(
                    return_type,
                    &[],
                    &format!("{}/return_type", method_base),
                    &format!("return type of {}", method.name),
                );
            }
        }

        if endpoints == 0 {
            lint.push(
                Severity::Warning,
                "W004",
                &base,
                "controller has no mapped endpoint methods".to_string(),
            );
        }
        endpoints_checked += endpoints;
        results.extend(lint.finish());
    }

    results.extend(lint_policy(model, policy));

    let count = |severity: Severity| {
        results
            .iter()
            .flat_map(|r: &ItemResult| r.diagnostics.iter())
            .filter(|d| d.severity == severity)
            .count()
    };
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);

    LintResult {
        types_checked: model.types().len(),
        controllers_checked: model.controllers().len(),
        endpoints_checked,
        errors,
        warnings,
        results,
    }
}

/// Exclusion entries must match a type, and listed fields must exist on it or
/// one of its ancestors.
fn lint_policy(model: &TypeModel, policy: &ExclusionPolicy) -> Option<ItemResult> {
    let mut lint = ItemLint::new(model, EXCLUSIONS_ITEM);
    for (entry, spec) in policy.entries() {
        let path = format!("/{}/{}", EXCLUSIONS_ITEM, entry);
        let matched: Vec<&TypeDescriptor> = model
            .types()
            .iter()
            .filter(|ty| entry_matches(entry, &ty.name))
            .collect();

        if matched.is_empty() {
            lint.push(
                Severity::Warning,
                "W002",
                &path,
                format!("exclusion entry \"{}\" matches no type", entry),
            );
            continue;
        }

        let ExclusionSpec::Fields(names) = spec else {
            continue;
        };
        let declared: BTreeSet<&str> = matched
            .iter()
            .flat_map(|ty| declared_fields(model, ty))
            .collect();
        for name in names.iter().filter(|n| !declared.contains(n.as_str())) {
            lint.push(
                Severity::Warning,
                "W003",
                &path,
                format!("excluded field \"{}\" is not declared on \"{}\"", name, entry),
            );
        }
    }
    lint.finish()
}

/// Field names of a type and its resolvable ancestors.
fn declared_fields<'m>(model: &'m TypeModel, ty: &'m TypeDescriptor) -> Vec<&'m str> {
    let mut names = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Some(ty);
    while let Some(descriptor) = current {
        if !visited.insert(descriptor.name.as_str()) {
            break;
        }
        names.extend(descriptor.fields.iter().map(|f| f.name.as_str()));
        current = descriptor
            .supertype
            .as_ref()
            .and_then(TypeRef::name)
            .and_then(|name| model.resolve(name));
    }
    names
}

struct ItemLint<'m> {
    model: &'m TypeModel,
    item: String,
    diagnostics: Vec<Diagnostic>,
}

impl<'m> ItemLint<'m> {
    fn new(model: &'m TypeModel, item: &str) -> Self {
        Self {
            model,
            item: item.to_string(),
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, severity: Severity, code: &str, path: &str, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            code: code.to_string(),
            item: self.item.clone(),
            path: path.to_string(),
            message,
        });
    }

    /// Report structured types under `ty` the model cannot resolve.
    ///
    /// Names in `scope` are type parameters of the enclosing type. Map values
    /// are never walked, so they are not checked.
    fn check_ref(&mut self, ty: &TypeRef, scope: &[String], path: &str, what: &str) {
        if let TypeRef::Named { name, args } = ty {
            if args.is_empty() && scope.contains(name) {
                return;
            }
        }
        match classify(ty).kind {
            Kind::Scalar | Kind::Map => {}
            Kind::Collection | Kind::Array => {
                if let Some(element) = element_type(ty) {
                    self.check_ref(&element, scope, path, what);
                }
            }
            Kind::Struct | Kind::Envelope => {
                let Some(name) = ty.name() else {
                    return;
                };
                if self.model.resolve(name).is_none() {
                    self.push(
                        Severity::Warning,
                        "W001",
                        path,
                        format!("{}: type \"{}\" is not in the model", what, name),
                    );
                }
                for arg in ty.args() {
                    self.check_ref(arg, scope, path, what);
                }
            }
        }
    }

    fn check_supertype(&mut self, supertype: &TypeRef, owner: &TypeDescriptor, path: &str) {
        if !classify(supertype).kind.is_structured() {
            return;
        }
        let Some(name) = supertype.name() else {
            return;
        };
        if self.model.resolve(name).is_none() {
            self.push(
                Severity::Error,
                "E001",
                path,
                format!(
                    "supertype \"{}\" of \"{}\" is not in the model, inherited fields will be missing",
                    name, owner.name
                ),
            );
        }
        for arg in supertype.args() {
            self.check_ref(arg, &owner.type_params, path, "supertype argument");
        }
    }

    fn finish(self) -> Option<ItemResult> {
        if self.diagnostics.is_empty() {
            return None;
        }
        let status = if self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
        {
            ItemStatus::Error
        } else {
            ItemStatus::Warning
        };
        Some(ItemResult {
            item: self.item,
            status,
            diagnostics: self.diagnostics,
        })
    }
}
