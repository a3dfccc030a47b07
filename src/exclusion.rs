//! Field exclusion policy.
//!
//! Configuration is a string of the form `class1:field1,field2;class2:*`.
//! It is parsed once into an [`ExclusionPolicy`]; the extractor only sees
//! the typed form and borrows it immutably for the whole walk.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::model::simple_name;

/// What to suppress for one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionSpec {
    /// Every field; the class contributes nothing to the output.
    All,
    /// Only the named fields.
    Fields(BTreeSet<String>),
}

impl ExclusionSpec {
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExclusionSpec::Fields(names.into_iter().map(Into::into).collect())
    }

    pub fn excludes(&self, field: &str) -> bool {
        match self {
            ExclusionSpec::All => true,
            ExclusionSpec::Fields(names) => names.contains(field),
        }
    }
}

/// Per-class exclusion entries, in configuration order.
///
/// Entry names may be qualified or simple class names. A class matches an
/// entry when the names are equal, when the class name ends with
/// `.<entry>`, or when the entry ends with `.<simple class name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPolicy {
    entries: Vec<(String, ExclusionSpec)>,
}

impl ExclusionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `class1:field1,field2;class2:*` form.
    ///
    /// `*` or an empty field list excludes the whole class. Entries without a
    /// class name before the colon are skipped.
    pub fn parse(text: &str) -> Self {
        let mut policy = Self::new();
        for entry in text.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let Some((class, fields)) = entry.split_once(':') else {
                tracing::warn!(entry, "skipping exclusion entry without ':'");
                continue;
            };
            let class = class.trim();
            if class.is_empty() {
                tracing::warn!(entry, "skipping exclusion entry without a class name");
                continue;
            }
            let fields = fields.trim();
            let spec = if fields.is_empty() || fields == "*" {
                ExclusionSpec::All
            } else {
                ExclusionSpec::fields(
                    fields
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty()),
                )
            };
            policy.insert(class, spec);
        }
        policy
    }

    /// Add whole-class exclusions from a comma-separated list.
    ///
    /// Classes that already have an entry keep it.
    pub fn with_excluded_classes(mut self, classes: &str) -> Self {
        for class in classes.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            if !self.entries.iter().any(|(name, _)| name == class) {
                self.entries.push((class.to_string(), ExclusionSpec::All));
            }
        }
        self
    }

    /// Set the entry for `class`, replacing an existing entry of the same name.
    pub fn insert(&mut self, class: impl Into<String>, spec: ExclusionSpec) {
        let class = class.into();
        match self.entries.iter_mut().find(|(name, _)| *name == class) {
            Some(slot) => slot.1 = spec,
            None => self.entries.push((class, spec)),
        }
    }

    pub fn remove(&mut self, class: &str) -> Option<ExclusionSpec> {
        let index = self.entries.iter().position(|(name, _)| name == class)?;
        Some(self.entries.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ExclusionSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Whether any entry applies to `class`.
    pub fn is_class_excluded(&self, class: &str) -> bool {
        self.excluded_fields_for(class).is_some()
    }

    /// The first entry matching `class`.
    pub fn excluded_fields_for(&self, class: &str) -> Option<&ExclusionSpec> {
        self.entries
            .iter()
            .find(|(entry, _)| entry_matches(entry, class))
            .map(|(_, spec)| spec)
    }

    /// Whether `field` of `class` is suppressed by this policy alone.
    ///
    /// Exclusions forwarded from subclasses are applied by the extractor.
    pub fn is_field_excluded(&self, class: &str, field: &str) -> bool {
        self.excluded_fields_for(class)
            .is_some_and(|spec| spec.excludes(field))
    }
}

/// Whether the exclusion entry name `entry` applies to `class`.
pub fn entry_matches(entry: &str, class: &str) -> bool {
    class == entry
        || class
            .strip_suffix(entry)
            .is_some_and(|head| head.ends_with('.'))
        || entry
            .strip_suffix(simple_name(class))
            .is_some_and(|head| head.ends_with('.'))
}

impl fmt::Display for ExclusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (class, spec)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            match spec {
                ExclusionSpec::All => write!(f, "{}:*", class)?,
                ExclusionSpec::Fields(names) => {
                    let joined: Vec<&str> = names.iter().map(String::as_str).collect();
                    write!(f, "{}:{}", class, joined.join(","))?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for ExclusionPolicy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ExclusionPolicy::parse(s))
    }
}
