//! Field access into opaque caller records.
//!
//! The data view never looks at a row directly. It asks the row for a
//! top-level field and walks nested mappings itself, so anything that can
//! hand out `serde_json::Value` fields can be browsed.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

/// A row the data view can read fields from.
///
/// # Example
///
/// ```
/// use serde_json::{Value, json};
/// use tabula::dataview::{Accessor, Record};
///
/// let row = json!({"product": {"name": "Espresso", "price": 4.5}});
/// let name = Accessor::path("product.name").resolve(&row);
/// assert_eq!(name, Some(&Value::from("Espresso")));
/// ```
pub trait Record {
    /// Top-level field by key.
    fn field(&self, key: &str) -> Option<&Value>;
}

impl Record for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl Record for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Record for HashMap<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Record for BTreeMap<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// How a column or filter reaches its value inside a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// A single top-level key, used verbatim (may contain dots)
    Key(String),
    /// Dotted path, one mapping level per segment
    Path(Vec<String>),
}

impl Accessor {
    pub fn key(key: impl Into<String>) -> Self {
        Accessor::Key(key.into())
    }

    /// Split a dotted path (`"product.name"`).
    pub fn path(path: &str) -> Self {
        Accessor::Path(path.split('.').map(str::to_string).collect())
    }

    /// Resolve against a row.
    ///
    /// A missing segment, a non-mapping intermediate or a null anywhere on
    /// the way (including the final value) is absent.
    pub fn resolve<'a, R: Record + ?Sized>(&self, row: &'a R) -> Option<&'a Value> {
        let value = match self {
            Accessor::Key(key) => row.field(key),
            Accessor::Path(segments) => {
                let (first, rest) = segments.split_first()?;
                rest.iter()
                    .try_fold(row.field(first)?, |value, segment| {
                        value.as_object()?.get(segment)
                    })
            }
        }?;
        (!value.is_null()).then_some(value)
    }

    /// The resolved value as display text.
    pub fn resolve_text<R: Record + ?Sized>(&self, row: &R) -> Option<String> {
        self.resolve(row).map(stringify)
    }
}

impl From<&str> for Accessor {
    fn from(path: &str) -> Self {
        Accessor::path(path)
    }
}

impl From<String> for Accessor {
    fn from(path: String) -> Self {
        Accessor::path(&path)
    }
}

impl std::fmt::Display for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Accessor::Key(key) => write!(f, "{}", key),
            Accessor::Path(segments) => write!(f, "{}", segments.join(".")),
        }
    }
}

/// Text form of a field value. Strings are unquoted; everything else uses
/// its JSON rendering.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
