//! Path-addressable JSON documents.
//!
//! [`Doc`] is the in-memory shape of both the actor document and the permission
//! set held by a [`Session`](crate::Session). It is a JSON object whose nested
//! values are reached with dot-separated paths.
//!
//! # Path semantics
//!
//! - Reads walk objects by key and arrays by numeric index. Any missing step
//!   resolves to `None` (or the caller's default).
//! - Writes create intermediate objects as needed. A non-container value in
//!   the middle of a path is replaced by an object; an array is indexed when
//!   the component is a number within bounds.
//! - Equality is structural: two documents (or values) are equal when their
//!   JSON trees are equal, regardless of how they were built.
//!
//! ```
//! use persona::doc::Doc;
//! use serde_json::json;
//!
//! let mut doc = Doc::new();
//! doc.set("profile.address.city", "Lisbon")?;
//! doc.set("roles", json!(["admin", "editor"]))?;
//!
//! assert_eq!(doc.get_str("profile.address.city"), Some("Lisbon"));
//! assert_eq!(doc.get("roles.1"), Some(&json!("editor")));
//! assert_eq!(doc.get_or("profile.phone", json!("n/a")), json!("n/a"));
//! # Ok::<(), persona::doc::DocError>(())
//! ```

pub mod errors;
pub mod path;
pub mod value;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

pub use errors::DocError;
pub use path::PathBuf;
pub use value::{is_truthy, kind};

/// A JSON object addressed by dot-separated paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Doc {
    fields: Map<String, Value>,
}

impl Doc {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Returns the value at `path`, or `None` if any step is missing.
    ///
    /// The empty path resolves to `None`; use [`Doc::as_map`] for the whole document.
    pub fn get(&self, path: impl AsRef<str>) -> Option<&Value> {
        let path = PathBuf::from(path.as_ref());
        let mut components = path.components();
        let mut current = self.fields.get(components.next()?)?;
        for component in components {
            current = step(current, component)?;
        }
        Some(current)
    }

    /// Returns a mutable reference to the value at `path`.
    pub fn get_mut(&mut self, path: impl AsRef<str>) -> Option<&mut Value> {
        let path = PathBuf::from(path.as_ref());
        let mut components = path.components();
        let mut current = self.fields.get_mut(components.next()?)?;
        for component in components {
            current = step_mut(current, component)?;
        }
        Some(current)
    }

    /// Returns a clone of the value at `path`, or `default` when absent.
    pub fn get_or(&self, path: impl AsRef<str>, default: Value) -> Value {
        self.get(path).cloned().unwrap_or(default)
    }

    /// Returns the value at `path` if it is a string.
    pub fn get_str(&self, path: impl AsRef<str>) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Deserializes the value at `path` into `T`.
    ///
    /// Returns `None` when the path is absent or the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: impl AsRef<str>) -> Option<T> {
        self.get(path)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Returns `true` if a value (including `null`) exists at `path`.
    pub fn contains(&self, path: impl AsRef<str>) -> bool {
        self.get(path).is_some()
    }

    /// Returns `true` if the value at `path` exists and is truthy.
    pub fn is_truthy(&self, path: impl AsRef<str>) -> bool {
        self.get(path).is_some_and(is_truthy)
    }

    /// Returns the top-level field named exactly `key`, without path parsing.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Writes `value` at `path`, returning the value it replaced.
    ///
    /// # Errors
    /// - [`DocError::EmptyPath`] if `path` has no components.
    /// - [`DocError::IndexOutOfBounds`] if an array step indexes past its end.
    pub fn set(
        &mut self,
        path: impl AsRef<str>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, DocError> {
        let path = PathBuf::from(path.as_ref());
        let components: Vec<&str> = path.components().collect();
        if components.is_empty() {
            return Err(DocError::EmptyPath);
        }
        set_in_map(
            &mut self.fields,
            &components,
            value.into(),
            "",
            Intermediates::Replace,
        )
    }

    /// Writes `value` at `path` without discarding existing data.
    ///
    /// Like [`Doc::set`], but an existing intermediate that is neither an
    /// object, an indexable array, nor `null` is left in place and reported.
    /// On error the document is unchanged.
    ///
    /// # Errors
    /// - [`DocError::PathBlocked`] if an intermediate holds a scalar.
    /// - The errors of [`Doc::set`].
    pub fn set_preserving(
        &mut self,
        path: impl AsRef<str>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, DocError> {
        let path = PathBuf::from(path.as_ref());
        let components: Vec<&str> = path.components().collect();
        if components.is_empty() {
            return Err(DocError::EmptyPath);
        }
        set_in_map(
            &mut self.fields,
            &components,
            value.into(),
            "",
            Intermediates::Keep,
        )
    }

    /// Removes and returns the value at `path`.
    ///
    /// Only object members can be removed; array elements are left in place.
    pub fn remove(&mut self, path: impl AsRef<str>) -> Option<Value> {
        let path = PathBuf::from(path.as_ref());
        let last = path.last()?;
        match path.parent() {
            None => self.fields.remove(last),
            Some(parent) => self.get_mut(parent.as_str())?.as_object_mut()?.remove(last),
        }
    }

    /// Iterates over the top-level fields.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.fields.iter()
    }

    /// Iterates over the top-level keys.
    pub fn keys(&self) -> serde_json::map::Keys<'_> {
        self.fields.keys()
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes every field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Clones the document into a `Value::Object`.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

fn step<'a>(value: &'a Value, component: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(component),
        Value::Array(items) => component
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, component: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(component),
        Value::Array(items) => component
            .parse::<usize>()
            .ok()
            .and_then(move |index| items.get_mut(index)),
        _ => None,
    }
}

fn join(walked: &str, component: &str) -> String {
    if walked.is_empty() {
        component.to_string()
    } else {
        format!("{walked}.{component}")
    }
}

/// What a write does with a scalar found in the middle of its path.
#[derive(Clone, Copy)]
enum Intermediates {
    Replace,
    Keep,
}

/// `path` is never empty here.
fn set_in_map(
    map: &mut Map<String, Value>,
    path: &[&str],
    value: Value,
    walked: &str,
    mode: Intermediates,
) -> Result<Option<Value>, DocError> {
    let Some((key, rest)) = path.split_first() else {
        return Err(DocError::EmptyPath);
    };
    if rest.is_empty() {
        return Ok(map.insert((*key).to_string(), value));
    }
    let slot = map.entry((*key).to_string()).or_insert(Value::Null);
    set_in_value(slot, rest, value, &join(walked, key), mode)
}

fn set_in_value(
    slot: &mut Value,
    path: &[&str],
    value: Value,
    walked: &str,
    mode: Intermediates,
) -> Result<Option<Value>, DocError> {
    let Some((component, rest)) = path.split_first() else {
        return Err(DocError::EmptyPath);
    };

    if let (Value::Array(items), Ok(index)) = (&mut *slot, component.parse::<usize>()) {
        let len = items.len();
        let Some(item) = items.get_mut(index) else {
            return Err(DocError::IndexOutOfBounds {
                path: walked.to_string(),
                index,
                len,
            });
        };
        return if rest.is_empty() {
            Ok(Some(std::mem::replace(item, value)))
        } else {
            set_in_value(item, rest, value, &join(walked, component), mode)
        };
    }

    if !slot.is_object() {
        if let (Intermediates::Keep, false) = (mode, slot.is_null()) {
            return Err(DocError::PathBlocked {
                path: walked.to_string(),
                found: kind(slot),
            });
        }
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => set_in_map(map, path, value, walked, mode),
        other => Err(DocError::NotAnObject { found: kind(other) }),
    }
}

impl From<Map<String, Value>> for Doc {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for Doc {
    type Error = DocError;

    /// Accepts objects; `null` becomes an empty document.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Ok(Self::new()),
            other => Err(DocError::NotAnObject { found: kind(&other) }),
        }
    }
}

impl From<Doc> for Value {
    fn from(doc: Doc) -> Self {
        doc.into_value()
    }
}

impl FromIterator<(String, Value)> for Doc {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Doc {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
