//! Dot-separated paths into a [`Doc`](super::Doc).
//!
//! Paths are normalized on construction, so every string is a valid path:
//!
//! - `""` → empty path (refers to the document itself)
//! - `".profile"` → `"profile"`
//! - `"profile."` → `"profile"`
//! - `"profile..name"` → `"profile.name"`
//!
//! ```
//! use persona::doc::PathBuf;
//!
//! let path = PathBuf::from("profile.address").push("city");
//! assert_eq!(path.as_str(), "profile.address.city");
//! assert_eq!(path.components().collect::<Vec<_>>(), ["profile", "address", "city"]);
//! ```

use std::{fmt, str::FromStr};

use crate::constants::PATH_SEPARATOR;

/// Normalizes a path string by dropping empty components.
///
/// ```
/// # use persona::doc::path::normalize_path;
/// assert_eq!(normalize_path(""), "");
/// assert_eq!(normalize_path(".user"), "user");
/// assert_eq!(normalize_path("user..profile."), "user.profile");
/// assert_eq!(normalize_path("..."), "");
/// ```
pub fn normalize_path(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    input
        .split(PATH_SEPARATOR)
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// An owned, normalized document path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathBuf {
    inner: String,
}

impl PathBuf {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Normalizes `path` into a `PathBuf`.
    pub fn normalize(path: &str) -> Self {
        Self {
            inner: normalize_path(path),
        }
    }

    /// Appends `path` (itself normalized) to the end of this path.
    pub fn push(mut self, path: impl AsRef<str>) -> Self {
        let normalized = normalize_path(path.as_ref());
        if normalized.is_empty() {
            return self;
        }

        if !self.inner.is_empty() {
            self.inner.push(PATH_SEPARATOR);
        }
        self.inner.push_str(&normalized);
        self
    }

    /// Returns an iterator over the path components.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner
            .split(PATH_SEPARATOR)
            .filter(|component| !component.is_empty())
    }

    /// Returns the number of components in the path.
    pub fn len(&self) -> usize {
        self.components().count()
    }

    /// Returns `true` if the path has no components.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the first component, the top-level key of a document.
    pub fn head(&self) -> Option<&str> {
        self.components().next()
    }

    /// Returns the parent path, or `None` for single-component and empty paths.
    pub fn parent(&self) -> Option<PathBuf> {
        self.inner.rfind(PATH_SEPARATOR).map(|last| PathBuf {
            inner: self.inner[..last].to_string(),
        })
    }

    /// Returns the last component, or `None` if empty.
    pub fn last(&self) -> Option<&str> {
        if self.inner.is_empty() {
            None
        } else {
            self.inner.rsplit(PATH_SEPARATOR).next()
        }
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for PathBuf {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for PathBuf {
    fn from(path: &str) -> Self {
        Self::normalize(path)
    }
}

impl From<String> for PathBuf {
    fn from(path: String) -> Self {
        Self::normalize(&path)
    }
}

impl FromStr for PathBuf {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "(empty path)")
        } else {
            write!(f, "{}", self.inner)
        }
    }
}
