//! Error types for document path operations.

use thiserror::Error;

/// Errors that can occur while reading or writing a [`Doc`](super::Doc).
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocError {
    /// A write was attempted with a path that has no components.
    #[error("Cannot write to an empty path")]
    EmptyPath,

    /// A document was built from a JSON value that is not an object.
    #[error("Expected a JSON object, found {found}")]
    NotAnObject {
        /// Kind of the rejected value
        found: &'static str,
    },

    /// A write would have to replace an existing non-object value.
    #[error("Cannot write through '{path}': it holds a {found}")]
    PathBlocked {
        /// The path prefix naming the blocking value
        path: String,
        /// Kind of the blocking value
        found: &'static str,
    },

    /// A path indexed past the end of an array.
    #[error("Index {index} out of bounds for array of length {len} at '{path}'")]
    IndexOutOfBounds {
        /// The path prefix naming the array
        path: String,
        /// The requested index
        index: usize,
        /// The array's length
        len: usize,
    },
}

impl DocError {
    /// Check if this error was caused by the shape of the path.
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            DocError::EmptyPath
                | DocError::PathBlocked { .. }
                | DocError::IndexOutOfBounds { .. }
        )
    }
}

impl From<DocError> for crate::Error {
    fn from(err: DocError) -> Self {
        crate::Error::Doc(err)
    }
}
