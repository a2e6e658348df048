//! Error types for ordered insertion
//!
//! Every error is deterministic for a given tree and input: retrying
//! without changing either gives the same result.

use coder_syntax::{ArrayPath, TreeError};

/// Errors raised by the locator, navigator and insertion engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoderError {
    /// Named property or method (or its return statement) does not exist
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// A value on the way to the target array is not an array
    #[error("shape mismatch at {}: expected array, found {found}", describe_path(.path))]
    ShapeMismatch {
        /// Path of the offending value, relative to the target root
        path: ArrayPath,
        /// Kind of the value found there
        found: &'static str,
    },

    /// Value cannot be represented as an array element
    #[error("unsupported value shape: {0}")]
    UnsupportedValueShape(String),

    /// Tree access failed (dangling id or wrong node kind)
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}

impl CoderError {
    /// Property with `name` was not declared
    pub fn property_not_found(name: impl AsRef<str>) -> Self {
        Self::TargetNotFound(format!("property '${}'", name.as_ref()))
    }

    /// No method matched
    pub fn method_not_found(description: impl AsRef<str>) -> Self {
        Self::TargetNotFound(format!("method {}", description.as_ref()))
    }

    /// Method exists but has no return statement
    pub fn return_not_found(method: impl AsRef<str>) -> Self {
        Self::TargetNotFound(format!("return statement in method '{}'", method.as_ref()))
    }

    /// Shape mismatch at `path`
    pub fn shape_mismatch(path: ArrayPath, found: &'static str) -> Self {
        Self::ShapeMismatch { path, found }
    }

    /// Value shape error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedValueShape(message.into())
    }
}

fn describe_path(path: &ArrayPath) -> String {
    if path.is_empty() {
        "target root".to_string()
    } else {
        format!("'{path}'")
    }
}

/// Result type alias for ordered insertion
pub type CoderResult<T> = Result<T, CoderError>;
