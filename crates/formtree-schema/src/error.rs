//! Errors reported while loading and lowering model documents.
//!
//! Locations are JSON-pointer-like paths into the document
//! (`/models/User/address`), so a diagnostic can be traced back to the entry
//! that produced it.

use formtree_common::diagnostics::{Diagnostic, diagnostic_codes};
use formtree_solver::FormTreeError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid model document: {0}")]
    InvalidDocument(String),

    #[error("{location}: invalid type expression '{expr}': {message}")]
    InvalidTypeExpression {
        location: String,
        expr: String,
        message: String,
    },

    #[error("{location}: cannot find type '{name}'")]
    UnknownTypeName { location: String, name: String },

    #[error("model '{name}' is defined more than once")]
    DuplicateModel { name: String },

    #[error("{location}: {message}")]
    InvalidModelEntry { location: String, message: String },

    #[error("{location}: invalid hint: {message}")]
    InvalidHint { location: String, message: String },

    #[error("no root model selected and the document defines {count} models")]
    MissingRoot { count: usize },

    #[error("model '{name}' is composed from itself")]
    CircularComposition { name: String },

    #[error(transparent)]
    FormTree(#[from] FormTreeError),
}

impl SchemaError {
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidDocument(_) => diagnostic_codes::INVALID_DOCUMENT,
            Self::InvalidTypeExpression { .. } => diagnostic_codes::INVALID_TYPE_EXPRESSION,
            Self::UnknownTypeName { .. } => diagnostic_codes::UNKNOWN_TYPE_NAME,
            Self::DuplicateModel { .. } => diagnostic_codes::DUPLICATE_MODEL,
            Self::InvalidModelEntry { .. } => diagnostic_codes::INVALID_MODEL_ENTRY,
            Self::InvalidHint { .. } => diagnostic_codes::INVALID_HINT,
            Self::MissingRoot { .. } => diagnostic_codes::MISSING_ROOT,
            Self::CircularComposition { .. } => diagnostic_codes::CIRCULAR_COMPOSITION,
            Self::FormTree(err) => err.code(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.code();
        match self {
            Self::InvalidDocument(reason) => Diagnostic::from_code("", code, &[reason.as_str()]),
            Self::InvalidTypeExpression {
                location,
                expr,
                message,
            } => Diagnostic::from_code(location.as_str(), code, &[expr.as_str(), message.as_str()]),
            Self::UnknownTypeName { location, name } => {
                Diagnostic::from_code(location.as_str(), code, &[name.as_str()])
            }
            Self::DuplicateModel { name } => {
                Diagnostic::from_code(format!("/models/{name}"), code, &[name.as_str()])
            }
            Self::InvalidModelEntry { location, message }
            | Self::InvalidHint { location, message } => {
                Diagnostic::from_code(location.as_str(), code, &[location.as_str(), message.as_str()])
            }
            Self::MissingRoot { count } => {
                Diagnostic::from_code("/root", code, &[&count.to_string()])
            }
            Self::CircularComposition { name } => {
                Diagnostic::from_code(format!("/models/{name}"), code, &[name.as_str()])
            }
            Self::FormTree(err) => err.to_diagnostic(),
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::InvalidDocument(err.to_string())
    }
}

/// Append a key to a JSON-pointer-like location, escaping `~` and `/`.
pub(crate) fn child_location(base: &str, key: &str) -> String {
    let escaped = key.replace('~', "~0").replace('/', "~1");
    format!("{base}/{escaped}")
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
