//! Errors reported while deriving a form tree.

use crate::hints::GroupingHint;
use formtree_common::diagnostics::{Diagnostic, diagnostic_codes};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(Arc<str>),
    /// The element position of an array.
    Element,
    /// One concrete element of a runtime array.
    Index(usize),
}

/// Location of a node inside a model, rendered as `a.b[].c`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn push_field(&mut self, name: Arc<str>) {
        self.segments.push(PathSegment::Field(name));
    }

    pub fn push_element(&mut self) {
        self.segments.push(PathSegment::Element);
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// A copy of this path extended by one field.
    pub fn join(&self, name: &str) -> Self {
        let mut path = self.clone();
        path.push_field(Arc::from(name));
        path
    }

    /// Parse a dotted path (`a.b[].c`). Empty input is the root.
    pub fn parse(text: &str) -> Self {
        let mut path = Self::root();
        for part in text.split('.').filter(|p| !p.is_empty()) {
            let mut name = part;
            let mut elements = 0;
            while let Some(stripped) = name.strip_suffix("[]") {
                name = stripped;
                elements += 1;
            }
            if !name.is_empty() {
                path.push_field(Arc::from(name));
            }
            for _ in 0..elements {
                path.push_element();
            }
        }
        path
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => {
                    if !first {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Element => f.write_str("[]")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormTreeError {
    #[error("mode flags '{first}' and '{second}' cannot be combined")]
    ConflictingModeFlags {
        first: &'static str,
        second: &'static str,
    },

    #[error("unknown mode flag '{0}'")]
    UnknownModeFlag(String),

    #[error("form root must be an object model, found '{found}'")]
    RootNotObject { found: String },

    #[error("model '{name}' referenced at '{path}' is never defined")]
    UnresolvedDefinition { name: String, path: FieldPath },

    #[error("hint at '{path}' names field '{field}' which does not exist on the model")]
    UnknownHintField { path: FieldPath, field: String },

    #[error("hint '{hint}' at '{path}' cannot be applied to type '{found}'")]
    HintMismatch {
        path: FieldPath,
        hint: GroupingHint,
        found: String,
    },

    #[error("model '{name}' references itself at '{path}' without a hint that stops the expansion")]
    CyclicModel { name: String, path: FieldPath },

    #[error("form tree at '{path}' exceeds the maximum nesting depth of {max_depth}")]
    DepthExceeded { path: FieldPath, max_depth: u32 },
}

impl FormTreeError {
    pub fn code(&self) -> u32 {
        match self {
            Self::ConflictingModeFlags { .. } => diagnostic_codes::CONFLICTING_MODE_FLAGS,
            Self::UnknownModeFlag(_) => diagnostic_codes::UNKNOWN_MODE_FLAG,
            Self::RootNotObject { .. } => diagnostic_codes::ROOT_NOT_OBJECT,
            Self::UnresolvedDefinition { .. } => diagnostic_codes::UNRESOLVED_DEFINITION,
            Self::UnknownHintField { .. } => diagnostic_codes::UNKNOWN_HINT_FIELD,
            Self::HintMismatch { .. } => diagnostic_codes::HINT_MISMATCH,
            Self::CyclicModel { .. } => diagnostic_codes::CYCLIC_MODEL,
            Self::DepthExceeded { .. } => diagnostic_codes::DEPTH_EXCEEDED,
        }
    }

    /// The model location this error applies to, if any.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::UnresolvedDefinition { path, .. }
            | Self::UnknownHintField { path, .. }
            | Self::HintMismatch { path, .. }
            | Self::CyclicModel { path, .. }
            | Self::DepthExceeded { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let location = self.path().map(ToString::to_string).unwrap_or_default();
        let code = self.code();
        match self {
            Self::ConflictingModeFlags { first, second } => {
                Diagnostic::from_code(location, code, &[*first, *second])
            }
            Self::UnknownModeFlag(flag) => Diagnostic::from_code(location, code, &[flag.as_str()]),
            Self::RootNotObject { found } => Diagnostic::from_code(location, code, &[found.as_str()]),
            Self::UnresolvedDefinition { name, .. } => {
                Diagnostic::from_code(location, code, &[name.as_str()])
            }
            Self::UnknownHintField { path, field } => {
                Diagnostic::from_code(location, code, &[&path.to_string(), field.as_str()])
            }
            Self::HintMismatch { path, hint, found } => Diagnostic::from_code(
                location,
                code,
                &[hint.as_str(), &path.to_string(), found.as_str()],
            ),
            Self::CyclicModel { name, path } => {
                Diagnostic::from_code(location, code, &[name.as_str(), &path.to_string()])
            }
            Self::DepthExceeded { path, max_depth } => Diagnostic::from_code(
                location,
                code,
                &[&path.to_string(), &max_depth.to_string()],
            ),
        }
    }
}

pub type Result<T, E = FormTreeError> = std::result::Result<T, E>;
