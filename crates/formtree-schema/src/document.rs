//! The JSON model document.
//!
//! ```json
//! {
//!   "leaves": ["Decimal"],
//!   "models": {
//!     "Address": { "street": "string", "zip?": "string | null" },
//!     "User": {
//!       "name": "string",
//!       "address": "Address",
//!       "tags": "string[]",
//!       "items": { "$array": { "price": "Decimal" } }
//!     },
//!     "UserPatch": "Partial<Omit<User, 'address'>>"
//!   },
//!   "root": "User",
//!   "hints": { "address": "control" },
//!   "mode": "FromModel & NonNullable"
//! }
//! ```

use crate::error::{Result, SchemaError, child_location};
use formtree_solver::{FormTreeError, GroupingHint, HintTree, InferMode, InferModeFlags};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelDocument {
    /// Names of atomic object types (never decomposed into groups).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leaves: Vec<String>,
    /// Named models. A value is an object model or a type expression.
    #[serde(default)]
    pub models: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ModeSpec>,
}

/// A mode written as an expression (`"FromModel & NonNullable"`) or a flag
/// list (`["FromModel", "NonNullable"]`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeSpec {
    Expression(String),
    Flags(Vec<String>),
}

impl ModeSpec {
    pub fn to_mode(&self) -> std::result::Result<InferMode, FormTreeError> {
        let flags = match self {
            ModeSpec::Expression(text) => InferModeFlags::parse_list(text)?,
            ModeSpec::Flags(names) => names.iter().try_fold(InferModeFlags::empty(), |acc, name| {
                InferModeFlags::parse_flag(name)
                    .map(|flag| acc | flag)
                    .ok_or_else(|| FormTreeError::UnknownModeFlag(name.clone()))
            })?,
        };
        InferMode::from_flags(flags)
    }
}

impl ModelDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The document's mode, if it declares one.
    pub fn mode(&self) -> Result<Option<InferMode>> {
        match &self.mode {
            Some(spec) => Ok(Some(spec.to_mode()?)),
            None => Ok(None),
        }
    }

    /// The document's hint tree; `Infer` when absent.
    pub fn hints(&self) -> Result<HintTree> {
        match &self.hints {
            Some(value) => decode_hints(value, "/hints"),
            None => Ok(HintTree::Infer),
        }
    }

    /// Pick the root model: an explicit name wins, then the document's
    /// `root`, then the only model of a single-model document.
    pub fn root_name<'s>(&'s self, explicit: Option<&'s str>) -> Result<&'s str> {
        if let Some(name) = explicit.or(self.root.as_deref()) {
            return Ok(name);
        }
        match self.models.keys().next() {
            Some(only) if self.models.len() == 1 => Ok(only.as_str()),
            _ => Err(SchemaError::MissingRoot {
                count: self.models.len(),
            }),
        }
    }
}

/// Decode a hint tree from JSON.
///
/// - `"group" | "array" | "control"`: a kind
/// - `null`: infer
/// - an object: hints for the fields of a group
/// - a one-element array: the hint for the elements of an array
pub fn decode_hints(value: &Value, location: &str) -> Result<HintTree> {
    match value {
        Value::Null => Ok(HintTree::Infer),
        Value::String(text) => text
            .parse::<GroupingHint>()
            .map(HintTree::Kind)
            .map_err(|message| SchemaError::InvalidHint {
                location: location.to_string(),
                message,
            }),
        Value::Object(fields) => {
            let mut decoded = IndexMap::with_capacity(fields.len());
            for (name, hint) in fields {
                let hint = decode_hints(hint, &child_location(location, name))?;
                decoded.insert(name.clone(), hint);
            }
            Ok(HintTree::Fields(decoded))
        }
        Value::Array(items) if items.len() == 1 => Ok(HintTree::elements(decode_hints(
            &items[0],
            &child_location(location, "0"),
        )?)),
        Value::Array(items) => Err(SchemaError::InvalidHint {
            location: location.to_string(),
            message: format!(
                "an element hint must be a one-element array, found {} elements",
                items.len()
            ),
        }),
        Value::Bool(_) | Value::Number(_) => Err(SchemaError::InvalidHint {
            location: location.to_string(),
            message: format!("expected a hint, found '{value}'"),
        }),
    }
}

#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod tests;
