//! Grouping hints: per-position overrides of node classification.
//!
//! A hint tree mirrors the model. Each position either says nothing (infer),
//! names a kind outright, or describes its children:
//!
//! ```text
//! { a: { b: "group" }, tags: "control", items: [{ price: "control" }] }
//! ```
//!
//! - `Fields` implies the position is a group and carries hints for its
//!   properties.
//! - `Elements` implies an array and carries the hint for its elements.
//! - `Kind(Control)` turns a whole subtree into one opaque control.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingHint {
    Group,
    Array,
    Control,
}

impl GroupingHint {
    pub const fn as_str(self) -> &'static str {
        match self {
            GroupingHint::Group => "group",
            GroupingHint::Array => "array",
            GroupingHint::Control => "control",
        }
    }

    /// `group` and `array` ask for the value to be decomposed.
    pub const fn is_structural(self) -> bool {
        matches!(self, GroupingHint::Group | GroupingHint::Array)
    }
}

impl fmt::Display for GroupingHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(GroupingHint::Group),
            "array" => Ok(GroupingHint::Array),
            "control" => Ok(GroupingHint::Control),
            other => Err(format!(
                "expected 'group', 'array' or 'control', found '{other}'"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum HintTree {
    #[default]
    Infer,
    Kind(GroupingHint),
    Fields(IndexMap<String, HintTree>),
    Elements(Box<HintTree>),
}

static INFER: HintTree = HintTree::Infer;

impl HintTree {
    pub const GROUP: HintTree = HintTree::Kind(GroupingHint::Group);
    pub const ARRAY: HintTree = HintTree::Kind(GroupingHint::Array);
    pub const CONTROL: HintTree = HintTree::Kind(GroupingHint::Control);

    /// Hints for the properties of a group.
    pub fn fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, HintTree)>,
        K: Into<String>,
    {
        HintTree::Fields(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Hint for the elements of an array.
    pub fn elements(element: HintTree) -> Self {
        HintTree::Elements(Box::new(element))
    }

    /// The kind this position asks for, explicit or implied by its shape.
    pub fn kind(&self) -> Option<GroupingHint> {
        match self {
            HintTree::Infer => None,
            HintTree::Kind(kind) => Some(*kind),
            HintTree::Fields(_) => Some(GroupingHint::Group),
            HintTree::Elements(_) => Some(GroupingHint::Array),
        }
    }

    pub fn is_infer(&self) -> bool {
        matches!(self, HintTree::Infer)
    }

    /// Whether this position carries hints for nested positions. Nested hints
    /// are finite, so expanding under them always terminates.
    pub fn has_nested(&self) -> bool {
        matches!(self, HintTree::Fields(_) | HintTree::Elements(_))
    }

    /// Hint for property `name`; `Infer` when absent.
    pub fn field(&self, name: &str) -> &HintTree {
        match self {
            HintTree::Fields(fields) => fields.get(name).unwrap_or(&INFER),
            _ => &INFER,
        }
    }

    /// Hint for array elements; `Infer` when absent.
    pub fn element(&self) -> &HintTree {
        match self {
            HintTree::Elements(element) => element,
            _ => &INFER,
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        let fields = match self {
            HintTree::Fields(fields) => Some(fields),
            _ => None,
        };
        fields.into_iter().flat_map(|f| f.keys().map(String::as_str))
    }
}

impl From<GroupingHint> for HintTree {
    fn from(kind: GroupingHint) -> Self {
        HintTree::Kind(kind)
    }
}

#[cfg(test)]
#[path = "../tests/hints_tests.rs"]
mod tests;
