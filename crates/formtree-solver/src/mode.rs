//! Inference mode: how nullability and optionality are decided.
//!
//! The mode is written as a set of flags, the way form authors think about it
//! (`FromModel & NonNullable`), and normalised into an [`InferMode`] with one
//! rule per independent axis:
//!
//! | flags | value nullable | entry optional |
//! |-------|----------------|----------------|
//! | *(none)* | always | never |
//! | `Nullable` / `NonNullable` | always / never | never |
//! | `Optional` / `Required` | always | always / never |
//! | `FromModel` | declared | declared |
//! | `FromModel & Nullable` | declared | declared |
//! | `FromModel & NonNullable` | never | declared |
//! | `FromModel & Optional` | declared | declared |
//! | `FromModel & Required` | declared | never |
//!
//! With `FromModel`, the permissive flag (`Nullable`, `Optional`) only
//! applies where the model declares it. The strict flag (`NonNullable`,
//! `Required`) strips it everywhere.

use crate::error::{FormTreeError, Result};
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InferModeFlags: u8 {
        /// Derive nullability/optionality from the model's own declarations.
        const FROM_MODEL = 1 << 0;
        const NON_NULLABLE = 1 << 1;
        const NULLABLE = 1 << 2;
        const REQUIRED = 1 << 3;
        const OPTIONAL = 1 << 4;
    }
}

impl InferModeFlags {
    /// Parse a single flag name. Accepts `FromModel`, `from-model`,
    /// `from_model` and the `InferMode` prefixed spelling.
    pub fn parse_flag(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .trim_start_matches("InferMode")
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "frommodel" => Some(Self::FROM_MODEL),
            "nonnullable" => Some(Self::NON_NULLABLE),
            "nullable" => Some(Self::NULLABLE),
            "required" => Some(Self::REQUIRED),
            "optional" => Some(Self::OPTIONAL),
            _ => None,
        }
    }

    /// Parse a flag expression such as `FromModel & NonNullable`.
    /// `&`, `|`, `,` and whitespace all separate flags.
    pub fn parse_list(text: &str) -> Result<Self> {
        text.split(|c: char| c == '&' || c == '|' || c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .try_fold(Self::empty(), |acc, part| {
                Self::parse_flag(part)
                    .map(|flag| acc | flag)
                    .ok_or_else(|| FormTreeError::UnknownModeFlag(part.to_string()))
            })
    }
}

/// Rule for one axis (nullability or optionality).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRule {
    /// Always apply (`null` is added / the entry is optional).
    Always,
    /// Never apply (`null` is stripped / the entry is required).
    Never,
    /// Follow the model's declaration.
    FromModel,
}

impl AxisRule {
    #[inline]
    pub const fn resolve(self, declared: bool) -> bool {
        match self {
            AxisRule::Always => true,
            AxisRule::Never => false,
            AxisRule::FromModel => declared,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            AxisRule::Always => "always",
            AxisRule::Never => "never",
            AxisRule::FromModel => "from-model",
        }
    }
}

/// Normalised mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InferMode {
    /// Whether control values include `null`.
    pub nullable: AxisRule,
    /// Whether entries in a group's `controls` are optional.
    pub optional: AxisRule,
}

impl Default for InferMode {
    /// `Nullable & Required`.
    fn default() -> Self {
        Self::new(AxisRule::Always, AxisRule::Never)
    }
}

impl InferMode {
    pub const fn new(nullable: AxisRule, optional: AxisRule) -> Self {
        Self { nullable, optional }
    }

    /// Normalise a flag set. Opposing flags on the same axis are rejected.
    pub fn from_flags(flags: InferModeFlags) -> Result<Self> {
        if flags.contains(InferModeFlags::NULLABLE | InferModeFlags::NON_NULLABLE) {
            return Err(FormTreeError::ConflictingModeFlags {
                first: "Nullable",
                second: "NonNullable",
            });
        }
        if flags.contains(InferModeFlags::REQUIRED | InferModeFlags::OPTIONAL) {
            return Err(FormTreeError::ConflictingModeFlags {
                first: "Required",
                second: "Optional",
            });
        }

        let from_model = flags.contains(InferModeFlags::FROM_MODEL);
        let nullable = Self::axis(
            from_model,
            flags.contains(InferModeFlags::NULLABLE),
            flags.contains(InferModeFlags::NON_NULLABLE),
            AxisRule::Always,
        );
        let optional = Self::axis(
            from_model,
            flags.contains(InferModeFlags::OPTIONAL),
            flags.contains(InferModeFlags::REQUIRED),
            AxisRule::Never,
        );
        Ok(Self::new(nullable, optional))
    }

    fn axis(from_model: bool, permissive: bool, strict: bool, default: AxisRule) -> AxisRule {
        match (from_model, permissive, strict) {
            (_, _, true) => AxisRule::Never,
            (true, _, false) => AxisRule::FromModel,
            (false, true, false) => AxisRule::Always,
            (false, false, false) => default,
        }
    }
}

impl FromStr for InferMode {
    type Err = FormTreeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_flags(InferModeFlags::parse_list(s)?)
    }
}

impl TryFrom<InferModeFlags> for InferMode {
    type Error = FormTreeError;

    fn try_from(flags: InferModeFlags) -> Result<Self> {
        Self::from_flags(flags)
    }
}

impl fmt::Display for InferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nullable: {}, optional: {}",
            self.nullable.as_str(),
            self.optional.as_str()
        )
    }
}

#[cfg(test)]
#[path = "../tests/mode_tests.rs"]
mod tests;
