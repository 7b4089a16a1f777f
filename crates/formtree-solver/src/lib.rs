//! Form Tree Solver
//!
//! This crate derives the shape of a reactive form from a data model. It uses:
//!
//! - **Interned types**: `TypeData` structures behind `TypeId` handles
//! - **Named definitions**: lazy references that make recursive models expressible
//! - **Cycle detection**: a recursion guard keyed on model definitions
//!
//! Key guarantees:
//! - O(1) type equality via interning (`TypeId` comparison)
//! - A node's value type is always computed from its controls
//! - Self-referential models terminate or are rejected, never loop
mod db;
pub mod def;
pub mod error;
mod format;
pub mod hints;
mod intern;
pub mod mode;
pub mod nullability;
pub mod objects;
pub mod recursion;
pub mod tree;
pub mod type_classifier;
pub mod types;

pub use db::TypeDatabase;
pub use def::*;
pub use error::{FieldPath, FormTreeError, PathSegment, Result};
pub use format::{FormTreeFormatter, TypeFormatter};
pub use hints::{GroupingHint, HintTree};
pub use intern::TypeInterner;
pub use mode::{AxisRule, InferMode, InferModeFlags};
pub use nullability::{DeclaredModifiers, ResolvedModifiers};
pub use objects::*;
pub use recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
pub use tree::{FormEntry, FormNode, FormTree, FormTreeBuilder};
pub use type_classifier::{NodeKind, TypeClassification, classify_node, classify_type};
pub use types::{
    IntrinsicKind, LiteralValue, ObjectShape, ObjectShapeId, OrderedFloat, PropertyInfo, TypeData,
    TypeId, TypeListId,
};
