//! Type and node classification.
//!
//! Two layers:
//!
//! - [`classify_type`] answers "what shape is this type?" in one lookup,
//!   expanding lazy references on the way.
//! - [`classify_node`] answers "what form node does this position become?",
//!   combining the shape with the grouping hint for the position.
//!
//! # Precedence
//!
//! 1. An explicit `control` hint always wins.
//! 2. Atomic objects (`Date`, named leaves) are controls. A structural hint on
//!    them is ignored with a warning.
//! 3. Arrays are checked before objects.
//! 4. Plain objects become groups.
//! 5. Everything else (primitives, literals, `unknown`, unions of several
//!    non-null members) is a control. A structural hint on these is an error.

use crate::db::TypeDatabase;
use crate::def::{DefId, DefinitionStore};
use crate::error::{FieldPath, FormTreeError, Result};
use crate::format::TypeFormatter;
use crate::hints::{GroupingHint, HintTree};
use crate::objects::resolve_lazy;
use crate::types::{IntrinsicKind, LiteralValue, ObjectShapeId, PropertyInfo, TypeData, TypeId};
use formtree_common::interner::Atom;
use std::sync::Arc;
use tracing::{trace, warn};

/// Structural classification of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeClassification {
    /// Primitive or `unknown`/`never`/`null`/`undefined`.
    Primitive(IntrinsicKind),
    /// `Date`, or a named atomic leaf.
    AtomicObject(Option<Atom>),
    Literal(LiteralValue),
    Object(ObjectShapeId),
    Array(TypeId),
    Union(Arc<[TypeId]>),
    /// A lazy reference whose definition has no body.
    Unresolved(DefId),
}

impl TypeClassification {
    pub fn is_atomic_object(&self) -> bool {
        matches!(self, TypeClassification::AtomicObject(_))
    }
}

/// Classify a type, expanding lazy references.
pub fn classify_type(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    ty: TypeId,
) -> TypeClassification {
    let resolved = match resolve_lazy(db, defs, ty) {
        Ok(resolved) => resolved,
        Err(def_id) => return TypeClassification::Unresolved(def_id),
    };
    match db.lookup(resolved) {
        Some(TypeData::Intrinsic(IntrinsicKind::Date)) => TypeClassification::AtomicObject(None),
        Some(TypeData::Intrinsic(kind)) => TypeClassification::Primitive(kind),
        Some(TypeData::Leaf(name)) => TypeClassification::AtomicObject(Some(name)),
        Some(TypeData::Literal(value)) => TypeClassification::Literal(value),
        Some(TypeData::Object(shape)) => TypeClassification::Object(shape),
        Some(TypeData::Array(element)) => TypeClassification::Array(element),
        Some(TypeData::Union(list)) => TypeClassification::Union(db.type_list(list)),
        // resolve_lazy never stops on a lazy; unknown ids behave like `unknown`.
        Some(TypeData::Lazy(def_id)) => TypeClassification::Unresolved(def_id),
        None => TypeClassification::Primitive(IntrinsicKind::Unknown),
    }
}

/// What a position in the model becomes in the form tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Control,
    Group(Vec<PropertyInfo>),
    /// Array with the (unstripped) element type.
    Array(TypeId),
}

/// Decide the node kind for `ty` (already stripped of `null`/`undefined`)
/// under `hint`.
pub fn classify_node(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    ty: TypeId,
    hint: &HintTree,
    path: &FieldPath,
) -> Result<NodeKind> {
    let requested = hint.kind();
    if requested == Some(GroupingHint::Control) {
        trace!(%path, "forced control by hint");
        return Ok(NodeKind::Control);
    }

    let shape = classify_type(db, defs, ty);
    let mismatch = |hint: GroupingHint| FormTreeError::HintMismatch {
        path: path.clone(),
        hint,
        found: TypeFormatter::new(db).with_def_store(defs).format(ty),
    };

    match (shape, requested) {
        (TypeClassification::Unresolved(def_id), _) => Err(FormTreeError::UnresolvedDefinition {
            name: definition_name(db, defs, def_id),
            path: path.clone(),
        }),
        (TypeClassification::AtomicObject(_), Some(hint)) => {
            warn!(%path, %hint, "ignoring structural hint on an atomic type");
            Ok(NodeKind::Control)
        }
        (TypeClassification::AtomicObject(_), None) => Ok(NodeKind::Control),
        (TypeClassification::Array(element), None | Some(GroupingHint::Array)) => {
            Ok(NodeKind::Array(element))
        }
        (TypeClassification::Object(shape_id), None | Some(GroupingHint::Group)) => {
            Ok(NodeKind::Group(db.object_shape(shape_id).properties.clone()))
        }
        (_, Some(hint)) => Err(mismatch(hint)),
        (_, None) => Ok(NodeKind::Control),
    }
}

pub(crate) fn definition_name(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    def_id: DefId,
) -> String {
    defs.name(def_id)
        .map(|atom| db.resolve_atom(atom).to_string())
        .unwrap_or_else(|| format!("#{}", def_id.0))
}

#[cfg(test)]
#[path = "../tests/type_classifier_tests.rs"]
mod tests;
