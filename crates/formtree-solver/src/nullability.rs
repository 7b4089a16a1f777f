//! Nullability and optionality resolution.
//!
//! Every property carries two independent declared facts: whether its type
//! admits `null`, and whether it may be absent (`?` or `| undefined`). The
//! mode turns them into two independent decisions: whether the control value
//! is nullable, and whether the parent's entry is optional. Neither decision
//! ever looks at the other.

use crate::db::TypeDatabase;
use crate::def::DefinitionStore;
use crate::mode::InferMode;
use crate::objects::resolve_lazy;
use crate::types::{TypeData, TypeId};

/// What the model says about a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeclaredModifiers {
    /// The declared type includes `null`.
    pub nullable: bool,
    /// The property is declared `?` or its type includes `undefined`.
    pub optional: bool,
}

/// What the form tree exposes for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedModifiers {
    /// The control value type includes `null`.
    pub value_nullable: bool,
    /// The entry in the parent's `controls` may be absent.
    pub entry_optional: bool,
}

/// Read the declared modifiers of a property type.
///
/// Lazy references are followed, so a model alias for `T | null` counts as
/// nullable.
pub fn declared_modifiers(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    ty: TypeId,
    optional_flag: bool,
) -> DeclaredModifiers {
    let resolved = resolve_lazy(db, defs, ty).unwrap_or(ty);
    let (has_null, has_undefined) = match db.lookup(resolved) {
        Some(TypeData::Union(list)) => {
            let members = db.type_list(list);
            (
                members.contains(&TypeId::NULL),
                members.contains(&TypeId::UNDEFINED),
            )
        }
        _ => (resolved == TypeId::NULL, resolved == TypeId::UNDEFINED),
    };
    DeclaredModifiers {
        nullable: has_null,
        optional: optional_flag || has_undefined,
    }
}

/// Remove `null` and `undefined` from a type.
///
/// A type that is nothing but `null`/`undefined` is returned unchanged: there
/// is no non-null part to expose, and the control simply holds that value.
pub fn strip_nullish(db: &dyn TypeDatabase, defs: &DefinitionStore, ty: TypeId) -> TypeId {
    let resolved = resolve_lazy(db, defs, ty).unwrap_or(ty);
    match db.lookup(resolved) {
        Some(TypeData::Union(list)) => {
            let members = db.type_list(list);
            let kept: Vec<TypeId> = members.iter().copied().filter(|m| !m.is_nullish()).collect();
            if kept.is_empty() {
                ty
            } else if kept.len() == members.len() {
                // No nullish member: keep the lazy reference intact.
                ty
            } else {
                db.union(kept)
            }
        }
        _ => ty,
    }
}

/// Apply the mode to the declared modifiers.
pub fn resolve_modifiers(mode: InferMode, declared: DeclaredModifiers) -> ResolvedModifiers {
    ResolvedModifiers {
        value_nullable: mode.nullable.resolve(declared.nullable),
        entry_optional: mode.optional.resolve(declared.optional),
    }
}

/// The value type exposed by a control: the non-null part of `ty`, plus `null`
/// when `nullable` is set.
pub fn control_value_type(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    ty: TypeId,
    nullable: bool,
) -> TypeId {
    let stripped = strip_nullish(db, defs, ty);
    if nullable {
        db.union(vec![stripped, TypeId::NULL])
    } else {
        stripped
    }
}

#[cfg(test)]
#[path = "../tests/nullability_tests.rs"]
mod tests;
