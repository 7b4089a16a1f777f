//! Object model queries and composition.
//!
//! Models are often built from other models (`Omit<Model, 'a'>`,
//! `Model & { b: string }`). These helpers perform that composition on the
//! interned table so the tree builder only ever sees plain object shapes.

use crate::db::TypeDatabase;
use crate::def::{DefId, DefinitionStore};
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::types::{PropertyInfo, TypeData, TypeId};
use formtree_common::interner::Atom;
use indexmap::IndexMap;

/// Follow lazy references until a structural type is reached.
///
/// Returns `Err(def_id)` naming the first definition that has no body, or the
/// definition at which an alias loop (`A = B`, `B = A`) was detected.
pub fn resolve_lazy(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    ty: TypeId,
) -> Result<TypeId, DefId> {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::LazyResolution);
    let mut current = ty;
    let mut entered = Vec::new();
    let result = loop {
        let Some(TypeData::Lazy(def_id)) = db.lookup(current) else {
            break Ok(current);
        };
        if !guard.enter(def_id).is_entered() {
            break Err(def_id);
        }
        entered.push(def_id);
        match defs.body(def_id) {
            Some(body) => current = body,
            None => break Err(def_id),
        }
    };
    for def_id in entered.into_iter().rev() {
        guard.leave(def_id);
    }
    result
}

/// The definition a type refers to, if it is a lazy reference.
pub fn lazy_def_id(db: &dyn TypeDatabase, ty: TypeId) -> Option<DefId> {
    match db.lookup(ty) {
        Some(TypeData::Lazy(def_id)) => Some(def_id),
        _ => None,
    }
}

/// Properties of an object type, expanding lazy references.
/// `None` when the type is not an object.
pub fn collect_properties(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    ty: TypeId,
) -> Option<Vec<PropertyInfo>> {
    let resolved = resolve_lazy(db, defs, ty).ok()?;
    match db.lookup(resolved)? {
        TypeData::Object(shape_id) => Some(db.object_shape(shape_id).properties.clone()),
        _ => None,
    }
}

/// `Omit<T, names>`.
pub fn omit(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    ty: TypeId,
    names: &[Atom],
) -> Option<TypeId> {
    let mut props = collect_properties(db, defs, ty)?;
    props.retain(|p| !names.contains(&p.name));
    Some(db.object(props))
}

/// `Pick<T, names>`. Names that do not exist on `T` are ignored.
pub fn pick(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    ty: TypeId,
    names: &[Atom],
) -> Option<TypeId> {
    let mut props = collect_properties(db, defs, ty)?;
    props.retain(|p| names.contains(&p.name));
    Some(db.object(props))
}

/// `Partial<T>`: every property becomes optional.
pub fn partial(db: &dyn TypeDatabase, defs: &DefinitionStore, ty: TypeId) -> Option<TypeId> {
    let props = collect_properties(db, defs, ty)?
        .into_iter()
        .map(|p| PropertyInfo {
            optional: true,
            ..p
        })
        .collect();
    Some(db.object(props))
}

/// `Base & Extra` for object types. A property declared in both takes the
/// declaration from `extra` but keeps its position from `base`.
pub fn extend(
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    base: TypeId,
    extra: TypeId,
) -> Option<TypeId> {
    let base_props = collect_properties(db, defs, base)?;
    let extra_props = collect_properties(db, defs, extra)?;

    let mut merged: IndexMap<Atom, PropertyInfo> =
        base_props.into_iter().map(|p| (p.name, p)).collect();
    for prop in extra_props {
        merged.insert(prop.name, prop);
    }
    Some(db.object(merged.into_values().collect()))
}

#[cfg(test)]
#[path = "../tests/objects_tests.rs"]
mod tests;
