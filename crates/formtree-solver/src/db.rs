//! Database trait shared by every algorithm in the solver.
//!
//! Algorithms take `&dyn TypeDatabase` instead of the concrete interner so
//! they can run against any type store, including test doubles.

use crate::def::DefId;
use crate::types::{
    LiteralValue, ObjectShape, ObjectShapeId, PropertyInfo, TypeData, TypeId, TypeListId,
};
use formtree_common::interner::Atom;
use std::sync::Arc;

pub trait TypeDatabase {
    /// Structural data for an interned type. `None` for ids that were never
    /// handed out.
    fn lookup(&self, id: TypeId) -> Option<TypeData>;
    fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape>;
    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]>;

    fn intern_string(&self, s: &str) -> Atom;
    fn resolve_atom(&self, atom: Atom) -> Arc<str>;

    fn object(&self, properties: Vec<PropertyInfo>) -> TypeId;
    fn array(&self, element: TypeId) -> TypeId;
    fn union(&self, members: Vec<TypeId>) -> TypeId;
    fn literal(&self, value: LiteralValue) -> TypeId;
    fn leaf(&self, name: Atom) -> TypeId;
    fn lazy(&self, def_id: DefId) -> TypeId;
}
