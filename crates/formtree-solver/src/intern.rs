//! Type interning for structural deduplication.
//!
//! This module implements the interning engine that converts `TypeData`
//! structures into lightweight `TypeId` handles.
//!
//! Benefits:
//! - O(1) type equality (just compare `TypeId` values)
//! - Memory efficient (each unique structure stored once)
//! - The form tree and its value projection can share one table, so a value
//!   type derived from a tree compares equal to a hand-written model type

use crate::db::TypeDatabase;
use crate::def::DefId;
use crate::types::{
    IntrinsicKind, LiteralValue, ObjectShape, ObjectShapeId, PropertyInfo, TypeData, TypeId,
    TypeListId,
};
use formtree_common::interner::{Atom, NameInterner};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

const TYPE_LIST_INLINE: usize = 8;

type TypeListBuffer = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

/// Deduplicating store of shared values, addressed by dense `u32` ids.
///
/// Holds both the member lists of unions (`[TypeId]`) and object shapes.
struct SharedPool<T: ?Sized> {
    items: Vec<Arc<T>>,
    ids: FxHashMap<Arc<T>, u32>,
}

impl<T: ?Sized + Eq + Hash> SharedPool<T> {
    fn new() -> Self {
        SharedPool {
            items: Vec::new(),
            ids: FxHashMap::default(),
        }
    }

    /// A pool whose id 0 is `first`.
    fn seeded(first: Arc<T>) -> Self {
        let mut pool = Self::new();
        pool.insert(first);
        pool
    }

    /// Id of the value equal to `key`, building and storing it if new.
    fn intern_with(&mut self, key: &T, build: impl FnOnce() -> Arc<T>) -> u32 {
        match self.ids.get(key) {
            Some(&id) => id,
            None => self.insert(build()),
        }
    }

    fn insert(&mut self, value: Arc<T>) -> u32 {
        let id = self.items.len() as u32;
        self.items.push(value.clone());
        self.ids.insert(value, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

// Every write below is a single push plus insert, so a table whose lock was
// poisoned by a panicking reader is still consistent. Recovering the guard
// keeps ids stable instead of handing out `unknown` or id 0.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct TypeTable {
    key_to_id: FxHashMap<TypeData, TypeId>,
    id_to_key: Vec<TypeData>,
}

/// Type interning table.
/// Thread-safe via `RwLock` so one table can serve concurrent derivations.
pub struct TypeInterner {
    types: RwLock<TypeTable>,
    /// String interner for property names, model names and string literals.
    pub string_interner: NameInterner,
    type_lists: RwLock<SharedPool<[TypeId]>>,
    object_shapes: RwLock<SharedPool<ObjectShape>>,
}

impl TypeInterner {
    /// Create a new type interner with pre-registered intrinsics.
    pub fn new() -> Self {
        TypeInterner {
            types: RwLock::new(TypeTable::default()),
            string_interner: NameInterner::with_builtins(),
            type_lists: RwLock::new(SharedPool::seeded(Arc::from(Vec::new()))),
            object_shapes: RwLock::new(SharedPool::new()),
        }
    }

    fn intern(&self, key: TypeData) -> TypeId {
        if let TypeData::Intrinsic(kind) = key {
            return kind.type_id();
        }

        if let Some(&id) = read(&self.types).key_to_id.get(&key) {
            return id;
        }

        let mut table = write(&self.types);
        if let Some(&id) = table.key_to_id.get(&key) {
            return id;
        }
        let id = TypeId(TypeId::FIRST_USER + table.id_to_key.len() as u32);
        table.id_to_key.push(key);
        table.key_to_id.insert(key, id);
        trace!(type_id = id.0, ?key, "interned type");
        id
    }

    fn intern_type_list(&self, members: Vec<TypeId>) -> TypeListId {
        let mut lists = write(&self.type_lists);
        TypeListId(lists.intern_with(members.as_slice(), || Arc::from(members.as_slice())))
    }

    fn intern_object_shape(&self, shape: ObjectShape) -> ObjectShapeId {
        let mut shapes = write(&self.object_shapes);
        ObjectShapeId(shapes.intern_with(&shape, || Arc::new(shape.clone())))
    }

    /// Number of non-intrinsic types interned so far.
    pub fn len(&self) -> usize {
        read(&self.types).id_to_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn literal_string(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.literal(LiteralValue::String(atom))
    }

    pub fn literal_number(&self, value: f64) -> TypeId {
        self.literal(LiteralValue::Number(crate::types::OrderedFloat(value)))
    }

    pub fn literal_boolean(&self, value: bool) -> TypeId {
        self.literal(LiteralValue::Boolean(value))
    }

    /// `T | null`.
    pub fn nullable(&self, ty: TypeId) -> TypeId {
        self.union(vec![ty, TypeId::NULL])
    }

    /// Shorthand for building an object from `(name, type, optional)` triples.
    pub fn object_from(&self, properties: &[(&str, TypeId, bool)]) -> TypeId {
        let props = properties
            .iter()
            .map(|&(name, type_id, optional)| PropertyInfo {
                name: self.intern_string(name),
                type_id,
                optional,
            })
            .collect();
        self.object(props)
    }

    fn collect_union_members(&self, members: Vec<TypeId>, out: &mut TypeListBuffer) {
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Union(list)) => {
                    out.extend(self.type_list(list).iter().copied());
                }
                _ => out.push(member),
            }
        }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDatabase for TypeInterner {
    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        if id.is_intrinsic() {
            return IntrinsicKind::from_type_id(id).map(TypeData::Intrinsic);
        }
        read(&self.types)
            .id_to_key
            .get((id.0 - TypeId::FIRST_USER) as usize)
            .copied()
    }

    fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape> {
        read(&self.object_shapes).get(id.0).unwrap_or_default()
    }

    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        read(&self.type_lists)
            .get(id.0)
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    fn object(&self, properties: Vec<PropertyInfo>) -> TypeId {
        let shape_id = self.intern_object_shape(ObjectShape { properties });
        self.intern(TypeData::Object(shape_id))
    }

    fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    /// Build a normalised union.
    ///
    /// Nested unions are flattened, `never` is dropped, `unknown` absorbs every
    /// other member, duplicates are removed and members are sorted by id. A
    /// single remaining member is returned as-is; no members yields `never`.
    fn union(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat = TypeListBuffer::new();
        self.collect_union_members(members, &mut flat);

        if flat.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        flat.retain(|id| *id != TypeId::NEVER);
        flat.sort_unstable();
        flat.dedup();

        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => {
                let list = self.intern_type_list(flat.into_vec());
                self.intern(TypeData::Union(list))
            }
        }
    }

    fn literal(&self, value: LiteralValue) -> TypeId {
        self.intern(TypeData::Literal(value))
    }

    fn leaf(&self, name: Atom) -> TypeId {
        self.intern(TypeData::Leaf(name))
    }

    fn lazy(&self, def_id: DefId) -> TypeId {
        self.intern(TypeData::Lazy(def_id))
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
