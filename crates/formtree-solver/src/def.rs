//! Named model definitions.
//!
//! Models refer to each other by name (`TypeData::Lazy(DefId)`), which is
//! what makes self-referential and mutually-referential models expressible.
//! A name is reserved first and its body defined later, so documents can
//! refer to models declared further down.
//!
//! | Step | Call | Result |
//! |------|------|--------|
//! | declare | `reserve("Node")` | `DefId`, body `None` |
//! | reference | `db.lazy(def_id)` | `TypeId` usable in other bodies |
//! | define | `define(def_id, body)` | body available to the classifier |

use crate::types::TypeId;
use dashmap::DashMap;
use formtree_common::interner::Atom;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

/// Solver-owned definition identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `DefId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

/// Stored information about a named model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefinitionInfo {
    /// Name of the model (for diagnostics and formatting)
    pub name: Atom,
    /// The structural body; `None` while only reserved
    pub body: Option<TypeId>,
}

/// Thread-safe store of named models.
pub struct DefinitionStore {
    definitions: DashMap<DefId, DefinitionInfo>,
    by_name: DashMap<Atom, DefId>,
    next_id: AtomicU32,
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self {
            definitions: DashMap::new(),
            by_name: DashMap::new(),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
        }
    }

    /// Reserve a `DefId` for `name`. Reserving an existing name returns the
    /// id already allocated for it.
    pub fn reserve(&self, name: Atom) -> DefId {
        *self.by_name.entry(name).or_insert_with(|| {
            let id = DefId(self.next_id.fetch_add(1, Ordering::SeqCst));
            self.definitions
                .insert(id, DefinitionInfo { name, body: None });
            trace!(def_id = id.0, "reserved definition");
            id
        })
    }

    /// Set the body of a reserved definition. Returns `false` if `def_id` was
    /// never reserved.
    pub fn define(&self, def_id: DefId, body: TypeId) -> bool {
        match self.definitions.get_mut(&def_id) {
            Some(mut info) => {
                info.body = Some(body);
                true
            }
            None => false,
        }
    }

    /// Reserve and define in one step.
    pub fn register(&self, name: Atom, body: TypeId) -> DefId {
        let id = self.reserve(name);
        self.define(id, body);
        id
    }

    pub fn get(&self, def_id: DefId) -> Option<DefinitionInfo> {
        self.definitions.get(&def_id).map(|info| info.clone())
    }

    pub fn body(&self, def_id: DefId) -> Option<TypeId> {
        self.definitions.get(&def_id).and_then(|info| info.body)
    }

    pub fn name(&self, def_id: DefId) -> Option<Atom> {
        self.definitions.get(&def_id).map(|info| info.name)
    }

    pub fn find_by_name(&self, name: Atom) -> Option<DefId> {
        self.by_name.get(&name).map(|id| *id)
    }

    pub fn contains(&self, def_id: DefId) -> bool {
        self.definitions.contains_key(&def_id)
    }

    pub fn is_defined(&self, def_id: DefId) -> bool {
        self.body(def_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
