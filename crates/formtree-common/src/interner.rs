//! Name interning for properties, models and leaf types.
//!
//! Every name the engine sees is stored once in a [`NameInterner`] and handed
//! around as an [`Atom`]. Atoms are dense indices into the pool, so the
//! solver can key its tables on names and compare them as integers.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// An interned name.
///
/// Resolve it back to text with [`NameInterner::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty name. Always present at index 0.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Names the model language gives meaning to, seeded into every pool.
pub const BUILTIN_NAMES: &[&str] = &[
    "string",
    "number",
    "boolean",
    "bigint",
    "null",
    "undefined",
    "unknown",
    "never",
    "Date",
    "Array",
    "Omit",
    "Pick",
    "Partial",
];

#[derive(Default)]
struct NamePool {
    atoms: FxHashMap<Arc<str>, Atom>,
    names: Vec<Arc<str>>,
}

impl NamePool {
    fn insert(&mut self, name: &str) -> Option<Atom> {
        if let Some(&atom) = self.atoms.get(name) {
            return Some(atom);
        }
        let atom = Atom(u32::try_from(self.names.len()).ok()?);
        let owned: Arc<str> = Arc::from(name);
        self.names.push(owned.clone());
        self.atoms.insert(owned, atom);
        Some(atom)
    }
}

/// Thread-safe name pool.
///
/// Lookups take a read lock. Interning a new name takes the write lock once;
/// names that are already present only ever read.
pub struct NameInterner {
    pool: RwLock<NamePool>,
}

impl NameInterner {
    /// An empty pool holding only the empty name.
    pub fn new() -> Self {
        let mut pool = NamePool::default();
        pool.insert("");
        NameInterner {
            pool: RwLock::new(pool),
        }
    }

    /// A pool pre-seeded with [`BUILTIN_NAMES`].
    pub fn with_builtins() -> Self {
        let interner = Self::new();
        for name in BUILTIN_NAMES {
            interner.intern(name);
        }
        interner
    }

    // A pool poisoned by a panicking holder is still consistent: inserts are
    // a single push plus map insert.
    fn read(&self) -> RwLockReadGuard<'_, NamePool> {
        self.pool.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Intern `name`, returning the existing atom when it is already known.
    ///
    /// Only exhausting the `u32` index space yields [`Atom::NONE`].
    pub fn intern(&self, name: &str) -> Atom {
        if name.is_empty() {
            return Atom::NONE;
        }
        if let Some(atom) = self.get(name) {
            return atom;
        }
        let mut pool = self.pool.write().unwrap_or_else(PoisonError::into_inner);
        pool.insert(name).unwrap_or(Atom::NONE)
    }

    /// Look a name up without interning it.
    pub fn get(&self, name: &str) -> Option<Atom> {
        self.read().atoms.get(name).copied()
    }

    /// The text of `atom`, or the empty string for an unknown atom.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        self.read().names.get(atom.0 as usize).cloned()
    }

    /// Number of interned names, the empty name included.
    pub fn len(&self) -> usize {
        self.read().names.len()
    }

    /// True when only the empty name is present.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for NameInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
