//! Type representation for data models.
//!
//! Types are interned: every structurally distinct type is stored once and
//! referred to through a `TypeId`. Models only need a small slice of a full
//! type system: primitives, `Date`, named atomic leaves, literals, object
//! shapes, arrays, unions and lazy references to named models.

use crate::def::DefId;
use formtree_common::interner::Atom;
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// Interned type handle.
///
/// The first ids are reserved for intrinsics so the common types can be
/// named as constants without touching the interner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NEVER: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NULL: TypeId = TypeId(2);
    pub const UNDEFINED: TypeId = TypeId(3);
    pub const BOOLEAN: TypeId = TypeId(4);
    pub const NUMBER: TypeId = TypeId(5);
    pub const STRING: TypeId = TypeId(6);
    pub const BIGINT: TypeId = TypeId(7);
    pub const DATE: TypeId = TypeId(8);

    /// First id handed out to non-intrinsic types.
    pub const FIRST_USER: u32 = 100;

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    /// `null` or `undefined`.
    #[inline]
    pub const fn is_nullish(self) -> bool {
        self.0 == Self::NULL.0 || self.0 == Self::UNDEFINED.0
    }
}

/// Built-in types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Never,
    Unknown,
    Null,
    Undefined,
    Boolean,
    Number,
    String,
    Bigint,
    /// The built-in date object. Structurally an object, always an atomic leaf.
    Date,
}

impl IntrinsicKind {
    pub const ALL: [IntrinsicKind; 9] = [
        IntrinsicKind::Never,
        IntrinsicKind::Unknown,
        IntrinsicKind::Null,
        IntrinsicKind::Undefined,
        IntrinsicKind::Boolean,
        IntrinsicKind::Number,
        IntrinsicKind::String,
        IntrinsicKind::Bigint,
        IntrinsicKind::Date,
    ];

    pub const fn type_id(self) -> TypeId {
        match self {
            IntrinsicKind::Never => TypeId::NEVER,
            IntrinsicKind::Unknown => TypeId::UNKNOWN,
            IntrinsicKind::Null => TypeId::NULL,
            IntrinsicKind::Undefined => TypeId::UNDEFINED,
            IntrinsicKind::Boolean => TypeId::BOOLEAN,
            IntrinsicKind::Number => TypeId::NUMBER,
            IntrinsicKind::String => TypeId::STRING,
            IntrinsicKind::Bigint => TypeId::BIGINT,
            IntrinsicKind::Date => TypeId::DATE,
        }
    }

    pub fn from_type_id(id: TypeId) -> Option<IntrinsicKind> {
        Self::ALL.get(id.0 as usize).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Never => "never",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Number => "number",
            IntrinsicKind::String => "string",
            IntrinsicKind::Bigint => "bigint",
            IntrinsicKind::Date => "Date",
        }
    }

    pub fn from_name(name: &str) -> Option<IntrinsicKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// `f64` wrapper with bitwise equality so number literals can be interned.
#[derive(Clone, Copy, Debug)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(Atom),
    Number(OrderedFloat),
    Boolean(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectShapeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeListId(pub u32);

/// A single property of an object model.
///
/// `optional` is the `?` qualifier on the declaration. Whether the declared
/// type also admits `undefined` or `null` is a property of `type_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: Atom,
    pub type_id: TypeId,
    pub optional: bool,
}

impl PropertyInfo {
    pub const fn new(name: Atom, type_id: TypeId) -> Self {
        Self {
            name,
            type_id,
            optional: false,
        }
    }

    pub const fn optional(name: Atom, type_id: TypeId) -> Self {
        Self {
            name,
            type_id,
            optional: true,
        }
    }
}

/// Properties of an object model, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
}

impl ObjectShape {
    pub fn property(&self, name: Atom) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Structural description of an interned type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    /// A named type that is an object at runtime but is never decomposed
    /// (`Decimal`, `Blob`, ...). Treated like `Date`.
    Leaf(Atom),
    Object(ObjectShapeId),
    Array(TypeId),
    /// Normalised union: flattened, deduplicated, sorted, at least two members.
    Union(TypeListId),
    /// Reference to a named model, resolved through the `DefinitionStore`.
    Lazy(DefId),
}
