//! Form tree derivation.
//!
//! [`FormTreeBuilder`] walks a model and produces the tree of controls a form
//! over that model must have. Each property is resolved (nullability and
//! optionality), classified (control, group or array), and either recursed
//! into or terminated as a control.
//!
//! The value shape of any node is computed from its `controls` by
//! [`FormNode::value_type`], never stored separately, so the two cannot
//! disagree.
//!
//! Self-referential models are expanded only as far as the hint tree
//! describes. A model re-entered at a position with no nested hint is
//! rejected with [`FormTreeError::CyclicModel`].

use crate::db::TypeDatabase;
use crate::def::{DefId, DefinitionStore};
use crate::error::{FieldPath, FormTreeError, PathSegment, Result};
use crate::format::TypeFormatter;
use crate::hints::{GroupingHint, HintTree};
use crate::mode::InferMode;
use crate::nullability::{control_value_type, declared_modifiers, resolve_modifiers};
use crate::recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
use crate::type_classifier::{
    NodeKind, TypeClassification, classify_node, classify_type, definition_name,
};
use crate::types::{PropertyInfo, TypeData, TypeId};
use formtree_common::interner::Atom;
use indexmap::IndexMap;
use tracing::{debug, trace};

/// A node of a derived form tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormNode {
    /// A leaf control. `value` already carries the resolved nullability.
    Control { value: TypeId },
    /// A group with one entry per model property, in declaration order.
    Group { controls: IndexMap<Atom, FormEntry> },
    Array { element: Box<FormNode> },
}

/// A group member: the child node and whether it may be absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormEntry {
    pub node: FormNode,
    pub optional: bool,
}

impl FormNode {
    pub fn kind(&self) -> GroupingHint {
        match self {
            FormNode::Control { .. } => GroupingHint::Control,
            FormNode::Group { .. } => GroupingHint::Group,
            FormNode::Array { .. } => GroupingHint::Array,
        }
    }

    pub fn is_control(&self) -> bool {
        matches!(self, FormNode::Control { .. })
    }

    pub fn is_group(&self) -> bool {
        matches!(self, FormNode::Group { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, FormNode::Array { .. })
    }

    /// Members of a group; `None` for controls and arrays.
    pub fn controls(&self) -> Option<&IndexMap<Atom, FormEntry>> {
        match self {
            FormNode::Group { controls } => Some(controls),
            _ => None,
        }
    }

    pub fn child(&self, name: Atom) -> Option<&FormEntry> {
        self.controls()?.get(&name)
    }

    pub fn element(&self) -> Option<&FormNode> {
        match self {
            FormNode::Array { element } => Some(element),
            _ => None,
        }
    }

    /// The control's value type; `None` for groups and arrays.
    pub fn control_value(&self) -> Option<TypeId> {
        match self {
            FormNode::Control { value } => Some(*value),
            _ => None,
        }
    }

    /// The value shape of this node, derived from its controls.
    ///
    /// - control: its value type
    /// - group: an object of the members' value types, optional where the
    ///   entry is optional
    /// - array: an array of the element's value type
    pub fn value_type(&self, db: &dyn TypeDatabase) -> TypeId {
        match self {
            FormNode::Control { value } => *value,
            FormNode::Group { controls } => {
                let properties = controls
                    .iter()
                    .map(|(name, entry)| PropertyInfo {
                        name: *name,
                        type_id: entry.node.value_type(db),
                        optional: entry.optional,
                    })
                    .collect();
                db.object(properties)
            }
            FormNode::Array { element } => db.array(element.value_type(db)),
        }
    }
}

/// The result of a derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormTree {
    root: FormNode,
    mode: InferMode,
    root_type: TypeId,
}

impl FormTree {
    /// The root group.
    pub fn root(&self) -> &FormNode {
        &self.root
    }

    pub fn mode(&self) -> InferMode {
        self.mode
    }

    /// The model the tree was derived from.
    pub fn root_type(&self) -> TypeId {
        self.root_type
    }

    /// Members of the root group.
    pub fn controls(&self) -> &IndexMap<Atom, FormEntry> {
        static EMPTY: std::sync::OnceLock<IndexMap<Atom, FormEntry>> = std::sync::OnceLock::new();
        self.root
            .controls()
            .unwrap_or_else(|| EMPTY.get_or_init(IndexMap::new))
    }

    pub fn value_type(&self, db: &dyn TypeDatabase) -> TypeId {
        self.root.value_type(db)
    }

    /// Navigate to the node at `path` (`a.b`, `items[].price`).
    pub fn get(&self, db: &dyn TypeDatabase, path: &FieldPath) -> Option<&FormNode> {
        path.segments()
            .iter()
            .try_fold(&self.root, |node, segment| match segment {
                PathSegment::Field(name) => {
                    node.child(db.intern_string(name)).map(|entry| &entry.node)
                }
                PathSegment::Element | PathSegment::Index(_) => node.element(),
            })
    }

    /// Like [`get`](Self::get), but returns the entry so optionality is
    /// visible. `None` for the root and for array elements.
    pub fn entry(&self, db: &dyn TypeDatabase, path: &FieldPath) -> Option<&FormEntry> {
        let (last, parent) = path.segments().split_last()?;
        let PathSegment::Field(name) = last else {
            return None;
        };
        let mut parent_path = FieldPath::root();
        for segment in parent {
            match segment {
                PathSegment::Field(name) => parent_path.push_field(name.clone()),
                PathSegment::Element => parent_path.push_element(),
                PathSegment::Index(index) => parent_path.push_index(*index),
            }
        }
        self.get(db, &parent_path)?.child(db.intern_string(name))
    }
}

/// Derives a [`FormTree`] from a model.
///
/// ```ignore
/// let tree = FormTreeBuilder::new(&db, &defs)
///     .with_mode("FromModel & NonNullable".parse()?)
///     .with_hints(HintTree::fields([("a", HintTree::CONTROL)]))
///     .build(model)?;
/// ```
pub struct FormTreeBuilder<'a> {
    db: &'a dyn TypeDatabase,
    defs: &'a DefinitionStore,
    mode: InferMode,
    hints: HintTree,
}

impl<'a> FormTreeBuilder<'a> {
    pub fn new(db: &'a dyn TypeDatabase, defs: &'a DefinitionStore) -> Self {
        FormTreeBuilder {
            db,
            defs,
            mode: InferMode::default(),
            hints: HintTree::Infer,
        }
    }

    pub fn with_mode(mut self, mode: InferMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_hints(mut self, hints: HintTree) -> Self {
        self.hints = hints;
        self
    }

    pub fn build(&self, root: TypeId) -> Result<FormTree> {
        let formatter = TypeFormatter::new(self.db).with_def_store(self.defs);
        debug!(root = %formatter.format(root), mode = %self.mode, "deriving form tree");

        if let Some(hint @ (GroupingHint::Control | GroupingHint::Array)) = self.hints.kind() {
            return Err(FormTreeError::HintMismatch {
                path: FieldPath::root(),
                hint,
                found: formatter.format(root),
            });
        }
        match classify_type(self.db, self.defs, root) {
            TypeClassification::Object(_) => {}
            TypeClassification::Unresolved(def_id) => {
                return Err(FormTreeError::UnresolvedDefinition {
                    name: definition_name(self.db, self.defs, def_id),
                    path: FieldPath::root(),
                });
            }
            _ => {
                return Err(FormTreeError::RootNotObject {
                    found: formatter.format(root),
                });
            }
        }

        let mut expansion = Expansion {
            db: self.db,
            defs: self.defs,
            mode: self.mode,
            guard: RecursionGuard::with_profile(RecursionProfile::ModelExpansion),
            depth: DepthCounter::with_profile(RecursionProfile::ModelExpansion),
            path: FieldPath::root(),
        };
        let node = expansion.node(root, &self.hints, false)?;
        debug!(
            controls = node.controls().map_or(0, IndexMap::len),
            "derived form tree"
        );

        Ok(FormTree {
            root: node,
            mode: self.mode,
            root_type: root,
        })
    }
}

/// The model a declared type names, looking through `| null | undefined`.
///
/// Taken before stripping: a model whose body is itself nullable resolves to
/// a bare object once stripped, and would slip past the cycle guard.
fn model_definition(db: &dyn TypeDatabase, ty: TypeId) -> Option<DefId> {
    match db.lookup(ty)? {
        TypeData::Lazy(def_id) => Some(def_id),
        TypeData::Union(list) => {
            let members = db.type_list(list);
            let mut kept = members.iter().filter(|member| !member.is_nullish());
            match (kept.next(), kept.next()) {
                (Some(&only), None) => model_definition(db, only),
                _ => None,
            }
        }
        _ => None,
    }
}

/// State of one derivation.
struct Expansion<'a> {
    db: &'a dyn TypeDatabase,
    defs: &'a DefinitionStore,
    mode: InferMode,
    /// Models currently being expanded, for cycle detection.
    guard: RecursionGuard<DefId>,
    /// Overall nesting depth, including unrolled cycles.
    depth: DepthCounter,
    path: FieldPath,
}

impl Expansion<'_> {
    /// Build the node for a position whose declared type is `ty`.
    fn node(&mut self, ty: TypeId, hint: &HintTree, value_nullable: bool) -> Result<FormNode> {
        if !self.depth.enter() {
            return Err(FormTreeError::DepthExceeded {
                path: self.path.clone(),
                max_depth: self.depth.max_depth(),
            });
        }
        let result = self.node_inner(ty, hint, value_nullable);
        self.depth.leave();
        result
    }

    fn node_inner(&mut self, ty: TypeId, hint: &HintTree, value_nullable: bool) -> Result<FormNode> {
        let stripped = crate::nullability::strip_nullish(self.db, self.defs, ty);
        match classify_node(self.db, self.defs, stripped, hint, &self.path)? {
            NodeKind::Control => {
                let value = control_value_type(self.db, self.defs, ty, value_nullable);
                trace!(path = %self.path, value = value.0, "control");
                Ok(FormNode::Control { value })
            }
            NodeKind::Group(properties) => {
                self.within_definition(ty, hint, |this| this.group(&properties, hint))
            }
            NodeKind::Array(element) => {
                self.path.push_element();
                let result = self.element(element, hint.element());
                self.path.pop();
                Ok(FormNode::Array {
                    element: Box::new(result?),
                })
            }
        }
    }

    /// Run `f` with the model behind the declared type `ty` marked as being
    /// expanded.
    fn within_definition(
        &mut self,
        ty: TypeId,
        hint: &HintTree,
        f: impl FnOnce(&mut Self) -> Result<FormNode>,
    ) -> Result<FormNode> {
        let Some(def_id) = model_definition(self.db, ty) else {
            return f(self);
        };
        match self.guard.enter(def_id) {
            RecursionResult::Entered => {
                let result = f(self);
                self.guard.leave(def_id);
                result
            }
            // The hint tree is finite, so unrolling under it terminates.
            RecursionResult::Cycle if hint.has_nested() => {
                trace!(path = %self.path, def_id = def_id.0, "unrolling recursive model under hint");
                f(self)
            }
            RecursionResult::Cycle => {
                debug!(cycle = ?self.guard.cycle_from(def_id), path = %self.path, "cyclic model");
                Err(FormTreeError::CyclicModel {
                    name: definition_name(self.db, self.defs, def_id),
                    path: self.path.clone(),
                })
            }
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                Err(FormTreeError::DepthExceeded {
                    path: self.path.clone(),
                    max_depth: self.guard.max_depth(),
                })
            }
        }
    }

    fn group(&mut self, properties: &[PropertyInfo], hint: &HintTree) -> Result<FormNode> {
        for field in hint.field_names() {
            let known = properties
                .iter()
                .any(|p| &*self.db.resolve_atom(p.name) == field);
            if !known {
                return Err(FormTreeError::UnknownHintField {
                    path: self.path.clone(),
                    field: field.to_string(),
                });
            }
        }

        let mut controls = IndexMap::with_capacity(properties.len());
        for prop in properties {
            let name = self.db.resolve_atom(prop.name);
            let declared = declared_modifiers(self.db, self.defs, prop.type_id, prop.optional);
            let resolved = resolve_modifiers(self.mode, declared);

            self.path.push_field(name.clone());
            let node = self.node(prop.type_id, hint.field(&name), resolved.value_nullable);
            self.path.pop();

            controls.insert(
                prop.name,
                FormEntry {
                    node: node?,
                    optional: resolved.entry_optional,
                },
            );
        }
        Ok(FormNode::Group { controls })
    }

    /// Array elements are never absent, only their nullability is resolved.
    fn element(&mut self, element: TypeId, hint: &HintTree) -> Result<FormNode> {
        let declared = declared_modifiers(self.db, self.defs, element, false);
        let resolved = resolve_modifiers(self.mode, declared);
        self.node(element, hint, resolved.value_nullable)
    }
}

#[cfg(test)]
#[path = "../tests/tree_tests.rs"]
mod tests;
