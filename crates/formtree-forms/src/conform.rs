//! Checking runtime controls against a derived form tree.
//!
//! A control tree conforms when it has exactly the entries the form tree
//! declares, each entry has the declared kind, nullable controls appear only
//! where the value type admits `null`, and every control value matches its
//! value type. Nothing is widened: an undeclared entry is as much a mismatch
//! as a missing one.

use crate::control::{AbstractControl, FormArray, FormControl, FormGroup};
use formtree_common::diagnostics::{Diagnostic, diagnostic_codes};
use formtree_common::interner::Atom;
use formtree_common::limits::MAX_CONFORMANCE_ERRORS;
use formtree_solver::{
    DefinitionStore, DepthCounter, FieldPath, FormEntry, FormNode, FormTree, GroupingHint,
    IntrinsicKind, LiteralValue, RecursionProfile, TypeData, TypeDatabase, TypeFormatter, TypeId,
    resolve_lazy,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// One way a control tree fails to conform.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeMismatch {
    #[error("control '{path}' is required but missing")]
    MissingControl { path: FieldPath },

    #[error("control '{path}' is not part of the form model")]
    UnexpectedControl { path: FieldPath },

    #[error("expected a {expected} at '{path}', found a {found}")]
    KindMismatch {
        path: FieldPath,
        expected: GroupingHint,
        found: GroupingHint,
    },

    #[error("control at '{path}' must be non-nullable")]
    NullableControl { path: FieldPath },

    #[error("value at '{path}' is not assignable to '{expected}'")]
    ValueTypeMismatch { path: FieldPath, expected: String },
}

impl ShapeMismatch {
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::MissingControl { path }
            | Self::UnexpectedControl { path }
            | Self::KindMismatch { path, .. }
            | Self::NullableControl { path }
            | Self::ValueTypeMismatch { path, .. } => path,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::MissingControl { .. } => diagnostic_codes::MISSING_CONTROL,
            Self::UnexpectedControl { .. } => diagnostic_codes::UNEXPECTED_CONTROL,
            Self::KindMismatch { .. } => diagnostic_codes::CONTROL_KIND_MISMATCH,
            Self::NullableControl { .. } => diagnostic_codes::NULLABLE_CONTROL,
            Self::ValueTypeMismatch { .. } => diagnostic_codes::VALUE_TYPE_MISMATCH,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let path = self.path().to_string();
        let code = self.code();
        match self {
            Self::MissingControl { .. }
            | Self::UnexpectedControl { .. }
            | Self::NullableControl { .. } => Diagnostic::from_code(path.as_str(), code, &[&path]),
            Self::KindMismatch {
                expected, found, ..
            } => Diagnostic::from_code(
                path.as_str(),
                code,
                &[expected.as_str(), &path, found.as_str()],
            ),
            Self::ValueTypeMismatch { expected, .. } => {
                Diagnostic::from_code(path.as_str(), code, &[&path, expected.as_str()])
            }
        }
    }
}

/// Check `group` against the root of `tree`.
pub fn conform(
    tree: &FormTree,
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    group: &FormGroup,
) -> Result<(), Vec<ShapeMismatch>> {
    let mismatches = ConformanceChecker::new(db, defs).check(tree, group);
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(mismatches)
    }
}

/// Structural conformance of runtime controls and JSON values.
pub struct ConformanceChecker<'a> {
    db: &'a dyn TypeDatabase,
    defs: &'a DefinitionStore,
    max_errors: usize,
}

impl<'a> ConformanceChecker<'a> {
    pub fn new(db: &'a dyn TypeDatabase, defs: &'a DefinitionStore) -> Self {
        Self {
            db,
            defs,
            max_errors: MAX_CONFORMANCE_ERRORS,
        }
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// All mismatches between `tree` and `group`, in traversal order.
    pub fn check(&self, tree: &FormTree, group: &FormGroup) -> Vec<ShapeMismatch> {
        let mut walk = Walk::new(self);
        match tree.root() {
            FormNode::Group { controls } => walk.group(controls, group),
            other => walk.report(ShapeMismatch::KindMismatch {
                path: FieldPath::root(),
                expected: other.kind(),
                found: GroupingHint::Group,
            }),
        }
        debug!(mismatches = walk.mismatches.len(), "checked form conformance");
        walk.mismatches
    }

    /// All mismatches between a single node and a control.
    pub fn check_node(&self, node: &FormNode, control: &AbstractControl) -> Vec<ShapeMismatch> {
        let mut walk = Walk::new(self);
        walk.node(node, control);
        walk.mismatches
    }

    /// Whether a JSON value inhabits `ty`.
    ///
    /// - `undefined` is represented by `null`
    /// - `Date` accepts an ISO string or epoch milliseconds
    /// - `bigint` accepts an integer or a string of digits
    /// - atomic leaves accept any non-null value
    pub fn value_matches(&self, value: &Value, ty: TypeId) -> bool {
        let mut depth = DepthCounter::with_profile(RecursionProfile::Conformance);
        self.matches(value, ty, &mut depth)
    }

    /// Whether `ty` admits `null`, following model references.
    pub fn admits_null(&self, ty: TypeId) -> bool {
        let resolved = resolve_lazy(self.db, self.defs, ty).unwrap_or(ty);
        match self.db.lookup(resolved) {
            Some(TypeData::Intrinsic(IntrinsicKind::Null | IntrinsicKind::Unknown)) => true,
            Some(TypeData::Union(list)) => self
                .db
                .type_list(list)
                .iter()
                .any(|member| *member == TypeId::NULL || *member == TypeId::UNKNOWN),
            _ => false,
        }
    }

    fn matches(&self, value: &Value, ty: TypeId, depth: &mut DepthCounter) -> bool {
        if !depth.enter() {
            trace!(type_id = ty.0, "value nested too deeply");
            return false;
        }
        let result = self.matches_inner(value, ty, depth);
        depth.leave();
        result
    }

    fn matches_inner(&self, value: &Value, ty: TypeId, depth: &mut DepthCounter) -> bool {
        let Some(data) = self.db.lookup(ty) else {
            return false;
        };
        match data {
            TypeData::Intrinsic(kind) => intrinsic_accepts(kind, value),
            TypeData::Literal(literal) => match literal {
                LiteralValue::String(atom) => {
                    value.as_str() == Some(&*self.db.resolve_atom(atom))
                }
                LiteralValue::Number(number) => value.as_f64() == Some(number.0),
                LiteralValue::Boolean(flag) => value.as_bool() == Some(flag),
            },
            TypeData::Leaf(_) => !value.is_null(),
            TypeData::Object(shape_id) => {
                let Value::Object(map) = value else {
                    return false;
                };
                let shape = self.db.object_shape(shape_id);
                let declared_ok = shape.properties.iter().all(|prop| {
                    match map.get(&*self.db.resolve_atom(prop.name)) {
                        Some(field) => self.matches(field, prop.type_id, depth),
                        None => prop.optional || self.admits_undefined(prop.type_id),
                    }
                });
                declared_ok
                    && map
                        .keys()
                        .all(|key| shape.property(self.db.intern_string(key)).is_some())
            }
            TypeData::Array(element) => match value {
                Value::Array(items) => items.iter().all(|item| self.matches(item, element, depth)),
                _ => false,
            },
            TypeData::Union(list) => self
                .db
                .type_list(list)
                .iter()
                .any(|member| self.matches(value, *member, depth)),
            TypeData::Lazy(def_id) => self
                .defs
                .body(def_id)
                .is_some_and(|body| self.matches(value, body, depth)),
        }
    }

    fn admits_undefined(&self, ty: TypeId) -> bool {
        let resolved = resolve_lazy(self.db, self.defs, ty).unwrap_or(ty);
        match self.db.lookup(resolved) {
            Some(TypeData::Union(list)) => self.db.type_list(list).contains(&TypeId::UNDEFINED),
            _ => resolved == TypeId::UNDEFINED || resolved == TypeId::UNKNOWN,
        }
    }

    fn format(&self, ty: TypeId) -> String {
        TypeFormatter::new(self.db)
            .with_def_store(self.defs)
            .format(ty)
    }
}

fn intrinsic_accepts(kind: IntrinsicKind, value: &Value) -> bool {
    match kind {
        IntrinsicKind::Never => false,
        IntrinsicKind::Unknown => true,
        IntrinsicKind::Null | IntrinsicKind::Undefined => value.is_null(),
        IntrinsicKind::Boolean => value.is_boolean(),
        IntrinsicKind::Number => value.is_number(),
        IntrinsicKind::String => value.is_string(),
        IntrinsicKind::Bigint => match value {
            Value::Number(number) => number.is_i64() || number.is_u64(),
            Value::String(text) => {
                let digits = text.strip_prefix('-').unwrap_or(text);
                !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
            }
            _ => false,
        },
        IntrinsicKind::Date => value.is_string() || value.is_number(),
    }
}

/// State of one conformance walk.
struct Walk<'c, 'a> {
    checker: &'c ConformanceChecker<'a>,
    path: FieldPath,
    mismatches: Vec<ShapeMismatch>,
}

impl<'c, 'a> Walk<'c, 'a> {
    fn new(checker: &'c ConformanceChecker<'a>) -> Self {
        Self {
            checker,
            path: FieldPath::root(),
            mismatches: Vec::new(),
        }
    }

    fn report(&mut self, mismatch: ShapeMismatch) {
        if self.mismatches.len() < self.checker.max_errors {
            trace!(%mismatch, "shape mismatch");
            self.mismatches.push(mismatch);
        }
    }

    fn node(&mut self, node: &FormNode, control: &AbstractControl) {
        match (node, control) {
            (FormNode::Control { value }, AbstractControl::Control(control)) => {
                self.control(*value, control);
            }
            (FormNode::Group { controls }, AbstractControl::Group(group)) => {
                self.group(controls, group);
            }
            (FormNode::Array { element }, AbstractControl::Array(array)) => {
                self.array(element, array);
            }
            (expected, found) => self.report(ShapeMismatch::KindMismatch {
                path: self.path.clone(),
                expected: expected.kind(),
                found: found.kind(),
            }),
        }
    }

    fn control(&mut self, value_type: TypeId, control: &FormControl) {
        if !control.is_non_nullable() && !self.checker.admits_null(value_type) {
            self.report(ShapeMismatch::NullableControl {
                path: self.path.clone(),
            });
        }
        if !self.checker.value_matches(control.value(), value_type) {
            self.report(ShapeMismatch::ValueTypeMismatch {
                path: self.path.clone(),
                expected: self.checker.format(value_type),
            });
        }
    }

    fn group(&mut self, declared: &IndexMap<Atom, FormEntry>, group: &FormGroup) {
        let db = self.checker.db;
        for (name, entry) in declared {
            let name = db.resolve_atom(*name);
            self.path.push_field(Arc::clone(&name));
            match group.controls().get(&*name) {
                Some(control) => self.node(&entry.node, control),
                None if !entry.optional => self.report(ShapeMismatch::MissingControl {
                    path: self.path.clone(),
                }),
                None => {}
            }
            self.path.pop();
        }
        for name in group.controls().keys() {
            if !declared.contains_key(&db.intern_string(name)) {
                self.report(ShapeMismatch::UnexpectedControl {
                    path: self.path.join(name),
                });
            }
        }
    }

    fn array(&mut self, element: &FormNode, array: &FormArray) {
        for (index, control) in array.controls().iter().enumerate() {
            self.path.push_index(index);
            self.node(element, control);
            self.path.pop();
        }
    }
}

#[cfg(test)]
#[path = "../tests/conform_tests.rs"]
mod tests;
