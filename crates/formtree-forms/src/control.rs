//! Runtime form controls.
//!
//! These mirror the host form API: a [`FormControl`] holds one value, a
//! [`FormGroup`] holds named children and a [`FormArray`] holds an ordered list
//! of children. A node's `value()` is always computed from its children.

use formtree_solver::GroupingHint;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Any runtime control.
#[derive(Clone, Debug, PartialEq)]
pub enum AbstractControl {
    Control(FormControl),
    Group(FormGroup),
    Array(FormArray),
}

impl AbstractControl {
    pub fn value(&self) -> Value {
        match self {
            AbstractControl::Control(control) => control.value().clone(),
            AbstractControl::Group(group) => group.value(),
            AbstractControl::Array(array) => array.value(),
        }
    }

    pub fn kind(&self) -> GroupingHint {
        match self {
            AbstractControl::Control(_) => GroupingHint::Control,
            AbstractControl::Group(_) => GroupingHint::Group,
            AbstractControl::Array(_) => GroupingHint::Array,
        }
    }

    pub fn as_control(&self) -> Option<&FormControl> {
        match self {
            AbstractControl::Control(control) => Some(control),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&FormGroup> {
        match self {
            AbstractControl::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&FormArray> {
        match self {
            AbstractControl::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Reset every control below this node.
    pub fn reset(&mut self) {
        match self {
            AbstractControl::Control(control) => control.reset(),
            AbstractControl::Group(group) => group.reset(),
            AbstractControl::Array(array) => array.reset(),
        }
    }

    /// Navigate a dotted path (`address.city`, `items.0.price`).
    pub fn get(&self, path: &str) -> Option<&AbstractControl> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |control, segment| match control {
                AbstractControl::Group(group) => group.controls.get(segment),
                AbstractControl::Array(array) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| array.at(index)),
                AbstractControl::Control(_) => None,
            })
    }
}

impl From<FormControl> for AbstractControl {
    fn from(control: FormControl) -> Self {
        AbstractControl::Control(control)
    }
}

impl From<FormGroup> for AbstractControl {
    fn from(group: FormGroup) -> Self {
        AbstractControl::Group(group)
    }
}

impl From<FormArray> for AbstractControl {
    fn from(array: FormArray) -> Self {
        AbstractControl::Array(array)
    }
}

/// A single value.
///
/// A nullable control resets to `null`. A non-nullable control resets to the
/// value it was created with, so its value is never `null` unless set so
/// explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct FormControl {
    value: Value,
    default_value: Value,
    non_nullable: bool,
}

impl FormControl {
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            default_value: value.clone(),
            value,
            non_nullable: false,
        }
    }

    pub fn non_nullable(value: impl Into<Value>) -> Self {
        Self {
            non_nullable: true,
            ..Self::new(value)
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The value a non-nullable control returns to on reset.
    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    pub fn is_non_nullable(&self) -> bool {
        self.non_nullable
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn reset(&mut self) {
        self.value = if self.non_nullable {
            self.default_value.clone()
        } else {
            Value::Null
        };
    }
}

/// Named child controls, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormGroup {
    controls: IndexMap<String, AbstractControl>,
}

impl FormGroup {
    pub fn new<I, K, C>(controls: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<AbstractControl>,
    {
        Self {
            controls: controls
                .into_iter()
                .map(|(name, control)| (name.into(), control.into()))
                .collect(),
        }
    }

    pub fn controls(&self) -> &IndexMap<String, AbstractControl> {
        &self.controls
    }

    /// An object with one key per child. Keys without a control are absent,
    /// never `null`.
    pub fn value(&self) -> Value {
        Value::Object(
            self.controls
                .iter()
                .map(|(name, control)| (name.clone(), control.value()))
                .collect::<Map<String, Value>>(),
        )
    }

    /// Navigate a dotted path relative to this group.
    pub fn get(&self, path: &str) -> Option<&AbstractControl> {
        let (first, rest) = match path.split_once('.') {
            Some((first, rest)) => (first, rest),
            None => (path, ""),
        };
        self.controls.get(first)?.get(rest)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AbstractControl> {
        self.controls.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }

    /// Add a control unless one with the same name exists. Returns whether
    /// the control was added.
    pub fn add_control(&mut self, name: impl Into<String>, control: impl Into<AbstractControl>) -> bool {
        let name = name.into();
        if self.controls.contains_key(&name) {
            return false;
        }
        self.controls.insert(name, control.into());
        true
    }

    /// Add or replace a control.
    pub fn set_control(&mut self, name: impl Into<String>, control: impl Into<AbstractControl>) {
        self.controls.insert(name.into(), control.into());
    }

    pub fn remove_control(&mut self, name: &str) -> Option<AbstractControl> {
        self.controls.shift_remove(name)
    }

    pub fn reset(&mut self) {
        for control in self.controls.values_mut() {
            control.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

/// An ordered list of controls of the same shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormArray {
    controls: Vec<AbstractControl>,
}

impl FormArray {
    pub fn new<I, C>(controls: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<AbstractControl>,
    {
        Self {
            controls: controls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn controls(&self) -> &[AbstractControl] {
        &self.controls
    }

    pub fn value(&self) -> Value {
        Value::Array(self.controls.iter().map(AbstractControl::value).collect())
    }

    pub fn push(&mut self, control: impl Into<AbstractControl>) {
        self.controls.push(control.into());
    }

    pub fn insert(&mut self, index: usize, control: impl Into<AbstractControl>) {
        let index = index.min(self.controls.len());
        self.controls.insert(index, control.into());
    }

    pub fn remove_at(&mut self, index: usize) -> Option<AbstractControl> {
        (index < self.controls.len()).then(|| self.controls.remove(index))
    }

    pub fn at(&self, index: usize) -> Option<&AbstractControl> {
        self.controls.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut AbstractControl> {
        self.controls.get_mut(index)
    }

    pub fn clear(&mut self) {
        self.controls.clear();
    }

    pub fn reset(&mut self) {
        for control in &mut self.controls {
            control.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/control_tests.rs"]
mod tests;
