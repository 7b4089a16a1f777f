//! Shorthand construction of control trees.

use crate::control::{AbstractControl, FormArray, FormControl, FormGroup};
use serde_json::Value;

/// Builds controls the way the host API's form builder does.
///
/// ```ignore
/// let fb = FormBuilder::new();
/// let form = fb.group([
///     ("name", fb.non_nullable_control("Ada")),
///     ("tags", fb.array([fb.control("math")]).into()),
/// ]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FormBuilder {
    non_nullable: bool,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose `control` creates non-nullable controls.
    pub fn non_nullable() -> Self {
        Self { non_nullable: true }
    }

    /// Children are taken as `AbstractControl` so nested `fb.group(..).into()`
    /// calls have a target type.
    pub fn group<I, K>(&self, controls: I) -> FormGroup
    where
        I: IntoIterator<Item = (K, AbstractControl)>,
        K: Into<String>,
    {
        FormGroup::new(controls)
    }

    pub fn control(&self, value: impl Into<Value>) -> AbstractControl {
        if self.non_nullable {
            FormControl::non_nullable(value).into()
        } else {
            FormControl::new(value).into()
        }
    }

    pub fn non_nullable_control(&self, value: impl Into<Value>) -> AbstractControl {
        FormControl::non_nullable(value).into()
    }

    pub fn array<I>(&self, controls: I) -> FormArray
    where
        I: IntoIterator<Item = AbstractControl>,
    {
        FormArray::new(controls)
    }
}
