//! Host form model for formtree.
//!
//! - `control` - runtime `FormControl`, `FormGroup` and `FormArray`
//! - `builder` - `FormBuilder` shorthand
//! - `conform` - checking a control tree against a derived `FormTree`

pub mod builder;
pub mod conform;
pub mod control;

pub use builder::FormBuilder;
pub use conform::{ConformanceChecker, ShapeMismatch, conform};
pub use control::{AbstractControl, FormArray, FormControl, FormGroup};
