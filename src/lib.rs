//! formtree: derive reactive form control trees from data models.
//!
//! The workspace is split by concern:
//! - [`solver`]: the derivation engine (types, modes, hints, tree builder)
//! - [`schema`]: JSON model documents and the type-expression language
//! - [`forms`]: runtime controls and conformance checking
//! - [`common`]: interning, limits and numbered diagnostics
//!
//! ```ignore
//! use formtree::{DefinitionStore, FormTreeBuilder, TypeInterner, load_document};
//!
//! let db = TypeInterner::new();
//! let defs = DefinitionStore::new();
//! let (_, lowered) = load_document(source, &db, &defs)?;
//! let tree = FormTreeBuilder::new(&db, &defs)
//!     .with_mode(lowered.mode.unwrap_or_default())
//!     .with_hints(lowered.hints.clone())
//!     .build(lowered.root_type(&db, None)?)?;
//! ```

pub use formtree_common as common;
pub use formtree_forms as forms;
pub use formtree_schema as schema;
pub use formtree_solver as solver;

pub mod cli;
pub mod tracing_config;

pub use formtree_common::{Diagnostic, DiagnosticCategory};
pub use formtree_forms::{
    AbstractControl, ConformanceChecker, FormArray, FormBuilder, FormControl, FormGroup,
    ShapeMismatch, conform,
};
pub use formtree_schema::{LoweredDocument, ModelDocument, SchemaError, load_document};
pub use formtree_solver::{
    DefinitionStore, FieldPath, FormEntry, FormNode, FormTree, FormTreeBuilder, FormTreeError,
    FormTreeFormatter, GroupingHint, HintTree, InferMode, InferModeFlags, TypeDatabase,
    TypeFormatter, TypeId, TypeInterner,
};
