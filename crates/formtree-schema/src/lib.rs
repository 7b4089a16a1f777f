//! Model documents for the formtree solver.
//!
//! This crate turns JSON documents into solver types:
//! - `scanner` / `parser` - the type-expression language (`Omit<User, 'id'>[] | null`)
//! - `document` - the serde document format, hint and mode decoding
//! - `lower` - registering models in a `DefinitionStore` and lowering their bodies

pub mod document;
pub mod error;
pub mod lower;
pub mod parser;
pub mod scanner;

pub use document::{ModeSpec, ModelDocument, decode_hints};
pub use error::{Result, SchemaError};
pub use lower::{LoweredDocument, lower_document};
pub use parser::{ParseError, TypeExpr, parse_type_expr};

use formtree_solver::{DefinitionStore, TypeDatabase};

/// Parse and lower a JSON document in one step.
pub fn load_document(
    text: &str,
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
) -> Result<(ModelDocument, LoweredDocument)> {
    let document = ModelDocument::from_json(text)?;
    let lowered = lower_document(&document, db, defs)?;
    Ok((document, lowered))
}
