//! Lowering model documents into the solver's type table.
//!
//! Every model name is reserved in the [`DefinitionStore`] before any body is
//! lowered, so plain references (`"address": "Address"`) become lazy
//! references and may point forward, backward or at the model itself.
//!
//! Composition (`Omit`, `Pick`, `Partial`, `&`) needs the properties of its
//! operands, so operand models are lowered on demand. A model composed from
//! itself is rejected with [`SchemaError::CircularComposition`].

use crate::document::ModelDocument;
use crate::error::{Result, SchemaError, child_location};
use crate::parser::{TypeExpr, parse_type_expr};
use formtree_common::interner::Atom;
use formtree_solver::{
    DefId, DefinitionStore, HintTree, InferMode, IntrinsicKind, LiteralValue, OrderedFloat,
    PropertyInfo, RecursionGuard, RecursionProfile, RecursionResult, TypeDatabase, TypeId,
    extend, lazy_def_id, omit, partial, pick, resolve_lazy,
};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Generic type names handled by the lowering itself.
const BUILTIN_GENERICS: &[&str] = &["Array", "Omit", "Pick", "Partial"];

/// A document lowered into a type table.
#[derive(Clone, Debug)]
pub struct LoweredDocument {
    /// Model names in document order.
    pub models: IndexMap<String, DefId>,
    pub leaves: IndexMap<String, TypeId>,
    pub hints: HintTree,
    pub mode: Option<InferMode>,
    root: Option<String>,
}

impl LoweredDocument {
    pub fn model(&self, name: &str) -> Option<DefId> {
        self.models.get(name).copied()
    }

    /// The type of the root model: `explicit` when given, then the
    /// document's `root`, then the only model.
    pub fn root_type(&self, db: &dyn TypeDatabase, explicit: Option<&str>) -> Result<TypeId> {
        let name = match explicit.or(self.root.as_deref()) {
            Some(name) => name,
            None if self.models.len() == 1 => self
                .models
                .keys()
                .next()
                .map(String::as_str)
                .unwrap_or_default(),
            None => {
                return Err(SchemaError::MissingRoot {
                    count: self.models.len(),
                });
            }
        };
        self.model(name)
            .map(|def_id| db.lazy(def_id))
            .ok_or_else(|| SchemaError::UnknownTypeName {
                location: "/root".to_string(),
                name: name.to_string(),
            })
    }
}

/// Lower every model of `document` into `db`/`defs`.
pub fn lower_document(
    document: &ModelDocument,
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
) -> Result<LoweredDocument> {
    let mut lowerer = Lowerer {
        db,
        defs,
        document,
        models: IndexMap::with_capacity(document.models.len()),
        leaves: FxHashMap::default(),
        in_progress: RecursionGuard::with_profile(RecursionProfile::LazyResolution),
    };

    let mut leaves = IndexMap::with_capacity(document.leaves.len());
    for name in &document.leaves {
        if is_reserved_name(name) || leaves.contains_key(name) {
            return Err(SchemaError::DuplicateModel { name: name.clone() });
        }
        let leaf = db.leaf(db.intern_string(name));
        leaves.insert(name.clone(), leaf);
        lowerer.leaves.insert(name.clone(), leaf);
    }

    for name in document.models.keys() {
        if is_reserved_name(name) || leaves.contains_key(name) {
            return Err(SchemaError::DuplicateModel { name: name.clone() });
        }
        let def_id = defs.reserve(db.intern_string(name));
        lowerer.models.insert(name.clone(), def_id);
    }

    for name in document.models.keys() {
        lowerer.define_model(name)?;
    }

    // Pure alias loops (`A = B`, `B = A`) never reach a structure.
    for (name, def_id) in &lowerer.models {
        if resolve_lazy(db, defs, db.lazy(*def_id)).is_err() {
            return Err(SchemaError::CircularComposition { name: name.clone() });
        }
    }

    debug!(
        models = lowerer.models.len(),
        leaves = leaves.len(),
        "lowered model document"
    );
    Ok(LoweredDocument {
        models: lowerer.models,
        leaves,
        hints: document.hints()?,
        mode: document.mode()?,
        root: document.root.clone(),
    })
}

fn is_reserved_name(name: &str) -> bool {
    IntrinsicKind::from_name(name).is_some()
        || BUILTIN_GENERICS.contains(&name)
        || name == "true"
        || name == "false"
}

struct Lowerer<'a> {
    db: &'a dyn TypeDatabase,
    defs: &'a DefinitionStore,
    document: &'a ModelDocument,
    models: IndexMap<String, DefId>,
    leaves: FxHashMap<String, TypeId>,
    /// Models whose bodies are being lowered right now.
    in_progress: RecursionGuard<DefId>,
}

impl Lowerer<'_> {
    fn define_model(&mut self, name: &str) -> Result<()> {
        let Some(&def_id) = self.models.get(name) else {
            return Ok(());
        };
        if self.defs.is_defined(def_id) {
            return Ok(());
        }
        let document = self.document;
        let Some(value) = document.models.get(name) else {
            return Ok(());
        };

        let location = child_location("/models", name);
        match self.in_progress.enter(def_id) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                return Err(SchemaError::CircularComposition {
                    name: name.to_string(),
                });
            }
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                return Err(SchemaError::InvalidModelEntry {
                    location,
                    message: "models are composed too deeply".to_string(),
                });
            }
        }
        let result = self.lower_value(value, &location);
        self.in_progress.leave(def_id);

        let body = result?;
        self.defs.define(def_id, body);
        trace!(model = name, type_id = body.0, "defined model");
        Ok(())
    }

    /// A model value or property value: a type expression, an inline object
    /// model, or a `$array`/`$union`/`$nullable` form.
    fn lower_value(&mut self, value: &Value, location: &str) -> Result<TypeId> {
        match value {
            Value::String(text) => self.lower_expr_text(text, location),
            Value::Object(map) => self.lower_object(map, location),
            other => Err(SchemaError::InvalidModelEntry {
                location: location.to_string(),
                message: format!("expected a type expression or an object, found '{other}'"),
            }),
        }
    }

    fn lower_object(&mut self, map: &Map<String, Value>, location: &str) -> Result<TypeId> {
        if let Some((key, inner)) = single_directive(map) {
            let inner_location = child_location(location, key);
            return match key {
                "$array" => {
                    let element = self.lower_value(inner, &inner_location)?;
                    Ok(self.db.array(element))
                }
                "$nullable" => {
                    let ty = self.lower_value(inner, &inner_location)?;
                    Ok(self.db.union(vec![ty, TypeId::NULL]))
                }
                "$union" => {
                    let Value::Array(items) = inner else {
                        return Err(SchemaError::InvalidModelEntry {
                            location: inner_location,
                            message: "'$union' expects an array of members".to_string(),
                        });
                    };
                    let mut members = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        let item_location = child_location(&inner_location, &i.to_string());
                        members.push(self.lower_value(item, &item_location)?);
                    }
                    Ok(self.db.union(members))
                }
                other => Err(SchemaError::InvalidModelEntry {
                    location: location.to_string(),
                    message: format!("unknown directive '{other}'"),
                }),
            };
        }

        let mut seen = FxHashSet::default();
        let mut properties = Vec::with_capacity(map.len());
        for (key, value) in map {
            let (name, optional) = match key.strip_suffix('?') {
                Some(name) => (name, true),
                None => (key.as_str(), false),
            };
            let property_location = child_location(location, key);
            if name.is_empty() {
                return Err(SchemaError::InvalidModelEntry {
                    location: property_location,
                    message: "property name is empty".to_string(),
                });
            }
            if !seen.insert(name) {
                return Err(SchemaError::InvalidModelEntry {
                    location: property_location,
                    message: format!("property '{name}' is declared more than once"),
                });
            }
            let type_id = self.lower_value(value, &property_location)?;
            properties.push(PropertyInfo {
                name: self.db.intern_string(name),
                type_id,
                optional,
            });
        }
        Ok(self.db.object(properties))
    }

    fn lower_expr_text(&mut self, text: &str, location: &str) -> Result<TypeId> {
        let expr = parse_type_expr(text).map_err(|err| SchemaError::InvalidTypeExpression {
            location: location.to_string(),
            expr: text.to_string(),
            message: err.to_string(),
        })?;
        self.lower_expr(&expr, text, location)
    }

    fn lower_expr(&mut self, expr: &TypeExpr, text: &str, location: &str) -> Result<TypeId> {
        let db = self.db;
        match expr {
            TypeExpr::Keyword(kind) => Ok(kind.type_id()),
            TypeExpr::StringLiteral(value) => {
                Ok(db.literal(LiteralValue::String(db.intern_string(value))))
            }
            TypeExpr::NumberLiteral(value) => {
                Ok(db.literal(LiteralValue::Number(OrderedFloat(*value))))
            }
            TypeExpr::BooleanLiteral(value) => Ok(db.literal(LiteralValue::Boolean(*value))),
            TypeExpr::Array(element) => {
                let element = self.lower_expr(element, text, location)?;
                Ok(db.array(element))
            }
            TypeExpr::Union(members) => {
                let members = members
                    .iter()
                    .map(|member| self.lower_expr(member, text, location))
                    .collect::<Result<Vec<_>>>()?;
                Ok(db.union(members))
            }
            TypeExpr::Intersection(members) => {
                let mut merged: Option<TypeId> = None;
                for member in members {
                    let ty = self.lower_composed_operand(member, text, location)?;
                    merged = Some(match merged {
                        None => ty,
                        Some(base) => extend(db, self.defs, base, ty)
                            .ok_or_else(|| invalid(text, location, "'&' requires object types"))?,
                    });
                }
                merged.ok_or_else(|| invalid(text, location, "empty intersection"))
            }
            TypeExpr::Reference { name, args } => self.lower_reference(name, args, text, location),
        }
    }

    fn lower_reference(
        &mut self,
        name: &str,
        args: &[TypeExpr],
        text: &str,
        location: &str,
    ) -> Result<TypeId> {
        let db = self.db;
        let expect_args = |count: usize| {
            if args.len() == count {
                Ok(())
            } else {
                Err(invalid(
                    text,
                    location,
                    &format!("'{name}' expects {count} type argument(s), found {}", args.len()),
                ))
            }
        };

        match name {
            "Array" => {
                expect_args(1)?;
                let element = self.lower_expr(&args[0], text, location)?;
                Ok(db.array(element))
            }
            "Partial" => {
                expect_args(1)?;
                let target = self.lower_composed_operand(&args[0], text, location)?;
                partial(db, self.defs, target)
                    .ok_or_else(|| invalid(text, location, "'Partial' requires an object type"))
            }
            "Omit" | "Pick" => {
                expect_args(2)?;
                let target = self.lower_composed_operand(&args[0], text, location)?;
                let keys = self.literal_keys(&args[1], text, location)?;
                let composed = if name == "Omit" {
                    omit(db, self.defs, target, &keys)
                } else {
                    pick(db, self.defs, target, &keys)
                };
                composed.ok_or_else(|| {
                    invalid(text, location, &format!("'{name}' requires an object type"))
                })
            }
            _ if !args.is_empty() => Err(invalid(
                text,
                location,
                &format!("unknown generic type '{name}'"),
            )),
            _ => {
                if let Some(&def_id) = self.models.get(name) {
                    Ok(db.lazy(def_id))
                } else if let Some(&leaf) = self.leaves.get(name) {
                    Ok(leaf)
                } else {
                    Err(SchemaError::UnknownTypeName {
                        location: location.to_string(),
                        name: name.to_string(),
                    })
                }
            }
        }
    }

    /// Lower an operand of a composition and make sure every model on its
    /// alias chain has a body.
    fn lower_composed_operand(
        &mut self,
        expr: &TypeExpr,
        text: &str,
        location: &str,
    ) -> Result<TypeId> {
        let ty = self.lower_expr(expr, text, location)?;
        let mut current = ty;
        let mut visited = FxHashSet::default();
        while let Some(def_id) = lazy_def_id(self.db, current) {
            if !visited.insert(def_id) {
                break;
            }
            if let Some(name) = self.model_name(def_id) {
                self.define_model(&name)?;
            }
            match self.defs.body(def_id) {
                Some(body) => current = body,
                None => break,
            }
        }
        Ok(ty)
    }

    fn model_name(&self, def_id: DefId) -> Option<String> {
        self.models
            .iter()
            .find(|(_, id)| **id == def_id)
            .map(|(name, _)| name.clone())
    }

    /// Keys of `Omit`/`Pick`: a string literal or a union of them.
    fn literal_keys(&self, expr: &TypeExpr, text: &str, location: &str) -> Result<Vec<Atom>> {
        match expr {
            TypeExpr::StringLiteral(key) => Ok(vec![self.db.intern_string(key)]),
            TypeExpr::Keyword(IntrinsicKind::Never) => Ok(Vec::new()),
            TypeExpr::Union(members) => members
                .iter()
                .map(|member| match member {
                    TypeExpr::StringLiteral(key) => Ok(self.db.intern_string(key)),
                    _ => Err(invalid(text, location, "keys must be string literals")),
                })
                .collect(),
            _ => Err(invalid(text, location, "keys must be string literals")),
        }
    }
}

/// `{"$array": ...}` and friends: a single key starting with `$`.
fn single_directive(map: &Map<String, Value>) -> Option<(&str, &Value)> {
    if map.len() != 1 {
        return None;
    }
    map.iter()
        .next()
        .filter(|(key, _)| key.starts_with('$'))
        .map(|(key, value)| (key.as_str(), value))
}

fn invalid(text: &str, location: &str, message: &str) -> SchemaError {
    SchemaError::InvalidTypeExpression {
        location: location.to_string(),
        expr: text.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod tests;
