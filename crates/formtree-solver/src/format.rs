//! Human-readable rendering of types and form trees.
//!
//! Types render TypeScript-style (`{ a?: number | null; b: Date }`), trees
//! render in form-API syntax
//! (`FormGroup<{ a: FormControl<number>; tags: FormArray<FormControl<string>> }>`).

use crate::db::TypeDatabase;
use crate::def::DefinitionStore;
use crate::tree::{FormEntry, FormNode, FormTree};
use crate::types::{LiteralValue, TypeData, TypeId};
use formtree_common::interner::Atom;
use serde_json::{Map, Value, json};

pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
    def_store: Option<&'a DefinitionStore>,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        TypeFormatter {
            db,
            def_store: None,
        }
    }

    /// Resolve lazy references to their model names instead of `Lazy(N)`.
    pub fn with_def_store(mut self, def_store: &'a DefinitionStore) -> Self {
        self.def_store = Some(def_store);
        self
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(ty, &mut out);
        out
    }

    fn write_type(&self, ty: TypeId, out: &mut String) {
        let Some(data) = self.db.lookup(ty) else {
            out.push_str(&format!("Type({})", ty.0));
            return;
        };
        match data {
            TypeData::Intrinsic(kind) => out.push_str(kind.name()),
            TypeData::Literal(value) => self.write_literal(value, out),
            TypeData::Leaf(name) => out.push_str(&self.db.resolve_atom(name)),
            TypeData::Object(shape_id) => {
                let shape = self.db.object_shape(shape_id);
                if shape.properties.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{ ");
                for (i, prop) in shape.properties.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    self.write_property_name(prop.name, out);
                    if prop.optional {
                        out.push('?');
                    }
                    out.push_str(": ");
                    self.write_type(prop.type_id, out);
                }
                out.push_str(" }");
            }
            TypeData::Array(element) => {
                let needs_parens = matches!(self.db.lookup(element), Some(TypeData::Union(_)));
                if needs_parens {
                    out.push('(');
                }
                self.write_type(element, out);
                if needs_parens {
                    out.push(')');
                }
                out.push_str("[]");
            }
            TypeData::Union(list) => {
                let members = self.db.type_list(list);
                // `null` and `undefined` print last, as they are written.
                let ordered = members
                    .iter()
                    .filter(|m| !m.is_nullish())
                    .chain(members.iter().filter(|m| **m == TypeId::NULL))
                    .chain(members.iter().filter(|m| **m == TypeId::UNDEFINED));
                for (i, member) in ordered.enumerate() {
                    if i > 0 {
                        out.push_str(" | ");
                    }
                    self.write_type(*member, out);
                }
            }
            TypeData::Lazy(def_id) => {
                match self.def_store.and_then(|defs| defs.name(def_id)) {
                    Some(name) => out.push_str(&self.db.resolve_atom(name)),
                    None => out.push_str(&format!("Lazy({})", def_id.0)),
                }
            }
        }
    }

    fn write_literal(&self, value: LiteralValue, out: &mut String) {
        match value {
            LiteralValue::String(atom) => {
                out.push('"');
                out.push_str(&self.db.resolve_atom(atom).escape_default().to_string());
                out.push('"');
            }
            LiteralValue::Number(n) => out.push_str(&n.0.to_string()),
            LiteralValue::Boolean(b) => out.push_str(if b { "true" } else { "false" }),
        }
    }

    fn write_property_name(&self, name: Atom, out: &mut String) {
        let name = self.db.resolve_atom(name);
        if is_identifier(&name) {
            out.push_str(&name);
        } else {
            out.push('"');
            out.push_str(&name.escape_default().to_string());
            out.push('"');
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Renders derived trees in form-API syntax and as JSON.
pub struct FormTreeFormatter<'a> {
    types: TypeFormatter<'a>,
}

impl<'a> FormTreeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        FormTreeFormatter {
            types: TypeFormatter::new(db),
        }
    }

    pub fn with_def_store(mut self, def_store: &'a DefinitionStore) -> Self {
        self.types = self.types.with_def_store(def_store);
        self
    }

    pub fn format(&self, tree: &FormTree) -> String {
        self.format_node(tree.root())
    }

    pub fn format_node(&self, node: &FormNode) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: &FormNode, out: &mut String) {
        match node {
            FormNode::Control { value } => {
                out.push_str("FormControl<");
                self.types.write_type(*value, out);
                out.push('>');
            }
            FormNode::Group { controls } => {
                if controls.is_empty() {
                    out.push_str("FormGroup<{}>");
                    return;
                }
                out.push_str("FormGroup<{ ");
                for (i, (name, entry)) in controls.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    self.types.write_property_name(*name, out);
                    if entry.optional {
                        out.push('?');
                    }
                    out.push_str(": ");
                    self.write_node(&entry.node, out);
                }
                out.push_str(" }>");
            }
            FormNode::Array { element } => {
                out.push_str("FormArray<");
                self.write_node(element, out);
                out.push('>');
            }
        }
    }

    /// JSON description of a whole derivation: root, mode, value type and
    /// the tree itself.
    pub fn to_json(&self, tree: &FormTree) -> Value {
        json!({
            "root": self.types.format(tree.root_type()),
            "mode": tree.mode().to_string(),
            "value": self.types.format(tree.value_type(self.types.db)),
            "tree": self.node_to_json(tree.root()),
        })
    }

    pub fn node_to_json(&self, node: &FormNode) -> Value {
        match node {
            FormNode::Control { value } => json!({
                "kind": "control",
                "value": self.types.format(*value),
            }),
            FormNode::Group { controls } => {
                let mut members = Map::new();
                for (name, entry) in controls {
                    members.insert(
                        self.types.db.resolve_atom(*name).to_string(),
                        self.entry_to_json(entry),
                    );
                }
                json!({ "kind": "group", "controls": members })
            }
            FormNode::Array { element } => json!({
                "kind": "array",
                "element": self.node_to_json(element),
            }),
        }
    }

    fn entry_to_json(&self, entry: &FormEntry) -> Value {
        let mut value = self.node_to_json(&entry.node);
        if let Value::Object(map) = &mut value {
            map.insert("optional".to_string(), Value::Bool(entry.optional));
        }
        value
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
