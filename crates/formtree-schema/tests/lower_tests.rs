use super::*;
use formtree_solver::{FormTreeBuilder, TypeFormatter, TypeInterner};

fn lower(text: &str) -> (TypeInterner, DefinitionStore, Result<LoweredDocument>) {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let document = ModelDocument::from_json(text).expect("valid json");
    let lowered = lower_document(&document, &db, &defs);
    (db, defs, lowered)
}

fn body(db: &TypeInterner, defs: &DefinitionStore, lowered: &LoweredDocument, name: &str) -> String {
    let def_id = lowered.model(name).expect("model");
    let body = defs.body(def_id).expect("defined");
    TypeFormatter::new(db).with_def_store(defs).format(body)
}

#[test]
fn test_inline_models_and_optional_keys() {
    let (db, defs, lowered) = lower(
        r#"{ "models": { "User": {
            "name": "string",
            "age?": "number | null",
            "born": "Date",
            "meta": { "tags": "string[]" }
        } } }"#,
    );
    let lowered = lowered.unwrap();
    assert_eq!(
        body(&db, &defs, &lowered, "User"),
        "{ name: string; age?: number | null; born: Date; meta: { tags: string[] } }"
    );
}

#[test]
fn test_forward_and_self_references_are_lazy() {
    let (db, defs, lowered) = lower(
        r#"{ "models": {
            "Node": { "value": "number", "next": "Node | null", "owner": "Owner" },
            "Owner": { "name": "string" }
        } }"#,
    );
    let lowered = lowered.unwrap();
    assert_eq!(
        body(&db, &defs, &lowered, "Node"),
        "{ value: number; next: Node | null; owner: Owner }"
    );
}

#[test]
fn test_directives() {
    let (db, defs, lowered) = lower(
        r#"{ "models": { "M": {
            "items": { "$array": { "price": "number" } },
            "status": { "$union": ["'draft'", "'done'"] },
            "note": { "$nullable": "string" }
        } } }"#,
    );
    let lowered = lowered.unwrap();
    assert_eq!(
        body(&db, &defs, &lowered, "M"),
        "{ items: { price: number }[]; status: \"draft\" | \"done\"; note: string | null }"
    );
}

#[test]
fn test_composition_operators() {
    let (db, defs, lowered) = lower(
        r#"{ "models": {
            "Patch": "Partial<Omit<User, 'id'>>",
            "Named": "Pick<User, 'name'> & Nick",
            "User": { "id": "number", "name": "string" },
            "Nick": { "nickname": "string", "name": "string | null" }
        } }"#,
    );
    let lowered = lowered.unwrap();
    assert_eq!(body(&db, &defs, &lowered, "Patch"), "{ name?: string }");
    assert_eq!(
        body(&db, &defs, &lowered, "Named"),
        "{ name: string | null; nickname: string }"
    );
}

#[test]
fn test_leaves_are_atomic() {
    let (db, defs, lowered) = lower(
        r#"{ "leaves": ["Decimal"], "models": { "Line": { "price": "Decimal" } } }"#,
    );
    let lowered = lowered.unwrap();
    assert_eq!(body(&db, &defs, &lowered, "Line"), "{ price: Decimal }");
    let decimal = lowered.leaves["Decimal"];
    assert_eq!(db.lookup(decimal), Some(formtree_solver::TypeData::Leaf(db.intern_string("Decimal"))));
}

#[test]
fn test_unknown_type_name_has_location() {
    let (_db, _defs, lowered) = lower(r#"{ "models": { "User": { "address": "Adress" } } }"#);
    assert_eq!(
        lowered.unwrap_err(),
        SchemaError::UnknownTypeName {
            location: "/models/User/address".to_string(),
            name: "Adress".to_string(),
        }
    );
}

#[test]
fn test_invalid_expression_has_location() {
    let (_db, _defs, lowered) = lower(r#"{ "models": { "User": { "tags": "string[" } } }"#);
    let err = lowered.unwrap_err();
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.code, 3001);
    assert_eq!(diagnostic.location, "/models/User/tags");
}

#[test]
fn test_reserved_and_duplicate_names() {
    let (_db, _defs, lowered) = lower(r#"{ "models": { "Date": { "a": "number" } } }"#);
    assert_eq!(
        lowered.unwrap_err(),
        SchemaError::DuplicateModel {
            name: "Date".to_string()
        }
    );

    let (_db, _defs, lowered) =
        lower(r#"{ "leaves": ["Money"], "models": { "Money": { "a": "number" } } }"#);
    assert!(matches!(lowered, Err(SchemaError::DuplicateModel { .. })));
}

#[test]
fn test_circular_composition() {
    let (_db, _defs, lowered) = lower(r#"{ "models": { "A": "Omit<A, 'x'>" } }"#);
    assert_eq!(
        lowered.unwrap_err(),
        SchemaError::CircularComposition {
            name: "A".to_string()
        }
    );

    let (_db, _defs, lowered) = lower(r#"{ "models": { "A": "B", "B": "A" } }"#);
    assert!(matches!(
        lowered,
        Err(SchemaError::CircularComposition { .. })
    ));
}

#[test]
fn test_composition_requires_objects() {
    let (_db, _defs, lowered) = lower(r#"{ "models": { "A": "Partial<string>" } }"#);
    assert!(matches!(
        lowered,
        Err(SchemaError::InvalidTypeExpression { ref message, .. }) if message.contains("Partial")
    ));

    let (_db, _defs, lowered) = lower(r#"{ "models": { "A": "Record<string, number>" } }"#);
    assert!(matches!(
        lowered,
        Err(SchemaError::InvalidTypeExpression { ref message, .. }) if message.contains("Record")
    ));
}

#[test]
fn test_invalid_entries() {
    let (_db, _defs, lowered) = lower(r#"{ "models": { "A": { "x": 42 } } }"#);
    assert!(matches!(
        lowered,
        Err(SchemaError::InvalidModelEntry { ref location, .. }) if location == "/models/A/x"
    ));

    let (_db, _defs, lowered) = lower(r#"{ "models": { "A": { "x": { "$map": "string" } } } }"#);
    assert!(matches!(lowered, Err(SchemaError::InvalidModelEntry { .. })));

    let (_db, _defs, lowered) = lower(r#"{ "models": { "A": { "x": "string", "x?": "number" } } }"#);
    assert!(matches!(lowered, Err(SchemaError::InvalidModelEntry { .. })));
}

#[test]
fn test_root_type_and_tree_derivation() {
    let (db, defs, lowered) = lower(
        r#"{
            "models": { "User": { "name": "string", "address": { "city": "string" } } },
            "hints": { "address": "control" },
            "mode": "NonNullable"
        }"#,
    );
    let lowered = lowered.unwrap();
    let root = lowered.root_type(&db, None).unwrap();
    let tree = FormTreeBuilder::new(&db, &defs)
        .with_hints(lowered.hints.clone())
        .with_mode(lowered.mode.unwrap_or_default())
        .build(root)
        .unwrap();
    assert_eq!(
        TypeFormatter::new(&db).format(tree.value_type(&db)),
        "{ name: string; address: { city: string } }"
    );

    assert!(matches!(
        lowered.root_type(&db, Some("Nope")),
        Err(SchemaError::UnknownTypeName { .. })
    ));
}
