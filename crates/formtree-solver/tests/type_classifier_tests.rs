use super::*;
use crate::intern::TypeInterner;

fn at(name: &str) -> FieldPath {
    FieldPath::root().join(name)
}

#[test]
fn test_classify_type_expands_lazies() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", TypeId::NUMBER, false)]);
    let named = defs.register(db.intern_string("Model"), model);

    assert!(matches!(
        classify_type(&db, &defs, db.lazy(named)),
        TypeClassification::Object(_)
    ));
    assert_eq!(
        classify_type(&db, &defs, TypeId::STRING),
        TypeClassification::Primitive(IntrinsicKind::String)
    );
    assert_eq!(
        classify_type(&db, &defs, db.array(TypeId::STRING)),
        TypeClassification::Array(TypeId::STRING)
    );
}

#[test]
fn test_date_and_leaves_are_atomic_objects() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let decimal = db.intern_string("Decimal");

    assert!(classify_type(&db, &defs, TypeId::DATE).is_atomic_object());
    assert_eq!(
        classify_type(&db, &defs, db.leaf(decimal)),
        TypeClassification::AtomicObject(Some(decimal))
    );
}

#[test]
fn test_unresolved_definition() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let pending = defs.reserve(db.intern_string("Pending"));
    assert_eq!(
        classify_type(&db, &defs, db.lazy(pending)),
        TypeClassification::Unresolved(pending)
    );

    let err = classify_node(&db, &defs, db.lazy(pending), &HintTree::Infer, &at("a"))
        .expect_err("unresolved");
    assert_eq!(
        err,
        FormTreeError::UnresolvedDefinition {
            name: "Pending".to_string(),
            path: at("a"),
        }
    );
}

#[test]
fn test_default_classification() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let infer = HintTree::Infer;
    let path = at("x");
    let model = db.object_from(&[("b", TypeId::NUMBER, false)]);

    assert_eq!(
        classify_node(&db, &defs, TypeId::NUMBER, &infer, &path),
        Ok(NodeKind::Control)
    );
    assert_eq!(
        classify_node(&db, &defs, TypeId::DATE, &infer, &path),
        Ok(NodeKind::Control)
    );
    assert_eq!(
        classify_node(&db, &defs, db.literal_string("on"), &infer, &path),
        Ok(NodeKind::Control)
    );
    assert_eq!(
        classify_node(&db, &defs, db.array(TypeId::STRING), &infer, &path),
        Ok(NodeKind::Array(TypeId::STRING))
    );
    let Ok(NodeKind::Group(props)) = classify_node(&db, &defs, model, &infer, &path) else {
        panic!("expected group");
    };
    assert_eq!(props.len(), 1);
}

#[test]
fn test_control_hint_wins() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("b", TypeId::NUMBER, false)]);
    let path = at("a");

    for ty in [model, db.array(model), TypeId::STRING, TypeId::DATE] {
        assert_eq!(
            classify_node(&db, &defs, ty, &HintTree::CONTROL, &path),
            Ok(NodeKind::Control)
        );
    }
}

#[test]
fn test_structural_hint_on_atomic_object_is_ignored() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let blob = db.leaf(db.intern_string("Blob"));
    assert_eq!(
        classify_node(&db, &defs, TypeId::DATE, &HintTree::GROUP, &at("when")),
        Ok(NodeKind::Control)
    );
    assert_eq!(
        classify_node(&db, &defs, blob, &HintTree::ARRAY, &at("file")),
        Ok(NodeKind::Control)
    );
}

#[test]
fn test_structural_hint_on_primitive_is_mismatch() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let err = classify_node(&db, &defs, TypeId::NUMBER, &HintTree::GROUP, &at("a"))
        .expect_err("mismatch");
    assert_eq!(
        err,
        FormTreeError::HintMismatch {
            path: at("a"),
            hint: GroupingHint::Group,
            found: "number".to_string(),
        }
    );
}

#[test]
fn test_kind_hints_must_match_shape() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("b", TypeId::NUMBER, false)]);

    assert!(classify_node(&db, &defs, model, &HintTree::ARRAY, &at("a")).is_err());
    assert!(
        classify_node(&db, &defs, db.array(model), &HintTree::GROUP, &at("a")).is_err()
    );
    assert!(
        classify_node(&db, &defs, model, &HintTree::fields([("b", HintTree::CONTROL)]), &at("a"))
            .is_ok()
    );
}

#[test]
fn test_union_of_several_members_is_a_control() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let a = db.object_from(&[("a", TypeId::NUMBER, false)]);
    let b = db.object_from(&[("b", TypeId::NUMBER, false)]);
    let either = db.union(vec![a, b]);

    assert_eq!(
        classify_node(&db, &defs, either, &HintTree::Infer, &at("x")),
        Ok(NodeKind::Control)
    );
    assert!(matches!(
        classify_node(&db, &defs, either, &HintTree::GROUP, &at("x")),
        Err(FormTreeError::HintMismatch { .. })
    ));
}
