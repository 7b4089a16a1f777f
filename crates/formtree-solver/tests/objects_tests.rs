use super::*;
use crate::intern::TypeInterner;

fn names(db: &TypeInterner, props: &[PropertyInfo]) -> Vec<String> {
    props
        .iter()
        .map(|p| db.resolve_atom(p.name).to_string())
        .collect()
}

#[test]
fn test_resolve_lazy_follows_alias_chain() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", TypeId::NUMBER, false)]);
    let inner = defs.register(db.intern_string("Inner"), model);
    let outer = defs.register(db.intern_string("Outer"), db.lazy(inner));

    assert_eq!(resolve_lazy(&db, &defs, db.lazy(outer)), Ok(model));
    assert_eq!(resolve_lazy(&db, &defs, TypeId::STRING), Ok(TypeId::STRING));
    assert_eq!(lazy_def_id(&db, db.lazy(outer)), Some(outer));
    assert_eq!(lazy_def_id(&db, model), None);
}

#[test]
fn test_resolve_lazy_reports_missing_body() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let pending = defs.reserve(db.intern_string("Pending"));
    assert_eq!(resolve_lazy(&db, &defs, db.lazy(pending)), Err(pending));
}

#[test]
fn test_resolve_lazy_detects_alias_loop() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let a = defs.reserve(db.intern_string("A"));
    let b = defs.reserve(db.intern_string("B"));
    defs.define(a, db.lazy(b));
    defs.define(b, db.lazy(a));
    assert_eq!(resolve_lazy(&db, &defs, db.lazy(a)), Err(a));
}

#[test]
fn test_collect_properties() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", TypeId::NUMBER, false), ("b", TypeId::STRING, true)]);
    let named = defs.register(db.intern_string("Model"), model);

    let props = collect_properties(&db, &defs, db.lazy(named)).expect("object");
    assert_eq!(names(&db, &props), ["a", "b"]);
    assert!(collect_properties(&db, &defs, TypeId::NUMBER).is_none());
    assert!(collect_properties(&db, &defs, db.array(model)).is_none());
}

#[test]
fn test_omit_and_pick() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[
        ("a", TypeId::STRING, false),
        ("b", TypeId::NUMBER, false),
        ("c", TypeId::BOOLEAN, true),
    ]);
    let a = db.intern_string("a");
    let c = db.intern_string("c");
    let missing = db.intern_string("zzz");

    let omitted = omit(&db, &defs, model, &[a]).expect("object");
    assert_eq!(
        omitted,
        db.object_from(&[("b", TypeId::NUMBER, false), ("c", TypeId::BOOLEAN, true)])
    );

    let picked = pick(&db, &defs, model, &[c, a, missing]).expect("object");
    assert_eq!(
        picked,
        db.object_from(&[("a", TypeId::STRING, false), ("c", TypeId::BOOLEAN, true)])
    );

    assert!(omit(&db, &defs, TypeId::STRING, &[a]).is_none());
}

#[test]
fn test_partial_marks_every_property_optional() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", TypeId::STRING, false), ("b", TypeId::NUMBER, true)]);
    assert_eq!(
        partial(&db, &defs, model),
        Some(db.object_from(&[("a", TypeId::STRING, true), ("b", TypeId::NUMBER, true)]))
    );
}

#[test]
fn test_extend_later_declaration_wins_in_place() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let base = db.object_from(&[("a", TypeId::STRING, false), ("b", TypeId::STRING, false)]);
    let extra = db.object_from(&[("c", TypeId::BOOLEAN, false), ("a", TypeId::NUMBER, true)]);

    let merged = extend(&db, &defs, base, extra).expect("objects");
    assert_eq!(
        merged,
        db.object_from(&[
            ("a", TypeId::NUMBER, true),
            ("b", TypeId::STRING, false),
            ("c", TypeId::BOOLEAN, false),
        ])
    );
}

#[test]
fn test_omit_then_extend_matches_hand_written_model() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", TypeId::STRING, false), ("b", TypeId::STRING, false)]);
    let named = defs.register(db.intern_string("Model"), model);

    let without_b = omit(&db, &defs, db.lazy(named), &[db.intern_string("b")]).expect("object");
    let extra = db.object_from(&[("b", TypeId::NUMBER, false)]);
    let composed = extend(&db, &defs, without_b, extra).expect("objects");

    assert_eq!(
        composed,
        db.object_from(&[("a", TypeId::STRING, false), ("b", TypeId::NUMBER, false)])
    );
}
