//! Derivation scenarios exercised through the public API.

use formtree_solver::{
    DefinitionStore, FieldPath, FormNode, FormTree, FormTreeBuilder, FormTreeError,
    FormTreeFormatter, HintTree, InferMode, InferModeFlags, TypeDatabase, TypeFormatter, TypeId,
    TypeInterner, extend, omit,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("formtree_solver=trace")
        .try_init();
}

fn derive(
    db: &TypeInterner,
    defs: &DefinitionStore,
    model: TypeId,
    hints: HintTree,
    mode: &str,
) -> Result<FormTree, FormTreeError> {
    init_tracing();
    let mode: InferMode = mode.parse()?;
    FormTreeBuilder::new(db, defs)
        .with_mode(mode)
        .with_hints(hints)
        .build(model)
}

fn render(db: &TypeInterner, defs: &DefinitionStore, tree: &FormTree) -> String {
    FormTreeFormatter::new(db).with_def_store(defs).format(tree)
}

fn render_value(db: &TypeInterner, defs: &DefinitionStore, tree: &FormTree) -> String {
    TypeFormatter::new(db)
        .with_def_store(defs)
        .format(tree.value_type(db))
}

#[test]
fn undefined_nullable_optional_field_becomes_non_nullable() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let declared = db.union(vec![TypeId::NUMBER, TypeId::NULL, TypeId::UNDEFINED]);
    let model = db.object_from(&[("a", declared, true)]);

    let tree = derive(&db, &defs, model, HintTree::Infer, "FromModel & NonNullable").unwrap();
    assert_eq!(render(&db, &defs, &tree), "FormGroup<{ a?: FormControl<number> }>");
    assert_eq!(render_value(&db, &defs, &tree), "{ a?: number }");
}

#[test]
fn nested_optional_group_under_non_nullable() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let inner = db.object_from(&[("b", db.nullable(TypeId::NUMBER), true)]);
    let model = db.object_from(&[("a", db.nullable(inner), true)]);

    let tree = derive(
        &db,
        &defs,
        model,
        HintTree::fields([("a", HintTree::GROUP)]),
        "FromModel & NonNullable",
    )
    .unwrap();
    assert_eq!(
        render(&db, &defs, &tree),
        "FormGroup<{ a?: FormGroup<{ b?: FormControl<number> }> }>"
    );
}

#[test]
fn date_inside_form_control() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", TypeId::DATE, false)]);

    let tree = derive(&db, &defs, model, HintTree::Infer, "FromModel & NonNullable").unwrap();
    assert_eq!(render(&db, &defs, &tree), "FormGroup<{ a: FormControl<Date> }>");
}

#[test]
fn form_model_after_omit() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", TypeId::NUMBER, false), ("b", TypeId::NUMBER, false)]);
    let without_a = omit(&db, &defs, model, &[db.intern_string("a")]).unwrap();

    let tree = derive(&db, &defs, without_a, HintTree::Infer, "FromModel & Nullable").unwrap();
    assert_eq!(render(&db, &defs, &tree), "FormGroup<{ b: FormControl<number> }>");
}

#[test]
fn non_nullable_form_control() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", db.nullable(TypeId::NUMBER), false)]);

    let tree = derive(&db, &defs, model, HintTree::Infer, "FromModel & NonNullable").unwrap();
    assert_eq!(render_value(&db, &defs, &tree), "{ a: number }");
}

#[test]
fn bubbling_groups_three_levels_deep() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let c = db.object_from(&[("c", TypeId::NUMBER, false)]);
    let b = db.object_from(&[("b", c, false)]);
    let f = db.object_from(&[("f", TypeId::NUMBER, true)]);
    let e = db.object_from(&[("e", f, true)]);
    let model = db.object_from(&[("a", b, false), ("d", e, true)]);

    let hints = HintTree::fields([
        ("a", HintTree::fields([("b", HintTree::GROUP)])),
        ("d", HintTree::fields([("e", HintTree::GROUP)])),
    ]);
    let tree = derive(&db, &defs, model, hints, "Nullable & Required").unwrap();

    for path in ["a", "a.b", "d", "d.e"] {
        let node = tree.get(&db, &FieldPath::parse(path)).unwrap();
        assert!(node.is_group(), "{path} should be a group");
    }
    assert_eq!(
        render_value(&db, &defs, &tree),
        "{ a: { b: { c: number | null } }; d: { e: { f: number | null } } }"
    );
}

#[test]
fn additional_field_through_extension() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", TypeId::NUMBER, false)]);
    let extra = db.object_from(&[("b", TypeId::STRING, false)]);
    let extended = extend(&db, &defs, model, extra).unwrap();

    let tree = derive(&db, &defs, extended, HintTree::Infer, "Nullable & Required").unwrap();
    assert_eq!(
        render(&db, &defs, &tree),
        "FormGroup<{ a: FormControl<number | null>; b: FormControl<string | null> }>"
    );
}

#[test]
fn optional_mode_marks_nested_groups_optional() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let inner = db.object_from(&[("b", TypeId::NUMBER, false)]);
    let model = db.object_from(&[("a", inner, false)]);

    let tree = derive(
        &db,
        &defs,
        model,
        HintTree::fields([("a", HintTree::GROUP)]),
        "Nullable & Optional",
    )
    .unwrap();
    assert_eq!(
        render(&db, &defs, &tree),
        "FormGroup<{ a?: FormGroup<{ b?: FormControl<number | null> }> }>"
    );
}

#[test]
fn control_hint_keeps_object_value_opaque() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let c = db.object_from(&[("c", TypeId::NUMBER, false)]);
    let b = db.object_from(&[("b", c, false)]);
    let model = db.object_from(&[("a", b, false)]);

    let tree = derive(
        &db,
        &defs,
        model,
        HintTree::fields([("a", HintTree::CONTROL)]),
        "Nullable & Optional",
    )
    .unwrap();
    assert_eq!(
        render(&db, &defs, &tree),
        "FormGroup<{ a?: FormControl<{ b: { c: number } } | null> }>"
    );
}

#[test]
fn named_model_inside_another_as_control() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model2 = defs.register(
        db.intern_string("Model2"),
        db.object_from(&[("a", TypeId::NUMBER, true), ("b", TypeId::NUMBER, true)]),
    );
    let inner = db.object_from(&[("b", db.lazy(model2), true)]);
    let model = db.object_from(&[("a", inner, true)]);

    let tree = derive(
        &db,
        &defs,
        model,
        HintTree::fields([("a", HintTree::fields([("b", HintTree::CONTROL)]))]),
        "",
    )
    .unwrap();
    assert_eq!(
        render(&db, &defs, &tree),
        "FormGroup<{ a: FormGroup<{ b: FormControl<Model2 | null> }> }>"
    );
}

#[test]
fn value_projection_matches_controls_everywhere() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let item = db.object_from(&[("sku", TypeId::STRING, false), ("qty", TypeId::NUMBER, true)]);
    let model = db.object_from(&[
        ("items", db.array(item), false),
        ("note", db.nullable(TypeId::STRING), true),
    ]);
    let tree = derive(&db, &defs, model, HintTree::Infer, "FromModel").unwrap();

    fn check(db: &TypeInterner, node: &FormNode) {
        match node {
            FormNode::Control { .. } => {}
            FormNode::Group { controls } => {
                for entry in controls.values() {
                    check(db, &entry.node);
                }
            }
            FormNode::Array { element } => {
                assert_eq!(node.value_type(db), db.array(element.value_type(db)));
                check(db, element);
            }
        }
    }
    check(&db, tree.root());
    assert_eq!(
        tree.value_type(&db),
        db.object_from(&[
            ("items", db.array(item), false),
            ("note", db.nullable(TypeId::STRING), true),
        ])
    );
}

#[test]
fn conflicting_mode_flags_are_rejected() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let model = db.object_from(&[("a", TypeId::NUMBER, false)]);
    let err = derive(&db, &defs, model, HintTree::Infer, "Nullable & NonNullable").unwrap_err();
    assert!(matches!(err, FormTreeError::ConflictingModeFlags { .. }));
    assert_eq!(err.to_diagnostic().code, 1001);
}

#[test]
fn cyclic_model_error_renders_as_diagnostic() {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let category = defs.reserve(db.intern_string("Category"));
    defs.define(
        category,
        db.object_from(&[
            ("name", TypeId::STRING, false),
            ("children", db.array(db.lazy(category)), false),
        ]),
    );

    let err = derive(&db, &defs, db.lazy(category), HintTree::Infer, "").unwrap_err();
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.code, 2005);
    assert_eq!(diagnostic.location, "children[]");
    assert!(diagnostic.message_text.contains("Category"));
}

#[test]
fn derivations_share_one_interner_across_threads() {
    let db = std::sync::Arc::new(TypeInterner::new());
    let defs = std::sync::Arc::new(DefinitionStore::new());
    let model = db.object_from(&[("a", TypeId::NUMBER, false)]);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = db.clone();
            let defs = defs.clone();
            std::thread::spawn(move || {
                FormTreeBuilder::new(&*db, &defs)
                    .build(model)
                    .map(|tree| tree.value_type(&*db))
            })
        })
        .collect();
    let expected = db.object_from(&[("a", db.nullable(TypeId::NUMBER), false)]);
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(expected));
    }
}
