//! End-to-end scenarios: model document, derived tree, runtime controls.

use formtree::{
    DefinitionStore, FormBuilder, FormTree, FormTreeBuilder, FormTreeFormatter, TypeInterner,
    conform, load_document,
};
use serde_json::json;

struct Derived {
    db: TypeInterner,
    defs: DefinitionStore,
    tree: FormTree,
}

impl Derived {
    fn render(&self) -> String {
        FormTreeFormatter::new(&self.db)
            .with_def_store(&self.defs)
            .format(&self.tree)
    }

    fn conforms(&self, form: &formtree::FormGroup) {
        if let Err(mismatches) = conform(&self.tree, &self.db, &self.defs, form) {
            panic!("form does not conform: {mismatches:?}");
        }
    }
}

fn derive(document: &str) -> Derived {
    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let (_, lowered) = load_document(document, &db, &defs).expect("document lowers");
    let root = lowered.root_type(&db, None).expect("root model");
    let tree = FormTreeBuilder::new(&db, &defs)
        .with_mode(lowered.mode.unwrap_or_default())
        .with_hints(lowered.hints.clone())
        .build(root)
        .expect("tree derives");
    Derived { db, defs, tree }
}

#[test]
fn undefined_nullable_optional_field_is_non_nullable() {
    let derived = derive(
        r#"{
            "models": { "Model": { "a?": "number | null | undefined" } },
            "mode": "FromModel & NonNullable"
        }"#,
    );
    assert_eq!(derived.render(), "FormGroup<{ a?: FormControl<number> }>");

    let fb = FormBuilder::new();
    let form = fb.group([("a", fb.non_nullable_control(42))]);
    derived.conforms(&form);
    assert_eq!(form.value()["a"], json!(42));
    assert_eq!(form.get("a").map(|a| a.value()), Some(json!(42)));

    let nullable = fb.group([("a", fb.control(42))]);
    assert!(conform(&derived.tree, &derived.db, &derived.defs, &nullable).is_err());
}

#[test]
fn nested_optional_fields_are_non_nullable() {
    let derived = derive(
        r#"{
            "models": { "Model": { "a?": { "$nullable": { "b?": "number | null" } } } },
            "hints": { "a": "group" },
            "mode": "FromModel & NonNullable"
        }"#,
    );
    assert_eq!(
        derived.render(),
        "FormGroup<{ a?: FormGroup<{ b?: FormControl<number> }> }>"
    );

    let fb = FormBuilder::new();
    let form = fb.group([(
        "a",
        fb.group([("b", fb.non_nullable_control(42))]).into(),
    )]);
    derived.conforms(&form);
    assert_eq!(form.value()["a"]["b"], json!(42));
}

#[test]
fn date_inside_form_control() {
    let derived = derive(
        r#"{ "models": { "Model": { "a": "Date" } }, "mode": "FromModel & NonNullable" }"#,
    );
    assert_eq!(derived.render(), "FormGroup<{ a: FormControl<Date> }>");

    let fb = FormBuilder::new();
    let form = fb.group([("a", fb.non_nullable_control("2022-07-08T06:46:28.452Z"))]);
    derived.conforms(&form);
    assert_eq!(form.value()["a"], json!("2022-07-08T06:46:28.452Z"));
}

#[test]
fn form_model_after_omit() {
    let derived = derive(
        r#"{
            "models": {
                "Model": { "a": "number", "b": "number" },
                "Form": "Omit<Model, 'a'>"
            },
            "root": "Form",
            "mode": "FromModel & Nullable"
        }"#,
    );
    assert_eq!(derived.render(), "FormGroup<{ b: FormControl<number> }>");

    let fb = FormBuilder::non_nullable();
    let form = fb.group([("b", fb.control(42))]);
    derived.conforms(&form);
    assert_eq!(form.value()["b"], json!(42));
}

#[test]
fn non_nullable_form_control() {
    let derived = derive(
        r#"{ "models": { "Model": { "a": "number | null" } }, "mode": "FromModel & NonNullable" }"#,
    );
    assert_eq!(derived.render(), "FormGroup<{ a: FormControl<number> }>");

    let fb = FormBuilder::new();
    let form = fb.group([("a", fb.non_nullable_control(42))]);
    derived.conforms(&form);
}

#[test]
fn bubbling_values_through_nested_groups() {
    let derived = derive(
        r#"{
            "models": {
                "Model": {
                    "a": { "b": { "c": "number" } },
                    "d?": { "e?": { "f?": "number" } }
                }
            },
            "hints": { "a": { "b": "group" }, "d": { "e": "group" } },
            "mode": "Nullable & Required"
        }"#,
    );
    assert_eq!(
        derived.render(),
        "FormGroup<{ a: FormGroup<{ b: FormGroup<{ c: FormControl<number | null> }> }>; \
         d: FormGroup<{ e: FormGroup<{ f: FormControl<number | null> }> }> }>"
    );

    let fb = FormBuilder::new();
    let form = fb.group([
        (
            "a",
            fb.group([("b", fb.group([("c", fb.control(42))]).into())]).into(),
        ),
        (
            "d",
            fb.group([("e", fb.group([("f", fb.control(42))]).into())]).into(),
        ),
    ]);
    derived.conforms(&form);
    assert_eq!(form.value()["a"]["b"]["c"], json!(42));
    assert_eq!(form.value()["d"]["e"]["f"], json!(42));
}

#[test]
fn additional_field_through_intersection() {
    let derived = derive(
        r#"{
            "models": {
                "Model": { "a": "number" },
                "Extra": { "b": "string" },
                "Form": "Model & Extra"
            },
            "root": "Form",
            "mode": "Nullable & Required"
        }"#,
    );
    assert_eq!(
        derived.render(),
        "FormGroup<{ a: FormControl<number | null>; b: FormControl<string | null> }>"
    );

    let fb = FormBuilder::new();
    let form = fb.group([("a", fb.control(42)), ("b", fb.control("test"))]);
    derived.conforms(&form);
    assert_eq!(form.value(), json!({ "a": 42, "b": "test" }));
}

#[test]
fn controls_inside_optional_fields() {
    let derived = derive(
        r#"{
            "models": { "Model": { "a": { "b": "number" } } },
            "hints": { "a": "group" },
            "mode": "Nullable & Optional"
        }"#,
    );
    assert_eq!(
        derived.render(),
        "FormGroup<{ a?: FormGroup<{ b?: FormControl<number | null> }> }>"
    );

    let fb = FormBuilder::new();
    let form = fb.group([("a", fb.group([("b", fb.control(42))]).into())]);
    derived.conforms(&form);
    assert_eq!(form.get("a.b").map(|b| b.value()), Some(json!(42)));

    // Every entry is optional, so an empty form conforms too.
    derived.conforms(&fb.group(Vec::<(&str, formtree::AbstractControl)>::new()));
}

#[test]
fn whole_object_in_one_control() {
    let derived = derive(
        r#"{
            "models": { "Model": { "a": { "b": { "c": "number" } } } },
            "hints": { "a": "control" },
            "mode": "Nullable & Optional"
        }"#,
    );
    assert_eq!(
        derived.render(),
        "FormGroup<{ a?: FormControl<{ b: { c: number } } | null> }>"
    );

    let fb = FormBuilder::new();
    let form = fb.group([("a", fb.control(json!({ "b": { "c": 42 } })))]);
    derived.conforms(&form);
    assert_eq!(form.value()["a"]["b"], json!({ "c": 42 }));
}

#[test]
fn model_inside_model_behind_control_hint() {
    let derived = derive(
        r#"{
            "models": {
                "Model": { "a?": { "b?": "Model2" } },
                "Model2": { "a?": "number", "b?": "number" }
            },
            "root": "Model",
            "hints": { "a": { "b": "control" } }
        }"#,
    );
    assert_eq!(
        derived.render(),
        "FormGroup<{ a: FormGroup<{ b: FormControl<Model2 | null> }> }>"
    );

    let fb = FormBuilder::new();
    let form = fb.group([("a", fb.group([("b", fb.control(json!(null)))]).into())]);
    derived.conforms(&form);
    assert_eq!(form.value()["a"]["b"], json!(null));

    let filled = fb.group([("a", fb.group([("b", fb.control(json!({ "a": 1 })))]).into())]);
    derived.conforms(&filled);

    let wrong = fb.group([("a", fb.group([("b", fb.control(json!({ "z": 1 })))]).into())]);
    assert!(conform(&derived.tree, &derived.db, &derived.defs, &wrong).is_err());
}
