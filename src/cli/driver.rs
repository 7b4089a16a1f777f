use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

use crate::cli::args::{CliArgs, OutputFormat};
use crate::cli::config::{ResolvedOptions, resolve_options};
use formtree_common::Diagnostic;
use formtree_forms::{AbstractControl, ConformanceChecker, FormArray, FormControl, FormGroup};
use formtree_schema::{ModelDocument, decode_hints, lower_document};
use formtree_solver::{
    DefinitionStore, FormNode, FormTree, FormTreeBuilder, FormTreeFormatter, InferMode,
    TypeDatabase, TypeFormatter, TypeInterner,
};

/// Outcome of one CLI run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The rendered tree, absent when derivation failed.
    pub output: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub options: ResolvedOptions,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// A successful derivation: the rendered tree and any `--check` mismatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derived {
    pub output: String,
    pub mismatches: Vec<Diagnostic>,
}

/// Load, derive and render the document named by `args`.
///
/// IO and usage failures are errors. Problems with the document itself are
/// reported as diagnostics.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let options = resolve_options(args, cwd)?;
    if let Some(config) = &options.config_path {
        debug!(config = %config.display(), "using project config");
    }

    let path = cwd.join(&args.document);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read model document: {}", path.display()))?;

    let check_value = match &args.check {
        Some(check) => {
            let check_path = cwd.join(check);
            let text = std::fs::read_to_string(&check_path)
                .with_context(|| format!("failed to read value: {}", check_path.display()))?;
            let value: Value = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse value: {}", check_path.display()))?;
            Some(value)
        }
        None => None,
    };

    let (output, diagnostics) = match derive_document(&source, &options, check_value.as_ref()) {
        Ok(derived) => (Some(derived.output), derived.mismatches),
        Err(diagnostic) => (None, vec![diagnostic]),
    };
    Ok(RunResult {
        output,
        diagnostics,
        options,
    })
}

/// Derive the form tree of a document source and render it.
pub fn derive_document(
    source: &str,
    options: &ResolvedOptions,
    check: Option<&Value>,
) -> std::result::Result<Derived, Diagnostic> {
    let mut document = ModelDocument::from_json(source).map_err(|err| err.to_diagnostic())?;
    for leaf in &options.leaves {
        if !document.leaves.contains(leaf) {
            document.leaves.push(leaf.clone());
        }
    }

    let db = TypeInterner::new();
    let defs = DefinitionStore::new();
    let lowered = lower_document(&document, &db, &defs).map_err(|err| err.to_diagnostic())?;

    let mode = match &options.mode {
        Some(text) => text
            .parse::<InferMode>()
            .map_err(|err| err.to_diagnostic())?,
        None => lowered.mode.unwrap_or_default(),
    };
    let hints = match &options.hints {
        Some(value) => decode_hints(value, "/hints").map_err(|err| err.to_diagnostic())?,
        None => lowered.hints.clone(),
    };
    let root = lowered
        .root_type(&db, options.root.as_deref())
        .map_err(|err| err.to_diagnostic())?;

    let tree = FormTreeBuilder::new(&db, &defs)
        .with_mode(mode)
        .with_hints(hints)
        .build(root)
        .map_err(|err| err.to_diagnostic())?;
    info!(
        models = lowered.models.len(),
        controls = tree.controls().len(),
        %mode,
        "derived form tree"
    );

    let output = match options.format {
        OutputFormat::Ts => FormTreeFormatter::new(&db).with_def_store(&defs).format(&tree),
        OutputFormat::Value => TypeFormatter::new(&db)
            .with_def_store(&defs)
            .format(tree.value_type(&db)),
        OutputFormat::Json => {
            let json = FormTreeFormatter::new(&db)
                .with_def_store(&defs)
                .to_json(&tree);
            format!("{json:#}")
        }
    };

    let mismatches = match check {
        Some(value) => check_value(&tree, &db, &defs, value),
        None => Vec::new(),
    };
    Ok(Derived { output, mismatches })
}

/// Build controls shaped like `value` and check them against `tree`.
pub fn check_value(
    tree: &FormTree,
    db: &dyn TypeDatabase,
    defs: &DefinitionStore,
    value: &Value,
) -> Vec<Diagnostic> {
    let checker = ConformanceChecker::new(db, defs);
    let controls = controls_for_value(tree.root(), value, db, &checker);
    checker
        .check_node(tree.root(), &controls)
        .iter()
        .map(|mismatch| mismatch.to_diagnostic())
        .collect()
}

/// Mirror a JSON value as controls, following the tree where it matches.
///
/// Objects become groups only where the tree expects a group, so a value
/// that decomposes differently from the tree shows up as a kind mismatch.
/// Controls are nullable exactly where the tree allows `null`.
fn controls_for_value(
    node: &FormNode,
    value: &Value,
    db: &dyn TypeDatabase,
    checker: &ConformanceChecker<'_>,
) -> AbstractControl {
    match (node, value) {
        (FormNode::Group { controls }, Value::Object(map)) => {
            FormGroup::new(map.iter().map(|(name, child)| {
                let control = match controls.get(&db.intern_string(name)) {
                    Some(entry) => controls_for_value(&entry.node, child, db, checker),
                    None => FormControl::non_nullable(child.clone()).into(),
                };
                (name.clone(), control)
            }))
            .into()
        }
        (FormNode::Array { element }, Value::Array(items)) => FormArray::new(
            items
                .iter()
                .map(|item| controls_for_value(element, item, db, checker)),
        )
        .into(),
        (FormNode::Control { value: value_type }, _) if checker.admits_null(*value_type) => {
            FormControl::new(value.clone()).into()
        }
        _ => FormControl::non_nullable(value.clone()).into(),
    }
}
