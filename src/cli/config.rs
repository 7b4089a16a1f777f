use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::cli::args::{CliArgs, OutputFormat};

pub const CONFIG_FILE_NAME: &str = "formtree.json";

/// Boolean options accept both `true` and `"true"`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// Contents of `formtree.json`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub leaves: Option<Vec<String>>,
    #[serde(default)]
    pub hints: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub pretty: Option<bool>,
}

/// Options after applying CLI flags over the project config.
///
/// Anything still `None` falls back to the model document, then to the
/// built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct ResolvedOptions {
    pub root: Option<String>,
    pub mode: Option<String>,
    pub hints: Option<Value>,
    pub format: OutputFormat,
    pub leaves: Vec<String>,
    pub pretty: Option<bool>,
    pub config_path: Option<PathBuf>,
}

pub fn parse_project_config(source: &str) -> Result<ProjectConfig> {
    serde_json::from_str(source).context("failed to parse formtree.json")
}

pub fn load_project_config(path: &Path) -> Result<ProjectConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read project config: {}", path.display()))?;
    parse_project_config(&source).with_context(|| format!("in {}", path.display()))
}

/// Find `formtree.json` in `start` or one of its ancestors.
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Resolve `--project`: a file, or a directory holding `formtree.json`.
pub fn resolve_project_path(project: &Path, cwd: &Path) -> Result<PathBuf> {
    let path = cwd.join(project);
    if path.is_dir() {
        let candidate = path.join(CONFIG_FILE_NAME);
        if !candidate.is_file() {
            bail!("no {CONFIG_FILE_NAME} found in {}", path.display());
        }
        return Ok(candidate);
    }
    if !path.is_file() {
        bail!("project config not found: {}", path.display());
    }
    Ok(path)
}

/// Apply CLI flags over the project config.
pub fn resolve_options(args: &CliArgs, cwd: &Path) -> Result<ResolvedOptions> {
    let config_path = match &args.project {
        Some(project) => Some(resolve_project_path(project, cwd)?),
        None => cwd
            .join(&args.document)
            .parent()
            .and_then(find_project_config),
    };
    let config = match &config_path {
        Some(path) => load_project_config(path)?,
        None => ProjectConfig::default(),
    };

    let format = match (args.format, config.format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(name)) => OutputFormat::parse(name)
            .ok_or_else(|| anyhow!("unknown output format '{name}' in project config"))?,
        (None, None) => OutputFormat::default(),
    };

    let hints = match &args.hints {
        Some(arg) => Some(read_hints_arg(arg, cwd)?),
        None => config.hints,
    };

    let mut leaves = config.leaves.unwrap_or_default();
    for leaf in args.leaves.iter().flatten() {
        if !leaves.contains(leaf) {
            leaves.push(leaf.clone());
        }
    }

    Ok(ResolvedOptions {
        root: args.root.clone().or(config.root),
        mode: args.mode.clone().or(config.mode),
        hints,
        format,
        leaves,
        pretty: args.pretty.or(config.pretty),
        config_path,
    })
}

/// `--hints` takes inline JSON or the path of a JSON file.
fn read_hints_arg(arg: &str, cwd: &Path) -> Result<Value> {
    let trimmed = arg.trim_start();
    if trimmed.starts_with(['{', '[', '"']) || trimmed == "null" {
        return serde_json::from_str(arg).context("failed to parse --hints JSON");
    }
    let path = cwd.join(arg);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read hints file: {}", path.display()))?;
    serde_json::from_str(&source)
        .with_context(|| format!("failed to parse hints file: {}", path.display()))
}
