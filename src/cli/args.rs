use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the formtree binary.
#[derive(Parser, Debug)]
#[command(
    name = "formtree",
    version,
    about = "Derive reactive form control trees from data models"
)]
pub struct CliArgs {
    /// Model document (JSON).
    pub document: PathBuf,

    /// Model to derive the form from. Defaults to the document's `root`.
    #[arg(short = 'r', long)]
    pub root: Option<String>,

    /// Mode flags, e.g. "FromModel & NonNullable".
    #[arg(short = 'm', long)]
    pub mode: Option<String>,

    /// Grouping hints: a JSON file, or inline JSON such as '{"address":"control"}'.
    #[arg(long)]
    pub hints: Option<String>,

    /// What to print.
    #[arg(short = 'f', long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Path to formtree.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    /// Extra atomic type names, in addition to the document's `leaves`.
    #[arg(long, value_delimiter = ',')]
    pub leaves: Option<Vec<String>>,

    /// Check a JSON form value against the derived tree.
    #[arg(long)]
    pub check: Option<PathBuf>,

    /// Enable color and formatting in output.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub pretty: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// The tree in form-API syntax.
    #[default]
    Ts,
    /// The tree as JSON.
    Json,
    /// The value type of the root group.
    Value,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}
