//! Logging for the `formtree` binary.
//!
//! Nothing is installed unless `FORMTREE_LOG` (or `RUST_LOG`) is set. Events
//! worth filtering on, by target:
//!
//! - `formtree_schema`: models reserved and lowered, one `trace` per model
//! - `formtree_solver`: the expansion walk. `debug` marks each derivation and
//!   any cyclic model, `trace` shows every control, hint-forced control and
//!   recursive unrolling, `warn` reports hints ignored on atomic types
//! - `formtree_forms`: conformance summaries, `trace` per mismatch
//! - `formtree`: the CLI's chosen project config and derivation summary
//!
//! ```bash
//! # Why did `address` become a control?
//! FORMTREE_LOG=formtree_solver=trace FORMTREE_LOG_FORMAT=tree formtree models.json
//!
//! # Which mismatches did --check find, as JSON lines
//! FORMTREE_LOG=formtree_forms=trace FORMTREE_LOG_FORMAT=json formtree models.json --check value.json
//! ```
//!
//! Output always goes to stderr; stdout carries only the rendered tree.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "FORMTREE_LOG";
pub const LOG_FORMAT_ENV: &str = "FORMTREE_LOG_FORMAT";

/// How events are written, chosen by `FORMTREE_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per event.
    #[default]
    Text,
    /// Indented by span, easiest for following a recursive expansion.
    Tree,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Unknown or empty values mean [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// The filter directives in effect, `FORMTREE_LOG` first, then `RUST_LOG`.
pub fn filter_directives(formtree_log: Option<String>, rust_log: Option<String>) -> Option<String> {
    formtree_log.or(rust_log)
}

/// Install the global subscriber described by the environment.
///
/// A subscriber that is already installed is left in place.
pub fn init_tracing() {
    let Some(directives) =
        filter_directives(std::env::var(LOG_ENV).ok(), std::env::var("RUST_LOG").ok())
    else {
        return;
    };
    let format = LogFormat::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default());
    let filter = EnvFilter::builder().parse_lossy(directives);

    let installed = match format {
        LogFormat::Tree => Registry::default()
            .with(filter)
            .with(
                tracing_tree::HierarchicalLayer::default()
                    .with_writer(std::io::stderr)
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_targets(true),
            )
            .try_init(),
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    if installed.is_ok() {
        tracing::debug!(?format, "tracing initialised");
    }
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tests;
