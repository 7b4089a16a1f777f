//! Common types and utilities for the formtree workspace.
//!
//! This crate provides foundational types used across all formtree crates:
//! - String interning (`Atom`, `NameInterner`)
//! - Engine limits and thresholds
//! - Numbered diagnostics shared by the solver, schema loader and CLI

// String interning for property and model names
pub mod interner;
pub use interner::{Atom, NameInterner};

// Centralized limits and thresholds
pub mod limits;

// Diagnostic codes, messages and the Diagnostic record
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage, format_message};
