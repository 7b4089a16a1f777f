//! Centralized limits and thresholds for formtree.
//!
//! Shared constants for recursion depths and work budgets used by the solver,
//! the schema loader and the conformance checker. Solver recursion guards read
//! their limits through [`formtree_solver::recursion::RecursionProfile`], which
//! is built on top of these values.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth when expanding a model into a form tree.
///
/// Each nested group or array adds one level. A model legitimately nested this
/// deep is far beyond anything a form can render, so exceeding it is reported as
/// `DepthExceeded` rather than risking a stack overflow.
///
/// # Example
///
/// ```text
/// // A self-referential model unrolled by an (enormous) hint tree:
/// Node { child?: Node }
/// hints: { child: { child: { child: ... 64 levels ... } } }
/// ```
pub const MAX_MODEL_DEPTH: u32 = 64;

/// Maximum depth when projecting a form tree onto its value type.
///
/// The projection mirrors the tree, so it never needs more than the model depth.
pub const MAX_VALUE_PROJECTION_DEPTH: u32 = MAX_MODEL_DEPTH;

/// Maximum nesting depth when checking a runtime form against a derived tree.
///
/// Runtime values can nest below the tree (a control may hold an object), so
/// this is larger than [`MAX_MODEL_DEPTH`].
pub const MAX_CONFORMANCE_DEPTH: u32 = 128;

/// Maximum nesting depth for parenthesised / generic type expressions in model
/// documents.
///
/// ```text
/// "((((((((number))))))))"
/// "Array<Array<Array<Array<string>>>>"
/// ```
pub const MAX_TYPE_EXPR_DEPTH: u32 = 64;

// =============================================================================
// Operation Counts
// =============================================================================

/// Total node budget for a single form tree derivation.
///
/// Bounds the work done for wide-and-deep models; every property visit counts
/// as one step.
pub const MAX_EXPANSION_STEPS: u32 = 100_000;

/// Maximum number of mismatches collected by one conformance check before it
/// stops reporting.
pub const MAX_CONFORMANCE_ERRORS: usize = 100;
