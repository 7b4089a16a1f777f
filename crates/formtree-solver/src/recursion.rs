//! Bounds for recursive walks over models, lazy references and runtime forms.
//!
//! [`RecursionGuard`] keeps the current expansion path as a stack of keys
//! (usually `DefId`s). Entering a key that is already on the path is a cycle.
//! Depth and total work are capped by the limits of a [`RecursionProfile`].
//!
//! [`DepthCounter`] is the depth-only variant, used where revisiting the same
//! key is legal but nesting must still stop somewhere.
//!
//! In debug builds both panic when dropped with unbalanced `enter`/`leave`
//! calls.

use formtree_common::limits;

/// Which walk a guard protects. Each profile carries its own limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// `FormTreeBuilder` expanding a model into controls, keyed on `DefId`.
    ModelExpansion,
    /// Following a chain of model aliases (`A` is `B` is ...).
    LazyResolution,
    /// Matching runtime control values against value types. Values can nest
    /// below the tree's leaves, so this is deeper than expansion.
    Conformance,
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::ModelExpansion | Self::LazyResolution => limits::MAX_MODEL_DEPTH,
            Self::Conformance => limits::MAX_CONFORMANCE_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    /// Total `enter` calls one guard accepts over its lifetime.
    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::ModelExpansion | Self::LazyResolution | Self::Conformance => {
                limits::MAX_EXPANSION_STEPS
            }
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already on the expansion path.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        self == Self::Entered
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        self == Self::Cycle
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

/// Cycle, depth and work bound for one recursive walk.
///
/// ```ignore
/// let mut guard = RecursionGuard::with_profile(RecursionProfile::ModelExpansion);
/// match guard.enter(def_id) {
///     RecursionResult::Entered => {
///         let node = expand(def_id);
///         guard.leave(def_id);
///         node
///     }
///     RecursionResult::Cycle => cyclic(guard.path()),
///     _ => too_deep(),
/// }
/// ```
pub struct RecursionGuard<K: PartialEq + Copy> {
    path: Vec<K>,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: PartialEq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        RecursionGuard {
            path: Vec::new(),
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Push `key` onto the path. Only [`RecursionResult::Entered`] needs a
    /// matching [`leave`](Self::leave).
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);
        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.depth() >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if self.path.contains(&key) {
            return RecursionResult::Cycle;
        }
        self.path.push(key);
        RecursionResult::Entered
    }

    /// Pop `key`, which must be the innermost entered key.
    pub fn leave(&mut self, key: K) {
        let popped = self.path.pop();
        debug_assert!(
            popped == Some(key),
            "RecursionGuard::leave() out of order or without a matching enter()"
        );
    }

    /// Run `f` with `key` entered, or report why it could not be.
    pub fn scope<T>(&mut self, key: K, f: impl FnOnce() -> T) -> Result<T, RecursionResult> {
        match self.enter(key) {
            RecursionResult::Entered => {
                let value = f();
                self.leave(key);
                Ok(value)
            }
            denied => Err(denied),
        }
    }

    /// Keys currently entered, outermost first.
    pub fn path(&self) -> &[K] {
        &self.path
    }

    /// The part of the path from the first occurrence of `key` onwards.
    pub fn cycle_from(&self, key: K) -> Option<&[K]> {
        let start = self.path.iter().position(|k| *k == key)?;
        Some(&self.path[start..])
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.path.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        u32::try_from(self.path.len()).unwrap_or(u32::MAX)
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Whether a limit was ever hit. Stays set until [`reset`](Self::reset).
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    pub fn reset(&mut self) {
        self.path.clear();
        self.iterations = 0;
        self.exceeded = false;
    }
}

#[cfg(debug_assertions)]
impl<K: PartialEq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.path.is_empty() {
            panic!(
                "RecursionGuard dropped with {} keys still entered",
                self.path.len()
            );
        }
    }
}

/// Depth-only bound.
///
/// The tree builder pairs it with a [`RecursionGuard`]: a hint tree may
/// legitimately unroll the same model several times, and this still stops
/// the nesting. The conformance checker uses it for nested control values.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl DepthCounter {
    pub fn new(max_depth: u32) -> Self {
        DepthCounter {
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Go one level deeper. On `false` nothing changed and no `leave` is due.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave() at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!("DepthCounter dropped at depth {}", self.depth);
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
