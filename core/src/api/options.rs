//! Engine configuration.

/// Runtime configuration for an [`Engine`](super::Engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Number of value slots in the arena's first page.
    pub arena_initial_capacity: usize,

    /// Upper bound on the size of any single arena page. Pages double in size
    /// until they reach it.
    pub arena_max_capacity: usize,

    /// Maximum nesting of segments, bodies and lists in a template.
    ///
    /// Exceeding it fails the cook with a resource error instead of
    /// overflowing the stack.
    pub max_depth: usize,

    /// Maximum number of elements a single range literal may expand to.
    pub max_range_len: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            arena_initial_capacity: 64,
            arena_max_capacity: 512,
            max_depth: 64,
            max_range_len: 1_000_000,
        }
    }
}

impl EngineOptions {
    pub fn with_arena_capacity(mut self, initial: usize, max: usize) -> Self {
        self.arena_initial_capacity = initial;
        self.arena_max_capacity = max;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_range_len(mut self, max_range_len: usize) -> Self {
        self.max_range_len = max_range_len;
        self
    }
}
