/// Tuning knobs for the apply pass
use serde::{Deserialize, Serialize};

/// Options controlling how a resolved matrix is applied to a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Allow the apply pass to run on the rayon thread pool. Default: true
    pub parallel: bool,

    /// Minimum vertex count before the parallel pass is used. Default: 4096
    pub parallel_threshold: usize,

    /// A transformed w' with magnitude at or below this is treated as zero.
    /// Default: 0.0 (only an exact zero is degenerate)
    pub degenerate_epsilon: f32,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 4096,
            degenerate_epsilon: 0.0,
        }
    }
}

impl ApplyConfig {
    /// Config that always runs the pass on the calling thread.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_degenerate_epsilon(mut self, epsilon: f32) -> Self {
        self.degenerate_epsilon = epsilon.abs();
        self
    }

    /// Whether a buffer of `len` vertices should take the parallel path.
    pub fn use_parallel(&self, len: usize) -> bool {
        self.parallel && len >= self.parallel_threshold
    }
}
