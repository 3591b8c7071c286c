//! Layout configuration.

use serde::{Deserialize, Serialize};

/// Layout configuration shared by every renderer in one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Relayout budget of the column-balancing loop.
    pub max_relayouts: usize,
    /// Height differences below this value are treated as zero.
    pub height_epsilon: f32,
    /// Height of the area used for unbounded trial layouts.
    pub unbounded_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_relayouts: 4,
            height_epsilon: 1e-4,
            unbounded_height: 1e6,
        }
    }
}

impl LayoutConfig {
    /// Set the relayout budget.
    pub fn with_max_relayouts(mut self, max_relayouts: usize) -> Self {
        self.max_relayouts = max_relayouts;
        self
    }
}
