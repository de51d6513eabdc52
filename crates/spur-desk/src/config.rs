//! Configuration for an investigation desk.

/// Limits and tuning for the command layer.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// RNG seed for reproducible rolls and target picks.
    pub seed: u64,
    /// Most tags a topic may name before a new clue is too specific to write.
    pub max_topic_tags: usize,
    /// Most of each resource type one investigation can hold.
    pub max_resource: u32,
    /// Silver must be committed in multiples of this.
    pub silver_step: u64,
    /// Most silver one investigation can hold.
    pub max_silver: u64,
    /// Action points must be committed in multiples of this.
    pub ap_step: u32,
    /// Shortest note accepted when sharing a clue.
    pub min_share_note: usize,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_topic_tags: 6,
            max_resource: 50,
            silver_step: 5000,
            max_silver: 50_000,
            ap_step: 5,
            min_share_note: 80,
        }
    }
}

impl DeskConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the topic tag limit (at least 1).
    pub fn with_max_topic_tags(mut self, max: usize) -> Self {
        self.max_topic_tags = max.max(1);
        self
    }

    /// Set the per-type resource cap.
    pub fn with_max_resource(mut self, max: u32) -> Self {
        self.max_resource = max;
        self
    }

    /// Set the silver step and cap. A zero step is treated as 1.
    pub fn with_silver(mut self, step: u64, max: u64) -> Self {
        self.silver_step = step.max(1);
        self.max_silver = max;
        self
    }

    /// Set the action point step (at least 1).
    pub fn with_ap_step(mut self, step: u32) -> Self {
        self.ap_step = step.max(1);
        self
    }

    /// Set the minimum share note length.
    pub fn with_min_share_note(mut self, len: usize) -> Self {
        self.min_share_note = len;
        self
    }
}
