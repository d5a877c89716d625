/// Tunables for one decision pass.
///
/// Windows are counted in simulated steps from the start of a direction's
/// search: a trigger with a window of 10 can only fire during the first 10
/// projected states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub max_depth:             u32,
    pub head_free_window:      u32,
    pub food_window:           u32,
    pub middle_window:         u32,
    pub kill_window:           u32,
    pub near_collision_window: u32,
    pub food_bonus:            i64,
    pub risk_threshold:        i64,
    pub risk_fallback_ratio:   f64,
    /// Every snake keeps its tail once every `n` ticks after its creation,
    /// on servers that grow snakes without food.
    pub growth_interval:       Option<u64>,
}

impl SearchOptions {
    /// True while `depth` (counted down from `max_depth`) is within the
    /// first `window` steps of the search.
    #[must_use]
    pub const fn within(&self, depth: u32, window: u32) -> bool {
        depth + window >= self.max_depth
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_depth:             30,
            head_free_window:      10,
            food_window:           20,
            middle_window:         2,
            kill_window:           10,
            near_collision_window: 10,
            food_bonus:            15,
            risk_threshold:        1,
            risk_fallback_ratio:   0.6,
            growth_interval:       None,
        }
    }
}
