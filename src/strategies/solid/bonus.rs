use std::fmt;

use log::debug;

use crate::arena::types::Direction;

/// Heuristic counters gathered while searching one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BonusTracker {
    pub food_on_path:     i64,
    pub kill_bonus:       i64,
    pub middle_bonus:     i64,
    pub free_head_spaces: i64,
    pub near_collisions:  i64,
}

impl BonusTracker {
    pub fn food_found(&mut self, value: i64) {
        self.food_on_path += value;
    }

    pub fn killed(&mut self) {
        self.kill_bonus += 1;
    }

    pub fn target_middle(&mut self) {
        self.middle_bonus += 1;
    }

    pub fn head_free(&mut self) {
        self.free_head_spaces += 1;
    }

    pub fn near_collision(&mut self) {
        self.near_collisions += 1;
    }

    /// Everything except near collisions, which the risk check covers.
    pub const fn composite(&self) -> i64 {
        self.food_on_path
            + self.kill_bonus
            + self.middle_bonus
            + self.free_head_spaces
    }
}

impl fmt::Display for BonusTracker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (food {}, kill {}, middle {}, free head {}, near collisions {})",
            self.composite(),
            self.food_on_path,
            self.kill_bonus,
            self.middle_bonus,
            self.free_head_spaces,
            self.near_collisions
        )
    }
}

/// One tracker per direction searched this tick.
#[derive(Debug, Default)]
pub struct BonusHandler {
    trackers: [Option<BonusTracker>; 4],
}

impl BonusHandler {
    pub fn add_tracker(&mut self, direction: Direction) -> &mut BonusTracker {
        self.trackers[direction.index()].insert(BonusTracker::default())
    }

    pub fn tracker(&self, direction: Direction) -> Option<&BonusTracker> {
        self.trackers[direction.index()].as_ref()
    }

    /// The direction with the most food for the fewest near collisions,
    /// `Down` when nothing was tracked.
    pub fn best_bonus(&self) -> Direction {
        let mut best = Direction::Down;
        let mut max_value = i64::MIN;
        for &direction in Direction::iter() {
            if let Some(tracker) = self.tracker(direction) {
                let value = tracker.food_on_path - tracker.near_collisions;
                debug!("{direction} has bonus value {value}");
                if value > max_value {
                    max_value = value;
                    best = direction;
                }
            }
        }
        best
    }

    /// Composite bonus for `direction`, zero when it was never searched.
    pub fn bonus(&self, direction: Direction) -> i64 {
        self.tracker(direction).map_or(0, BonusTracker::composite)
    }
}
