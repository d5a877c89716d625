pub mod board;
pub mod bonus;
pub mod brain;
pub mod options;
pub mod risk;
pub mod snake;
pub mod world;

use std::time::Instant;

use color_eyre::Result;
use log::{debug, info, trace};

use self::{
    brain::{decide, Decision},
    options::SearchOptions,
    world::World,
};
use super::Strategy;
use crate::arena::models::MapUpdate;

/// Greedy straight-line search with bonus and risk tie-breaks.
///
/// Keeps the world between ticks so the controlled snake's heading and
/// eaten flag survive from one update to the next.
#[derive(Debug, Default)]
pub struct SolidSnake {
    options: SearchOptions,
    world:   Option<World>,
}

impl SolidSnake {
    pub const fn new(options: SearchOptions) -> Self {
        Self {
            options,
            world: None,
        }
    }

    pub const fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Forgets the current game.
    pub fn reset(&mut self) {
        self.world = None;
    }
}

impl Strategy for SolidSnake {
    fn get_movement(&mut self, update: &MapUpdate) -> Result<Decision> {
        let start = Instant::now();

        let world = match self.world.take() {
            Some(mut world) if update.game_tick > 0 => {
                if let Err(e) = world.refresh(update) {
                    self.world = Some(world);
                    return Err(e);
                }
                world
            },
            _ => {
                info!(
                    "starting game {} at tick {}",
                    update.game_id, update.game_tick
                );
                World::from_update(update, self.options.growth_interval)?
            },
        };
        let world = self.world.insert(world);

        trace!("tick {} at {}\n{world}", world.tick, world.you.head());

        let decision = decide(world, &self.options);
        world.record_move(decision.direction, decision.will_eat);
        if decision.will_eat {
            debug!("found food going {}", decision.direction);
        }

        info!(
            "tick {}: going {} after {} ms",
            update.game_tick,
            decision.direction,
            start.elapsed().as_millis()
        );
        Ok(decision)
    }
}
