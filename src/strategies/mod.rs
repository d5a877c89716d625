pub mod solid;

use color_eyre::Result;
pub use solid::SolidSnake;

use crate::arena::models::MapUpdate;
use crate::strategies::solid::brain::Decision;

pub trait Strategy {
    /// # Errors
    ///
    /// Can fail for a wide range of reasons usually due to invalid game states.
    fn get_movement(&mut self, update: &MapUpdate) -> Result<Decision>;
}
