//! Game entities.
//!
//! Player cells and bots share [`CellData`]; food, pellets and particles
//! are lighter-weight records.

mod cell;
mod color;
mod food;
mod mover;
mod particle;
mod pellet;
mod player_cell;

pub use cell::{CellData, Faction, radius_from_mass, speed_from_mass};
pub use color::Color;
pub use food::Food;
pub use mover::{Mover, MoverKey};
pub use particle::{EAT_BURST, FOOD_BURST, Particle};
pub use pellet::Pellet;
pub use player_cell::{PLAYER_COLOR, Player, PlayerCell};
