//! Single-player cell arena simulation.

pub mod ai;
pub mod collision;
pub mod config;
pub mod driver;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod lifecycle;
pub mod movement;
pub mod progression;
pub mod snapshot;
pub mod spatial;
pub mod split;
pub mod util;
pub mod world;

// Re-export commonly used types
pub use config::Config;
pub use driver::{Command, run_game_loop};
pub use error::ConfigError;
pub use game::{FrameClock, Game, TickReport};
pub use input::{Controls, InputIntent, TickInput};
pub use snapshot::{LeaderboardEntry, WorldSnapshot};
pub use world::World;
