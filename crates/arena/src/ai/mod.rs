//! Bot AI.
//!
//! Each bot is a reflex agent: on a randomized cadence it re-picks a target
//! (flee, hunt, forage or wander) and steers towards it in between.

pub mod bot_manager;
pub mod bot_player;

pub use bot_manager::BotManager;
pub use bot_player::{Behavior, Bot, Sighting, ThinkContext};
