//! Food pellet.

use super::Color;
use crate::config::FoodConfig;
use crate::util::{random_between, random_position};
use glam::Vec2;
use rand::Rng;

/// A stationary food item. Replaced in place when eaten.
#[derive(Debug, Clone)]
pub struct Food {
    pub position: Vec2,
    pub mass: f32,
    pub color: Color,
}

impl Food {
    pub fn new(position: Vec2, mass: f32, color: Color) -> Self {
        Self {
            position,
            mass,
            color,
        }
    }

    /// Spawn a food item at a random position with a random mass.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &FoodConfig, world_size: f32) -> Self {
        let position = random_position(rng, world_size);
        let mass = random_between(rng, config.min_mass, config.max_mass);
        Self::new(position, mass, Color::random(rng))
    }
}
