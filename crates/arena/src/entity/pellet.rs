//! Ejected mass pellet.

use super::{Color, Faction};
use crate::util::clamp_to_world;
use glam::Vec2;

/// Mass ejected by a player cell. Drifts with decaying velocity until absorbed or expired.
#[derive(Debug, Clone)]
pub struct Pellet {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    /// Faction of the cell that ejected this pellet.
    pub owner: Faction,
    /// Remaining lifetime in seconds.
    pub life: f32,
    /// Seconds since the pellet was ejected.
    pub age: f32,
    pub color: Color,
}

impl Pellet {
    pub fn new(position: Vec2, velocity: Vec2, mass: f32, owner: Faction, life: f32, color: Color) -> Self {
        Self {
            position,
            velocity,
            mass,
            owner,
            life,
            age: 0.0,
            color,
        }
    }

    /// Advance one tick. Returns false once the lifetime has run out.
    pub fn update(&mut self, dt: f32, friction: f32, world_size: f32) -> bool {
        self.life -= dt;
        self.age += dt;
        self.position = clamp_to_world(self.position + self.velocity * dt, world_size);
        self.velocity *= friction;
        self.life > 0.0
    }

    /// Own-faction movers must wait out the grace period before absorbing.
    #[inline]
    pub fn absorbable_by(&self, faction: Faction, own_grace: f32) -> bool {
        faction != self.owner || self.age >= own_grace
    }
}
