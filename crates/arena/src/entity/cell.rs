//! Common body data and mass-derived quantities.

use super::Color;
use crate::util::clamp_to_world;
use glam::Vec2;

/// Radius grows with the square root of mass.
pub const RADIUS_PER_SQRT_MASS: f32 = 4.6;
/// Speed numerator: `speed = SPEED_SCALE / sqrt(mass)` before clamping.
pub const SPEED_SCALE: f32 = 210.0;
pub const MIN_SPEED: f32 = 24.0;
pub const MAX_SPEED: f32 = 170.0;

/// Interaction radius for a given mass.
#[inline]
pub fn radius_from_mass(mass: f32) -> f32 {
    mass.max(0.0).sqrt() * RADIUS_PER_SQRT_MASS
}

/// Base top speed for a given mass; heavier is slower.
#[inline]
pub fn speed_from_mass(mass: f32) -> f32 {
    let root = mass.max(f32::EPSILON).sqrt();
    (SPEED_SCALE / root).clamp(MIN_SPEED, MAX_SPEED)
}

/// Which side of the arena a mover or pellet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Bot,
}

/// Physical state shared by player cells and bots.
#[derive(Debug, Clone)]
pub struct CellData {
    /// Position in world coordinates.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    pub mass: f32,
    pub color: Color,
}

impl CellData {
    pub fn new(position: Vec2, mass: f32, color: Color) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            color,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        radius_from_mass(self.mass)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        speed_from_mass(self.mass)
    }

    /// Add `direction * acceleration * dt` to the velocity.
    #[inline]
    pub fn accelerate(&mut self, direction: Vec2, acceleration: f32, dt: f32) {
        self.velocity += direction * acceleration * dt;
    }

    /// Apply per-tick drag, then move and clamp against the world walls.
    #[inline]
    pub fn advance(&mut self, friction: f32, dt: f32, world_size: f32) {
        self.velocity *= friction;
        self.position = clamp_to_world(self.position + self.velocity * dt, world_size);
    }

    /// Lose `amount` of mass without going below `floor`.
    #[inline]
    pub fn decay(&mut self, amount: f32, floor: f32) {
        self.mass = (self.mass - amount).max(floor);
    }

    /// Check whether a point lies within this body's reach.
    #[inline]
    pub fn reaches(&self, point: Vec2, extra: f32) -> bool {
        self.position.distance(point) < self.radius() + extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_and_speed() {
        assert!((radius_from_mass(16.0) - 18.4).abs() < 1e-4);
        // 210 / 4 = 52.5, inside the clamp range
        assert!((speed_from_mass(16.0) - 52.5).abs() < 1e-4);
        assert_eq!(speed_from_mass(1.0), MAX_SPEED);
        assert_eq!(speed_from_mass(10_000.0), MIN_SPEED);
    }

    #[test]
    fn test_advance_clamps_to_walls() {
        let mut cell = CellData::new(Vec2::new(5.0, 5590.0), 16.0, Color::default());
        cell.velocity = Vec2::new(-1000.0, 1000.0);
        cell.advance(0.84, 0.034, 5600.0);
        assert_eq!(cell.position, Vec2::new(0.0, 5600.0));
        assert!((cell.velocity.x + 840.0).abs() < 1e-3);
    }

    #[test]
    fn test_decay_respects_floor() {
        let mut cell = CellData::new(Vec2::ZERO, 8.01, Color::default());
        cell.decay(1.0, 8.0);
        assert_eq!(cell.mass, 8.0);
    }
}
