//! Cosmetic particles emitted on consumption events.

use super::Color;
use crate::util::random_between;
use glam::Vec2;
use rand::Rng;

/// Particles emitted when a player cell eats food.
pub const FOOD_BURST: usize = 3;
/// Particles emitted when a mover is eaten.
pub const EAT_BURST: usize = 22;

const BURST_SPEED: f32 = 140.0;
const PARTICLE_DAMPING: f32 = 0.95;

/// Visual-only debris. Never participates in gameplay.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining life in seconds.
    pub life: f32,
    pub color: Color,
    pub size: f32,
}

impl Particle {
    /// Push `count` particles scattering from `position`.
    pub fn emit<R: Rng + ?Sized>(rng: &mut R, out: &mut Vec<Particle>, position: Vec2, color: Color, count: usize) {
        out.reserve(count);
        for _ in 0..count {
            out.push(Particle {
                position,
                velocity: Vec2::new(
                    random_between(rng, -BURST_SPEED, BURST_SPEED),
                    random_between(rng, -BURST_SPEED, BURST_SPEED),
                ),
                life: random_between(rng, 0.35, 0.75),
                color,
                size: random_between(rng, 2.0, 5.0),
            });
        }
    }

    /// Advance one tick. Returns false once the particle has faded.
    pub fn update(&mut self, dt: f32) -> bool {
        self.life -= dt;
        self.position += self.velocity * dt;
        self.velocity *= PARTICLE_DAMPING;
        self.life > 0.0
    }
}
