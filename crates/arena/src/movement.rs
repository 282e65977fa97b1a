//! Kinematics for player cells and bots, plus passive mass decay.
//!
//! Every mover integrates `v += dir * accel * dt; v *= friction; p += v * dt`
//! and is clamped to the world square afterwards.

use crate::config::PlayerConfig;
use crate::entity::Player;
use crate::input::InputIntent;
use crate::world::World;

/// Drain or regenerate the boost gauge and return the acceleration factor for this tick.
pub fn update_boost(player: &mut Player, boost_held: bool, dt: f32, config: &PlayerConfig) -> f32 {
    if boost_held && player.boost_energy > config.boost_threshold {
        player.boost_energy = (player.boost_energy - config.boost_drain * dt).clamp(0.0, 1.0);
        config.boost_factor
    } else {
        player.boost_energy = (player.boost_energy + config.boost_regen * dt).clamp(0.0, 1.0);
        1.0
    }
}

/// Accelerate every player cell along the intent direction.
pub fn move_player(world: &mut World, intent: &InputIntent, dt: f32) {
    let speed_multiplier = world.speed_multiplier();
    let size = world.size();
    let config = &world.config.player;
    let boost = update_boost(&mut world.player, intent.boost, dt, config);
    let direction = intent.direction();

    for cell in &mut world.player.cells {
        let data = &mut cell.cell_data;
        let accel = data.speed() * speed_multiplier * boost * config.acceleration;
        data.accelerate(direction, accel, dt);
        data.advance(config.friction, dt, size);
    }
}

/// Steer every bot towards its current target.
pub fn move_bots(world: &mut World, dt: f32) {
    let speed_multiplier = world.speed_multiplier();
    let size = world.size();
    let config = &world.config.bots;

    for bot in &mut world.bots.bots {
        let data = &mut bot.cell_data;
        let direction = (bot.target - data.position).normalize_or_zero();
        let accel = data.speed() * config.speed_factor * speed_multiplier * config.acceleration;
        data.accelerate(direction, accel, dt);
        data.advance(config.friction, dt, size);
    }
}

/// Shrink every mover by the decay rate, never below the mass floor.
pub fn apply_decay(world: &mut World, dt: f32) {
    let amount = world.config.world.decay_rate * dt;
    let floor = world.config.world.min_mass;
    for cell in &mut world.player.cells {
        cell.cell_data.decay(amount, floor);
    }
    for bot in &mut world.bots.bots {
        bot.cell_data.decay(amount, floor);
    }
}
