//! World (re)initialization, bot replenishment and player respawn.

use crate::entity::Player;
use crate::progression::Progression;
use crate::world::World;
use glam::Vec2;
use tracing::{debug, info};

pub const WELCOME_MESSAGE: &str = "Welcome to the arena!";
pub const GOAL_MESSAGE: &str = "Goal: survive and rule the top 10.";
pub const DEATH_MESSAGE: &str = "You were absorbed... try again!";
pub const START_MESSAGE: &str = "Good luck! Use boost sparingly.";

/// Reset every collection to a freshly seeded state.
///
/// The food pool is refilled to its configured size, bots are spawned up to
/// the configured population and the player restarts as a single cell at the
/// centre of the world with progression back at level 1.
pub fn init_world(world: &mut World) {
    world.populate_food();

    world.bots.clear();
    let target = world.config.bots.count;
    let size = world.size();
    world.bots.replenish(target, &mut world.rng, &world.config.bots, size);

    world.player = Player::new(
        world.config.player.name.clone(),
        Vec2::splat(size / 2.0),
        world.config.player.start_mass,
    );
    world.progression = Progression::new(&world.config.progression);
    world.pellets.clear();
    world.particles.clear();
    world.clock = 0.0;

    world.events.clear();
    world.events.push(GOAL_MESSAGE);
    world.events.push(WELCOME_MESSAGE);

    debug!(
        "World initialized: {} food, {} bots, size {}",
        world.foods.len(),
        world.bots.len(),
        size
    );
}

/// Spawn replacements so the bot population is back at its target.
pub fn replenish_bots(world: &mut World) -> usize {
    let target = world.config.bots.count;
    let size = world.size();
    let spawned = world
        .bots
        .replenish(target, &mut world.rng, &world.config.bots, size);
    if spawned > 0 {
        debug!("Replenished {} bots", spawned);
    }
    spawned
}

/// Mark the start of a play session. A respawn after death is not a new
/// session and only gets [`DEATH_MESSAGE`].
pub fn start_session(world: &mut World) {
    world.events.push(START_MESSAGE);
}

/// Handle the loss of the player's last cell.
pub fn respawn_player(world: &mut World) {
    world.deaths += 1;
    info!(
        "Player absorbed at level {} after {:.1}s (death #{})",
        world.progression.level, world.clock, world.deaths
    );
    init_world(world);
    world.events.push(DEATH_MESSAGE);
}
