//! The per-frame simulation pipeline.

use crate::collision;
use crate::config::Config;
use crate::input::TickInput;
use crate::lifecycle;
use crate::movement;
use crate::snapshot::WorldSnapshot;
use crate::split;
use crate::world::World;
use std::time::Instant;
use tracing::debug;

/// Log per-phase timings every this many ticks.
const METRICS_INTERVAL: u64 = 600;

/// Clamp a raw frame delta into the simulation's accepted range.
/// Non-finite input collapses to the minimum. Never panics, even on
/// inverted or NaN bounds.
#[inline]
pub fn clamp_delta(dt: f32, min: f32, max: f32) -> f32 {
    if dt.is_finite() { dt.max(min).min(max) } else { min }
}

/// Turns wall-clock instants into clamped simulation deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    min: f32,
    max: f32,
}

impl FrameClock {
    pub fn new(min: f32, max: f32) -> Self {
        Self { last: None, min, max }
    }

    /// Seconds since the previous call, clamped. The first call yields the minimum.
    pub fn delta(&mut self, now: Instant) -> f32 {
        let raw = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => self.min,
        };
        self.last = Some(now);
        clamp_delta(raw, self.min, self.max)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Delta actually simulated after clamping.
    pub dt: f32,
    pub food_eaten: usize,
    pub pellets_absorbed: usize,
    pub bots_eaten: usize,
    pub player_cells_lost: usize,
    pub cells_split: usize,
    pub pellets_ejected: usize,
    pub cells_merged: usize,
    pub bots_spawned: usize,
    pub levels_gained: u32,
    pub player_died: bool,
}

/// Single-player game session.
#[derive(Debug)]
pub struct Game {
    world: World,
    pub tick_count: u64,
}

impl Game {
    pub fn new(config: Config) -> Self {
        Self::from_world(World::new(config))
    }

    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::from_world(World::with_seed(config, seed))
    }

    pub fn from_world(mut world: World) -> Self {
        lifecycle::start_session(&mut world);
        Self { world, tick_count: 0 }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.world)
    }

    /// Advance the simulation by one frame.
    ///
    /// Order: bot decisions, movement and decay, food and pellet contact,
    /// eating, split/eject/merge, bot replenishment, particles. A player
    /// death resets the world and ends the tick early.
    pub fn tick(&mut self, dt: f32, input: &TickInput) -> TickReport {
        let tick_start = Instant::now();
        let session = &self.world.config.session;
        let dt = clamp_delta(dt, session.min_frame_secs, session.max_frame_secs);
        let world = &mut self.world;
        let start_level = world.progression.level;
        let mut report = TickReport { dt, ..TickReport::default() };

        self.tick_count += 1;
        world.clock += dt;
        world.player.tick_cooldowns(dt);

        // Bot decisions see the start-of-tick positions of every mover
        let ai_start = Instant::now();
        let speed_multiplier = world.speed_multiplier();
        let size = world.size();
        world.bots.update(
            dt,
            &world.player.cells,
            &world.foods,
            &world.config.bots,
            size,
            speed_multiplier,
            &mut world.rng,
        );
        let ai_time = ai_start.elapsed();

        let movement_start = Instant::now();
        movement::move_player(world, &input.intent, dt);
        movement::move_bots(world, dt);
        movement::apply_decay(world, dt);
        let movement_time = movement_start.elapsed();

        let collision_start = Instant::now();
        report.food_eaten = collision::absorb_food(world);
        report.pellets_absorbed = collision::update_pellets(world, dt);
        let eat = collision::resolve_eating(world);
        report.bots_eaten = eat.bots_eaten;
        report.player_cells_lost = eat.player_cells_lost;
        if eat.player_died {
            report.player_died = true;
            return report;
        }
        let collision_time = collision_start.elapsed();

        let direction = input.intent.direction();
        if input.split {
            report.cells_split = split::split(world, direction);
        }
        if input.eject {
            report.pellets_ejected = split::eject(world, direction);
        }
        report.cells_merged = split::merge_cells(world);

        report.bots_spawned = lifecycle::replenish_bots(world);
        world.particles.retain_mut(|p| p.update(dt));
        report.levels_gained = world.progression.level - start_level;

        if self.tick_count % METRICS_INTERVAL == 0 {
            debug!(
                "Tick #{}: {:.2}ms total | ai={:.2}ms move={:.2}ms collision={:.2}ms | {} bots, {} cells, {} pellets, {} particles",
                self.tick_count,
                tick_start.elapsed().as_secs_f64() * 1000.0,
                ai_time.as_secs_f64() * 1000.0,
                movement_time.as_secs_f64() * 1000.0,
                collision_time.as_secs_f64() * 1000.0,
                world.bots.len(),
                world.player.cells.len(),
                world.pellets.len(),
                world.particles.len()
            );
        }

        report
    }
}
