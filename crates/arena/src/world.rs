//! World state.
//!
//! A single owned aggregate holding every entity collection, the progression
//! state and the injected random source. Subsystems take `&mut World`.

use crate::ai::BotManager;
use crate::config::Config;
use crate::entity::{CellData, Color, Food, Mover, MoverKey, Particle, Pellet, Player};
use crate::events::EventLog;
use crate::lifecycle;
use crate::progression::Progression;
use crate::spatial::{GridItem, SpatialGrid};
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

/// Buckets per side of the food index.
const FOOD_GRID_SIZE: usize = 32;

/// The game world containing all entities.
#[derive(Debug)]
pub struct World {
    /// Sanitized configuration, fixed for the session.
    pub config: Config,
    /// Food pool. Its length never changes after initialization.
    pub foods: Vec<Food>,
    /// Spatial index over food slots (id = slot index).
    pub food_index: SpatialGrid,
    pub pellets: Vec<Pellet>,
    pub bots: BotManager,
    pub player: Player,
    pub particles: Vec<Particle>,
    pub progression: Progression,
    pub events: EventLog,
    /// Simulated seconds since the last (re)initialization.
    pub clock: f32,
    /// Number of player deaths this session.
    pub deaths: u32,
    /// Random source for spawning, AI and cosmetics.
    pub rng: StdRng,
}

impl World {
    /// Create a world seeded from the OS.
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a world with a deterministic random source.
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: Config, rng: StdRng) -> Self {
        let config = config.sanitized();
        let size = config.world.size;
        let mut world = Self {
            food_index: SpatialGrid::new(size, FOOD_GRID_SIZE),
            foods: Vec::with_capacity(config.food.count),
            pellets: Vec::new(),
            bots: BotManager::new(),
            player: Player::new(config.player.name.clone(), Vec2::splat(size / 2.0), config.player.start_mass),
            particles: Vec::new(),
            progression: Progression::new(&config.progression),
            events: EventLog::new(config.session.event_log_len),
            clock: 0.0,
            deaths: 0,
            rng,
            config,
        };
        lifecycle::init_world(&mut world);
        world
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.config.world.size
    }

    /// Current game-speed multiplier (difficulty raised by level).
    #[inline]
    pub fn speed_multiplier(&self) -> f32 {
        self.progression
            .speed_multiplier(self.config.bots.difficulty, &self.config.progression)
    }

    /// All movers: player cells first, then bots, each in collection order.
    pub fn movers(&self) -> impl Iterator<Item = (MoverKey, Mover<'_>)> {
        let cells = self
            .player
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| (MoverKey::Player(i), Mover::Player(c)));
        let bots = self
            .bots
            .bots
            .iter()
            .enumerate()
            .map(|(i, b)| (MoverKey::Bot(i), Mover::Bot(b)));
        cells.chain(bots)
    }

    pub fn mover_data_mut(&mut self, key: MoverKey) -> Option<&mut CellData> {
        match key {
            MoverKey::Player(i) => self.player.cells.get_mut(i).map(|c| &mut c.cell_data),
            MoverKey::Bot(i) => self.bots.bots.get_mut(i).map(|b| &mut b.cell_data),
        }
    }

    /// Fill the food pool from scratch and rebuild its index.
    pub fn populate_food(&mut self) {
        let size = self.size();
        self.foods.clear();
        self.food_index.clear();
        for slot in 0..self.config.food.count {
            let food = Food::random(&mut self.rng, &self.config.food, size);
            self.food_index.insert(GridItem::new(slot as u32, food.position, 0.0));
            self.foods.push(food);
        }
    }

    /// Replace the food in `slot` with a freshly generated one.
    pub fn respawn_food(&mut self, slot: usize) {
        let size = self.size();
        if let Some(food) = self.foods.get_mut(slot) {
            *food = Food::random(&mut self.rng, &self.config.food, size);
            self.food_index.update(slot as u32, food.position, 0.0);
        }
    }

    /// Food slots whose item lies strictly within `reach` of `center`.
    pub fn food_within(&mut self, center: Vec2, reach: f32) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .food_index
            .find_in_radius(center, reach)
            .into_iter()
            .map(|id| id as usize)
            .filter(|&slot| {
                self.foods
                    .get(slot)
                    .is_some_and(|f| f.position.distance(center) < reach)
            })
            .collect();
        slots.sort_unstable();
        slots
    }

    pub fn emit_particles(&mut self, position: Vec2, color: Color, count: usize) {
        Particle::emit(&mut self.rng, &mut self.particles, position, color, count);
    }

    /// Award experience to the player, applying any level-up rewards.
    /// Returns the number of levels gained.
    pub fn award_xp(&mut self, amount: f32, reason: Option<String>) -> u32 {
        let start_level = self.progression.level;
        let levels = self.progression.gain(amount, &self.config.progression);
        let bonus = self.config.progression.mass_bonus;
        for level in start_level + 1..=start_level + levels {
            self.player.grant_mass(bonus);
            info!("Player reached level {}", level);
            self.events
                .push(format!("Level {level} reached! +{bonus:.1} bonus mass."));
        }
        if let Some(reason) = reason {
            self.events.push(reason);
        }
        levels
    }
}
