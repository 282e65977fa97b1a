//! Simulation configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Allowed range for the bot population target.
pub const BOT_COUNT_RANGE: (usize, usize) = (5, 120);
/// Allowed range for the difficulty / game-speed scalar.
pub const DIFFICULTY_RANGE: (f32, f32) = (0.85, 2.0);
/// Hard cap on the number of cells a player may own.
pub const MAX_PLAYER_CELLS: usize = 8;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub bots: BotConfig,
    #[serde(default)]
    pub food: FoodConfig,
    #[serde(default)]
    pub eat: EatConfig,
    #[serde(default)]
    pub eject: EjectConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
}

impl Config {
    /// Load configuration from `path`, writing the defaults there if the file is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    /// Clamp out-of-range values instead of rejecting them.
    pub fn sanitized(mut self) -> Self {
        let (min_bots, max_bots) = BOT_COUNT_RANGE;
        let bots = self.bots.count.clamp(min_bots, max_bots);
        if bots != self.bots.count {
            warn!("Bot count {} out of range, clamped to {}", self.bots.count, bots);
            self.bots.count = bots;
        }

        let (min_diff, max_diff) = DIFFICULTY_RANGE;
        let difficulty = if self.bots.difficulty.is_finite() {
            self.bots.difficulty.clamp(min_diff, max_diff)
        } else {
            1.0
        };
        if difficulty != self.bots.difficulty {
            warn!("Difficulty {} out of range, clamped to {}", self.bots.difficulty, difficulty);
            self.bots.difficulty = difficulty;
        }

        let max_cells = self.player.max_cells.clamp(1, MAX_PLAYER_CELLS);
        if max_cells != self.player.max_cells {
            warn!("Player max cells {} out of range, clamped to {}", self.player.max_cells, max_cells);
            self.player.max_cells = max_cells;
        }

        if self.world.size <= 0.0 || !self.world.size.is_finite() {
            warn!("World size {} is invalid, using {}", self.world.size, default_world_size());
            self.world.size = default_world_size();
        }

        let floats = [
            ("session.min_frame_secs", &mut self.session.min_frame_secs, default_min_frame()),
            ("session.max_frame_secs", &mut self.session.max_frame_secs, default_max_frame()),
            ("world.min_mass", &mut self.world.min_mass, default_min_mass()),
            ("world.decay_rate", &mut self.world.decay_rate, default_decay_rate()),
            ("player.start_mass", &mut self.player.start_mass, default_player_start_mass()),
            ("player.friction", &mut self.player.friction, default_player_friction()),
            ("bots.min_start_mass", &mut self.bots.min_start_mass, default_bot_min_mass()),
            ("bots.max_start_mass", &mut self.bots.max_start_mass, default_bot_max_mass()),
            ("bots.friction", &mut self.bots.friction, default_bot_friction()),
            ("eject.friction", &mut self.eject.friction, default_eject_friction()),
        ];
        for (name, value, default) in floats {
            if !value.is_finite() {
                warn!("{} = {} is not finite, using {}", name, value, default);
                *value = default;
            }
        }

        if self.player.start_mass < self.world.min_mass {
            warn!("Player start mass {} below mass floor, raised", self.player.start_mass);
            self.player.start_mass = self.world.min_mass;
        }

        if self.bots.min_start_mass > self.bots.max_start_mass {
            std::mem::swap(&mut self.bots.min_start_mass, &mut self.bots.max_start_mass);
        }
        self.bots.min_start_mass = self.bots.min_start_mass.max(self.world.min_mass);
        self.bots.max_start_mass = self.bots.max_start_mass.max(self.bots.min_start_mass);

        if self.session.min_frame_secs > self.session.max_frame_secs {
            std::mem::swap(&mut self.session.min_frame_secs, &mut self.session.max_frame_secs);
        }
        self.session.event_log_len = self.session.event_log_len.max(1);

        self
    }
}

/// Host loop and presentation-facing settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Frame interval of the headless host in milliseconds.
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
    /// Lower bound for a tick delta in seconds.
    #[serde(default = "default_min_frame")]
    pub min_frame_secs: f32,
    /// Upper bound for a tick delta in seconds.
    #[serde(default = "default_max_frame")]
    pub max_frame_secs: f32,
    /// Session length in seconds (0 = run until interrupted).
    #[serde(default)]
    pub duration_secs: u64,
    /// Fixed random seed (unset = seeded from the OS).
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of entries kept in the event log.
    #[serde(default = "default_event_log_len")]
    pub event_log_len: usize,
    /// Number of entries reported on the leaderboard.
    #[serde(default = "default_leaderboard_len")]
    pub leaderboard_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
            min_frame_secs: default_min_frame(),
            max_frame_secs: default_max_frame(),
            duration_secs: 0,
            seed: None,
            event_log_len: default_event_log_len(),
            leaderboard_len: default_leaderboard_len(),
        }
    }
}

fn default_frame_interval() -> u64 {
    16
}
fn default_min_frame() -> f32 {
    0.001
}
fn default_max_frame() -> f32 {
    0.034
}
fn default_event_log_len() -> usize {
    7
}
fn default_leaderboard_len() -> usize {
    10
}

/// World bounds and global mass rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorldConfig {
    /// Side length of the square world.
    #[serde(default = "default_world_size")]
    pub size: f32,
    /// No live mover ever drops below this mass.
    #[serde(default = "default_min_mass")]
    pub min_mass: f32,
    /// Mass lost per second by every mover.
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: default_world_size(),
            min_mass: default_min_mass(),
            decay_rate: default_decay_rate(),
        }
    }
}

fn default_world_size() -> f32 {
    5600.0
}
fn default_min_mass() -> f32 {
    8.0
}
fn default_decay_rate() -> f32 {
    0.035
}

/// Player movement, boost and split settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_name")]
    pub name: String,
    #[serde(default = "default_player_start_mass")]
    pub start_mass: f32,
    #[serde(default = "default_player_max_cells")]
    pub max_cells: usize,
    #[serde(default = "default_player_min_split")]
    pub min_split_mass: f32,
    /// Seconds between two accepted split actions.
    #[serde(default = "default_player_split_cooldown")]
    pub split_cooldown: f32,
    /// Initial speed of a freshly split cell.
    #[serde(default = "default_player_split_impulse")]
    pub split_impulse: f32,
    /// Seconds before a split cell may merge again.
    #[serde(default = "default_player_merge_cooldown")]
    pub merge_cooldown: f32,
    /// Merge when centres are closer than this fraction of the combined radii.
    #[serde(default = "default_player_merge_distance")]
    pub merge_distance: f32,
    #[serde(default = "default_player_acceleration")]
    pub acceleration: f32,
    /// Velocity multiplier applied every tick.
    #[serde(default = "default_player_friction")]
    pub friction: f32,
    #[serde(default = "default_boost_factor")]
    pub boost_factor: f32,
    #[serde(default = "default_boost_drain")]
    pub boost_drain: f32,
    #[serde(default = "default_boost_regen")]
    pub boost_regen: f32,
    #[serde(default = "default_boost_threshold")]
    pub boost_threshold: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: default_player_name(),
            start_mass: default_player_start_mass(),
            max_cells: default_player_max_cells(),
            min_split_mass: default_player_min_split(),
            split_cooldown: default_player_split_cooldown(),
            split_impulse: default_player_split_impulse(),
            merge_cooldown: default_player_merge_cooldown(),
            merge_distance: default_player_merge_distance(),
            acceleration: default_player_acceleration(),
            friction: default_player_friction(),
            boost_factor: default_boost_factor(),
            boost_drain: default_boost_drain(),
            boost_regen: default_boost_regen(),
            boost_threshold: default_boost_threshold(),
        }
    }
}

fn default_player_name() -> String {
    "You".to_string()
}
fn default_player_start_mass() -> f32 {
    16.0
}
fn default_player_max_cells() -> usize {
    MAX_PLAYER_CELLS
}
fn default_player_min_split() -> f32 {
    24.0
}
fn default_player_split_cooldown() -> f32 {
    0.35
}
fn default_player_split_impulse() -> f32 {
    560.0
}
fn default_player_merge_cooldown() -> f32 {
    4.0
}
fn default_player_merge_distance() -> f32 {
    0.5
}
fn default_player_acceleration() -> f32 {
    4.8
}
fn default_player_friction() -> f32 {
    0.84
}
fn default_boost_factor() -> f32 {
    1.75
}
fn default_boost_drain() -> f32 {
    0.38
}
fn default_boost_regen() -> f32 {
    0.18
}
fn default_boost_threshold() -> f32 {
    0.05
}

/// Bot population and AI tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    /// Target bot population.
    #[serde(default = "default_bot_count")]
    pub count: usize,
    /// Difficulty / game-speed scalar.
    #[serde(default = "default_bot_difficulty")]
    pub difficulty: f32,
    #[serde(default = "default_bot_min_mass")]
    pub min_start_mass: f32,
    #[serde(default = "default_bot_max_mass")]
    pub max_start_mass: f32,
    /// Spawn velocity range (per axis, symmetric).
    #[serde(default = "default_bot_start_velocity")]
    pub start_velocity: f32,
    #[serde(default = "default_bot_acceleration")]
    pub acceleration: f32,
    #[serde(default = "default_bot_speed_factor")]
    pub speed_factor: f32,
    #[serde(default = "default_bot_friction")]
    pub friction: f32,
    /// Fraction of food mass a bot keeps.
    #[serde(default = "default_bot_food_gain")]
    pub food_gain: f32,
    /// Mass ratio above which another mover counts as threat or prey.
    #[serde(default = "default_bot_threat_margin")]
    pub threat_margin: f32,
    /// Flee when a threat is within this many own radii.
    #[serde(default = "default_bot_flee_radius")]
    pub flee_radius: f32,
    /// How far past itself the bot projects its escape point.
    #[serde(default = "default_bot_flee_distance")]
    pub flee_distance: f32,
    /// Hunt player cells within this many own radii.
    #[serde(default = "default_bot_hunt_radius")]
    pub hunt_radius: f32,
    #[serde(default = "default_bot_forage_jitter")]
    pub forage_jitter: f32,
    #[serde(default = "default_bot_min_think")]
    pub min_think_secs: f32,
    #[serde(default = "default_bot_max_think")]
    pub max_think_secs: f32,
    /// Upper bound of the randomized first decision delay.
    #[serde(default = "default_bot_initial_think")]
    pub initial_think_secs: f32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            count: default_bot_count(),
            difficulty: default_bot_difficulty(),
            min_start_mass: default_bot_min_mass(),
            max_start_mass: default_bot_max_mass(),
            start_velocity: default_bot_start_velocity(),
            acceleration: default_bot_acceleration(),
            speed_factor: default_bot_speed_factor(),
            friction: default_bot_friction(),
            food_gain: default_bot_food_gain(),
            threat_margin: default_bot_threat_margin(),
            flee_radius: default_bot_flee_radius(),
            flee_distance: default_bot_flee_distance(),
            hunt_radius: default_bot_hunt_radius(),
            forage_jitter: default_bot_forage_jitter(),
            min_think_secs: default_bot_min_think(),
            max_think_secs: default_bot_max_think(),
            initial_think_secs: default_bot_initial_think(),
        }
    }
}

fn default_bot_count() -> usize {
    28
}
fn default_bot_difficulty() -> f32 {
    1.0
}
fn default_bot_min_mass() -> f32 {
    11.0
}
fn default_bot_max_mass() -> f32 {
    42.0
}
fn default_bot_start_velocity() -> f32 {
    30.0
}
fn default_bot_acceleration() -> f32 {
    5.0
}
fn default_bot_speed_factor() -> f32 {
    0.8
}
fn default_bot_friction() -> f32 {
    0.88
}
fn default_bot_food_gain() -> f32 {
    0.86
}
fn default_bot_threat_margin() -> f32 {
    1.15
}
fn default_bot_flee_radius() -> f32 {
    8.0
}
fn default_bot_flee_distance() -> f32 {
    3.0
}
fn default_bot_hunt_radius() -> f32 {
    14.0
}
fn default_bot_forage_jitter() -> f32 {
    65.0
}
fn default_bot_min_think() -> f32 {
    0.35
}
fn default_bot_max_think() -> f32 {
    1.2
}
fn default_bot_initial_think() -> f32 {
    1.5
}

/// Food pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FoodConfig {
    /// Constant size of the food pool.
    #[serde(default = "default_food_count")]
    pub count: usize,
    #[serde(default = "default_food_min_mass")]
    pub min_mass: f32,
    #[serde(default = "default_food_max_mass")]
    pub max_mass: f32,
    /// Extra reach added to a mover's radius when absorbing food.
    #[serde(default = "default_food_reach")]
    pub reach: f32,
    /// Fraction of food mass a player cell keeps.
    #[serde(default = "default_food_player_gain")]
    pub player_gain: f32,
    /// Experience per food item eaten by a player cell.
    #[serde(default = "default_food_xp")]
    pub xp: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            count: default_food_count(),
            min_mass: default_food_min_mass(),
            max_mass: default_food_max_mass(),
            reach: default_food_reach(),
            player_gain: default_food_player_gain(),
            xp: default_food_xp(),
        }
    }
}

fn default_food_count() -> usize {
    900
}
fn default_food_min_mass() -> f32 {
    0.8
}
fn default_food_max_mass() -> f32 {
    1.4
}
fn default_food_reach() -> f32 {
    2.0
}
fn default_food_player_gain() -> f32 {
    1.0
}
fn default_food_xp() -> f32 {
    1.1
}

/// Entity-vs-entity eating rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EatConfig {
    /// Eater mass must exceed `target * margin` (exclusive).
    #[serde(default = "default_eat_margin")]
    pub margin: f32,
    /// Centre distance must be below `eater_radius * overlap`.
    #[serde(default = "default_eat_overlap")]
    pub overlap: f32,
    /// Fraction of the target's mass gained by the eater.
    #[serde(default = "default_eat_absorb")]
    pub absorb: f32,
    /// Experience per unit of bot mass eaten by a player cell.
    #[serde(default = "default_eat_xp_per_mass")]
    pub xp_per_mass: f32,
}

impl Default for EatConfig {
    fn default() -> Self {
        Self {
            margin: default_eat_margin(),
            overlap: default_eat_overlap(),
            absorb: default_eat_absorb(),
            xp_per_mass: default_eat_xp_per_mass(),
        }
    }
}

fn default_eat_margin() -> f32 {
    1.08
}
fn default_eat_overlap() -> f32 {
    0.72
}
fn default_eat_absorb() -> f32 {
    0.82
}
fn default_eat_xp_per_mass() -> f32 {
    0.7
}

/// Eject-mass action and pellet behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EjectConfig {
    /// Cells must be above this mass to eject.
    #[serde(default = "default_eject_min_cell_mass")]
    pub min_cell_mass: f32,
    #[serde(default = "default_eject_mass_loss")]
    pub mass_loss: f32,
    #[serde(default = "default_eject_pellet_mass")]
    pub pellet_mass: f32,
    #[serde(default = "default_eject_speed")]
    pub speed: f32,
    #[serde(default = "default_eject_cooldown")]
    pub cooldown: f32,
    #[serde(default = "default_eject_lifetime")]
    pub lifetime: f32,
    #[serde(default = "default_eject_friction")]
    pub friction: f32,
    /// Seconds during which movers of the ejecting faction cannot absorb the pellet.
    #[serde(default = "default_eject_own_grace")]
    pub own_grace: f32,
}

impl Default for EjectConfig {
    fn default() -> Self {
        Self {
            min_cell_mass: default_eject_min_cell_mass(),
            mass_loss: default_eject_mass_loss(),
            pellet_mass: default_eject_pellet_mass(),
            speed: default_eject_speed(),
            cooldown: default_eject_cooldown(),
            lifetime: default_eject_lifetime(),
            friction: default_eject_friction(),
            own_grace: default_eject_own_grace(),
        }
    }
}

fn default_eject_min_cell_mass() -> f32 {
    20.0
}
fn default_eject_mass_loss() -> f32 {
    2.0
}
fn default_eject_pellet_mass() -> f32 {
    1.8
}
fn default_eject_speed() -> f32 {
    460.0
}
fn default_eject_cooldown() -> f32 {
    0.08
}
fn default_eject_lifetime() -> f32 {
    6.0
}
fn default_eject_friction() -> f32 {
    0.92
}
fn default_eject_own_grace() -> f32 {
    0.25
}

/// Experience curve and level rewards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_first_requirement")]
    pub first_requirement: u32,
    #[serde(default = "default_requirement_growth")]
    pub growth: f32,
    #[serde(default = "default_requirement_bonus")]
    pub flat_bonus: f32,
    /// Mass granted per level, spread evenly over the player's cells.
    #[serde(default = "default_level_mass_bonus")]
    pub mass_bonus: f32,
    /// Game-speed increase per level above 1.
    #[serde(default = "default_level_speed_step")]
    pub speed_step: f32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            first_requirement: default_first_requirement(),
            growth: default_requirement_growth(),
            flat_bonus: default_requirement_bonus(),
            mass_bonus: default_level_mass_bonus(),
            speed_step: default_level_speed_step(),
        }
    }
}

fn default_first_requirement() -> u32 {
    60
}
fn default_requirement_growth() -> f32 {
    1.24
}
fn default_requirement_bonus() -> f32 {
    18.0
}
fn default_level_mass_bonus() -> f32 {
    2.2
}
fn default_level_speed_step() -> f32 {
    0.035
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_clamps_bots_and_difficulty() {
        let mut config = Config::default();
        config.bots.count = 500;
        config.bots.difficulty = 9.0;
        let config = config.sanitized();
        assert_eq!(config.bots.count, 120);
        assert_eq!(config.bots.difficulty, 2.0);

        let mut config = Config::default();
        config.bots.count = 0;
        config.bots.difficulty = 0.1;
        let config = config.sanitized();
        assert_eq!(config.bots.count, 5);
        assert_eq!(config.bots.difficulty, 0.85);
    }

    #[test]
    fn test_sanitize_rejects_nan_difficulty() {
        let mut config = Config::default();
        config.bots.difficulty = f32::NAN;
        assert_eq!(config.sanitized().bots.difficulty, 1.0);
    }

    #[test]
    fn test_sanitize_rejects_nan_frame_bounds() {
        let text = "[session]\nmin_frame_secs = nan\nmax_frame_secs = inf\n\
                    [world]\nmin_mass = nan\n\
                    [bots]\nfriction = -inf\n";
        let config: Config = toml::from_str(text).unwrap();
        let config = config.sanitized();
        assert_eq!(config.session.min_frame_secs, default_min_frame());
        assert_eq!(config.session.max_frame_secs, default_max_frame());
        assert_eq!(config.world.min_mass, default_min_mass());
        assert_eq!(config.bots.friction, default_bot_friction());
        assert_eq!(config.player.start_mass, default_player_start_mass());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[bots]\ncount = 12\n").unwrap();
        assert_eq!(config.bots.count, 12);
        assert_eq!(config.food.count, 900);
        assert_eq!(config.player.max_cells, 8);
        assert_eq!(config.eat.margin, 1.08);
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.world.size, 5600.0);
        assert_eq!(parsed.session.seed, None);
    }
}
