use crate::config::BotConfig;
use crate::entity::{CellData, Color, Food, MoverKey};
use crate::util::{clamp_to_world, nearest, random_between, random_position};
use glam::Vec2;
use rand::Rng;

/// Bot names to use.
const BOT_NAMES: &[&str] = &[
    "Nova", "Kraken", "Pixel", "Nebula", "Turbo", "Yuzu",
    "Flash", "Vortex", "Basilisk", "Cerberus", "Sapphire", "Panther",
];

/// What a bot decided to do at its last re-evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    Flee,
    Hunt,
    Forage,
    #[default]
    Wander,
}

/// Position and mass of a mover as seen by the AI at the start of a tick.
#[derive(Debug, Clone, Copy)]
pub struct Sighting {
    pub key: MoverKey,
    pub position: Vec2,
    pub mass: f32,
}

/// Everything a bot may look at while deciding.
#[derive(Debug, Clone, Copy)]
pub struct ThinkContext<'a> {
    pub movers: &'a [Sighting],
    pub foods: &'a [Food],
    pub config: &'a BotConfig,
    pub world_size: f32,
    /// Game-speed multiplier; higher values shorten the think interval.
    pub speed_multiplier: f32,
}

/// A bot controlled by AI.
#[derive(Debug, Clone)]
pub struct Bot {
    /// Stable, never reused id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Cell data (public for direct access).
    pub cell_data: CellData,
    /// Seconds until the next re-evaluation.
    pub behavior_timer: f32,
    /// Point the bot currently steers towards.
    pub target: Vec2,
    /// Last decision taken.
    pub behavior: Behavior,
}

impl Bot {
    /// Create a bot with a randomized body and name suffixed by `sequence`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, id: u32, sequence: u32, config: &BotConfig, world_size: f32) -> Self {
        let name = format!("{}-{}", BOT_NAMES[sequence as usize % BOT_NAMES.len()], sequence + 1);
        let tone = random_between(rng, 0.0, 360.0);
        let mass = random_between(rng, config.min_start_mass, config.max_start_mass);
        let mut cell_data = CellData::new(random_position(rng, world_size), mass, Color::random_near(rng, tone));
        cell_data.velocity = Vec2::new(
            random_between(rng, -config.start_velocity, config.start_velocity),
            random_between(rng, -config.start_velocity, config.start_velocity),
        );

        Self {
            id,
            name,
            cell_data,
            behavior_timer: random_between(rng, 0.0, config.initial_think_secs),
            target: random_position(rng, world_size),
            behavior: Behavior::Wander,
        }
    }

    /// Count down the think timer and re-decide when it elapses.
    /// Returns true if a new decision was taken.
    pub fn update<R: Rng + ?Sized>(&mut self, key: MoverKey, dt: f32, ctx: &ThinkContext<'_>, rng: &mut R) -> bool {
        self.behavior_timer -= dt;
        if self.behavior_timer > 0.0 {
            return false;
        }
        let cadence = ctx.speed_multiplier.max(f32::EPSILON);
        self.behavior_timer = random_between(rng, ctx.config.min_think_secs, ctx.config.max_think_secs) / cadence;
        self.decide(key, ctx, rng);
        true
    }

    /// Pick a new target: flee, else hunt, else forage, else wander.
    pub fn decide<R: Rng + ?Sized>(&mut self, key: MoverKey, ctx: &ThinkContext<'_>, rng: &mut R) {
        let config = ctx.config;
        let my_pos = self.cell_data.position;
        let my_mass = self.cell_data.mass;
        let my_radius = self.cell_data.radius();

        let threat = closest(my_pos, ctx.movers.iter().filter(|m| {
            m.key != key && m.mass > my_mass * config.threat_margin
        }));
        if let Some((threat, dist)) = threat {
            if dist < my_radius * config.flee_radius {
                let away = my_pos - (threat.position - my_pos) * config.flee_distance;
                self.target = clamp_to_world(away, ctx.world_size);
                self.behavior = Behavior::Flee;
                return;
            }
        }

        let prey = closest(my_pos, ctx.movers.iter().filter(|m| {
            matches!(m.key, MoverKey::Player(_)) && my_mass > m.mass * config.threat_margin
        }));
        if let Some((prey, dist)) = prey {
            if dist < my_radius * config.hunt_radius {
                self.target = prey.position;
                self.behavior = Behavior::Hunt;
                return;
            }
        }

        if let Some((idx, _)) = nearest(my_pos, ctx.foods.iter().map(|f| f.position)) {
            let jitter = Vec2::new(
                random_between(rng, -config.forage_jitter, config.forage_jitter),
                random_between(rng, -config.forage_jitter, config.forage_jitter),
            );
            self.target = ctx.foods[idx].position + jitter;
            self.behavior = Behavior::Forage;
            return;
        }

        self.target = random_position(rng, ctx.world_size);
        self.behavior = Behavior::Wander;
    }
}

/// Closest sighting and its distance.
fn closest<'a, I>(from: Vec2, sightings: I) -> Option<(&'a Sighting, f32)>
where
    I: Iterator<Item = &'a Sighting>,
{
    sightings
        .map(|s| (s, s.position.distance(from)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bot_at(position: Vec2, mass: f32) -> Bot {
        let mut rng = StdRng::seed_from_u64(3);
        let mut bot = Bot::new(&mut rng, 1, 0, &BotConfig::default(), 5600.0);
        bot.cell_data.position = position;
        bot.cell_data.mass = mass;
        bot
    }

    fn ctx<'a>(movers: &'a [Sighting], foods: &'a [Food], config: &'a BotConfig) -> ThinkContext<'a> {
        ThinkContext {
            movers,
            foods,
            config,
            world_size: 5600.0,
            speed_multiplier: 1.0,
        }
    }

    #[test]
    fn test_bot_name_and_mass_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = BotConfig::default();
        let bot = Bot::new(&mut rng, 42, 13, &config, 5600.0);
        assert_eq!(bot.name, "Kraken-14");
        assert!((11.0..42.0).contains(&bot.cell_data.mass));
        assert!(bot.behavior_timer < 1.5);
    }

    #[test]
    fn test_flee_mirrors_away_from_threat() {
        let config = BotConfig::default();
        let mut bot = bot_at(Vec2::new(1000.0, 1000.0), 20.0);
        let movers = [
            Sighting { key: MoverKey::Bot(0), position: Vec2::new(1000.0, 1000.0), mass: 20.0 },
            Sighting { key: MoverKey::Player(0), position: Vec2::new(1050.0, 1000.0), mass: 40.0 },
        ];
        let mut rng = StdRng::seed_from_u64(4);
        bot.decide(MoverKey::Bot(0), &ctx(&movers, &[], &config), &mut rng);
        assert_eq!(bot.behavior, Behavior::Flee);
        assert_eq!(bot.target, Vec2::new(850.0, 1000.0));
    }

    #[test]
    fn test_threat_outside_radius_is_ignored() {
        let config = BotConfig::default();
        let mut bot = bot_at(Vec2::new(1000.0, 1000.0), 20.0);
        // flee radius = 4.6 * sqrt(20) * 8 ≈ 164.6
        let movers = [Sighting { key: MoverKey::Bot(1), position: Vec2::new(1200.0, 1000.0), mass: 80.0 }];
        let mut rng = StdRng::seed_from_u64(4);
        bot.decide(MoverKey::Bot(0), &ctx(&movers, &[], &config), &mut rng);
        assert_eq!(bot.behavior, Behavior::Wander);
    }

    #[test]
    fn test_hunts_smaller_player_cell() {
        let config = BotConfig::default();
        let mut bot = bot_at(Vec2::new(1000.0, 1000.0), 40.0);
        let movers = [
            Sighting { key: MoverKey::Player(0), position: Vec2::new(1200.0, 1000.0), mass: 16.0 },
            Sighting { key: MoverKey::Bot(3), position: Vec2::new(1010.0, 1000.0), mass: 10.0 },
        ];
        let foods = [Food::new(Vec2::new(1001.0, 1000.0), 1.0, Color::default())];
        let mut rng = StdRng::seed_from_u64(4);
        bot.decide(MoverKey::Bot(0), &ctx(&movers, &foods, &config), &mut rng);
        assert_eq!(bot.behavior, Behavior::Hunt);
        assert_eq!(bot.target, Vec2::new(1200.0, 1000.0));
    }

    #[test]
    fn test_forages_nearest_food_with_jitter() {
        let config = BotConfig::default();
        let mut bot = bot_at(Vec2::new(1000.0, 1000.0), 20.0);
        let foods = [
            Food::new(Vec2::new(3000.0, 3000.0), 1.0, Color::default()),
            Food::new(Vec2::new(1100.0, 1000.0), 1.0, Color::default()),
        ];
        let mut rng = StdRng::seed_from_u64(4);
        bot.decide(MoverKey::Bot(0), &ctx(&[], &foods, &config), &mut rng);
        assert_eq!(bot.behavior, Behavior::Forage);
        assert!((bot.target - Vec2::new(1100.0, 1000.0)).abs().max_element() <= 65.0);
    }

    #[test]
    fn test_think_interval_scales_with_speed() {
        let config = BotConfig::default();
        let mut bot = bot_at(Vec2::new(1000.0, 1000.0), 20.0);
        bot.behavior_timer = 0.0;
        let mut context = ctx(&[], &[], &config);
        context.speed_multiplier = 2.0;
        let mut rng = StdRng::seed_from_u64(5);
        assert!(bot.update(MoverKey::Bot(0), 0.016, &context, &mut rng));
        assert!(bot.behavior_timer >= 0.35 / 2.0 && bot.behavior_timer < 1.2 / 2.0);
        assert!(!bot.update(MoverKey::Bot(0), 0.016, &context, &mut rng));
    }
}
