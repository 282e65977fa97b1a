//! Collision detection and resolution.
//!
//! This module handles every contact the simulation cares about:
//! - Food absorption by player cells and bots
//! - Ejected pellet drift, expiry and absorption
//! - Eating between movers (player cells and bots)
//!
//! Player cells never collide rigidly with each other; overlapping own
//! cells are only ever merged by the split module.

use crate::entity::{Color, EAT_BURST, FOOD_BURST, MoverKey, radius_from_mass};
use crate::lifecycle;
use crate::world::World;
use fixedbitset::FixedBitSet;
use glam::Vec2;
use tracing::debug;

/// Strict size-advantage test: equal or near-equal masses never eat.
#[inline]
pub fn can_eat(eater_mass: f32, target_mass: f32, margin: f32) -> bool {
    eater_mass > target_mass * margin
}

/// The target centre must sit well inside the eater.
#[inline]
pub fn is_engulfed(eater_pos: Vec2, eater_mass: f32, target_pos: Vec2, overlap: f32) -> bool {
    eater_pos.distance(target_pos) < radius_from_mass(eater_mass) * overlap
}

/// Outcome of the eating pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EatReport {
    pub bots_eaten: usize,
    pub player_cells_lost: usize,
    /// The player lost its last cell; the world has already been reset.
    pub player_died: bool,
}

/// Absorb food touched by any mover. Eaten slots are refilled in place.
/// Returns the number of food items eaten.
pub fn absorb_food(world: &mut World) -> usize {
    let reach = world.config.food.reach;
    let player_gain = world.config.food.player_gain;
    let bot_gain = world.config.bots.food_gain;
    let xp = world.config.food.xp;
    let mut eaten = 0;

    for i in 0..world.player.cells.len() {
        let (position, radius) = {
            let data = &world.player.cells[i].cell_data;
            (data.position, data.radius())
        };
        for slot in world.food_within(position, radius + reach) {
            let (food_pos, food_mass, food_color) = {
                let food = &world.foods[slot];
                (food.position, food.mass, food.color)
            };
            if let Some(cell) = world.player.cells.get_mut(i) {
                cell.cell_data.mass += food_mass * player_gain;
            }
            world.respawn_food(slot);
            world.award_xp(xp, None);
            world.emit_particles(food_pos, food_color, FOOD_BURST);
            eaten += 1;
        }
    }

    for i in 0..world.bots.len() {
        let (position, radius) = {
            let data = &world.bots.bots[i].cell_data;
            (data.position, data.radius())
        };
        for slot in world.food_within(position, radius + reach) {
            let food_mass = world.foods[slot].mass;
            world.bots.bots[i].cell_data.mass += food_mass * bot_gain;
            world.respawn_food(slot);
            eaten += 1;
        }
    }

    eaten
}

/// Advance pellets, drop expired ones and let movers absorb the rest.
/// Bots are checked before player cells; the first qualifying mover wins.
/// Returns the number of pellets absorbed.
pub fn update_pellets(world: &mut World, dt: f32) -> usize {
    let eject = world.config.eject.clone();
    let reach = world.config.food.reach;
    let size = world.size();

    world
        .pellets
        .retain_mut(|pellet| pellet.update(dt, eject.friction, size));

    let pellets = std::mem::take(&mut world.pellets);
    let mut kept = Vec::with_capacity(pellets.len());
    let mut absorbed = 0;

    for pellet in pellets {
        let absorber = world
            .bots
            .bots
            .iter()
            .enumerate()
            .map(|(i, b)| (MoverKey::Bot(i), &b.cell_data))
            .chain(
                world
                    .player
                    .cells
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (MoverKey::Player(i), &c.cell_data)),
            )
            .find(|(key, data)| {
                pellet.absorbable_by(key.faction(), eject.own_grace) && data.reaches(pellet.position, reach)
            })
            .map(|(key, _)| key);

        match absorber.and_then(|key| world.mover_data_mut(key)) {
            Some(data) => {
                data.mass += pellet.mass;
                absorbed += 1;
            }
            None => kept.push(pellet),
        }
    }

    world.pellets = kept;
    absorbed
}

#[derive(Debug, Clone, Copy)]
struct Contender {
    key: MoverKey,
    position: Vec2,
    mass: f32,
    color: Color,
}

/// Resolve eating between all movers.
///
/// Eaters are visited in roster order (player cells, then bots) and each
/// scans every other mover. Masses change as the pass progresses and an
/// eaten mover can neither eat nor be eaten again. If the player loses its
/// last cell the pass stops and the world is reset.
pub fn resolve_eating(world: &mut World) -> EatReport {
    let eat = world.config.eat.clone();
    let mut roster: Vec<Contender> = world
        .movers()
        .map(|(key, mover)| Contender {
            key,
            position: mover.position(),
            mass: mover.mass(),
            color: mover.data().color,
        })
        .collect();

    let mut eaten = FixedBitSet::with_capacity(roster.len());
    let mut player_alive = world.player.cells.len();
    let mut report = EatReport::default();
    let mut awards: Vec<(f32, String)> = Vec::new();

    for i in 0..roster.len() {
        if eaten.contains(i) {
            continue;
        }
        for j in 0..roster.len() {
            if i == j || eaten.contains(j) {
                continue;
            }
            let eater = roster[i];
            let target = roster[j];
            if matches!((eater.key, target.key), (MoverKey::Player(_), MoverKey::Player(_))) {
                continue;
            }
            if !can_eat(eater.mass, target.mass, eat.margin)
                || !is_engulfed(eater.position, eater.mass, target.position, eat.overlap)
            {
                continue;
            }

            roster[i].mass += target.mass * eat.absorb;
            eaten.insert(j);
            world.emit_particles(target.position, target.color, EAT_BURST);

            match (eater.key, target.key) {
                (MoverKey::Player(_), MoverKey::Bot(b)) => {
                    let xp = (target.mass * eat.xp_per_mass).round();
                    let name = &world.bots.bots[b].name;
                    awards.push((xp, format!("Bot {} absorbed (+{} XP)", name, xp as u32)));
                }
                (MoverKey::Bot(b), MoverKey::Player(_)) => {
                    report.player_cells_lost += 1;
                    player_alive -= 1;
                    if player_alive == 0 {
                        debug!("Last player cell eaten by {}", world.bots.bots[b].name);
                        lifecycle::respawn_player(world);
                        report.player_died = true;
                        return report;
                    }
                    let message = format!("Lost a cell to {}", world.bots.bots[b].name);
                    world.events.push(message);
                }
                _ => {}
            }
        }
    }

    for (idx, contender) in roster.iter().enumerate() {
        if eaten.contains(idx) {
            continue;
        }
        if let Some(data) = world.mover_data_mut(contender.key) {
            data.mass = contender.mass;
        }
    }

    let mut lost_cells = Vec::new();
    let mut lost_bots = Vec::new();
    for idx in eaten.ones() {
        match roster[idx].key {
            MoverKey::Player(i) => lost_cells.push(i),
            MoverKey::Bot(i) => lost_bots.push(i),
        }
    }
    for &i in lost_cells.iter().rev() {
        world.player.cells.remove(i);
    }
    report.bots_eaten = world.bots.remove_eaten(&lost_bots);

    for (xp, reason) in awards {
        world.award_xp(xp, Some(reason));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::entity::Faction;
    use crate::entity::Pellet;

    /// World with nothing close to the player at (2800, 2800).
    fn quiet_world(seed: u64) -> World {
        let mut world = World::with_seed(Config::default(), seed);
        for bot in &mut world.bots.bots {
            bot.cell_data.position = Vec2::new(100.0, 100.0);
            bot.cell_data.mass = 11.0;
        }
        for slot in 0..world.foods.len() {
            world.foods[slot].position = Vec2::new(5000.0, 5000.0);
            world.food_index.update(slot as u32, Vec2::new(5000.0, 5000.0), 0.0);
        }
        world
    }

    #[test]
    fn test_margin_boundary() {
        assert!(!can_eat(21.6, 20.0, 1.08));
        assert!(can_eat(21.61, 20.0, 1.08));
        assert!(!can_eat(20.0, 20.0, 1.08));
    }

    #[test]
    fn test_resolve_respects_margin_boundary() {
        let spot = Vec2::new(3000.0, 1000.0);
        for (eater_mass, expected) in [(21.6, 0), (21.61, 1)] {
            let mut world = quiet_world(10);
            world.bots.bots[0].cell_data.position = spot;
            world.bots.bots[0].cell_data.mass = eater_mass;
            world.bots.bots[1].cell_data.position = spot;
            world.bots.bots[1].cell_data.mass = 20.0;

            let report = resolve_eating(&mut world);
            assert_eq!(report.bots_eaten, expected, "eater mass {}", eater_mass);
            assert_eq!(world.bots.len(), 28 - expected);
        }
    }

    #[test]
    fn test_engulf_requires_deep_overlap() {
        // radius(25) = 23, 23 * 0.72 = 16.56
        assert!(is_engulfed(Vec2::ZERO, 25.0, Vec2::new(16.5, 0.0), 0.72));
        assert!(!is_engulfed(Vec2::ZERO, 25.0, Vec2::new(16.6, 0.0), 0.72));
    }

    #[test]
    fn test_player_eats_bot_gains_mass_and_xp() {
        let mut world = quiet_world(1);
        let pos = world.player.cells[0].cell_data.position;
        world.player.cells[0].cell_data.mass = 30.0;
        let bot_id = world.bots.bots[0].id;
        world.bots.bots[0].cell_data.position = pos + Vec2::new(5.0, 0.0);
        world.bots.bots[0].cell_data.mass = 20.0;

        let report = resolve_eating(&mut world);

        assert_eq!(report.bots_eaten, 1);
        assert!(!report.player_died);
        assert!((world.player.cells[0].cell_data.mass - 46.4).abs() < 1e-4);
        assert!((world.progression.xp - 14.0).abs() < 1e-4);
        assert!(world.bots.get_bot(bot_id).is_none());
        assert_eq!(world.bots.len(), 27);
        assert_eq!(world.bots.pending_replacements(), 1);
        assert!(world.events.latest().is_some_and(|e| e.ends_with("absorbed (+14 XP)")));
        assert_eq!(world.particles.len(), EAT_BURST);
    }

    #[test]
    fn test_equal_masses_do_not_eat() {
        let mut world = quiet_world(2);
        let pos = world.player.cells[0].cell_data.position;
        world.player.cells[0].cell_data.mass = 20.0;
        world.bots.bots[0].cell_data.position = pos;
        world.bots.bots[0].cell_data.mass = 20.0;

        let report = resolve_eating(&mut world);
        assert_eq!(report, EatReport::default());
        assert_eq!(world.bots.len(), 28);
    }

    #[test]
    fn test_bot_eats_bot() {
        let mut world = quiet_world(3);
        world.bots.bots[0].cell_data.position = Vec2::new(3000.0, 1000.0);
        world.bots.bots[0].cell_data.mass = 40.0;
        world.bots.bots[1].cell_data.position = Vec2::new(3002.0, 1000.0);
        world.bots.bots[1].cell_data.mass = 10.0;
        let big = world.bots.bots[0].id;

        let report = resolve_eating(&mut world);
        assert_eq!(report.bots_eaten, 1);
        let eater = world.bots.get_bot(big).unwrap();
        assert!((eater.cell_data.mass - 48.2).abs() < 1e-4);
        assert_eq!(world.progression.xp, 0.0);
    }

    #[test]
    fn test_eaten_mover_passes_on_its_gains() {
        let mut world = quiet_world(4);
        let spot = Vec2::new(3000.0, 3000.0);
        let (medium, big, small) = (world.bots.bots[0].id, world.bots.bots[1].id, world.bots.bots[2].id);
        world.bots.bots[0].cell_data.position = spot;
        world.bots.bots[0].cell_data.mass = 40.0;
        world.bots.bots[1].cell_data.position = spot;
        world.bots.bots[1].cell_data.mass = 100.0;
        world.bots.bots[2].cell_data.position = spot;
        world.bots.bots[2].cell_data.mass = 10.0;

        let report = resolve_eating(&mut world);

        // medium eats small first, then big eats the grown medium
        assert_eq!(report.bots_eaten, 2);
        assert_eq!(world.bots.len(), 26);
        assert!(world.bots.get_bot(medium).is_none());
        assert!(world.bots.get_bot(small).is_none());
        let survivor = world.bots.get_bot(big).unwrap();
        assert!((survivor.cell_data.mass - (100.0 + 48.2 * 0.82)).abs() < 1e-3);
    }

    #[test]
    fn test_losing_last_cell_resets_world() {
        let mut world = quiet_world(5);
        let pos = world.player.cells[0].cell_data.position;
        world.bots.bots[3].cell_data.position = pos;
        world.bots.bots[3].cell_data.mass = 60.0;

        let report = resolve_eating(&mut world);
        assert!(report.player_died);
        assert_eq!(world.deaths, 1);
        assert_eq!(world.player.cells.len(), 1);
        assert_eq!(world.player.total_mass(), 16.0);
        assert_eq!(world.bots.len(), 28);
        assert_eq!(world.events.latest(), Some(lifecycle::DEATH_MESSAGE));
    }

    #[test]
    fn test_losing_one_of_many_cells_is_not_death() {
        let mut world = quiet_world(6);
        let pos = world.player.cells[0].cell_data.position;
        world.player.spawn_cell(Vec2::new(4000.0, 2000.0), 20.0);
        world.bots.bots[0].cell_data.position = pos;
        world.bots.bots[0].cell_data.mass = 60.0;

        let report = resolve_eating(&mut world);
        assert!(!report.player_died);
        assert_eq!(report.player_cells_lost, 1);
        assert_eq!(world.player.cells.len(), 1);
        assert_eq!(world.player.cells[0].cell_data.position, Vec2::new(4000.0, 2000.0));
        assert!((world.bots.bots[0].cell_data.mass - (60.0 + 16.0 * 0.82)).abs() < 1e-4);
    }

    #[test]
    fn test_own_cells_never_eat_each_other() {
        let mut world = quiet_world(7);
        let pos = world.player.cells[0].cell_data.position;
        world.player.cells[0].cell_data.mass = 100.0;
        world.player.spawn_cell(pos, 10.0);
        let report = resolve_eating(&mut world);
        assert_eq!(report, EatReport::default());
        assert_eq!(world.player.cells.len(), 2);
    }

    #[test]
    fn test_food_absorption_keeps_pool_size() {
        let mut world = quiet_world(8);
        let pos = world.player.cells[0].cell_data.position;
        world.foods[0].position = pos;
        world.foods[0].mass = 1.0;
        world.food_index.update(0, pos, 0.0);

        let eaten = absorb_food(&mut world);
        assert_eq!(eaten, 1);
        assert_eq!(world.foods.len(), 900);
        assert!((world.player.total_mass() - 17.0).abs() < 1e-4);
        assert!((world.progression.xp - 1.1).abs() < 1e-4);
        assert_eq!(world.particles.len(), FOOD_BURST);
    }

    #[test]
    fn test_bot_food_gain_is_reduced() {
        let mut world = quiet_world(9);
        world.foods[0].position = Vec2::new(100.0, 100.0);
        world.foods[0].mass = 1.0;
        world.food_index.update(0, Vec2::new(100.0, 100.0), 0.0);
        // Only the first bot in roster order gets it.
        let before = world.bots.bots[0].cell_data.mass;
        assert_eq!(absorb_food(&mut world), 1);
        assert!((world.bots.bots[0].cell_data.mass - before - 0.86).abs() < 1e-4);
        assert_eq!(world.progression.xp, 0.0);
    }

    #[test]
    fn test_pellet_grace_and_bot_priority() {
        let mut world = quiet_world(10);
        let pos = world.player.cells[0].cell_data.position;
        world
            .pellets
            .push(Pellet::new(pos, Vec2::ZERO, 1.8, Faction::Player, 6.0, Color::default()));

        assert_eq!(update_pellets(&mut world, 0.1), 0);
        assert_eq!(world.pellets.len(), 1);

        world.bots.bots[0].cell_data.position = pos;
        assert_eq!(update_pellets(&mut world, 0.1), 1);
        assert!(world.pellets.is_empty());
        assert!((world.bots.bots[0].cell_data.mass - 12.8).abs() < 1e-4);
        assert_eq!(world.player.total_mass(), 16.0);
    }

    #[test]
    fn test_own_pellet_absorbed_after_grace() {
        let mut world = quiet_world(11);
        let pos = world.player.cells[0].cell_data.position;
        world
            .pellets
            .push(Pellet::new(pos, Vec2::ZERO, 1.8, Faction::Player, 6.0, Color::default()));
        assert_eq!(update_pellets(&mut world, 0.2), 0);
        assert_eq!(update_pellets(&mut world, 0.1), 1);
        assert!((world.player.total_mass() - 17.8).abs() < 1e-4);
    }

    #[test]
    fn test_expired_pellets_are_discarded() {
        let mut world = quiet_world(12);
        world.pellets.push(Pellet::new(
            Vec2::new(4500.0, 500.0),
            Vec2::ZERO,
            1.8,
            Faction::Player,
            0.05,
            Color::default(),
        ));
        assert_eq!(update_pellets(&mut world, 0.1), 0);
        assert!(world.pellets.is_empty());
    }
}
