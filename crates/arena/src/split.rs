//! Player split, mass ejection and cell merging.

use crate::entity::{Faction, Pellet, radius_from_mass};
use crate::util::{clamp_to_world, direction_or_random};
use crate::world::World;
use glam::Vec2;
use tracing::debug;

/// Gap between a cell's edge and a freshly ejected pellet.
const EJECT_CLEARANCE: f32 = 4.0;

/// Split every cell heavy enough, up to the cell cap.
///
/// Each qualifying cell halves; the new half is placed along `direction`
/// (random if zero) and launched with the split impulse. Both halves start
/// their merge cooldown. Returns the number of cells created.
pub fn split(world: &mut World, direction: Vec2) -> usize {
    let config = world.config.player.clone();
    if world.player.split_cooldown > 0.0 || world.player.cells.len() >= config.max_cells {
        return 0;
    }
    let direction = direction_or_random(&mut world.rng, direction);
    let size = world.size();

    let existing = world.player.cells.len();
    let mut created = 0;
    for i in 0..existing {
        if world.player.cells.len() >= config.max_cells {
            break;
        }
        let cell = &mut world.player.cells[i];
        if cell.cell_data.mass < config.min_split_mass {
            continue;
        }
        let half = cell.cell_data.mass / 2.0;
        cell.cell_data.mass = half;
        cell.merge_cooldown = config.merge_cooldown;
        let origin = cell.cell_data.position;
        let velocity = cell.cell_data.velocity + direction * config.split_impulse;

        let position = clamp_to_world(origin + direction * radius_from_mass(half), size);
        let idx = world.player.spawn_cell(position, half);
        let child = &mut world.player.cells[idx];
        child.cell_data.velocity = velocity;
        child.merge_cooldown = config.merge_cooldown;
        created += 1;
    }

    if created > 0 {
        world.player.split_cooldown = config.split_cooldown;
        debug!("Player split into {} cells", world.player.cells.len());
    }
    created
}

/// Eject a pellet from every cell above the minimum mass.
/// Returns the number of pellets spawned.
pub fn eject(world: &mut World, direction: Vec2) -> usize {
    if world.player.eject_cooldown > 0.0 {
        return 0;
    }
    let config = world.config.eject.clone();
    let floor = world.config.world.min_mass;
    let size = world.size();
    let direction = direction_or_random(&mut world.rng, direction);

    let mut spawned = 0;
    for cell in &mut world.player.cells {
        let data = &mut cell.cell_data;
        if data.mass <= config.min_cell_mass {
            continue;
        }
        data.mass = (data.mass - config.mass_loss).max(floor);
        let offset = data.radius() + world.config.food.reach + EJECT_CLEARANCE;
        let position = clamp_to_world(data.position + direction * offset, size);
        world.pellets.push(Pellet::new(
            position,
            direction * config.speed,
            config.pellet_mass,
            Faction::Player,
            config.lifetime,
            data.color,
        ));
        spawned += 1;
    }

    if spawned > 0 {
        world.player.eject_cooldown = config.cooldown;
    }
    spawned
}

/// Merge own cells whose cooldowns have expired and whose centres are close
/// enough. The first cell of each pair absorbs the second. Returns the
/// number of merges.
pub fn merge_cells(world: &mut World) -> usize {
    let factor = world.config.player.merge_distance;
    let cells = &mut world.player.cells;
    let mut merges = 0;

    loop {
        let mut pair = None;
        'scan: for i in 0..cells.len() {
            if !cells[i].can_merge() {
                continue;
            }
            for j in i + 1..cells.len() {
                if !cells[j].can_merge() {
                    continue;
                }
                let (a, b) = (&cells[i].cell_data, &cells[j].cell_data);
                if a.position.distance(b.position) < (a.radius() + b.radius()) * factor {
                    pair = Some((i, j));
                    break 'scan;
                }
            }
        }

        let Some((i, j)) = pair else { break };
        let absorbed = cells.remove(j);
        let keeper = &mut cells[i].cell_data;
        keeper.mass += absorbed.cell_data.mass;
        keeper.velocity += absorbed.cell_data.velocity * 0.5;
        merges += 1;
    }

    if merges > 0 {
        debug!("Merged {} player cells, {} remaining", merges, cells.len());
    }
    merges
}
