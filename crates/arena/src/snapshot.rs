//! Read-only views of the world for presentation layers.

use crate::entity::{Color, Food, Particle, Pellet};
use crate::world::World;
use glam::Vec2;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub mass: f32,
    pub is_player: bool,
}

#[derive(Debug, Clone)]
pub struct CellView {
    pub id: u32,
    pub position: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct BotView {
    pub id: u32,
    pub name: String,
    pub position: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub color: Color,
}

/// Owned copy of everything a renderer or HUD needs for one frame.
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub clock: f32,
    pub world_size: f32,
    pub foods: Vec<Food>,
    pub pellets: Vec<Pellet>,
    pub bots: Vec<BotView>,
    pub player_cells: Vec<CellView>,
    pub particles: Vec<Particle>,
    pub player_name: String,
    pub player_mass: f32,
    /// Mass-weighted centre of the player's cells, for camera tracking.
    pub player_centroid: Option<Vec2>,
    pub boost_energy: f32,
    pub level: u32,
    pub xp: f32,
    pub xp_to_next: u32,
    /// Share of the current level completed, in `[0, 1]`.
    pub xp_fraction: f32,
    pub rank: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Newest first.
    pub events: Vec<String>,
    pub deaths: u32,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        let board = leaderboard(world);
        let rank = board.iter().position(|e| e.is_player).map_or(board.len(), |i| i + 1);
        let top = world.config.session.leaderboard_len;

        Self {
            clock: world.clock,
            world_size: world.size(),
            foods: world.foods.clone(),
            pellets: world.pellets.clone(),
            bots: world
                .bots
                .bots
                .iter()
                .map(|b| BotView {
                    id: b.id,
                    name: b.name.clone(),
                    position: b.cell_data.position,
                    mass: b.cell_data.mass,
                    radius: b.cell_data.radius(),
                    color: b.cell_data.color,
                })
                .collect(),
            player_cells: world
                .player
                .cells
                .iter()
                .map(|c| CellView {
                    id: c.id,
                    position: c.cell_data.position,
                    mass: c.cell_data.mass,
                    radius: c.cell_data.radius(),
                    color: c.cell_data.color,
                })
                .collect(),
            particles: world.particles.clone(),
            player_name: world.player.name.clone(),
            player_mass: world.player.total_mass(),
            player_centroid: world.player.centroid(),
            boost_energy: world.player.boost_energy,
            level: world.progression.level,
            xp: world.progression.xp,
            xp_to_next: world.progression.xp_to_next,
            xp_fraction: world.progression.fraction(),
            rank,
            leaderboard: board.into_iter().take(top).collect(),
            events: world.events.iter().map(str::to_owned).collect(),
            deaths: world.deaths,
        }
    }
}

/// Player (total mass) and every bot, heaviest first. Ties keep the player ahead.
pub fn leaderboard(world: &World) -> Vec<LeaderboardEntry> {
    let mut entries = Vec::with_capacity(world.bots.len() + 1);
    entries.push(LeaderboardEntry {
        name: world.player.name.clone(),
        mass: world.player.total_mass(),
        is_player: true,
    });
    entries.extend(world.bots.bots.iter().map(|b| LeaderboardEntry {
        name: b.name.clone(),
        mass: b.cell_data.mass,
        is_player: false,
    }));
    entries.sort_by(|a, b| b.mass.partial_cmp(&a.mass).unwrap_or(Ordering::Equal));
    entries
}
