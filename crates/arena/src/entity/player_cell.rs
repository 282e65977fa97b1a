//! Player cells and the player's cell collection.

use super::{CellData, Color};
use glam::Vec2;

/// Player glow color.
pub const PLAYER_COLOR: Color = Color::new(191.0, 100.0, 68.0);

/// A cell controlled by the player.
#[derive(Debug, Clone)]
pub struct PlayerCell {
    /// Stable id within the current life of the player.
    pub id: u32,
    /// Cell data (public for direct access).
    pub cell_data: CellData,
    /// Seconds until this cell may merge with a sibling.
    pub merge_cooldown: f32,
}

impl PlayerCell {
    pub fn new(id: u32, position: Vec2, mass: f32, color: Color) -> Self {
        Self {
            id,
            cell_data: CellData::new(position, mass, color),
            merge_cooldown: 0.0,
        }
    }

    #[inline]
    pub fn can_merge(&self) -> bool {
        self.merge_cooldown <= 0.0
    }
}

/// The player: a non-empty ordered collection of cells while alive.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub color: Color,
    pub cells: Vec<PlayerCell>,
    /// Boost resource in `[0, 1]`.
    pub boost_energy: f32,
    /// Seconds until the next split is accepted.
    pub split_cooldown: f32,
    /// Seconds until the next eject is accepted.
    pub eject_cooldown: f32,
    next_cell_id: u32,
}

impl Player {
    /// Create a player with a single cell.
    pub fn new(name: impl Into<String>, position: Vec2, mass: f32) -> Self {
        let mut player = Self {
            name: name.into(),
            color: PLAYER_COLOR,
            cells: Vec::with_capacity(crate::config::MAX_PLAYER_CELLS),
            boost_energy: 1.0,
            split_cooldown: 0.0,
            eject_cooldown: 0.0,
            next_cell_id: 1,
        };
        player.spawn_cell(position, mass);
        player
    }

    /// Append a new cell and return its index.
    pub fn spawn_cell(&mut self, position: Vec2, mass: f32) -> usize {
        let id = self.next_cell_id;
        self.next_cell_id = self.next_cell_id.wrapping_add(1);
        self.cells.push(PlayerCell::new(id, position, mass, self.color));
        self.cells.len() - 1
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Aggregate mass of all cells.
    pub fn total_mass(&self) -> f32 {
        self.cells.iter().map(|c| c.cell_data.mass).sum()
    }

    /// Mass-weighted centroid of all cells.
    pub fn centroid(&self) -> Option<Vec2> {
        let total = self.total_mass();
        if self.cells.is_empty() || total <= 0.0 {
            return None;
        }
        let weighted: Vec2 = self
            .cells
            .iter()
            .map(|c| c.cell_data.position * c.cell_data.mass)
            .sum();
        Some(weighted / total)
    }

    /// Spread `amount` of mass evenly across all cells.
    pub fn grant_mass(&mut self, amount: f32) {
        if self.cells.is_empty() {
            return;
        }
        let share = amount / self.cells.len() as f32;
        for cell in &mut self.cells {
            cell.cell_data.mass += share;
        }
    }

    /// Count down action and merge timers.
    pub fn tick_cooldowns(&mut self, dt: f32) {
        self.split_cooldown = (self.split_cooldown - dt).max(0.0);
        self.eject_cooldown = (self.eject_cooldown - dt).max(0.0);
        for cell in &mut self.cells {
            cell.merge_cooldown = (cell.merge_cooldown - dt).max(0.0);
        }
    }
}
