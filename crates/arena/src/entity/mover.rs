//! Uniform view over everything that moves and eats.

use super::{CellData, Faction, PlayerCell};
use crate::ai::Bot;
use glam::Vec2;

/// Index of a mover inside its owning collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoverKey {
    Player(usize),
    Bot(usize),
}

impl MoverKey {
    #[inline]
    pub fn faction(self) -> Faction {
        match self {
            MoverKey::Player(_) => Faction::Player,
            MoverKey::Bot(_) => Faction::Bot,
        }
    }
}

/// A player cell or a bot, borrowed from the world.
#[derive(Debug, Clone, Copy)]
pub enum Mover<'a> {
    Player(&'a PlayerCell),
    Bot(&'a Bot),
}

impl<'a> Mover<'a> {
    /// Get the common cell data.
    pub fn data(&self) -> &'a CellData {
        match self {
            Mover::Player(c) => &c.cell_data,
            Mover::Bot(b) => &b.cell_data,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.data().position
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.data().mass
    }
}
