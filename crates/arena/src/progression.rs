//! Experience and level curve.

use crate::config::ProgressionConfig;

/// Player experience state. Reset whenever the world is reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    /// Experience accumulated towards the next level.
    pub xp: f32,
    pub level: u32,
    /// Experience required to reach the next level.
    pub xp_to_next: u32,
}

impl Progression {
    pub fn new(config: &ProgressionConfig) -> Self {
        Self {
            xp: 0.0,
            level: 1,
            xp_to_next: config.first_requirement.max(1),
        }
    }

    /// Add experience and return the number of levels gained.
    ///
    /// Each level consumes its requirement and grows the next one
    /// geometrically; the requirement always strictly increases.
    pub fn gain(&mut self, amount: f32, config: &ProgressionConfig) -> u32 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0;
        }
        self.xp += amount;

        let mut levels = 0;
        while self.xp >= self.xp_to_next as f32 {
            self.xp -= self.xp_to_next as f32;
            self.level += 1;
            levels += 1;
            let grown = (self.xp_to_next as f32 * config.growth + config.flat_bonus).round();
            self.xp_to_next = (grown as u32).max(self.xp_to_next + 1);
        }
        levels
    }

    /// Game-speed multiplier: difficulty scaled up by each level above 1.
    pub fn speed_multiplier(&self, difficulty: f32, config: &ProgressionConfig) -> f32 {
        difficulty * (1.0 + config.speed_step * (self.level - 1) as f32)
    }

    /// Fraction of the current level completed, for HUD gauges.
    pub fn fraction(&self) -> f32 {
        (self.xp / self.xp_to_next as f32).clamp(0.0, 1.0)
    }
}
