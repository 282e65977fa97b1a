use super::bot_player::{Bot, Sighting, ThinkContext};
use crate::config::BotConfig;
use crate::entity::{Food, MoverKey, PlayerCell};
use rand::Rng;
use tracing::debug;

/// Bot manager.
#[derive(Debug, Default)]
pub struct BotManager {
    /// Active bots.
    pub bots: Vec<Bot>,
    /// Next bot ID counter.
    next_id: u32,
    /// Name suffix counter.
    sequence: u32,
    /// Replacements owed for bots eaten since the last replenish.
    pending_replacements: usize,
}

impl BotManager {
    /// Create a new bot manager.
    pub fn new() -> Self {
        Self {
            bots: Vec::new(),
            next_id: 1,
            sequence: 0,
            pending_replacements: 0,
        }
    }

    /// Add a freshly generated bot.
    pub fn add_bot<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &BotConfig, world_size: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let bot = Bot::new(rng, id, self.sequence, config, world_size);
        self.sequence += 1;
        debug!("Bot {} '{}' spawned with mass {:.1}", id, bot.name, bot.cell_data.mass);
        self.bots.push(bot);
        id
    }

    /// Remove the bots at `indices` and owe one replacement per removal.
    /// Returns the number removed.
    pub fn remove_eaten(&mut self, indices: &[usize]) -> usize {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let mut removed = 0;
        for &idx in sorted.iter().rev() {
            if idx < self.bots.len() {
                let bot = self.bots.remove(idx);
                debug!("Bot {} '{}' eaten", bot.id, bot.name);
                self.pending_replacements += 1;
                removed += 1;
            }
        }
        removed
    }

    #[inline]
    pub fn pending_replacements(&self) -> usize {
        self.pending_replacements
    }

    /// Spawn bots until the population reaches `target`. Returns the number spawned.
    pub fn replenish<R: Rng + ?Sized>(&mut self, target: usize, rng: &mut R, config: &BotConfig, world_size: f32) -> usize {
        let mut spawned = 0;
        while self.bots.len() < target {
            self.add_bot(rng, config, world_size);
            spawned += 1;
        }
        self.pending_replacements = 0;
        spawned
    }

    /// Get a bot by ID.
    pub fn get_bot(&self, id: u32) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id == id)
    }

    /// Run the decision step for every bot against a start-of-tick view of all movers.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        player_cells: &[PlayerCell],
        foods: &[Food],
        config: &BotConfig,
        world_size: f32,
        speed_multiplier: f32,
        rng: &mut R,
    ) {
        let sightings: Vec<Sighting> = player_cells
            .iter()
            .enumerate()
            .map(|(i, c)| Sighting {
                key: MoverKey::Player(i),
                position: c.cell_data.position,
                mass: c.cell_data.mass,
            })
            .chain(self.bots.iter().enumerate().map(|(i, b)| Sighting {
                key: MoverKey::Bot(i),
                position: b.cell_data.position,
                mass: b.cell_data.mass,
            }))
            .collect();

        let ctx = ThinkContext {
            movers: &sightings,
            foods,
            config,
            world_size,
            speed_multiplier,
        };

        for (i, bot) in self.bots.iter_mut().enumerate() {
            bot.update(MoverKey::Bot(i), dt, &ctx, rng);
        }
    }

    /// Clear all bots. Ids keep counting up.
    pub fn clear(&mut self) {
        self.bots.clear();
        self.pending_replacements = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_replacement_gets_fresh_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = BotConfig::default();
        let mut manager = BotManager::new();
        manager.replenish(5, &mut rng, &config, 5600.0);
        let eaten_id = manager.bots[2].id;

        assert_eq!(manager.remove_eaten(&[2]), 1);
        assert!(manager.get_bot(eaten_id).is_none());
        assert_eq!(manager.pending_replacements(), 1);

        assert_eq!(manager.replenish(5, &mut rng, &config, 5600.0), 1);
        assert_eq!(manager.len(), 5);
        assert!(manager.get_bot(eaten_id).is_none());
        assert_eq!(manager.bots[4].id, 6);
        assert_eq!(manager.pending_replacements(), 0);
    }

    #[test]
    fn test_remove_eaten_handles_unsorted_and_duplicates() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = BotConfig::default();
        let mut manager = BotManager::new();
        manager.replenish(6, &mut rng, &config, 5600.0);
        let ids: Vec<u32> = manager.bots.iter().map(|b| b.id).collect();

        assert_eq!(manager.remove_eaten(&[4, 1, 4, 9]), 2);
        assert_eq!(manager.pending_replacements(), 2);
        let remaining: Vec<u32> = manager.bots.iter().map(|b| b.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3], ids[5]]);
    }
}
