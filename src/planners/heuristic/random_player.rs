use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::warn;

use crate::game::{CombatEngine, Phase};

/// Training opponent that fills each round's placement quota at random.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Places random units on random empty cells until the round cap, the
    /// stock or the free cells run out. Returns how many were placed.
    pub fn place_units(&mut self, engine: &mut CombatEngine) -> usize {
        let mut placed = 0;

        while engine.phase() == Phase::Placement && engine.placements_left() > 0 {
            let kinds = engine.stock().available_kinds();
            let cells = engine.board().empty_cells();
            let (Some(kind), Some(cell)) = (kinds.choose(&mut self.rng), cells.choose(&mut self.rng))
            else {
                break;
            };

            if let Err(err) = engine.place_unit(*kind, *cell) {
                warn!("Random placement of {} at {} rejected: {}", kind, cell, err);
                break;
            }
            placed += 1;
        }

        placed
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use crate::planners::heuristic::ScriptedAgent;

    #[test]
    fn test_fills_first_round_quota() {
        let mut engine =
            CombatEngine::with_seed(GameConfig::default(), Box::new(ScriptedAgent::default()), 1);
        let mut player = RandomPlayer::with_seed(2);
        engine.start_new_game();

        assert_eq!(player.place_units(&mut engine), 7);
        assert_eq!(engine.board().len(), 7);
        assert_eq!(engine.placements_left(), 0);
        assert!(engine.stock().is_empty());
    }

    #[test]
    fn test_does_nothing_outside_placement() {
        let mut engine =
            CombatEngine::with_seed(GameConfig::default(), Box::new(ScriptedAgent::default()), 1);
        let mut player = RandomPlayer::with_seed(2);
        assert_eq!(player.place_units(&mut engine), 0);
    }
}
