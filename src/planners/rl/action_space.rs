//! Action space for RL - fixed skill indices, masking and exploration

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::state::Skill;

/// Number of discrete boss actions (one per skill)
pub const NUM_ACTIONS: usize = Skill::COUNT;

/// Validity mask over the fixed action space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionMask {
    mask: [bool; NUM_ACTIONS],
}

impl ActionMask {
    /// Build the mask from the skills that are usable right now
    pub fn from_available(available: &[Skill]) -> Self {
        let mut mask = [false; NUM_ACTIONS];
        for skill in available {
            mask[skill.index()] = true;
        }
        Self { mask }
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// Get the number of valid actions
    pub fn num_valid(&self) -> usize {
        self.mask.iter().filter(|v| **v).count()
    }

    /// Check if any actions are available
    pub fn has_actions(&self) -> bool {
        self.mask.iter().any(|v| *v)
    }

    /// Valid action indices in ascending order
    pub fn valid_indices(&self) -> Vec<usize> {
        (0..NUM_ACTIONS).filter(|i| self.mask[*i]).collect()
    }

    /// Index of the highest value among valid actions, lowest index on ties.
    ///
    /// Invalid actions count as negative infinity.
    pub fn masked_argmax<T: Copy + PartialOrd>(&self, values: &[T]) -> Option<usize> {
        let mut best: Option<(usize, T)> = None;
        for index in self.valid_indices() {
            let Some(&value) = values.get(index) else {
                continue;
            };
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((index, value));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Uniformly random valid action
    pub fn sample(&self, rng: &mut dyn RngCore) -> Option<usize> {
        self.valid_indices().choose(rng).copied()
    }
}

/// Geometric epsilon-greedy schedule: `ε ← max(ε · decay, min)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonSchedule {
    pub epsilon: f64,
    pub decay: f64,
    pub min: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            decay: 0.9999,
            min: 0.05,
        }
    }
}

impl EpsilonSchedule {
    pub fn new(epsilon: f64, decay: f64, min: f64) -> Self {
        Self {
            epsilon,
            decay,
            min,
        }
    }

    /// Whether this decision should explore
    pub fn explore(&self, rng: &mut dyn RngCore) -> bool {
        rng.random::<f64>() < self.epsilon
    }

    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.min);
    }
}

/// Epsilon-greedy selection over a value vector restricted to `mask`
pub fn select_action<T: Copy + PartialOrd>(
    values: &[T],
    mask: &ActionMask,
    schedule: &EpsilonSchedule,
    rng: &mut dyn RngCore,
) -> Option<usize> {
    if !mask.has_actions() {
        return None;
    }
    if schedule.explore(rng) {
        mask.sample(rng)
    } else {
        mask.masked_argmax(values)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_action_space_size() {
        assert_eq!(NUM_ACTIONS, 5);
    }

    #[test]
    fn test_mask_from_available() {
        let mask = ActionMask::from_available(&[Skill::NormalAttack, Skill::Ultimate]);
        assert_eq!(mask.valid_indices(), vec![0, 4]);
        assert_eq!(mask.num_valid(), 2);
        assert!(!mask.is_valid(7));
    }

    #[test]
    fn test_masked_argmax_ignores_invalid() {
        let mask = ActionMask::from_available(&[Skill::NormalAttack, Skill::Heal]);
        let values = [-1.0, 50.0, 50.0, -0.5, 99.0];
        assert_eq!(mask.masked_argmax(&values), Some(3));
    }

    #[test]
    fn test_masked_argmax_tie_takes_lowest() {
        let mask = ActionMask::from_available(&Skill::ALL);
        assert_eq!(mask.masked_argmax(&[0.0f32; NUM_ACTIONS]), Some(0));
        assert_eq!(ActionMask::default().masked_argmax(&[1.0f32; 5]), None);
    }

    #[test]
    fn test_epsilon_decay_floor() {
        let mut schedule = EpsilonSchedule::new(0.0501, 0.9999, 0.05);
        for _ in 0..100 {
            schedule.decay();
        }
        assert_eq!(schedule.epsilon, 0.05);

        let mut schedule = EpsilonSchedule::default();
        schedule.decay();
        assert!((schedule.epsilon - 0.9999).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_selection_respects_mask() {
        let mut rng = StdRng::seed_from_u64(9);
        let schedule = EpsilonSchedule::new(0.0, 0.9999, 0.0);
        let mask = ActionMask::from_available(&[Skill::VerticalShot]);
        let values = [9.0, 9.0, -3.0, 9.0, 9.0];
        assert_eq!(select_action(&values, &mask, &schedule, &mut rng), Some(2));
    }

    #[test]
    fn test_exploration_stays_in_mask() {
        let mut rng = StdRng::seed_from_u64(4);
        let schedule = EpsilonSchedule::default();
        let mask = ActionMask::from_available(&[Skill::HorizontalShot, Skill::Heal]);
        for _ in 0..50 {
            let action = select_action(&[0.0f32; 5], &mask, &schedule, &mut rng);
            assert!(matches!(action, Some(1 | 3)));
        }
        assert_eq!(
            select_action(&[0.0f32; 5], &ActionMask::default(), &schedule, &mut rng),
            None
        );
    }
}
