use std::path::Path;

use rand::RngCore;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::error::AgentError;
use crate::planners::rl::EncodedState;
use crate::planners::{BossAction, PolicyAgent};
use crate::state::{BOSS_MAX_HP, Board, Skill};

use super::targeting::skill_params;

/// Ultimate is only worth its rage against at least this many units.
const ULTIMATE_MIN_UNITS: i32 = 3;
/// Heal early once hp falls to this fraction of max.
const EMERGENCY_HEAL_FRACTION: f64 = 0.4;

/// Hand-written boss used when no trained policy is attached.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedAgent {
    max_hp: i32,
}

impl Default for ScriptedAgent {
    fn default() -> Self {
        Self::new(BOSS_MAX_HP)
    }
}

impl ScriptedAgent {
    pub fn new(max_hp: i32) -> Self {
        Self { max_hp }
    }

    fn pick_skill(
        &self,
        state: &EncodedState,
        available: &[Skill],
        rng: &mut dyn RngCore,
    ) -> Option<Skill> {
        let has = |skill: Skill| available.contains(&skill);
        let units = state.unit_count();
        let hp = state.boss_hp;
        let max_hp = self.max_hp.max(1);

        if has(Skill::Ultimate) && units >= ULTIMATE_MIN_UNITS {
            return Some(Skill::Ultimate);
        }
        let critical = f64::from(hp) <= f64::from(max_hp) * EMERGENCY_HEAL_FRACTION;
        if has(Skill::Heal) && critical && hp < max_hp {
            return Some(Skill::Heal);
        }

        if units > 0 {
            let damage: Vec<Skill> = available
                .iter()
                .copied()
                .filter(|skill| {
                    matches!(
                        skill,
                        Skill::NormalAttack | Skill::HorizontalShot | Skill::VerticalShot
                    )
                })
                .collect();
            if let Some(skill) = damage.choose(rng) {
                return Some(*skill);
            }
        }

        if has(Skill::Heal) && hp < max_hp {
            return Some(Skill::Heal);
        }
        if has(Skill::NormalAttack) && units > 0 {
            return Some(Skill::NormalAttack);
        }
        available.choose(rng).copied()
    }
}

impl PolicyAgent for ScriptedAgent {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn epsilon(&self) -> f64 {
        0.0
    }

    fn choose_action(
        &mut self,
        state: &EncodedState,
        available: &[Skill],
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Option<BossAction> {
        let skill = self.pick_skill(state, available, rng)?;
        debug!("Scripted boss picks {}", skill);
        Some(BossAction::new(skill, skill_params(skill, board, rng)))
    }

    fn learn(
        &mut self,
        _state: &EncodedState,
        _action_index: usize,
        _reward: f32,
        _next_state: &EncodedState,
        _done: bool,
        _rng: &mut dyn RngCore,
    ) {
    }

    fn save(&self, _path: &Path) -> Result<(), AgentError> {
        Ok(())
    }

    fn load(&mut self, _path: &Path) -> Result<(), AgentError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn state(hp: i32, units: i32) -> EncodedState {
        EncodedState {
            boss_hp: hp,
            ad_count: units,
            current_round: 2,
            ..EncodedState::default()
        }
    }

    #[test]
    fn test_prefers_ultimate_against_crowd() {
        let mut rng = StdRng::seed_from_u64(0);
        let agent = ScriptedAgent::new(BOSS_MAX_HP);
        let skill = agent.pick_skill(&state(70, 3), &Skill::ALL, &mut rng);
        assert_eq!(skill, Some(Skill::Ultimate));
    }

    #[test]
    fn test_heals_when_low() {
        let mut rng = StdRng::seed_from_u64(0);
        let agent = ScriptedAgent::new(BOSS_MAX_HP);
        let available = [Skill::NormalAttack, Skill::Heal];
        assert_eq!(agent.pick_skill(&state(28, 1), &available, &mut rng), Some(Skill::Heal));
    }

    #[test]
    fn test_attacks_when_units_present() {
        let mut rng = StdRng::seed_from_u64(0);
        let agent = ScriptedAgent::new(BOSS_MAX_HP);
        let available = [Skill::NormalAttack, Skill::VerticalShot, Skill::Heal];
        for _ in 0..20 {
            let skill = agent.pick_skill(&state(60, 2), &available, &mut rng);
            assert!(matches!(skill, Some(Skill::NormalAttack | Skill::VerticalShot)));
        }
    }

    #[test]
    fn test_heals_on_empty_board() {
        let mut rng = StdRng::seed_from_u64(0);
        let agent = ScriptedAgent::new(BOSS_MAX_HP);
        let available = [Skill::NormalAttack, Skill::Heal];
        assert_eq!(agent.pick_skill(&state(60, 0), &available, &mut rng), Some(Skill::Heal));
        assert_eq!(agent.pick_skill(&state(70, 0), &[], &mut rng), None);
    }
}
