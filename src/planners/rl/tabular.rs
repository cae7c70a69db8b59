//! Value-table boss policy keyed by the exact encoded state.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::planners::heuristic::skill_params;
use crate::planners::{BossAction, PolicyAgent};
use crate::state::{Board, Skill};

use super::action_space::{ActionMask, EpsilonSchedule, NUM_ACTIONS, select_action};
use super::encoder::{EncodedState, StateKey};

/// Configuration for the tabular agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabularConfig {
    /// Step size of the value update
    pub learning_rate: f64,
    /// Kept for parity with the network agent; the update is reward-only
    pub discount: f64,
    pub epsilon: EpsilonSchedule,
}

impl Default for TabularConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.7,
            epsilon: EpsilonSchedule::default(),
        }
    }
}

/// One persisted table row
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableEntry {
    key: StateKey,
    values: [f64; NUM_ACTIONS],
}

/// Epsilon-greedy agent over a state → action-value table.
///
/// Updates move `Q[s][a]` towards the immediate reward only:
/// `Q[s][a] += α · (r − Q[s][a])`.
#[derive(Debug, Clone)]
pub struct TabularAgent {
    config: TabularConfig,
    schedule: EpsilonSchedule,
    table: HashMap<StateKey, [f64; NUM_ACTIONS]>,
}

impl Default for TabularAgent {
    fn default() -> Self {
        Self::new(TabularConfig::default())
    }
}

impl TabularAgent {
    pub fn new(config: TabularConfig) -> Self {
        Self {
            schedule: config.epsilon,
            config,
            table: HashMap::new(),
        }
    }

    pub fn config(&self) -> &TabularConfig {
        &self.config
    }

    /// Values for `state`, zero for states never seen
    pub fn q_values(&self, state: &EncodedState) -> [f64; NUM_ACTIONS] {
        self.table
            .get(&state.key())
            .copied()
            .unwrap_or([0.0; NUM_ACTIONS])
    }

    /// Number of states in the table
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The table lives next to `path` with a `.json` extension.
    pub fn table_path(path: &Path) -> PathBuf {
        path.with_extension("json")
    }
}

impl PolicyAgent for TabularAgent {
    fn name(&self) -> &'static str {
        "tabular"
    }

    fn epsilon(&self) -> f64 {
        self.schedule.epsilon
    }

    fn set_epsilon(&mut self, epsilon: f64) {
        self.schedule.epsilon = epsilon;
    }

    fn choose_action(
        &mut self,
        state: &EncodedState,
        available: &[Skill],
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Option<BossAction> {
        let mask = ActionMask::from_available(available);
        let values = self.q_values(state);
        let index = select_action(&values, &mask, &self.schedule, rng)?;
        let skill = Skill::from_index(index)?;

        Some(BossAction::new(skill, skill_params(skill, board, rng)))
    }

    fn learn(
        &mut self,
        state: &EncodedState,
        action_index: usize,
        reward: f32,
        next_state: &EncodedState,
        _done: bool,
        _rng: &mut dyn RngCore,
    ) {
        if action_index >= NUM_ACTIONS {
            warn!("Ignoring transition with action index {}", action_index);
            return;
        }

        self.table
            .entry(next_state.key())
            .or_insert([0.0; NUM_ACTIONS]);
        let row = self.table.entry(state.key()).or_insert([0.0; NUM_ACTIONS]);
        let q = &mut row[action_index];
        *q += self.config.learning_rate * (f64::from(reward) - *q);

        self.schedule.decay();
    }

    fn save(&self, path: &Path) -> Result<(), AgentError> {
        let file = Self::table_path(path);
        if let Some(parent) = file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut entries: Vec<TableEntry> = self
            .table
            .iter()
            .map(|(key, values)| TableEntry {
                key: *key,
                values: *values,
            })
            .collect();
        entries.sort_by_key(|entry| entry.key);

        fs::write(&file, serde_json::to_string(&entries)?)?;
        info!("Saved value table ({} states) to {}", entries.len(), file.display());
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<(), AgentError> {
        let file = Self::table_path(path);
        if !file.exists() {
            warn!("No value table at {}, starting fresh", file.display());
            return Ok(());
        }

        let entries: Vec<TableEntry> = serde_json::from_str(&fs::read_to_string(&file)?)?;
        self.table = entries
            .into_iter()
            .map(|entry| (entry.key, entry.values))
            .collect();
        debug!("Loaded {} states from {}", self.table.len(), file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::infra::Cell;
    use crate::state::{Unit, UnitKind};

    fn state(hp: i32) -> EncodedState {
        EncodedState {
            boss_hp: hp,
            current_round: 1,
            ..EncodedState::default()
        }
    }

    #[test]
    fn test_reward_only_update() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = TabularAgent::default();
        let s = state(70);
        let next = state(60);

        agent.learn(&s, 2, 10.0, &next, false, &mut rng);
        assert!((agent.q_values(&s)[2] - 1.0).abs() < 1e-9);
        agent.learn(&s, 2, 10.0, &next, false, &mut rng);
        assert!((agent.q_values(&s)[2] - 1.9).abs() < 1e-9);

        // next state row exists but stays zero
        assert_eq!(agent.len(), 2);
        assert_eq!(agent.q_values(&next), [0.0; NUM_ACTIONS]);
        assert!((agent.epsilon() - 0.9999 * 0.9999).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_choice_uses_table_and_mask() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = TabularAgent::default();
        let s = state(70);
        let mut table_rng = StdRng::seed_from_u64(1);
        agent.learn(&s, 4, 100.0, &s, false, &mut table_rng);
        agent.learn(&s, 3, 5.0, &s, false, &mut table_rng);
        agent.set_epsilon(0.0);

        let mut board = Board::new();
        board.insert(Unit::new(UnitKind::Ad, Cell::new(1, 1))).unwrap();

        let all = agent.choose_action(&s, &Skill::ALL, &board, &mut rng).unwrap();
        assert_eq!(all.skill, Skill::Ultimate);
        assert_eq!(all.action_index, 4);

        let no_ult = [Skill::NormalAttack, Skill::Heal];
        let action = agent.choose_action(&s, &no_ult, &board, &mut rng).unwrap();
        assert_eq!(action.skill, Skill::Heal);

        assert!(agent.choose_action(&s, &[], &board, &mut rng).is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("boss_agent");
        let mut rng = StdRng::seed_from_u64(0);

        let mut agent = TabularAgent::default();
        agent.learn(&state(70), 1, -20.0, &state(68), false, &mut rng);
        agent.save(&path).unwrap();
        assert!(TabularAgent::table_path(&path).exists());

        let mut restored = TabularAgent::default();
        restored.load(&path).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.q_values(&state(70)), agent.q_values(&state(70)));
    }

    #[test]
    fn test_load_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut agent = TabularAgent::default();
        agent.load(&dir.path().join("missing")).unwrap();
        assert!(agent.is_empty());
    }

    #[test]
    fn test_load_malformed_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken");
        std::fs::write(TabularAgent::table_path(&path), "{not json").unwrap();

        let mut agent = TabularAgent::default();
        assert!(matches!(agent.load(&path), Err(AgentError::Json(_))));
    }
}
