//! State encoder for RL - converts the combat state to a fixed feature vector

use serde::{Deserialize, Serialize};

use crate::state::{Board, Boss, Skill, UnitKind};

/// Number of features in an encoded state
pub const STATE_SIZE: usize = 9;

/// Hashable discretized state used by the value table
pub type StateKey = [i32; STATE_SIZE];

/// Snapshot of everything the boss policy observes.
///
/// Field order is the wire contract with persisted policies:
/// `[boss_hp, boss_rage, cd_horizontal_shot, cd_vertical_shot, cd_heal,
///   tank_count, knight_count, ad_count, current_round]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EncodedState {
    pub boss_hp: i32,
    pub boss_rage: i32,
    pub cd_horizontal_shot: i32,
    pub cd_vertical_shot: i32,
    pub cd_heal: i32,
    pub tank_count: i32,
    pub knight_count: i32,
    pub ad_count: i32,
    pub current_round: i32,
}

impl EncodedState {
    pub fn key(&self) -> StateKey {
        [
            self.boss_hp,
            self.boss_rage,
            self.cd_horizontal_shot,
            self.cd_vertical_shot,
            self.cd_heal,
            self.tank_count,
            self.knight_count,
            self.ad_count,
            self.current_round,
        ]
    }

    pub fn from_key(key: StateKey) -> Self {
        Self {
            boss_hp: key[0],
            boss_rage: key[1],
            cd_horizontal_shot: key[2],
            cd_vertical_shot: key[3],
            cd_heal: key[4],
            tank_count: key[5],
            knight_count: key[6],
            ad_count: key[7],
            current_round: key[8],
        }
    }

    /// Raw (unscaled) features for the network input
    pub fn features(&self) -> [f32; STATE_SIZE] {
        self.key().map(|v| v as f32)
    }

    pub fn unit_count(&self) -> i32 {
        self.tank_count + self.knight_count + self.ad_count
    }
}

/// Builds [`EncodedState`] snapshots from the live combat state
#[derive(Debug, Clone, Copy, Default)]
pub struct StateEncoder;

impl StateEncoder {
    pub fn encode(board: &Board, boss: &Boss, current_round: u32) -> EncodedState {
        let counts = board.unit_counts();

        EncodedState {
            boss_hp: boss.current_hp(),
            boss_rage: boss.current_rage() as i32,
            cd_horizontal_shot: boss.cooldown(Skill::HorizontalShot) as i32,
            cd_vertical_shot: boss.cooldown(Skill::VerticalShot) as i32,
            cd_heal: boss.cooldown(Skill::Heal) as i32,
            tank_count: counts[UnitKind::Tank.index()] as i32,
            knight_count: counts[UnitKind::Knight.index()] as i32,
            ad_count: counts[UnitKind::Ad.index()] as i32,
            current_round: current_round as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Cell;
    use crate::state::Unit;

    #[test]
    fn test_encode_field_order() {
        let mut board = Board::new();
        board.insert(Unit::new(UnitKind::Tank, Cell::new(0, 0))).unwrap();
        board.insert(Unit::new(UnitKind::Ad, Cell::new(1, 0))).unwrap();
        board.insert(Unit::new(UnitKind::Ad, Cell::new(2, 0))).unwrap();

        let mut boss = Boss::new();
        boss.apply_skill_effect_and_cd(Skill::VerticalShot).unwrap();
        boss.take_damage(12);

        let state = StateEncoder::encode(&board, &boss, 4);
        assert_eq!(state.key(), [58, 1, 0, 2, 0, 1, 0, 2, 4]);
        assert_eq!(state.features()[0], 58.0);
        assert_eq!(state.unit_count(), 3);
    }

    #[test]
    fn test_key_round_trip() {
        let key = [70, 0, 1, 2, 3, 1, 2, 3, 9];
        assert_eq!(EncodedState::from_key(key).key(), key);
    }
}
