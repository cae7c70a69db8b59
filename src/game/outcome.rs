use std::fmt;

use crate::planners::BossAction;
use crate::planners::rl::EncodedState;

use super::resolution::SkillEffect;

/// Combat phases. `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Initializing,
    Placement,
    PlayerAttack,
    BossAttack,
    RoundEnd,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initializing => "INITIALIZING",
            Phase::Placement => "PLACEMENT",
            Phase::PlayerAttack => "PLAYER_ATTACK",
            Phase::BossAttack => "BOSS_ATTACK",
            Phase::RoundEnd => "ROUND_END",
            Phase::GameOver => "GAME_OVER",
        };
        f.write_str(name)
    }
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// Player units brought the boss to 0 hp
    BossDefeated,
    /// Boss was still standing when the round limit hit
    BossSurvived { rounds: u32 },
    /// Boss destroyed every unit on the board during its turn
    BoardWiped,
}

impl GameOutcome {
    pub fn boss_won(self) -> bool {
        !matches!(self, GameOutcome::BossDefeated)
    }

    pub fn message(self) -> String {
        match self {
            GameOutcome::BossDefeated => "Boss defeated! Player wins!".to_string(),
            GameOutcome::BossSurvived { rounds } => {
                format!("Boss survives {rounds} rounds! Player loses.")
            }
            GameOutcome::BoardWiped => "All player units destroyed!".to_string(),
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Game Over: {}", self.message())
    }
}

/// One boss decision as seen by a learning agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state_before: EncodedState,
    /// `None` when the boss had nothing to do
    pub action_index: Option<usize>,
    pub reward: f32,
    pub state_after: EncodedState,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhaseStatus {
    /// Attack resolved, the boss acts next
    BossTurn,
    BossDefeated,
    /// The episode had already ended; nothing happened
    AlreadyOver,
}

/// Result of the player's attack phase, rewards from the boss's point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPhaseResult {
    pub status: PlayerPhaseStatus,
    pub damage: i32,
    pub reward: f32,
    pub state_after: EncodedState,
    pub done: bool,
}

/// Everything that happened during one boss turn.
#[derive(Debug, Clone, PartialEq)]
pub struct BossTurnResult {
    pub transition: Transition,
    /// The decision the agent made, if any
    pub action: Option<BossAction>,
    pub effect: SkillEffect,
    /// Set when this turn ended the episode
    pub outcome: Option<GameOutcome>,
}

/// What `proceed_to_next_round` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAdvance {
    NewRound(u32),
    GameOver(GameOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        let survived = GameOutcome::BossSurvived { rounds: 9 };
        assert_eq!(survived.message(), "Boss survives 9 rounds! Player loses.");
        assert!(survived.boss_won());
        assert!(GameOutcome::BoardWiped.boss_won());
        assert!(!GameOutcome::BossDefeated.boss_won());
        assert_eq!(
            GameOutcome::BossDefeated.to_string(),
            "Game Over: Boss defeated! Player wins!"
        );
    }
}
