use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::error::PlacementError;
use crate::infra::{Axis, BeamDirection, Cell};
use crate::planners::rl::{EncodedState, StateEncoder};
use crate::planners::{BossAction, PolicyAgent, SkillParams};
use crate::state::{Board, Boss, Skill, Unit, UnitKind};

use super::outcome::{
    BossTurnResult, GameOutcome, Phase, PlayerPhaseResult, PlayerPhaseStatus, RoundAdvance,
    Transition,
};
use super::resolution::{
    BEAM_CHARGES, SkillEffect, ULTIMATE_MAX_TARGETS, resolve_beam, resolve_multi_target,
    resolve_single_target,
};
use super::reward;
use super::stock::PlacementStock;

/// Episode rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Surviving this many rounds wins the episode for the boss
    pub max_rounds: u32,
    pub first_round_placements: u32,
    pub later_round_placements: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: 9,
            first_round_placements: 7,
            later_round_placements: 2,
        }
    }
}

/// Turn-based combat between the player's units and a boss driven by a [`PolicyAgent`].
///
/// A round is placement, player attack, boss attack and round end. The engine is
/// the only thing that moves the phase forward.
pub struct CombatEngine {
    config: GameConfig,
    board: Board,
    boss: Boss,
    agent: Box<dyn PolicyAgent>,
    rng: StdRng,
    phase: Phase,
    current_round: u32,
    stock: PlacementStock,
    placed_this_round: u32,
    destroyed_this_round: u32,
    ultimate_uses: u32,
    outcome: Option<GameOutcome>,
    action_log: Vec<String>,
}

impl CombatEngine {
    pub fn new(config: GameConfig, agent: Box<dyn PolicyAgent>) -> Self {
        Self::with_rng(config, agent, StdRng::from_os_rng())
    }

    /// Engine whose random choices replay identically for the same seed and agent.
    pub fn with_seed(config: GameConfig, agent: Box<dyn PolicyAgent>, seed: u64) -> Self {
        Self::with_rng(config, agent, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, agent: Box<dyn PolicyAgent>, rng: StdRng) -> Self {
        Self {
            config,
            board: Board::new(),
            boss: Boss::new(),
            agent,
            rng,
            phase: Phase::Initializing,
            current_round: 0,
            stock: PlacementStock::new(),
            placed_this_round: 0,
            destroyed_this_round: 0,
            ultimate_uses: 0,
            outcome: None,
            action_log: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    #[cfg(test)]
    pub(crate) fn boss_mut(&mut self) -> &mut Boss {
        &mut self.boss
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    #[cfg(test)]
    pub(crate) fn set_current_round(&mut self, round: u32) {
        self.current_round = round;
    }

    pub fn stock(&self) -> &PlacementStock {
        &self.stock
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn agent(&self) -> &dyn PolicyAgent {
        self.agent.as_ref()
    }

    pub fn agent_mut(&mut self) -> &mut dyn PolicyAgent {
        self.agent.as_mut()
    }

    /// Hands the agent back, e.g. to save it after training.
    pub fn into_agent(self) -> Box<dyn PolicyAgent> {
        self.agent
    }

    pub fn encode_state(&self) -> EncodedState {
        StateEncoder::encode(&self.board, &self.boss, self.current_round)
    }

    pub fn placement_cap(&self) -> u32 {
        if self.current_round == 1 {
            self.config.first_round_placements
        } else {
            self.config.later_round_placements
        }
    }

    pub fn placements_left(&self) -> u32 {
        self.placement_cap().saturating_sub(self.placed_this_round)
    }

    pub fn ultimate_uses(&self) -> u32 {
        self.ultimate_uses
    }

    /// Last `tail` combat log lines, or all of them when `tail` is 0.
    pub fn action_log(&self, tail: usize) -> &[String] {
        if tail > 0 && self.action_log.len() > tail {
            &self.action_log[self.action_log.len() - tail..]
        } else {
            &self.action_log
        }
    }

    fn log(&mut self, line: String) {
        debug!("{}", line);
        self.action_log.push(line);
    }

    // ------------------------------------------------------------------------
    // Episode flow
    // ------------------------------------------------------------------------

    /// Resets everything and enters round 1 placement.
    pub fn start_new_game(&mut self) -> EncodedState {
        self.board.clear();
        self.boss.reset();
        self.current_round = 0;
        self.stock.reset();
        self.ultimate_uses = 0;
        self.outcome = None;
        self.action_log.clear();
        self.log("Game started (new episode).".to_string());
        self.setup_new_round();
        self.encode_state()
    }

    fn setup_new_round(&mut self) {
        self.current_round += 1;
        self.placed_this_round = 0;
        self.boss.decrement_cooldowns();
        self.destroyed_this_round = 0;
        if self.current_round > 1 {
            self.stock.regenerate();
        }
        self.log(format!("--- Round {} ---", self.current_round));
        self.phase = Phase::Placement;
    }

    /// Places a unit from stock. Rejections leave the engine untouched.
    pub fn place_unit(&mut self, kind: UnitKind, cell: Cell) -> Result<(), PlacementError> {
        if self.phase != Phase::Placement {
            return Err(PlacementError::NotInPlacementPhase);
        }
        if self.placements_left() == 0 {
            return Err(PlacementError::PlacementLimitReached);
        }
        if self.stock.get(kind) == 0 {
            return Err(PlacementError::NoStock(kind));
        }
        if !self.board.contains(cell) {
            return Err(PlacementError::OutOfBounds(cell));
        }
        if self.board.is_occupied(cell) {
            return Err(PlacementError::CellOccupied(cell));
        }

        if self.board.insert(Unit::new(kind, cell)).is_err() {
            return Err(PlacementError::OutOfBounds(cell));
        }
        self.stock.take(kind);
        self.placed_this_round += 1;
        self.log(format!(
            "Placed {} at {}. Stock: {}. Placed: {}.",
            kind,
            cell,
            self.stock.get(kind),
            self.placed_this_round
        ));
        Ok(())
    }

    /// Closes placement and runs the player's attack.
    pub fn end_placement(&mut self) -> PlayerPhaseResult {
        self.log("Placement phase ended.".to_string());
        self.process_player_attack()
    }

    /// Every unit hits the boss for its attack power in one combined strike.
    pub fn process_player_attack(&mut self) -> PlayerPhaseResult {
        if self.phase == Phase::GameOver {
            return PlayerPhaseResult {
                status: PlayerPhaseStatus::AlreadyOver,
                damage: 0,
                reward: 0.0,
                state_after: self.encode_state(),
                done: true,
            };
        }
        self.phase = Phase::PlayerAttack;

        if self.board.is_empty() {
            self.log("No player units on board to attack.".to_string());
            self.phase = Phase::BossAttack;
            return PlayerPhaseResult {
                status: PlayerPhaseStatus::BossTurn,
                damage: 0,
                reward: 0.0,
                state_after: self.encode_state(),
                done: false,
            };
        }

        let damage = self.board.total_attack_power();
        let boss_died = damage > 0 && self.boss.take_damage(damage);
        if damage > 0 {
            self.log(format!(
                "Boss takes {} total. HP: {}",
                damage,
                self.boss.current_hp()
            ));
        } else {
            self.log("Player units dealt no damage.".to_string());
        }

        let reward = reward::player_attack(damage, boss_died);
        let status = if boss_died {
            self.finish(GameOutcome::BossDefeated);
            PlayerPhaseStatus::BossDefeated
        } else {
            self.phase = Phase::BossAttack;
            PlayerPhaseStatus::BossTurn
        };

        PlayerPhaseResult {
            status,
            damage,
            reward,
            state_after: self.encode_state(),
            done: boss_died,
        }
    }

    /// Lets the agent pick a skill, resolves it and scores it.
    #[tracing::instrument(level = "debug", skip(self), fields(round = self.current_round))]
    pub fn process_boss_attack(&mut self) -> BossTurnResult {
        let state_before = self.encode_state();

        if self.phase == Phase::GameOver {
            return BossTurnResult {
                transition: Transition {
                    state_before,
                    action_index: None,
                    reward: 0.0,
                    state_after: state_before,
                    done: true,
                },
                action: None,
                effect: SkillEffect::default(),
                outcome: self.outcome,
            };
        }

        self.phase = Phase::BossAttack;
        self.destroyed_this_round = 0;

        let available = self.boss.available_skills();
        let chosen =
            self.agent
                .choose_action(&state_before, &available, &self.board, &mut self.rng);

        let Some(action) = chosen else {
            self.log("Boss does nothing (no skill available).".to_string());
            return self.settle_skipped_turn(state_before, None, reward::NO_ACTION);
        };

        if !available.contains(&action.skill) {
            warn!("{} picked unavailable skill {}", self.agent.name(), action.skill);
            self.log(format!("Boss cannot use {} now.", action.skill));
            return self.settle_skipped_turn(state_before, Some(action), reward::INVALID_ACTION);
        }

        let hp_before = self.boss.current_hp();
        if let Err(err) = self.boss.apply_skill_effect_and_cd(action.skill) {
            warn!("{} failed: {}", action.skill, err);
            self.log(format!("Boss failed to use {}: {}", action.skill, err));
            return self.settle_skipped_turn(state_before, Some(action), reward::INVALID_ACTION);
        }
        self.log(format!("Boss uses {}.", action.skill));

        let (effect, reward) = self.resolve_skill(&action, hp_before);
        self.destroyed_this_round += effect.kills() as u32;
        for hit in &effect.hits {
            self.log(format!(
                "- Hits {} at {} for {}{}",
                hit.kind,
                hit.cell,
                hit.damage,
                if hit.killed { ", destroyed!" } else { "" }
            ));
        }

        self.settle_boss_turn(state_before, Some(action), effect, reward)
    }

    /// Runs after the skill's cost and cooldown were applied.
    fn resolve_skill(&mut self, action: &BossAction, hp_before: i32) -> (SkillEffect, f32) {
        let spec = action.skill.spec();

        match action.skill {
            Skill::NormalAttack => {
                let target = action.params.targets().first().copied();
                let effect = resolve_single_target(&mut self.board, target, spec.power);
                let available_after = self.boss.available_skills().len();
                let reward = reward::normal_attack(&effect, available_after);
                (effect, reward)
            }
            Skill::HorizontalShot | Skill::VerticalShot => {
                let axis = action.skill.axis().unwrap_or(Axis::Row);
                let (index, direction) = match action.params {
                    SkillParams::Line { index, direction } => (index, direction),
                    _ => (0, BeamDirection::Forward),
                };
                self.log(format!(
                    "- {} (4 charges) on line {} dir {}",
                    action.skill,
                    index,
                    direction.label(axis)
                ));
                let path = self.board.line(axis, index, direction);
                let effect = resolve_beam(
                    &mut self.board,
                    &path,
                    BEAM_CHARGES,
                    spec.power,
                    spec.unblockable,
                );
                let reward = reward::beam(&effect);
                (effect, reward)
            }
            Skill::Heal => {
                let effect = SkillEffect::healing(self.boss.current_hp() - hp_before);
                let reward = reward::heal(
                    self.current_round,
                    self.boss.current_hp(),
                    self.boss.max_hp,
                );
                (effect, reward)
            }
            Skill::Ultimate => {
                self.ultimate_uses += 1;
                let effect = resolve_multi_target(
                    &mut self.board,
                    action.params.targets(),
                    spec.power,
                    ULTIMATE_MAX_TARGETS,
                );
                let reward = reward::ultimate(
                    &effect,
                    self.ultimate_uses,
                    self.current_round == self.config.max_rounds,
                );
                (effect, reward)
            }
        }
    }

    /// A turn where no skill took effect: flat penalty, plus the round limit
    /// bonus when this was the last round. No survival bonus.
    fn settle_skipped_turn(
        &mut self,
        state_before: EncodedState,
        action: Option<BossAction>,
        mut reward: f32,
    ) -> BossTurnResult {
        let mut outcome = None;
        if self.current_round >= self.config.max_rounds && self.boss.is_alive() {
            reward += reward::ROUND_LIMIT_SURVIVED;
            outcome = Some(GameOutcome::BossSurvived {
                rounds: self.config.max_rounds,
            });
        }
        self.phase = Phase::RoundEnd;

        self.build_turn_result(state_before, action, SkillEffect::default(), reward, outcome)
    }

    /// Adds the end-of-turn terminal adjustment and builds the transition.
    fn settle_boss_turn(
        &mut self,
        state_before: EncodedState,
        action: Option<BossAction>,
        effect: SkillEffect,
        mut reward: f32,
    ) -> BossTurnResult {
        let mut outcome = None;

        if self.board.is_empty() && self.destroyed_this_round > 0 {
            reward += reward::BOARD_WIPED;
            self.log("All player units destroyed by Boss this round!".to_string());
            self.finish(GameOutcome::BoardWiped);
            outcome = Some(GameOutcome::BoardWiped);
        } else if !self.boss.is_alive() {
            reward += reward::BOSS_DEFEATED;
            self.finish(GameOutcome::BossDefeated);
            outcome = Some(GameOutcome::BossDefeated);
        } else if self.current_round >= self.config.max_rounds {
            reward += reward::ROUND_LIMIT_SURVIVED;
            self.phase = Phase::RoundEnd;
            outcome = Some(GameOutcome::BossSurvived {
                rounds: self.config.max_rounds,
            });
        } else {
            reward += reward::ROUND_SURVIVED;
            self.phase = Phase::RoundEnd;
        }

        self.build_turn_result(state_before, action, effect, reward, outcome)
    }

    fn build_turn_result(
        &self,
        state_before: EncodedState,
        action: Option<BossAction>,
        effect: SkillEffect,
        reward: f32,
        outcome: Option<GameOutcome>,
    ) -> BossTurnResult {
        let transition = Transition {
            state_before,
            action_index: action.as_ref().map(|a| a.action_index),
            reward,
            state_after: self.encode_state(),
            done: outcome.is_some(),
        };
        debug!(
            "Boss turn: action={:?} reward={} done={}",
            transition.action_index, transition.reward, transition.done
        );

        BossTurnResult {
            transition,
            action,
            effect,
            outcome,
        }
    }

    /// Ends the episode if the boss is dead or outlasted the round limit.
    pub fn check_game_over_conditions(&mut self) -> Option<GameOutcome> {
        let outcome = if self.current_round >= self.config.max_rounds && self.boss.is_alive() {
            GameOutcome::BossSurvived {
                rounds: self.config.max_rounds,
            }
        } else if !self.boss.is_alive() {
            GameOutcome::BossDefeated
        } else {
            return None;
        };

        self.finish(outcome);
        Some(outcome)
    }

    pub fn proceed_to_next_round(&mut self) -> RoundAdvance {
        if let (Phase::GameOver, Some(outcome)) = (self.phase, self.outcome) {
            return RoundAdvance::GameOver(outcome);
        }
        if let Some(outcome) = self.check_game_over_conditions() {
            return RoundAdvance::GameOver(outcome);
        }

        self.setup_new_round();
        RoundAdvance::NewRound(self.current_round)
    }

    fn finish(&mut self, outcome: GameOutcome) {
        if self.outcome.is_none() {
            info!("{}", outcome);
            self.log(outcome.to_string());
        }
        self.phase = Phase::GameOver;
        self.outcome = Some(outcome);
    }

    /// Feeds a boss transition to the agent. Transitions without an action are skipped.
    pub fn learn(&mut self, transition: &Transition) {
        if let Some(action_index) = transition.action_index {
            self.agent.learn(
                &transition.state_before,
                action_index,
                transition.reward,
                &transition.state_after,
                transition.done,
                &mut self.rng,
            );
        }
    }
}
