//! Training loop: random player against the learning boss

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::AgentError;
use crate::game::{CombatEngine, PlayerPhaseStatus, RoundAdvance};
use crate::planners::PolicyAgent;
use crate::planners::heuristic::RandomPlayer;

use super::metrics::{EpisodeSummary, TrainingMetrics};

/// Training configuration
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to play
    pub episodes: usize,
    /// Checkpoint save frequency (episodes)
    pub save_every: usize,
    /// Progress log frequency (episodes)
    pub log_every: usize,
    /// Where the agent is saved; each agent picks its own file extension
    pub model_path: PathBuf,
    /// Moving-average window of the metrics
    pub metrics_window: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: 20_000,
            save_every: 5_000,
            log_every: 1_000,
            model_path: PathBuf::from("model/boss_agent"),
            metrics_window: 5_000,
        }
    }
}

/// Plays episodes sequentially and feeds every boss transition to the agent
pub struct Trainer {
    engine: CombatEngine,
    player: RandomPlayer,
    config: TrainConfig,
    metrics: TrainingMetrics,
}

impl Trainer {
    pub fn new(engine: CombatEngine, player: RandomPlayer, config: TrainConfig) -> Self {
        Self {
            metrics: TrainingMetrics::new(config.metrics_window),
            engine,
            player,
            config,
        }
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn agent(&self) -> &dyn PolicyAgent {
        self.engine.agent()
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    /// Hands the trained agent back to the caller
    pub fn into_agent(self) -> Box<dyn PolicyAgent> {
        self.engine.into_agent()
    }

    /// Plays one full episode and returns its summary
    pub fn run_episode(&mut self) -> EpisodeSummary {
        self.engine.start_new_game();
        let mut total_reward = 0.0;

        for _ in 0..self.engine.config().max_rounds + 2 {
            if self.engine.check_game_over_conditions().is_some() {
                break;
            }

            // Player turn
            self.player.place_units(&mut self.engine);
            let player_phase = self.engine.end_placement();
            total_reward += player_phase.reward;
            if player_phase.done || player_phase.status != PlayerPhaseStatus::BossTurn {
                break;
            }

            // Boss turn
            let turn = self.engine.process_boss_attack();
            total_reward += turn.transition.reward;
            self.engine.learn(&turn.transition);
            if turn.transition.done {
                break;
            }

            if let RoundAdvance::GameOver(_) = self.engine.proceed_to_next_round() {
                break;
            }
        }

        // A round-limit transition ends the loop before the round advances
        let outcome = match self.engine.outcome() {
            Some(outcome) => Some(outcome),
            None => self.engine.check_game_over_conditions(),
        };

        let summary = EpisodeSummary {
            total_reward,
            rounds: self.engine.current_round(),
            boss_won: outcome.is_some_and(|outcome| outcome.boss_won()),
        };
        debug!(
            "Episode finished after {} rounds: reward={:.1}, boss won={}",
            summary.rounds, summary.total_reward, summary.boss_won
        );
        summary
    }

    /// Main training loop
    pub fn train(&mut self) -> Result<(), AgentError> {
        info!(
            "Starting training of {} agent for {} episodes",
            self.engine.agent().name(),
            self.config.episodes
        );

        for episode in 1..=self.config.episodes {
            let summary = self.run_episode();
            self.metrics.record_episode(&summary);

            if self.config.log_every > 0 && episode % self.config.log_every == 0 {
                self.metrics.log_to_console(self.engine.agent().epsilon());
            }

            if self.config.save_every > 0 && episode % self.config.save_every == 0 {
                self.save_checkpoint()?;
            }
        }

        self.save_checkpoint()?;
        info!("Training complete!");
        Ok(())
    }

    /// Save the agent to the configured path
    pub fn save_checkpoint(&self) -> Result<(), AgentError> {
        self.engine.agent().save(&self.config.model_path)
    }
}
