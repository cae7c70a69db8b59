//! Function-approximation boss policy trained from replayed experience

use std::fs;
use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{Adam, AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use burn::tensor::ElementConversion;
use burn::tensor::backend::AutodiffBackend;
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::planners::heuristic::skill_params;
use crate::planners::{BossAction, PolicyAgent};
use crate::state::{Board, Skill};

use super::action_space::{ActionMask, EpsilonSchedule};
use super::encoder::EncodedState;
use super::policy::{QNetwork, QNetworkConfig, states_to_tensor};
use super::replay::{Experience, ReplayBuffer};

/// Training configuration for the network agent
#[derive(Debug, Clone)]
pub struct ApproximateConfig {
    /// Network shape
    pub network: QNetworkConfig,
    /// Adam learning rate
    pub learning_rate: f64,
    /// Discount applied to the bootstrapped next-state value
    pub gamma: f32,
    /// Mini-batch size; no update happens until the buffer holds this many
    pub batch_size: usize,
    /// Replay ring buffer capacity
    pub buffer_capacity: usize,
    pub epsilon: EpsilonSchedule,
}

impl Default for ApproximateConfig {
    fn default() -> Self {
        Self {
            network: QNetworkConfig::default(),
            learning_rate: 1e-3,
            gamma: 0.7,
            batch_size: 64,
            buffer_capacity: 10_000,
            epsilon: EpsilonSchedule::default(),
        }
    }
}

/// Bootstrapped regression targets `r + gamma * max_a Q(s', a) * (1 - done)`.
///
/// `next_values` is `[batch, actions]`; no gradient flows back through it.
pub(crate) fn td_targets<B: Backend>(
    rewards: Tensor<B, 1>,
    next_values: Tensor<B, 2>,
    not_done: Tensor<B, 1>,
    gamma: f32,
) -> Tensor<B, 1> {
    let next_max = next_values.detach().max_dim(1).squeeze::<1>(1);
    rewards + next_max * not_done * gamma
}

/// Epsilon-greedy agent backed by a small Q-network.
///
/// Each transition goes into the replay buffer; once a full batch is
/// available, one Adam step minimizes the squared error against
/// `r + γ · max_a Q(s', a) · (1 − done)`.
pub struct ApproximateAgent<B: AutodiffBackend> {
    config: ApproximateConfig,
    model: QNetwork<B>,
    optimizer: OptimizerAdaptor<Adam, QNetwork<B>, B>,
    buffer: ReplayBuffer,
    schedule: EpsilonSchedule,
    device: B::Device,
    updates: usize,
    last_loss: Option<f32>,
}

impl<B: AutodiffBackend> ApproximateAgent<B> {
    pub fn new(device: B::Device, config: ApproximateConfig) -> Self {
        let model = QNetwork::new(&device, &config.network);
        let optimizer = AdamConfig::new().init::<B, QNetwork<B>>();

        Self {
            buffer: ReplayBuffer::new(config.buffer_capacity),
            schedule: config.epsilon,
            model,
            optimizer,
            device,
            updates: 0,
            last_loss: None,
            config,
        }
    }

    pub fn config(&self) -> &ApproximateConfig {
        &self.config
    }

    pub fn q_values(&self, state: &EncodedState) -> Vec<f32> {
        self.model.q_values(state, &self.device)
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Gradient steps performed so far
    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn last_loss(&self) -> Option<f32> {
        self.last_loss
    }

    /// Weights file written by the recorder for `path`
    pub fn model_path(path: &Path) -> PathBuf {
        path.with_extension("mpk")
    }

    /// One gradient step on `batch`, returning the loss
    fn train_step(&mut self, batch: &[Experience]) -> f32 {
        let batch_size = batch.len();

        let states: Vec<EncodedState> = batch.iter().map(|e| e.state).collect();
        let next_states: Vec<EncodedState> = batch.iter().map(|e| e.next_state).collect();
        let actions: Vec<i64> = batch.iter().map(|e| e.action as i64).collect();
        let rewards: Vec<f32> = batch.iter().map(|e| e.reward).collect();
        let not_done: Vec<f32> = batch
            .iter()
            .map(|e| if e.done { 0.0 } else { 1.0 })
            .collect();

        let states_tensor = states_to_tensor::<B>(&states, &self.device);
        let next_states_tensor = states_to_tensor::<B>(&next_states, &self.device);
        let actions_tensor = Tensor::<B, 1, Int>::from_ints(actions.as_slice(), &self.device)
            .reshape([batch_size, 1]);
        let rewards_tensor = Tensor::<B, 1>::from_floats(rewards.as_slice(), &self.device);
        let not_done_tensor = Tensor::<B, 1>::from_floats(not_done.as_slice(), &self.device);

        let next_values = self.model.forward(next_states_tensor);
        let target = td_targets(
            rewards_tensor,
            next_values,
            not_done_tensor,
            self.config.gamma,
        );

        let predicted = self
            .model
            .forward(states_tensor)
            .gather(1, actions_tensor)
            .squeeze::<1>(1);
        let loss = (predicted - target.detach()).powf_scalar(2.0).mean();
        let loss_value = loss.clone().into_scalar().elem::<f32>();

        // Backward pass
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.model);

        // Update model
        self.model = self
            .optimizer
            .step(self.config.learning_rate, self.model.clone(), grads);

        loss_value
    }
}

impl<B: AutodiffBackend> PolicyAgent for ApproximateAgent<B> {
    fn name(&self) -> &'static str {
        "dqn"
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
        if !mask.has_actions() {
            return None;
        }

        let index = if self.schedule.explore(rng) {
            mask.sample(rng)?
        } else {
            mask.masked_argmax(&self.q_values(state))?
        };
        let skill = Skill::from_index(index)?;

        Some(BossAction::new(skill, skill_params(skill, board, rng)))
    }

    fn learn(
        &mut self,
        state: &EncodedState,
        action_index: usize,
        reward: f32,
        next_state: &EncodedState,
        done: bool,
        rng: &mut dyn RngCore,
    ) {
        if action_index >= self.config.network.num_actions {
            warn!("Ignoring transition with action index {}", action_index);
            return;
        }

        self.buffer.push(Experience {
            state: *state,
            action: action_index,
            reward,
            next_state: *next_state,
            done,
        });

        let Some(batch) = self.buffer.sample(self.config.batch_size, rng) else {
            return;
        };

        let loss = self.train_step(&batch);
        self.updates += 1;
        self.last_loss = Some(loss);
        self.schedule.decay();

        if self.updates % 1000 == 0 {
            debug!(
                "DQN update {}: loss={:.4}, epsilon={:.4}",
                self.updates, loss, self.schedule.epsilon
            );
        }
    }

    fn save(&self, path: &Path) -> Result<(), AgentError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        self.model
            .clone()
            .save_file(path.to_path_buf(), &recorder)
            .map_err(|err| AgentError::Recorder(format!("{err:?}")))?;
        info!("Saved model to {}", Self::model_path(path).display());
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<(), AgentError> {
        if !Self::model_path(path).exists() {
            warn!(
                "No model at {}, starting fresh",
                Self::model_path(path).display()
            );
            return Ok(());
        }

        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        self.model = self
            .model
            .clone()
            .load_file(path.to_path_buf(), &recorder, &self.device)
            .map_err(|err| AgentError::Recorder(format!("{err:?}")))?;
        info!("Loaded model from {}", Self::model_path(path).display());
        Ok(())
    }
}
