use std::path::Path;

use rand::RngCore;

use crate::error::AgentError;
use crate::planners::rl::EncodedState;
use crate::state::{Board, Skill};

use super::action::BossAction;

/// A boss-control policy.
///
/// The combat engine only talks to this trait, so value tables, networks and
/// scripted bosses are interchangeable.
pub trait PolicyAgent {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Current exploration rate
    fn epsilon(&self) -> f64;

    /// Picks a skill among `available` (never outside it) together with its
    /// targeting parameters. Returns `None` only if `available` is empty.
    fn choose_action(
        &mut self,
        state: &EncodedState,
        available: &[Skill],
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Option<BossAction>;

    /// Updates the value estimate from one transition.
    fn learn(
        &mut self,
        state: &EncodedState,
        action_index: usize,
        reward: f32,
        next_state: &EncodedState,
        done: bool,
        rng: &mut dyn RngCore,
    );

    /// Overrides the exploration rate, e.g. 0.0 for greedy evaluation.
    /// Policies that never explore ignore it.
    fn set_epsilon(&mut self, _epsilon: f64) {}

    fn save(&self, path: &Path) -> Result<(), AgentError>;

    /// Restores a saved policy. A missing file is logged and ignored.
    fn load(&mut self, path: &Path) -> Result<(), AgentError>;
}
