//! Boss decision making: the policy contract, scripted play and learning agents

mod action;
mod agent;
pub mod heuristic;
pub mod rl;

pub use action::{BossAction, SkillParams};
pub use agent::PolicyAgent;
