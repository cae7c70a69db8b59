//! Combat rules: round flow, skill resolution and reward shaping.

mod combat;
mod outcome;
pub mod resolution;
pub mod reward;
mod stock;

pub use combat::{CombatEngine, GameConfig};
pub use outcome::{
    BossTurnResult, GameOutcome, Phase, PlayerPhaseResult, PlayerPhaseStatus, RoundAdvance,
    Transition,
};
pub use resolution::{Hit, SkillEffect};
pub use stock::PlacementStock;
