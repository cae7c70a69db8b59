pub mod error;
pub mod game;
pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use error::{AgentError, PlacementError, SkillError};
pub use game::{CombatEngine, GameConfig, GameOutcome, Phase};
pub use infra::Cell;
pub use planners::{BossAction, PolicyAgent, SkillParams};
pub use state::{Board, Boss, Skill, Unit, UnitKind};

/// CPU backend with autodiff used to train the network agent
#[cfg(feature = "rl")]
pub type TrainingBackend = burn::backend::Autodiff<burn::backend::NdArray>;
