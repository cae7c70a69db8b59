//! Learning boss policies: a value table and a Burn Q-network
//!
//! Both agents implement [`PolicyAgent`](crate::planners::PolicyAgent) and share
//! the same encoder, action space and epsilon-greedy schedule, so a trained
//! table and a trained network are drop-in replacements for each other.
//!
//! # Architecture
//!
//! ```text
//! CombatEngine (board, boss, round)
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  StateEncoder                                               │
//! │  - 9 integers: hp, rage, 3 cooldowns, unit counts, round    │
//! └─────────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ActionMask                                                 │
//! │  - 5 fixed skill indices, unavailable skills masked out     │
//! └─────────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  TabularAgent            │  ApproximateAgent                │
//! │  - HashMap<key, [f64;5]> │  - QNetwork 9 → 64 → 5           │
//! │  - reward-only update    │  - replay buffer + Adam          │
//! └─────────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Targeting heuristic                                        │
//! │  - Fills in cells / line for the chosen skill               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// Core modules that don't depend on Burn
pub mod action_space;
pub mod encoder;
pub mod metrics;
pub mod replay;
pub mod tabular;
pub mod train;

// Burn-dependent modules
#[cfg(feature = "rl")]
pub mod dqn;
#[cfg(feature = "rl")]
pub mod policy;

// Re-export commonly used types
pub use action_space::{ActionMask, EpsilonSchedule, NUM_ACTIONS, select_action};
#[cfg(feature = "rl")]
pub use dqn::{ApproximateAgent, ApproximateConfig};
pub use encoder::{EncodedState, STATE_SIZE, StateEncoder, StateKey};
pub use metrics::{EpisodeSummary, MovingAverage, TrainingMetrics};
#[cfg(feature = "rl")]
pub use policy::{QNetwork, QNetworkConfig};
pub use replay::{Experience, ReplayBuffer};
pub use tabular::{TabularAgent, TabularConfig};
pub use train::{TrainConfig, Trainer};
