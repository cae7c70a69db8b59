//! Rule-based pieces: targeting shared by every boss policy, the scripted
//! fallback boss and the random training opponent.

mod random_player;
mod scripted;
pub mod targeting;

pub use random_player::RandomPlayer;
pub use scripted::ScriptedAgent;
pub use targeting::skill_params;
