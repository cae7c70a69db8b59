mod board;
mod boss;
mod unit;

pub use board::{Board, GRID_SIZE};
pub use boss::{BOSS_MAX_HP, BOSS_MAX_RAGE, Boss, RageEffect, SKILL_SPECS, Skill, SkillSpec};
pub use unit::{Unit, UnitKind};
