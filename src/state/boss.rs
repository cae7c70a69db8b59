use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SkillError;
use crate::infra::Axis;

/// Boss skills in their fixed action-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    NormalAttack,
    HorizontalShot,
    VerticalShot,
    Heal,
    Ultimate,
}

impl Skill {
    pub const COUNT: usize = 5;
    pub const ALL: [Skill; Skill::COUNT] = [
        Skill::NormalAttack,
        Skill::HorizontalShot,
        Skill::VerticalShot,
        Skill::Heal,
        Skill::Ultimate,
    ];

    /// Stable action index. Persisted policies depend on this mapping.
    pub fn index(self) -> usize {
        match self {
            Skill::NormalAttack => 0,
            Skill::HorizontalShot => 1,
            Skill::VerticalShot => 2,
            Skill::Heal => 3,
            Skill::Ultimate => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Skill> {
        Skill::ALL.get(index).copied()
    }

    pub fn key(self) -> &'static str {
        match self {
            Skill::NormalAttack => "normal_attack",
            Skill::HorizontalShot => "horizontal_shot",
            Skill::VerticalShot => "vertical_shot",
            Skill::Heal => "heal",
            Skill::Ultimate => "ultimate",
        }
    }

    pub fn spec(self) -> &'static SkillSpec {
        &SKILL_SPECS[self.index()]
    }

    /// Beam orientation for the line skills.
    pub fn axis(self) -> Option<Axis> {
        match self {
            Skill::HorizontalShot => Some(Axis::Row),
            Skill::VerticalShot => Some(Axis::Column),
            _ => None,
        }
    }

    /// Whether the skill's cooldown timer is ever set after use.
    pub fn tracks_cooldown(self) -> bool {
        !matches!(self, Skill::NormalAttack | Skill::Ultimate)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RageEffect {
    Gain(u32),
    Cost(u32),
}

/// Immutable skill descriptor.
#[derive(Debug, Clone, Copy)]
pub struct SkillSpec {
    pub name: &'static str,
    pub cooldown: u32,
    pub rage: RageEffect,
    /// Damage per hit, or hp restored for heal
    pub power: i32,
    pub unblockable: bool,
}

pub const SKILL_SPECS: [SkillSpec; Skill::COUNT] = [
    SkillSpec {
        name: "Normal Attack",
        cooldown: 0,
        rage: RageEffect::Gain(1),
        power: 1,
        unblockable: false,
    },
    SkillSpec {
        name: "Horizontal Shot",
        cooldown: 2,
        rage: RageEffect::Gain(1),
        power: 1,
        unblockable: false,
    },
    SkillSpec {
        name: "Vertical Shot",
        cooldown: 2,
        rage: RageEffect::Gain(1),
        power: 1,
        unblockable: false,
    },
    SkillSpec {
        name: "Heal",
        cooldown: 3,
        rage: RageEffect::Gain(1),
        power: 10,
        unblockable: false,
    },
    SkillSpec {
        name: "Ultimate",
        cooldown: 0,
        rage: RageEffect::Cost(3),
        power: 2,
        unblockable: true,
    },
];

pub const BOSS_MAX_HP: i32 = 70;
pub const BOSS_MAX_RAGE: u32 = 3;

/// The boss: hp, rage and per-skill cooldown timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boss {
    pub max_hp: i32,
    current_hp: i32,
    pub max_rage: u32,
    current_rage: u32,
    cooldowns: [u32; Skill::COUNT],
}

impl Default for Boss {
    fn default() -> Self {
        Self::new()
    }
}

impl Boss {
    pub fn new() -> Self {
        Self {
            max_hp: BOSS_MAX_HP,
            current_hp: BOSS_MAX_HP,
            max_rage: BOSS_MAX_RAGE,
            current_rage: 0,
            cooldowns: [0; Skill::COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.current_hp = self.max_hp;
        self.current_rage = 0;
        self.cooldowns = [0; Skill::COUNT];
    }

    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    pub fn current_rage(&self) -> u32 {
        self.current_rage
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn hp_fraction(&self) -> f32 {
        self.current_hp as f32 / self.max_hp as f32
    }

    /// Overrides hp, clamped to `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: i32) {
        self.current_hp = hp.clamp(0, self.max_hp);
    }

    /// Overrides rage, clamped to `[0, max_rage]`.
    pub fn set_rage(&mut self, rage: u32) {
        self.current_rage = rage.min(self.max_rage);
    }

    /// Applies damage. Returns `true` if the boss died.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.current_hp = (self.current_hp - amount.max(0)).max(0);
        self.current_hp == 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.current_hp = (self.current_hp + amount.max(0)).min(self.max_hp);
    }

    pub fn gain_rage(&mut self, amount: u32) {
        self.current_rage = (self.current_rage + amount).min(self.max_rage);
    }

    /// Spends rage if enough is available.
    pub fn use_rage(&mut self, amount: u32) -> bool {
        if self.current_rage >= amount {
            self.current_rage -= amount;
            true
        } else {
            false
        }
    }

    pub fn cooldown(&self, skill: Skill) -> u32 {
        self.cooldowns[skill.index()]
    }

    pub fn set_cooldown(&mut self, skill: Skill, timer: u32) {
        if skill.tracks_cooldown() {
            self.cooldowns[skill.index()] = timer;
        }
    }

    pub fn is_available(&self, skill: Skill) -> bool {
        if self.cooldown(skill) != 0 {
            return false;
        }
        match skill.spec().rage {
            RageEffect::Cost(cost) => self.current_rage >= cost,
            RageEffect::Gain(_) => true,
        }
    }

    /// Currently usable skills, in action-index order.
    pub fn available_skills(&self) -> Vec<Skill> {
        Skill::ALL
            .into_iter()
            .filter(|skill| self.is_available(*skill))
            .collect()
    }

    /// Pays the skill's cost, applies its self effects and starts its cooldown.
    pub fn apply_skill_effect_and_cd(&mut self, skill: Skill) -> Result<(), SkillError> {
        let spec = skill.spec();

        match spec.rage {
            RageEffect::Cost(cost) => {
                if !self.use_rage(cost) {
                    return Err(SkillError::InsufficientRage {
                        required: cost,
                        available: self.current_rage,
                    });
                }
            }
            RageEffect::Gain(gain) => {
                if skill == Skill::Heal {
                    self.heal(spec.power);
                }
                self.gain_rage(gain);
            }
        }

        if skill.tracks_cooldown() {
            self.cooldowns[skill.index()] = spec.cooldown;
        }

        Ok(())
    }

    /// Ticks every running cooldown down by one round.
    pub fn decrement_cooldowns(&mut self) {
        for timer in &mut self.cooldowns {
            *timer = timer.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_boss() {
        let boss = Boss::new();
        assert_eq!(boss.current_hp(), 70);
        assert_eq!(boss.current_rage(), 0);
        assert_eq!(
            boss.available_skills(),
            vec![
                Skill::NormalAttack,
                Skill::HorizontalShot,
                Skill::VerticalShot,
                Skill::Heal
            ]
        );
    }

    #[test]
    fn test_skill_index_round_trip() {
        for skill in Skill::ALL {
            assert_eq!(Skill::from_index(skill.index()), Some(skill));
        }
        assert_eq!(Skill::from_index(5), None);
        assert_eq!(Skill::Ultimate.key(), "ultimate");
    }

    #[test]
    fn test_heal_restores_and_grants_rage() {
        let mut boss = Boss::new();
        boss.set_hp(65);
        boss.set_rage(3);
        boss.apply_skill_effect_and_cd(Skill::Heal).unwrap();
        assert_eq!(boss.current_hp(), 70);
        assert_eq!(boss.current_rage(), 3);
        assert_eq!(boss.cooldown(Skill::Heal), 3);

        boss.set_hp(20);
        boss.set_rage(0);
        boss.apply_skill_effect_and_cd(Skill::Heal).unwrap();
        assert_eq!(boss.current_hp(), 30);
        assert_eq!(boss.current_rage(), 1);
    }

    #[test]
    fn test_ultimate_requires_rage() {
        let mut boss = Boss::new();
        boss.set_rage(2);
        assert!(!boss.is_available(Skill::Ultimate));
        assert_eq!(
            boss.apply_skill_effect_and_cd(Skill::Ultimate),
            Err(SkillError::InsufficientRage {
                required: 3,
                available: 2
            })
        );
        assert_eq!(boss.current_rage(), 2);

        boss.gain_rage(5);
        assert_eq!(boss.current_rage(), 3);
        assert!(boss.is_available(Skill::Ultimate));
        boss.apply_skill_effect_and_cd(Skill::Ultimate).unwrap();
        assert_eq!(boss.current_rage(), 0);
        assert_eq!(boss.cooldown(Skill::Ultimate), 0);
    }

    #[test]
    fn test_cooldowns_only_on_tracked_skills() {
        let mut boss = Boss::new();
        boss.apply_skill_effect_and_cd(Skill::NormalAttack).unwrap();
        assert_eq!(boss.cooldown(Skill::NormalAttack), 0);
        boss.apply_skill_effect_and_cd(Skill::HorizontalShot).unwrap();
        boss.apply_skill_effect_and_cd(Skill::VerticalShot).unwrap();
        assert_eq!(boss.cooldown(Skill::HorizontalShot), 2);
        assert_eq!(boss.cooldown(Skill::VerticalShot), 2);
        assert!(!boss.is_available(Skill::HorizontalShot));
        assert_eq!(boss.current_rage(), 3);

        boss.set_cooldown(Skill::NormalAttack, 4);
        assert_eq!(boss.cooldown(Skill::NormalAttack), 0);
    }

    #[test]
    fn test_decrement_cooldowns_floors_at_zero() {
        let mut boss = Boss::new();
        boss.apply_skill_effect_and_cd(Skill::Heal).unwrap();
        for _ in 0..5 {
            boss.decrement_cooldowns();
        }
        assert_eq!(boss.cooldown(Skill::Heal), 0);
        assert_eq!(boss.cooldown(Skill::NormalAttack), 0);
    }

    #[test]
    fn test_available_skills_is_idempotent() {
        let mut boss = Boss::new();
        boss.apply_skill_effect_and_cd(Skill::VerticalShot).unwrap();
        let first = boss.available_skills();
        let second = boss.available_skills();
        assert_eq!(first, second);
    }

    #[test]
    fn test_hp_clamped() {
        let mut boss = Boss::new();
        assert!(boss.take_damage(100));
        assert_eq!(boss.current_hp(), 0);
        boss.heal(500);
        assert_eq!(boss.current_hp(), 70);
        boss.set_hp(-3);
        assert_eq!(boss.current_hp(), 0);
    }
}
