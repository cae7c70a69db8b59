//! Reward shaping for the boss policy.
//!
//! Every constant here is part of the contract with already-trained policies;
//! changing one silently invalidates them.

use crate::state::UnitKind;

use super::resolution::SkillEffect;

pub const NO_ACTION: f32 = -10.0;
pub const INVALID_ACTION: f32 = -10.0;

pub const BOSS_DEFEATED: f32 = -100.0;
pub const BOARD_WIPED: f32 = 100.0;
pub const ROUND_LIMIT_SURVIVED: f32 = 150.0;
pub const ROUND_SURVIVED: f32 = 2.0;

pub const TANK_HIT: f32 = -10.0;
/// Replaces `TANK_HIT` for the killing blow of a single or ultimate hit.
/// Beams charge `TANK_HIT` per absorbed charge and add this on top.
pub const TANK_KILL: f32 = -20.0;

pub const NORMAL_ATTACK_WASTED: f32 = -5.0;
pub const NORMAL_ATTACK_KILL: f32 = 1.0;
pub const NORMAL_ATTACK_DAMAGE: f32 = 0.0;
pub const NORMAL_ATTACK_MISS: f32 = -10.0;

pub const BEAM_DAMAGE: f32 = 5.0;
pub const BEAM_KILL: f32 = 15.0;
pub const BEAM_EMPTY_LINE: f32 = -2.0;

pub const ULTIMATE_DAMAGE: f32 = 8.0;
pub const ULTIMATE_KILL: f32 = 25.0;
pub const ULTIMATE_PER_UNIT_BONUS: f32 = 2.0;
pub const ULTIMATE_WHIFF: f32 = -2.0;
pub const ULTIMATE_SECOND_USE: f32 = 50.0;
pub const ULTIMATE_FINAL_ROUND: f32 = 50.0;

pub const HEAL_FIRST_ROUND: f32 = -30.0;
pub const HEAL_CRITICAL: f32 = 10.0;
pub const HEAL_LOW: f32 = 5.0;
pub const HEAL_NEAR_FULL: f32 = -10.0;
pub const HEAL_OTHER: f32 = 1.0;

/// Boss-side reward for the player's attack phase.
pub fn player_attack(total_damage: i32, boss_died: bool) -> f32 {
    let mut reward = -(total_damage as f32);
    if boss_died {
        reward += BOSS_DEFEATED;
    }
    reward
}

/// `available_after_cast` counts every usable skill, normal attack included,
/// once the attack's rage gain has been applied.
pub fn normal_attack(effect: &SkillEffect, available_after_cast: usize) -> f32 {
    let mut reward = 0.0;
    if available_after_cast > 2 {
        reward += NORMAL_ATTACK_WASTED;
    }

    match effect.hits.first() {
        Some(hit) => {
            reward += match (hit.kind, hit.killed) {
                (UnitKind::Tank, true) => TANK_KILL,
                (UnitKind::Tank, false) => TANK_HIT,
                (_, true) => NORMAL_ATTACK_KILL,
                (_, false) => NORMAL_ATTACK_DAMAGE,
            };
        }
        None => reward += NORMAL_ATTACK_MISS,
    }

    reward
}

pub fn beam(effect: &SkillEffect) -> f32 {
    if effect.hits.is_empty() {
        return BEAM_EMPTY_LINE;
    }

    effect
        .hits
        .iter()
        .map(|hit| match hit.kind {
            UnitKind::Tank => {
                let mut r = TANK_HIT * hit.charges as f32;
                if hit.killed {
                    r += TANK_KILL;
                }
                r
            }
            _ if hit.killed => BEAM_KILL,
            _ => BEAM_DAMAGE,
        })
        .sum()
}

/// `uses_this_episode` includes the current cast.
pub fn ultimate(effect: &SkillEffect, uses_this_episode: u32, final_round: bool) -> f32 {
    let mut reward: f32 = effect
        .hits
        .iter()
        .map(|hit| match (hit.kind, hit.killed) {
            (UnitKind::Tank, true) => TANK_KILL,
            (UnitKind::Tank, false) => TANK_HIT,
            (_, true) => ULTIMATE_KILL,
            (_, false) => ULTIMATE_DAMAGE,
        })
        .sum();

    let units_hit = effect.units_hit();
    if units_hit == 0 && !effect.targeted.is_empty() {
        reward += ULTIMATE_WHIFF;
    } else if units_hit > 2 {
        reward += ULTIMATE_PER_UNIT_BONUS * units_hit as f32;
    }

    if uses_this_episode == 2 {
        reward += ULTIMATE_SECOND_USE;
    }
    if final_round {
        reward += ULTIMATE_FINAL_ROUND;
    }

    reward
}

/// Scored against the boss hp after the heal landed.
pub fn heal(current_round: u32, hp_after: i32, max_hp: i32) -> f32 {
    let mut reward = 0.0;
    if current_round == 1 {
        reward += HEAL_FIRST_ROUND;
    }

    let hp = f64::from(hp_after);
    let max = f64::from(max_hp);
    reward += if hp < max * 0.3 {
        HEAL_CRITICAL
    } else if hp < max * 0.6 {
        HEAL_LOW
    } else if hp > max * 0.9 {
        HEAL_NEAR_FULL
    } else {
        HEAL_OTHER
    };

    reward
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resolution::Hit;
    use crate::infra::Cell;

    fn hit(kind: UnitKind, charges: u32, killed: bool) -> Hit {
        Hit {
            cell: Cell::new(0, 0),
            kind,
            charges,
            damage: charges as i32,
            killed,
        }
    }

    fn effect(hits: Vec<Hit>) -> SkillEffect {
        SkillEffect {
            targeted: hits.iter().map(|h| h.cell).collect(),
            hits,
            ..SkillEffect::default()
        }
    }

    #[test]
    fn test_player_attack_reward() {
        assert_eq!(player_attack(2, false), -2.0);
        assert_eq!(player_attack(5, true), -105.0);
        assert_eq!(player_attack(0, false), 0.0);
    }

    #[test]
    fn test_normal_attack_rewards() {
        assert_eq!(normal_attack(&effect(vec![hit(UnitKind::Tank, 1, true)]), 0), -20.0);
        assert_eq!(normal_attack(&effect(vec![hit(UnitKind::Tank, 1, false)]), 0), -10.0);
        assert_eq!(normal_attack(&effect(vec![hit(UnitKind::Ad, 1, true)]), 0), 1.0);
        assert_eq!(normal_attack(&effect(vec![hit(UnitKind::Knight, 1, false)]), 2), 0.0);
        assert_eq!(normal_attack(&SkillEffect::default(), 0), -10.0);
        assert_eq!(normal_attack(&effect(vec![hit(UnitKind::Ad, 1, true)]), 3), -4.0);
        // normal attack plus both shots is already a wasted turn
        assert_eq!(normal_attack(&effect(vec![hit(UnitKind::Knight, 1, false)]), 3), -5.0);
    }

    #[test]
    fn test_beam_rewards() {
        // Lone tank soaking three charges and dying
        assert_eq!(beam(&effect(vec![hit(UnitKind::Tank, 3, true)])), -50.0);
        assert_eq!(beam(&effect(vec![hit(UnitKind::Tank, 2, false)])), -20.0);
        assert_eq!(
            beam(&effect(vec![
                hit(UnitKind::Knight, 1, false),
                hit(UnitKind::Ad, 1, true)
            ])),
            20.0
        );
        assert_eq!(beam(&SkillEffect::default()), -2.0);
    }

    #[test]
    fn test_ultimate_rewards() {
        let two_ads = effect(vec![hit(UnitKind::Ad, 1, true), hit(UnitKind::Ad, 1, true)]);
        assert_eq!(ultimate(&two_ads, 1, false), 50.0);
        assert_eq!(ultimate(&two_ads, 2, false), 100.0);
        assert_eq!(ultimate(&two_ads, 2, true), 150.0);

        let three = effect(vec![
            hit(UnitKind::Knight, 1, false),
            hit(UnitKind::Knight, 1, true),
            hit(UnitKind::Tank, 1, false),
        ]);
        assert_eq!(ultimate(&three, 1, false), 8.0 + 25.0 - 10.0 + 6.0);

        // a Tank kill is a flat -20, the -10 hit penalty is not added on top
        let tank_kill = effect(vec![hit(UnitKind::Tank, 1, true)]);
        assert_eq!(ultimate(&tank_kill, 1, false), -20.0);
        let tank_kill_and_ad = effect(vec![
            hit(UnitKind::Tank, 1, true),
            hit(UnitKind::Ad, 1, false),
        ]);
        assert_eq!(ultimate(&tank_kill_and_ad, 1, false), -20.0 + 8.0);

        let whiff = SkillEffect {
            targeted: vec![Cell::new(1, 1)],
            ..SkillEffect::default()
        };
        assert_eq!(ultimate(&whiff, 1, false), -2.0);
    }

    #[test]
    fn test_heal_rewards() {
        assert_eq!(heal(1, 70, 70), -40.0);
        assert_eq!(heal(3, 20, 70), 10.0);
        assert_eq!(heal(3, 21, 70), 5.0);
        assert_eq!(heal(3, 41, 70), 5.0);
        assert_eq!(heal(3, 42, 70), 1.0);
        assert_eq!(heal(3, 63, 70), 1.0);
        assert_eq!(heal(3, 64, 70), -10.0);
    }
}
