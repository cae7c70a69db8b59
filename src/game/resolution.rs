//! Board-side effects of boss skills.

use crate::infra::Cell;
use crate::state::{Board, UnitKind};

/// Damage charges carried by a line skill
pub const BEAM_CHARGES: u32 = 4;

/// Maximum distinct cells struck by the ultimate
pub const ULTIMATE_MAX_TARGETS: usize = 6;

/// One unit struck by a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub cell: Cell,
    pub kind: UnitKind,
    /// Damage instances absorbed (beam charges, or 1 for single strikes)
    pub charges: u32,
    pub damage: i32,
    pub killed: bool,
}

/// Everything a skill did to the board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkillEffect {
    /// Cells the skill aimed at, in resolution order
    pub targeted: Vec<Cell>,
    pub hits: Vec<Hit>,
    /// Beam charges consumed by units
    pub charges_spent: u32,
    /// Hp the boss restored
    pub healed: i32,
}

impl SkillEffect {
    pub fn healing(amount: i32) -> Self {
        Self {
            healed: amount,
            ..Self::default()
        }
    }

    pub fn units_hit(&self) -> usize {
        self.hits.len()
    }

    pub fn kills(&self) -> usize {
        self.hits.iter().filter(|hit| hit.killed).count()
    }

    pub fn hit_cells(&self) -> Vec<Cell> {
        self.hits.iter().map(|hit| hit.cell).collect()
    }
}

/// Deals `damage` once to the unit at `cell`, removing it if it dies.
fn strike(board: &mut Board, cell: Cell, damage: i32) -> Option<Hit> {
    let unit = board.get_mut(cell)?;
    let kind = unit.kind;
    let killed = unit.take_damage(damage);
    if killed {
        board.remove(cell);
    }
    Some(Hit {
        cell,
        kind,
        charges: 1,
        damage,
        killed,
    })
}

/// Single-target strike. A missing or empty target is a miss.
pub fn resolve_single_target(board: &mut Board, target: Option<Cell>, damage: i32) -> SkillEffect {
    let mut effect = SkillEffect::default();

    if let Some(cell) = target {
        effect.targeted.push(cell);
        if let Some(hit) = strike(board, cell, damage) {
            effect.hits.push(hit);
        }
    }

    effect
}

/// Sends a beam with `charges` damage instances along `path`.
///
/// Every unit in the way eats one charge, except a blockable Tank, which soaks
/// charge after charge until it dies or the beam is spent. The beam never gets
/// past a Tank; whatever it had left is lost.
pub fn resolve_beam(
    board: &mut Board,
    path: &[Cell],
    charges: u32,
    damage: i32,
    unblockable: bool,
) -> SkillEffect {
    let mut effect = SkillEffect {
        targeted: path.to_vec(),
        ..SkillEffect::default()
    };
    let mut remaining = charges;

    for &cell in path {
        if remaining == 0 {
            break;
        }
        let Some(unit) = board.get_mut(cell) else {
            continue;
        };

        if unit.kind == UnitKind::Tank && !unblockable {
            let mut absorbed = 0;
            let mut killed = false;
            while remaining > 0 && !killed {
                killed = unit.take_damage(damage);
                remaining -= 1;
                absorbed += 1;
            }
            if killed {
                board.remove(cell);
            }

            effect.charges_spent += absorbed;
            effect.hits.push(Hit {
                cell,
                kind: UnitKind::Tank,
                charges: absorbed,
                damage: damage * absorbed as i32,
                killed,
            });
            tracing::trace!(%cell, absorbed, killed, "Tank blocked beam");
            break;
        }

        if let Some(hit) = strike(board, cell, damage) {
            remaining -= 1;
            effect.charges_spent += 1;
            effect.hits.push(hit);
        }
    }

    effect
}

/// Strikes up to `max_targets` distinct cells once each; duplicates are dropped.
pub fn resolve_multi_target(
    board: &mut Board,
    targets: &[Cell],
    damage: i32,
    max_targets: usize,
) -> SkillEffect {
    let mut effect = SkillEffect::default();

    for &cell in targets {
        if effect.targeted.len() >= max_targets {
            break;
        }
        if effect.targeted.contains(&cell) || !board.contains(cell) {
            continue;
        }
        effect.targeted.push(cell);
        if let Some(hit) = strike(board, cell, damage) {
            effect.hits.push(hit);
        }
    }

    effect
}
