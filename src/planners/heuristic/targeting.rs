//! Skill targeting shared by every boss policy.
//!
//! Policies only decide *which* skill to use; where it lands is decided here
//! from the board alone.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore};

use crate::game::resolution::ULTIMATE_MAX_TARGETS;
use crate::infra::{Axis, BeamDirection, Cell};
use crate::planners::SkillParams;
use crate::state::{Board, Skill, UnitKind};

/// Normal attack preference, most wanted first.
const STRIKE_PRIORITY: [UnitKind; UnitKind::COUNT] = [UnitKind::Ad, UnitKind::Knight, UnitKind::Tank];

pub fn skill_params(skill: Skill, board: &Board, rng: &mut dyn RngCore) -> SkillParams {
    match skill {
        Skill::NormalAttack => match strike_target(board, rng) {
            Some(cell) => SkillParams::Targets(vec![cell]),
            None => SkillParams::Targets(Vec::new()),
        },
        Skill::HorizontalShot => line_params(board, Axis::Row, rng),
        Skill::VerticalShot => line_params(board, Axis::Column, rng),
        Skill::Heal => SkillParams::None,
        Skill::Ultimate => SkillParams::Targets(ultimate_targets(board, rng)),
    }
}

/// Random unit from the highest-priority kind present on the board.
pub fn strike_target(board: &Board, rng: &mut dyn RngCore) -> Option<Cell> {
    STRIKE_PRIORITY
        .iter()
        .map(|kind| board.cells_of(*kind))
        .find(|cells| !cells.is_empty())
        .or_else(|| Some(board.occupied_cells()))
        .and_then(|cells| cells.choose(rng).copied())
}

/// Line with the most AD and Knight units (first one on ties), random direction.
fn line_params(board: &Board, axis: Axis, rng: &mut dyn RngCore) -> SkillParams {
    let index = if board.is_empty() {
        rng.random_range(0..board.size())
    } else {
        best_line(board, axis)
    };
    let direction = BeamDirection::BOTH
        .choose(rng)
        .copied()
        .unwrap_or(BeamDirection::Forward);

    SkillParams::Line { index, direction }
}

pub fn best_line(board: &Board, axis: Axis) -> usize {
    let mut best = 0;
    let mut best_count = 0;
    for index in 0..board.size() {
        let count = board.damage_dealers_on_line(axis, index);
        if count > best_count {
            best = index;
            best_count = count;
        }
    }
    best
}

/// Every unit first (shuffled), padded with shuffled empty cells, at most six.
pub fn ultimate_targets(board: &Board, rng: &mut dyn RngCore) -> Vec<Cell> {
    let mut targets = board.occupied_cells();
    targets.shuffle(rng);

    if targets.len() < ULTIMATE_MAX_TARGETS {
        let mut empty = board.empty_cells();
        empty.shuffle(rng);
        let missing = ULTIMATE_MAX_TARGETS - targets.len();
        targets.extend(empty.into_iter().take(missing));
    }

    targets.truncate(ULTIMATE_MAX_TARGETS);
    targets
}
