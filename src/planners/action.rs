use crate::infra::{BeamDirection, Cell};
use crate::state::Skill;

/// Concrete targeting parameters for a boss skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillParams {
    /// Explicit target cells (normal attack uses the first, ultimate up to six)
    Targets(Vec<Cell>),
    /// Row or column index and travel direction for the beam skills
    Line {
        index: usize,
        direction: BeamDirection,
    },
    /// Skills without a target (heal)
    None,
}

impl SkillParams {
    pub fn targets(&self) -> &[Cell] {
        match self {
            SkillParams::Targets(cells) => cells,
            _ => &[],
        }
    }
}

/// A boss decision: the skill, its parameters and the action index that was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BossAction {
    pub skill: Skill,
    pub params: SkillParams,
    pub action_index: usize,
}

impl BossAction {
    pub fn new(skill: Skill, params: SkillParams) -> Self {
        Self {
            skill,
            params,
            action_index: skill.index(),
        }
    }
}
