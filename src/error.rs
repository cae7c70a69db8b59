use thiserror::Error;

use crate::infra::Cell;
use crate::state::UnitKind;

/// Reasons a unit placement was rejected. State is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("not in placement phase")]
    NotInPlacementPhase,
    #[error("placement limit reached")]
    PlacementLimitReached,
    #[error("no {0}s left")]
    NoStock(UnitKind),
    #[error("cell {0} is occupied")]
    CellOccupied(Cell),
    #[error("cell {0} is outside the board")]
    OutOfBounds(Cell),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("not enough rage (required {required}, available {available})")]
    InsufficientRage { required: u32, available: u32 },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed value table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model recorder error: {0}")]
    Recorder(String),
}
