mod logging;
mod types;

pub use logging::init_logging;
pub use types::{Axis, BeamDirection, Cell};

// ============================================================================
// Helper functions
// ============================================================================

/// Cells visited by a beam on line `index` of an `size`×`size` grid, in travel order.
pub fn beam_path(axis: Axis, index: usize, direction: BeamDirection, size: usize) -> Vec<Cell> {
    let mut path: Vec<Cell> = (0..size)
        .map(|i| match axis {
            Axis::Row => Cell::new(index, i),
            Axis::Column => Cell::new(i, index),
        })
        .collect();

    if direction == BeamDirection::Backward {
        path.reverse();
    }

    path
}
