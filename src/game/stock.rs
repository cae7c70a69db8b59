use crate::state::UnitKind;

/// Per-kind reserve of units the player can still place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementStock {
    current: [u32; UnitKind::COUNT],
    max: [u32; UnitKind::COUNT],
}

impl Default for PlacementStock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementStock {
    pub fn new() -> Self {
        let max = UnitKind::ALL.map(UnitKind::max_stock);
        Self { current: max, max }
    }

    pub fn get(&self, kind: UnitKind) -> u32 {
        self.current[kind.index()]
    }

    pub fn max(&self, kind: UnitKind) -> u32 {
        self.max[kind.index()]
    }

    pub fn reset(&mut self) {
        self.current = self.max;
    }

    /// Adds one unit of every kind, up to the per-kind maximum.
    pub fn regenerate(&mut self) {
        for (current, max) in self.current.iter_mut().zip(self.max) {
            if *current < max {
                *current += 1;
            }
        }
    }

    /// Removes one unit of `kind` from stock if there is any.
    pub fn take(&mut self, kind: UnitKind) -> bool {
        let slot = &mut self.current[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Kinds with at least one unit in stock.
    pub fn available_kinds(&self) -> Vec<UnitKind> {
        UnitKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind) > 0)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.current.iter().all(|c| *c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_and_regenerate() {
        let mut stock = PlacementStock::new();
        assert_eq!(stock.get(UnitKind::Ad), 3);
        assert!(stock.take(UnitKind::Tank));
        assert!(stock.take(UnitKind::Tank));
        assert!(!stock.take(UnitKind::Tank));
        assert_eq!(stock.available_kinds(), vec![UnitKind::Knight, UnitKind::Ad]);

        stock.regenerate();
        assert_eq!(stock.get(UnitKind::Tank), 1);
        assert_eq!(stock.get(UnitKind::Knight), 2);
        assert_eq!(stock.get(UnitKind::Ad), 3);

        stock.reset();
        assert_eq!(stock, PlacementStock::new());
    }
}
