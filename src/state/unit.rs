use std::fmt;

use serde::{Deserialize, Serialize};

use crate::infra::Cell;

/// Player unit archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Tank,
    Knight,
    #[serde(rename = "AD")]
    Ad,
}

impl UnitKind {
    pub const COUNT: usize = 3;
    pub const ALL: [UnitKind; UnitKind::COUNT] = [UnitKind::Tank, UnitKind::Knight, UnitKind::Ad];

    pub fn index(self) -> usize {
        match self {
            UnitKind::Tank => 0,
            UnitKind::Knight => 1,
            UnitKind::Ad => 2,
        }
    }

    pub fn max_hp(self) -> i32 {
        match self {
            UnitKind::Tank => 3,
            UnitKind::Knight => 2,
            UnitKind::Ad => 1,
        }
    }

    pub fn attack_power(self) -> i32 {
        match self {
            UnitKind::Tank => 0,
            UnitKind::Knight => 1,
            UnitKind::Ad => 2,
        }
    }

    /// Maximum number of units of this kind the player can hold in stock.
    pub fn max_stock(self) -> u32 {
        match self {
            UnitKind::Tank => 2,
            UnitKind::Knight => 2,
            UnitKind::Ad => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Tank => "Tank",
            UnitKind::Knight => "Knight",
            UnitKind::Ad => "AD",
        }
    }

    pub fn abbr(self) -> char {
        match self {
            UnitKind::Tank => 'T',
            UnitKind::Knight => 'K',
            UnitKind::Ad => 'A',
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player combatant occupying one board cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub kind: UnitKind,
    pub max_hp: i32,
    pub current_hp: i32,
    pub attack_power: i32,
    pub position: Cell,
}

impl Unit {
    pub fn new(kind: UnitKind, position: Cell) -> Self {
        Self {
            kind,
            max_hp: kind.max_hp(),
            current_hp: kind.max_hp(),
            attack_power: kind.attack_power(),
            position,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Applies damage, clamping hp at zero. Returns `true` if the unit died.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.current_hp = (self.current_hp - amount).max(0);
        self.current_hp == 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}/{} HP, {} ATK)",
            self.kind, self.current_hp, self.max_hp, self.attack_power
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_stats() {
        let tank = Unit::new(UnitKind::Tank, Cell::new(0, 0));
        assert_eq!((tank.max_hp, tank.attack_power), (3, 0));
        let knight = Unit::new(UnitKind::Knight, Cell::new(0, 1));
        assert_eq!((knight.max_hp, knight.attack_power), (2, 1));
        let ad = Unit::new(UnitKind::Ad, Cell::new(0, 2));
        assert_eq!((ad.max_hp, ad.attack_power), (1, 2));
    }

    #[test]
    fn test_take_damage_never_negative() {
        let mut knight = Unit::new(UnitKind::Knight, Cell::new(1, 1));
        assert!(!knight.take_damage(1));
        assert!(knight.take_damage(5));
        assert_eq!(knight.current_hp, 0);
        assert!(!knight.is_alive());
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut tank = Unit::new(UnitKind::Tank, Cell::new(2, 2));
        tank.take_damage(2);
        tank.heal(10);
        assert_eq!(tank.current_hp, 3);
    }
}
