//! Attack module - converts line clears into outgoing garbage
//!
//! All tuning lives in [`AttackTables`]; [`AttackEconomy`] only combines lookups.
//!
//! Calculation order:
//! 1. base lines from the clear kind
//! 2. + back-to-back bonus (only if base > 0)
//! 3. + combo bonus at `min(combo, len - 1)` (only if combo > 0)
//! 4. + targeting bonus at `min(targeted_by, len - 1)` (only if targeted_by > 0)
//! 5. if the sum is positive and the attacker holds badges, scale the *sum* by the badge
//!    multiplier and floor

use crate::grid::Row;
use crate::rng::SimpleRng;
use crate::types::{ClearKind, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL, GARBAGE_CELL};

/// Lines sent per clear kind
pub const ATTACK_TABLE: [(ClearKind, u32); 4] = [
    (ClearKind::Single, 0),
    (ClearKind::Double, 1),
    (ClearKind::Triple, 2),
    (ClearKind::Tetris, 4),
];

pub const BACK_TO_BACK_BONUS: u32 = 1;

/// Extra lines indexed by combo counter
pub const COMBO_TABLE: [u32; 12] = [0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 4, 5];

/// Extra lines indexed by how many opponents are targeting the attacker
pub const TARGETING_BONUS: [u32; 7] = [0, 0, 1, 3, 5, 7, 9];

/// Badge multipliers in percent (1.0x, 1.25x, 1.5x, 1.75x, 2.0x)
pub const BADGE_MULTIPLIER_PERCENT: [u32; 5] = [100, 125, 150, 175, 200];

/// Tunable lookup tables for [`AttackEconomy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackTables {
    pub attack: Vec<(ClearKind, u32)>,
    pub back_to_back_bonus: u32,
    pub combo: Vec<u32>,
    pub targeting: Vec<u32>,
    pub badge_percent: Vec<u32>,
}

impl Default for AttackTables {
    fn default() -> Self {
        Self {
            attack: ATTACK_TABLE.to_vec(),
            back_to_back_bonus: BACK_TO_BACK_BONUS,
            combo: COMBO_TABLE.to_vec(),
            targeting: TARGETING_BONUS.to_vec(),
            badge_percent: BADGE_MULTIPLIER_PERCENT.to_vec(),
        }
    }
}

/// Lookup at `min(index, len - 1)`, 0 for an empty table
fn clamped(table: &[u32], index: usize) -> u32 {
    match table.len() {
        0 => 0,
        len => table[index.min(len - 1)],
    }
}

/// Stateless attack calculator shared by every board in a room
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackEconomy {
    tables: AttackTables,
}

impl AttackEconomy {
    pub fn new(tables: AttackTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &AttackTables {
        &self.tables
    }

    /// Base lines for a clear kind (0 if the table has no entry)
    pub fn base_attack(&self, kind: ClearKind) -> u32 {
        self.tables
            .attack
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, lines)| *lines)
            .unwrap_or(0)
    }

    /// Total lines sent for one clear
    ///
    /// ```
    /// use royale_core::AttackEconomy;
    /// use royale_core::types::ClearKind;
    ///
    /// let economy = AttackEconomy::default();
    /// assert_eq!(economy.calculate_attack(ClearKind::Tetris, 0, false, 0, 0), 4);
    /// assert_eq!(economy.calculate_attack(ClearKind::Tetris, 0, true, 0, 0), 5);
    /// assert_eq!(economy.calculate_attack(ClearKind::Single, 0, false, 0, 0), 0);
    /// ```
    pub fn calculate_attack(
        &self,
        kind: ClearKind,
        combo: i32,
        back_to_back: bool,
        badges: u32,
        targeted_by: usize,
    ) -> u32 {
        let base = self.base_attack(kind);
        let mut total = base;

        if back_to_back && base > 0 {
            total += self.tables.back_to_back_bonus;
        }
        if combo > 0 {
            total += clamped(&self.tables.combo, combo as usize);
        }
        if targeted_by > 0 {
            total += clamped(&self.tables.targeting, targeted_by);
        }
        if total > 0 && badges > 0 {
            let percent = clamped(&self.tables.badge_percent, badges as usize);
            total = total * percent / 100;
        }

        total
    }

    /// Generate `amount` garbage rows sharing one random hole column
    ///
    /// At most a board's height of rows is built; more could never be on screen.
    pub fn generate_garbage(&self, amount: u32, rng: &mut SimpleRng) -> Vec<Row> {
        let amount = amount.min(u32::from(BOARD_HEIGHT));
        if amount == 0 {
            return Vec::new();
        }
        let hole = rng.next_range(BOARD_WIDTH as u32) as usize;
        let mut row = [GARBAGE_CELL; BOARD_WIDTH as usize];
        row[hole] = EMPTY_CELL;
        vec![row; amount as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_table_values() {
        let e = AttackEconomy::default();
        assert_eq!(e.calculate_attack(ClearKind::Single, 0, false, 0, 0), 0);
        assert_eq!(e.calculate_attack(ClearKind::Double, 0, false, 0, 0), 1);
        assert_eq!(e.calculate_attack(ClearKind::Triple, 0, false, 0, 0), 2);
        assert_eq!(e.calculate_attack(ClearKind::Tetris, 0, false, 0, 0), 4);
    }

    #[test]
    fn back_to_back_needs_positive_base() {
        let e = AttackEconomy::default();
        assert_eq!(e.calculate_attack(ClearKind::Single, 0, true, 0, 0), 0);
        assert_eq!(e.calculate_attack(ClearKind::Tetris, 0, true, 0, 0), 5);
    }

    #[test]
    fn combo_lookup_is_clamped() {
        let e = AttackEconomy::default();
        // combo 1 -> table[1] = 0
        assert_eq!(e.calculate_attack(ClearKind::Double, 1, false, 0, 0), 1);
        // combo 2 -> table[2] = 1
        assert_eq!(e.calculate_attack(ClearKind::Double, 2, false, 0, 0), 2);
        assert_eq!(e.calculate_attack(ClearKind::Single, 50, false, 0, 0), 5);
        assert_eq!(e.calculate_attack(ClearKind::Single, -1, false, 0, 0), 0);
    }

    #[test]
    fn targeting_bonus_applies_to_single() {
        let e = AttackEconomy::default();
        assert_eq!(e.calculate_attack(ClearKind::Single, 0, false, 0, 2), 1);
        assert_eq!(e.calculate_attack(ClearKind::Single, 0, false, 0, 99), 9);
    }

    #[test]
    fn badge_multiplier_scales_sum_and_floors() {
        let e = AttackEconomy::default();
        // (4 + 1) * 1.25 = 6.25 -> 6
        assert_eq!(e.calculate_attack(ClearKind::Tetris, 0, true, 1, 0), 6);
        // 1 * 1.5 = 1.5 -> 1
        assert_eq!(e.calculate_attack(ClearKind::Double, 0, false, 2, 0), 1);
        // clamped at 2.0x
        assert_eq!(e.calculate_attack(ClearKind::Tetris, 0, false, 10, 0), 8);
    }

    #[test]
    fn badges_do_not_create_attack_from_nothing() {
        let e = AttackEconomy::default();
        assert_eq!(e.calculate_attack(ClearKind::Single, 0, false, 4, 0), 0);
    }

    #[test]
    fn garbage_rows_share_one_hole() {
        let e = AttackEconomy::default();
        let mut rng = SimpleRng::new(5);
        let rows = e.generate_garbage(3, &mut rng);
        assert_eq!(rows.len(), 3);

        let hole = rows[0].iter().position(|&c| c == EMPTY_CELL);
        assert!(hole.is_some());
        for row in &rows {
            assert_eq!(row.iter().filter(|&&c| c == EMPTY_CELL).count(), 1);
            assert_eq!(row.iter().position(|&c| c == EMPTY_CELL), hole);
            assert!(row.iter().all(|&c| c == EMPTY_CELL || c == GARBAGE_CELL));
        }
    }

    #[test]
    fn zero_garbage_is_empty() {
        let e = AttackEconomy::default();
        let mut rng = SimpleRng::new(5);
        assert!(e.generate_garbage(0, &mut rng).is_empty());
    }

    #[test]
    fn garbage_is_capped_at_board_height() {
        let e = AttackEconomy::default();
        let mut rng = SimpleRng::new(8);
        let rows = e.generate_garbage(u32::MAX, &mut rng);
        assert_eq!(rows.len(), BOARD_HEIGHT as usize);
        assert_eq!(e.generate_garbage(3, &mut rng).len(), 3);
    }
}
