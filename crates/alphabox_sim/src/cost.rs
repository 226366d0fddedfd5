//! Required-cost tracking.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::rarity::RarityTable;

/// Powder value of every still-unfilled slot on the selected words.
///
/// Initialized once from the board and then only decremented as slots are
/// filled; it is never recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredCost {
    initial: u64,
    remaining: u64,
}

impl RequiredCost {
    /// Sums the acquisition cost of every unfilled slot of the selected words.
    #[must_use]
    pub fn for_board(board: &Board, table: &RarityTable) -> Self {
        let total = board
            .unfilled_targets()
            .filter_map(|letter| table.rarity_of(letter))
            .map(|rarity| table.acquisition_cost(rarity))
            .sum();
        Self {
            initial: total,
            remaining: total,
        }
    }

    /// Removes the cost of one slot that was just filled.
    #[inline]
    pub fn settle(&mut self, cost: u64) {
        debug_assert!(cost <= self.remaining, "settled more than was owed");
        self.remaining = self.remaining.saturating_sub(cost);
    }

    /// Cost at initialization.
    #[inline]
    #[must_use]
    pub const fn initial(&self) -> u64 {
        self.initial
    }

    /// Cost still owed.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// The completion test: accumulated powder covers what is still owed.
    #[inline]
    #[must_use]
    pub const fn is_covered_by(&self, powder: u64) -> bool {
        powder >= self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Word;

    #[test]
    fn test_star_cost_follows_partition() {
        let table = RarityTable::reference();
        let words = vec![Word::new("STAR").unwrap()];
        let board = Board::new(&words, &[true]);
        let cost = RequiredCost::for_board(&board, &table);
        // S medium, T rare, A medium, R common.
        assert_eq!(cost.initial(), 1500 + 5000 + 1500 + 100);
        assert_eq!(cost.remaining(), cost.initial());
    }

    #[test]
    fn test_covered_by() {
        let table = RarityTable::reference();
        let words = vec![Word::new("BE").unwrap()];
        let board = Board::new(&words, &[true]);
        let mut cost = RequiredCost::for_board(&board, &table);
        assert!(!cost.is_covered_by(199));
        assert!(cost.is_covered_by(200));

        cost.settle(100);
        cost.settle(100);
        assert_eq!(cost.remaining(), 0);
        assert!(cost.is_covered_by(0));
    }
}
