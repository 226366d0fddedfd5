//! # Word Board
//!
//! Target words and their letter slots.
//!
//! A slot is either empty or holds its own target letter; there is no way to
//! mis-fill a slot. Words that were not selected for a run stay empty and are
//! skipped by placement, but still appear in snapshots so a presentation
//! layer can draw the full board.

use serde::{Deserialize, Serialize};

use crate::cost::RequiredCost;
use crate::inventory::Inventory;
use crate::rarity::{Letter, RarityTable};

/// Slot contents of every word, in word order. `None` is an empty slot.
pub type BoardSnapshot = Vec<Vec<Option<Letter>>>;

/// A target word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word {
    text: String,
    letters: Vec<Letter>,
}

impl Word {
    /// Parses a word. Lower-case input is normalized.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownLetter` for characters outside `A-Z`.
    pub fn new(text: &str) -> crate::SimResult<Self> {
        let letters = Letter::parse_word(text)?;
        Ok(Self {
            text: letters.iter().map(|l| l.as_char()).collect(),
            letters,
        })
    }

    /// The word's spelling.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The word's letters, in spelling order.
    #[must_use]
    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    /// Number of letters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Returns true for the empty word.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl TryFrom<String> for Word {
    type Error = crate::SimError;

    fn try_from(text: String) -> crate::SimResult<Self> {
        Self::new(&text)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.text
    }
}

/// One word on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Row {
    target: Vec<Letter>,
    selected: bool,
    slots: Vec<Option<Letter>>,
}

/// The set of target words and their slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: Vec<Row>,
}

impl Board {
    /// Creates an empty board. `selection[i]` marks word `i` as pursued;
    /// missing entries count as unselected.
    #[must_use]
    pub fn new(words: &[Word], selection: &[bool]) -> Self {
        let rows = words
            .iter()
            .enumerate()
            .map(|(i, word)| Row {
                target: word.letters().to_vec(),
                selected: selection.get(i).copied().unwrap_or(false),
                slots: vec![None; word.len()],
            })
            .collect();
        Self { rows }
    }

    /// Target letters of every slot in a selected word, filled or not.
    pub fn selected_targets(&self) -> impl Iterator<Item = Letter> + '_ {
        self.rows
            .iter()
            .filter(|row| row.selected)
            .flat_map(|row| row.target.iter().copied())
    }

    /// Target letters of the still-empty slots of selected words.
    pub fn unfilled_targets(&self) -> impl Iterator<Item = Letter> + '_ {
        self.rows.iter().filter(|row| row.selected).flat_map(|row| {
            row.target
                .iter()
                .zip(&row.slots)
                .filter(|(_, slot)| slot.is_none())
                .map(|(&target, _)| target)
        })
    }

    /// Runs one placement pass.
    ///
    /// Scans selected words in order, and each word's slots in spelling
    /// order. Every empty slot whose target letter is held gets filled: the
    /// letter leaves the inventory and its acquisition cost leaves `cost`.
    /// Returns the number of slots filled.
    pub fn place_from(
        &mut self,
        inventory: &mut Inventory,
        table: &RarityTable,
        cost: &mut RequiredCost,
    ) -> usize {
        let mut filled = 0;
        for row in self.rows.iter_mut().filter(|row| row.selected) {
            for (slot, &target) in row.slots.iter_mut().zip(&row.target) {
                if slot.is_none() && inventory.take(target) {
                    *slot = Some(target);
                    if let Some(rarity) = table.rarity_of(target) {
                        cost.settle(table.acquisition_cost(rarity));
                    }
                    filled += 1;
                }
            }
        }
        filled
    }

    /// Returns true once every slot of every selected word is filled.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.rows
            .iter()
            .filter(|row| row.selected)
            .all(|row| row.slots.iter().all(Option::is_some))
    }

    /// Copies out the slot contents of every word.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.rows.iter().map(|row| row.slots.clone()).collect()
    }

    /// An all-empty snapshot for the given words.
    #[must_use]
    pub fn empty_snapshot(words: &[Word]) -> BoardSnapshot {
        words.iter().map(|w| vec![None; w.len()]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<Word> {
        texts.iter().map(|t| Word::new(t).unwrap()).collect()
    }

    fn letter(c: char) -> Letter {
        Letter::new(c).unwrap()
    }

    #[test]
    fn test_word_normalizes_case() {
        let word = Word::new("star").unwrap();
        assert_eq!(word.text(), "STAR");
        assert_eq!(word.len(), 4);
        assert!(Word::new("st4r").is_err());
    }

    #[test]
    fn test_placement_fills_all_matching_slots() {
        let table = RarityTable::reference();
        let words = words(&["STAR", "SUN"]);
        let mut board = Board::new(&words, &[true, true]);
        let mut cost = RequiredCost::for_board(&board, &table);
        let mut inv = Inventory::new(&table);
        for c in "SSR".chars() {
            inv.add(letter(c));
        }

        let filled = board.place_from(&mut inv, &table, &mut cost);
        assert_eq!(filled, 3);
        assert_eq!(inv.total(), 0);
        assert_eq!(
            board.snapshot(),
            vec![
                vec![Some(letter('S')), None, None, Some(letter('R'))],
                vec![Some(letter('S')), None, None],
            ]
        );
        // Remaining: T, A, U, N.
        assert_eq!(cost.remaining(), 5000 + 1500 + 5000 + 1500);
    }

    #[test]
    fn test_unselected_words_are_ignored() {
        let table = RarityTable::reference();
        let words = words(&["STAR", "SUN"]);
        let mut board = Board::new(&words, &[false, true]);
        let mut cost = RequiredCost::for_board(&board, &table);
        let mut inv = Inventory::new(&table);
        inv.add(letter('S'));
        inv.add(letter('R'));

        board.place_from(&mut inv, &table, &mut cost);
        assert_eq!(board.snapshot()[0], vec![None; 4]);
        assert_eq!(board.snapshot()[1][0], Some(letter('S')));
        assert_eq!(inv.count(letter('R')), 1, "R is only wanted by STAR");
        assert_eq!(board.selected_targets().count(), 3);
    }

    #[test]
    fn test_is_filled() {
        let table = RarityTable::reference();
        let words = words(&["BE"]);
        let mut board = Board::new(&words, &[true]);
        let mut cost = RequiredCost::for_board(&board, &table);
        let mut inv = Inventory::new(&table);
        inv.add(letter('B'));
        board.place_from(&mut inv, &table, &mut cost);
        assert!(!board.is_filled());
        assert_eq!(board.unfilled_targets().collect::<Vec<_>>(), vec![letter('E')]);

        inv.add(letter('E'));
        board.place_from(&mut inv, &table, &mut cost);
        assert!(board.is_filled());
        assert_eq!(cost.remaining(), 0);
    }
}
