//! # Inventory System
//!
//! Held letter counts, one entry per classified letter.
//!
//! Entries are pre-allocated in canonical order (Rare block, Medium block,
//! Common block) when the inventory is created, so iteration order never
//! changes during a run and snapshots serialize identically.
//!
//! Counts are unsigned and only move by one unit at a time: `add` for draws
//! and synthesis yields, `take` for placement, `take_fuel` for synthesis.
//!
//! ## Wire Format
//!
//! An inventory serializes as a plain letter -> count map in canonical
//! order, e.g. `{"K":0,"P":1,...}`. Tiers are catalog data and are not
//! repeated in snapshots; deserialization classifies letters against the
//! reference rarity table. Use [`Inventory::from_counts`] for other tables.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{SimError, SimResult};
use crate::rarity::{Letter, Rarity, RarityTable, RaritySet};

/// Held count of one letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterCount {
    /// The letter.
    pub letter: Letter,
    /// The letter's tier.
    pub rarity: Rarity,
    /// Number held.
    pub count: u32,
}

/// Mapping from letter to held count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    entries: Vec<LetterCount>,
}

impl Inventory {
    /// Creates an inventory holding zero of every letter in `table`.
    #[must_use]
    pub fn new(table: &RarityTable) -> Self {
        let entries = table
            .canonical_letters()
            .iter()
            .filter_map(|&letter| {
                table.rarity_of(letter).map(|rarity| LetterCount {
                    letter,
                    rarity,
                    count: 0,
                })
            })
            .collect();
        Self { entries }
    }

    /// Builds an inventory over `table` holding the given counts. Letters
    /// not mentioned hold zero.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnclassifiedInventoryLetter` if a letter is not
    /// classified by `table`.
    pub fn from_counts(
        table: &RarityTable,
        counts: impl IntoIterator<Item = (Letter, u32)>,
    ) -> SimResult<Self> {
        let mut inventory = Self::new(table);
        for (letter, count) in counts {
            let entry = inventory
                .entry_mut(letter)
                .ok_or(SimError::UnclassifiedInventoryLetter(letter.as_char()))?;
            entry.count = count;
        }
        Ok(inventory)
    }

    #[inline]
    fn entry_mut(&mut self, letter: Letter) -> Option<&mut LetterCount> {
        self.entries.iter_mut().find(|e| e.letter == letter)
    }

    /// Number of a letter held (0 for unclassified letters).
    #[must_use]
    pub fn count(&self, letter: Letter) -> u32 {
        self.entries
            .iter()
            .find(|e| e.letter == letter)
            .map_or(0, |e| e.count)
    }

    /// Adds one unit of a letter. Returns false if the letter is not
    /// classified by the table this inventory was built from.
    pub fn add(&mut self, letter: Letter) -> bool {
        match self.entry_mut(letter) {
            Some(entry) => {
                entry.count += 1;
                true
            }
            None => false,
        }
    }

    /// Removes one unit of a letter. Returns false (and changes nothing) if
    /// none is held.
    pub fn take(&mut self, letter: Letter) -> bool {
        match self.entry_mut(letter) {
            Some(entry) if entry.count > 0 => {
                entry.count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Total units held.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Units held whose tier is in `rarities`.
    #[must_use]
    pub fn total_in(&self, rarities: RaritySet) -> u32 {
        self.entries
            .iter()
            .filter(|e| rarities.contains(e.rarity))
            .map(|e| e.count)
            .sum()
    }

    /// Returns true if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.count == 0)
    }

    /// Iterates all entries in canonical order, including zero counts.
    pub fn iter(&self) -> impl Iterator<Item = &LetterCount> {
        self.entries.iter()
    }

    /// Removes up to `units` letters as synthesis fuel.
    ///
    /// The first unit is the first held letter (canonical order) whose tier
    /// is in `eligible`. The remaining units are then taken in canonical order
    /// from the start, regardless of tier, until `units` are removed or the
    /// inventory runs dry. Returns the removed units in removal order; empty
    /// if no eligible letter is held.
    pub fn take_fuel(&mut self, eligible: RaritySet, units: u32) -> Vec<LetterCount> {
        let mut used = Vec::with_capacity(units as usize);
        if units == 0 {
            return used;
        }

        let Some(first) = self
            .entries
            .iter_mut()
            .find(|e| e.count > 0 && eligible.contains(e.rarity))
        else {
            return used;
        };
        first.count -= 1;
        used.push(LetterCount { count: 1, ..*first });

        for entry in &mut self.entries {
            while entry.count > 0 && (used.len() as u32) < units {
                entry.count -= 1;
                used.push(LetterCount { count: 1, ..*entry });
            }
        }

        used
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a LetterCount;
    type IntoIter = std::slice::Iter<'a, LetterCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.letter, &entry.count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Inventory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let counts = BTreeMap::<Letter, u32>::deserialize(deserializer)?;
        Self::from_counts(&RarityTable::reference(), counts).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rarity::Tier;

    fn letter(c: char) -> Letter {
        Letter::new(c).unwrap()
    }

    fn stocked(letters: &str) -> Inventory {
        let mut inv = Inventory::new(&RarityTable::reference());
        for c in letters.chars() {
            assert!(inv.add(letter(c)));
        }
        inv
    }

    fn used_letters(used: &[LetterCount]) -> String {
        used.iter().map(|u| u.letter.as_char()).collect()
    }

    #[test]
    fn test_new_inventory_is_empty() {
        let inv = Inventory::new(&RarityTable::reference());
        assert_eq!(inv.iter().count(), 26);
        assert_eq!(inv.total(), 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn test_add_and_take() {
        let mut inv = stocked("SSA");
        assert_eq!(inv.count(letter('S')), 2);
        assert_eq!(inv.total(), 3);

        assert!(inv.take(letter('S')));
        assert!(inv.take(letter('S')));
        assert!(!inv.take(letter('S')), "count must never go negative");
        assert_eq!(inv.count(letter('S')), 0);
        assert_eq!(inv.total(), 1);
    }

    #[test]
    fn test_total_in() {
        let inv = stocked("KAABBB");
        assert_eq!(inv.total_in(RaritySet::only(Rarity::Rare)), 1);
        assert_eq!(inv.total_in(RaritySet::only(Rarity::Medium)), 2);
        assert_eq!(inv.total_in(RaritySet::only(Rarity::Common)), 3);
        assert_eq!(inv.total_in(RaritySet::ALL), 6);
    }

    #[test]
    fn test_take_fuel_canonical_order() {
        let mut inv = stocked("BEKAAB");
        let used = inv.take_fuel(RaritySet::ALL, 5);
        // Rare block first, then medium, then common (declaration order B, E).
        assert_eq!(used_letters(&used), "KAABB");
        assert_eq!(inv.total(), 1);
        assert_eq!(inv.count(letter('E')), 1);
    }

    #[test]
    fn test_take_fuel_first_unit_must_be_eligible() {
        let mut inv = stocked("AAABB");
        let used = inv.take_fuel(RaritySet::only(Rarity::Common), 5);
        // First unit skips the ineligible mediums, the rest restart from the top.
        assert_eq!(used_letters(&used), "BAAAB");
        assert!(inv.is_empty());
    }

    #[test]
    fn test_take_fuel_without_eligible_letters() {
        let mut inv = stocked("AAAAA");
        let used = inv.take_fuel(RaritySet::only(Rarity::Rare), 5);
        assert!(used.is_empty());
        assert_eq!(inv.total(), 5);
    }

    #[test]
    fn test_serializes_as_letter_count_map() {
        let inv = stocked("KAAB");
        let value = serde_json::to_value(&inv).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 26);
        assert_eq!(value["K"], 1);
        assert_eq!(value["A"], 2);
        assert_eq!(value["Z"], 0);

        let text = serde_json::to_string(&inv).unwrap();
        assert!(text.starts_with(r#"{"K":1,"P":0,"T":0,"U":0,"A":2"#), "{text}");
        assert_eq!(serde_json::from_str::<Inventory>(&text).unwrap(), inv);
    }

    #[test]
    fn test_from_counts_rejects_unclassified_letter() {
        let table = RarityTable::new(
            Tier { letters: vec![letter('K')], powder_value: 1, acquisition_cost: 1 },
            Tier { letters: vec![letter('A')], powder_value: 1, acquisition_cost: 1 },
            Tier { letters: vec![letter('B')], powder_value: 1, acquisition_cost: 1 },
        )
        .unwrap();
        let result = Inventory::from_counts(&table, [(letter('A'), 3), (letter('Z'), 1)]);
        assert_eq!(result, Err(SimError::UnclassifiedInventoryLetter('Z')));

        let inv = Inventory::from_counts(&table, [(letter('A'), 3)]).unwrap();
        assert_eq!(inv.count(letter('A')), 3);
        assert_eq!(inv.total(), 3);
    }

    #[test]
    fn test_take_fuel_stops_when_dry() {
        let mut inv = stocked("BB");
        let used = inv.take_fuel(RaritySet::ALL, 5);
        assert_eq!(used.len(), 2);
        assert!(inv.is_empty());
    }
}
