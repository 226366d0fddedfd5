//! # Catalog
//!
//! Everything about the game that does not change between runs: the rarity
//! table and the list of target words.
//!
//! ## TOML Format
//!
//! ```toml
//! words = ["STAR", "UNIVERSE"]
//!
//! [rarities.rare]
//! letters = ["K", "P", "T", "U"]
//! powder_value = 255
//! acquisition_cost = 5000
//!
//! [rarities.medium]
//! letters = ["A", "I", "N", "S", "V"]
//! powder_value = 75
//! acquisition_cost = 1500
//!
//! [rarities.common]
//! letters = ["B", "E", "R", "C", "D", "F", "G", "H", "J", "L", "M", "O", "Q", "W", "X", "Y", "Z"]
//! powder_value = 5
//! acquisition_cost = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::board::Word;
use crate::error::{SimError, SimResult};
use crate::rarity::{RarityTable, TierTable};

/// The five words of the reference game, in board order.
pub const REFERENCE_WORDS: [&str; 5] = [
    "STAR",
    "UNIVERSE",
    "PINKBEAN",
    "UNIVERSESTAR",
    "UNIVERSEPINKSTAR",
];

/// Serialized shape of a [`Catalog`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CatalogFile {
    words: Vec<Word>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rarities: Option<TierTable>,
}

/// Rarity table plus target words.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile", into = "CatalogFile")]
pub struct Catalog {
    rarities: RarityTable,
    words: Vec<Word>,
}

impl Catalog {
    /// Builds a catalog.
    ///
    /// # Errors
    ///
    /// Returns `SimError::EmptyWord` for an empty word, or
    /// `SimError::UnclassifiedLetter` if a word uses a letter outside the
    /// rarity table.
    pub fn new(rarities: RarityTable, words: Vec<Word>) -> SimResult<Self> {
        for (index, word) in words.iter().enumerate() {
            if word.is_empty() {
                return Err(SimError::EmptyWord(index));
            }
            if let Some(letter) = word
                .letters()
                .iter()
                .find(|&&l| rarities.rarity_of(l).is_none())
            {
                return Err(SimError::UnclassifiedLetter {
                    letter: letter.as_char(),
                    word: word.text().to_string(),
                });
            }
        }
        Ok(Self { rarities, words })
    }

    /// The reference game: reference rarity table and the five reference words.
    #[must_use]
    pub fn reference() -> Self {
        let words = REFERENCE_WORDS
            .iter()
            .filter_map(|w| Word::new(w).ok())
            .collect();
        Self {
            rarities: RarityTable::reference(),
            words,
        }
    }

    /// Parses a catalog from TOML. A missing `[rarities]` table falls back to
    /// the reference rarity table.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` on malformed TOML. Validation
    /// failures keep their own variants, as from [`RarityTable::new`] and
    /// [`Catalog::new`].
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        Self::try_from(file)
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` if the file cannot be read, otherwise as
    /// [`Catalog::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SimError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Renders the catalog as TOML.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` if serialization fails.
    pub fn to_toml_string(&self) -> SimResult<String> {
        toml::to_string(self).map_err(|e| SimError::InvalidConfig(e.to_string()))
    }

    /// The rarity table.
    #[inline]
    #[must_use]
    pub fn rarities(&self) -> &RarityTable {
        &self.rarities
    }

    /// The target words, in board order.
    #[inline]
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Number of target words.
    #[inline]
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::reference()
    }
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = SimError;

    fn try_from(file: CatalogFile) -> SimResult<Self> {
        let rarities = match file.rarities {
            Some(tiers) => RarityTable::try_from(tiers)?,
            None => RarityTable::reference(),
        };
        Self::new(rarities, file.words)
    }
}

impl From<Catalog> for CatalogFile {
    fn from(catalog: Catalog) -> Self {
        Self {
            words: catalog.words,
            rarities: Some(catalog.rarities.into()),
        }
    }
}
