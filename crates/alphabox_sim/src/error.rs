//! # Simulation Error Types
//!
//! All errors that can occur while building a catalog, validating a run
//! configuration, or running the engine.

use thiserror::Error;

/// Errors that can occur in the simulation core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// No word was selected for the run.
    #[error("no words selected: at least one word must be collected")]
    NoWordsSelected,

    /// The set of rarities allowed as synthesis fuel is empty.
    #[error("synthesis eligible rarities must not be empty")]
    NoEligibleRarities,

    /// Advanced box probability outside of `[0, 100]` (or NaN).
    #[error("advanced box probability {0} is outside of [0, 100]")]
    AdvancedProbabilityOutOfRange(f64),

    /// The selection mask does not line up with the catalog's words.
    #[error("word selection has {actual} entries, catalog has {expected} words")]
    SelectionLengthMismatch {
        /// Number of words in the catalog.
        expected: usize,
        /// Number of entries in the selection mask.
        actual: usize,
    },

    /// A character outside of `A-Z` was used as a letter.
    #[error("unknown letter: {0:?}")]
    UnknownLetter(char),

    /// A letter was assigned to more than one rarity tier.
    #[error("letter {0} is assigned to more than one rarity tier")]
    DuplicateLetter(char),

    /// A word uses a letter that no rarity tier contains.
    #[error("letter {letter} in word {word:?} has no rarity tier")]
    UnclassifiedLetter {
        /// The unclassified letter.
        letter: char,
        /// The word it appears in.
        word: String,
    },

    /// An inventory snapshot holds a letter that no rarity tier contains.
    #[error("inventory letter {0} has no rarity tier")]
    UnclassifiedInventoryLetter(char),

    /// A rarity tier that a draw table can select has no letters.
    #[error("rarity tier {0} has no letters")]
    EmptyTier(&'static str),

    /// A configured word has no letters.
    #[error("word {0} is empty")]
    EmptyWord(usize),

    /// A bounded engine hit its draw limit before completing.
    #[error("run did not complete within {0} draws")]
    DrawLimitExceeded(u64),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read {path}: {reason}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error message.
        reason: String,
    },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
