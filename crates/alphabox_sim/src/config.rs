//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{SimError, SimResult};
use crate::rarity::RaritySet;

/// Default percent chance of an advanced box per normal box.
pub const DEFAULT_ADVANCED_BOX_PROBABILITY: f64 = 1.0;

/// Configuration for one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// One flag per catalog word: true if the run collects it.
    pub selected_words: Vec<bool>,

    /// Percent chance (0-100) that a normal box comes with an advanced box.
    pub advanced_box_probability: f64,

    /// Rarity tiers that may be burned as synthesis fuel.
    pub synthesis_eligible: RaritySet,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::for_catalog(&Catalog::reference())
    }
}

impl SimConfig {
    /// Reference settings for a catalog: every word selected, 1% advanced
    /// boxes, every tier eligible as fuel.
    #[must_use]
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            selected_words: vec![true; catalog.word_count()],
            advanced_box_probability: DEFAULT_ADVANCED_BOX_PROBABILITY,
            synthesis_eligible: RaritySet::ALL,
        }
    }

    /// Selects exactly the words at `indices`, out of `word_count` words.
    /// Out-of-range indices are ignored (and leave nothing selected if they
    /// are all out of range, which [`SimConfig::validate`] rejects).
    #[must_use]
    pub fn select_only(mut self, word_count: usize, indices: &[usize]) -> Self {
        self.selected_words = (0..word_count).map(|i| indices.contains(&i)).collect();
        self
    }

    /// Sets the advanced box probability (percent).
    #[must_use]
    pub const fn with_advanced_probability(mut self, percent: f64) -> Self {
        self.advanced_box_probability = percent;
        self
    }

    /// Sets the tiers eligible as synthesis fuel.
    #[must_use]
    pub const fn with_eligible(mut self, eligible: RaritySet) -> Self {
        self.synthesis_eligible = eligible;
        self
    }

    /// Parses a configuration from TOML. Missing keys take reference values.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` on malformed TOML.
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        toml::from_str(text).map_err(|e| SimError::InvalidConfig(e.to_string()))
    }

    /// Checks the configuration against a catalog.
    ///
    /// # Errors
    ///
    /// - `SelectionLengthMismatch` if the mask does not match the word count
    /// - `NoWordsSelected` if every word is deselected
    /// - `AdvancedProbabilityOutOfRange` outside `[0, 100]` or for NaN
    /// - `NoEligibleRarities` if no tier may be burned
    pub fn validate(&self, catalog: &Catalog) -> SimResult<()> {
        if self.selected_words.len() != catalog.word_count() {
            return Err(SimError::SelectionLengthMismatch {
                expected: catalog.word_count(),
                actual: self.selected_words.len(),
            });
        }
        if !self.selected_words.iter().any(|&s| s) {
            return Err(SimError::NoWordsSelected);
        }
        if !(0.0..=100.0).contains(&self.advanced_box_probability) {
            return Err(SimError::AdvancedProbabilityOutOfRange(
                self.advanced_box_probability,
            ));
        }
        if self.synthesis_eligible.is_empty() {
            return Err(SimError::NoEligibleRarities);
        }
        Ok(())
    }
}
