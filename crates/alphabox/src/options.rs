//! Turns command line choices into a [`SimConfig`].

use alphabox_sim::{Catalog, Rarity, RaritySet, SimConfig};

use crate::error::{AppError, AppResult};

/// Run settings as given on the command line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunOptions {
    /// Indices of the words to collect; `None` selects every word.
    pub words: Option<Vec<usize>>,
    /// Advanced box chance in percent; `None` keeps the default.
    pub advanced_probability: Option<f64>,
    /// Tiers allowed as synthesis fuel; `None` allows all.
    pub eligible: Option<Vec<Rarity>>,
}

impl RunOptions {
    /// Builds and validates the run configuration for `catalog`.
    ///
    /// # Errors
    ///
    /// `AppError::InvalidArgument` for a word index past the end of the
    /// catalog, otherwise whatever [`SimConfig::validate`] reports.
    pub fn to_config(&self, catalog: &Catalog) -> AppResult<SimConfig> {
        let mut config = SimConfig::for_catalog(catalog);

        if let Some(words) = &self.words {
            if let Some(&bad) = words.iter().find(|&&i| i >= catalog.word_count()) {
                return Err(AppError::InvalidArgument(format!(
                    "word index {bad} out of range (catalog has {} words)",
                    catalog.word_count()
                )));
            }
            config = config.select_only(catalog.word_count(), words);
        }
        if let Some(percent) = self.advanced_probability {
            config = config.with_advanced_probability(percent);
        }
        if let Some(eligible) = &self.eligible {
            config = config.with_eligible(eligible.iter().copied().collect::<RaritySet>());
        }

        config.validate(catalog)?;
        Ok(config)
    }
}
