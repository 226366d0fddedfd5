//! # Weighted Draws
//!
//! Samples one letter from a rarity-tiered probability distribution.
//!
//! ## Sampling
//!
//! Every draw consumes exactly two samples from the [`RandomSource`]:
//!
//! 1. **Tier roll** - one uniform `[0, 1)` sample, matched against the
//!    cumulative bands of the mode's [`DrawTable`] in the fixed order
//!    Common -> Medium -> Rare. A sample equal to a band's upper bound falls
//!    into the next band (`rand < upper`).
//! 2. **Letter pick** - one uniform sample selecting a member of the tier,
//!    `floor(u * tier_size)`.
//!
//! ## Tables
//!
//! | mode             | Common    | Medium   | Rare |
//! |------------------|-----------|----------|------|
//! | `Normal`         | 95.4635%  | 4.5365%  | 0%   |
//! | `Advanced`       | 0%        | 0%       | 100% |
//! | `SynthesisYield` | 94.7%     | 4.5%     | 0.8% |

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::rarity::{Letter, Rarity, RarityTable};

// ============================================================================
// Random Source Capability
// ============================================================================

/// A source of uniform samples in `[0, 1)`.
///
/// The engine never touches a global generator; every sample it needs comes
/// through this trait so tests can replay a fixed sequence.
pub trait RandomSource {
    /// Returns the next uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    /// Wraps a generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// A generator seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of samples, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Creates a source cycling through `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty or holds a value outside `[0, 1)`.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "sequence source needs at least one value");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "sequence source values must lie in [0, 1)"
        );
        Self { values, cursor: 0 }
    }

    /// A source returning the same value forever.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples handed out so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

// ============================================================================
// Draw Tables
// ============================================================================

/// Which probability table a draw uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawMode {
    /// A normal box.
    Normal,
    /// An advanced box (always rare).
    Advanced,
    /// The bonus letter produced by synthesis.
    SynthesisYield,
}

/// Cumulative probability bands for one draw mode.
///
/// Each band is `(tier, upper)`: a tier roll `r` selects the first band
/// with `r < upper`. Bands are ordered Common -> Medium -> Rare and tiers
/// with zero mass are omitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawTable {
    bands: &'static [(Rarity, f64)],
}

impl DrawTable {
    /// Normal box table.
    pub const NORMAL: Self = Self {
        bands: &[(Rarity::Common, 0.954_635), (Rarity::Medium, 1.0)],
    };

    /// Advanced box table.
    pub const ADVANCED: Self = Self {
        bands: &[(Rarity::Rare, 1.0)],
    };

    /// Synthesis yield table.
    pub const SYNTHESIS_YIELD: Self = Self {
        bands: &[
            (Rarity::Common, 0.947),
            (Rarity::Medium, 0.992),
            (Rarity::Rare, 1.0),
        ],
    };

    /// Returns the table for a draw mode.
    #[must_use]
    pub const fn for_mode(mode: DrawMode) -> Self {
        match mode {
            DrawMode::Normal => Self::NORMAL,
            DrawMode::Advanced => Self::ADVANCED,
            DrawMode::SynthesisYield => Self::SYNTHESIS_YIELD,
        }
    }

    /// Probability mass of one tier.
    #[must_use]
    pub fn probability(&self, rarity: Rarity) -> f64 {
        let mut lower = 0.0;
        for &(tier, upper) in self.bands {
            if tier == rarity {
                return upper - lower;
            }
            lower = upper;
        }
        0.0
    }

    /// Total probability mass (the last band's upper bound).
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.bands.last().map_or(0.0, |&(_, upper)| upper)
    }

    /// Checks that the bands are non-decreasing and end at exactly 1.0.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_well_formed(&self) -> bool {
        let ascending = self.bands.windows(2).all(|w| w[0].1 <= w[1].1);
        ascending && self.total_mass() == 1.0
    }

    /// Maps a tier roll to a tier.
    #[must_use]
    pub fn select(&self, roll: f64) -> Rarity {
        debug_assert!(!self.bands.is_empty());
        self.bands
            .iter()
            .find(|&&(_, upper)| roll < upper)
            .or(self.bands.last())
            .map_or(Rarity::Common, |&(tier, _)| tier)
    }
}

// ============================================================================
// WeightedDraw
// ============================================================================

/// Result of one draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Drawn {
    /// The letter drawn.
    pub letter: Letter,
    /// Its tier.
    pub rarity: Rarity,
}

/// Draws letters from a rarity table.
#[derive(Clone, Copy, Debug)]
pub struct WeightedDraw<'a> {
    table: &'a RarityTable,
}

impl<'a> WeightedDraw<'a> {
    /// Creates a drawer over a rarity table.
    ///
    /// # Panics
    ///
    /// Panics if a draw table does not sum to 1.0. That is a programming
    /// error in the static tables, not a runtime condition.
    #[must_use]
    pub fn new(table: &'a RarityTable) -> Self {
        for mode in [DrawMode::Normal, DrawMode::Advanced, DrawMode::SynthesisYield] {
            assert!(
                DrawTable::for_mode(mode).is_well_formed(),
                "draw table {mode:?} does not sum to 1.0"
            );
        }
        Self { table }
    }

    /// Draws one letter using the table for `mode`.
    pub fn draw<R: RandomSource + ?Sized>(&self, mode: DrawMode, rng: &mut R) -> Drawn {
        let rarity = DrawTable::for_mode(mode).select(rng.next_f64());
        let members = self.table.letters(rarity);
        let pick = rng.next_f64();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let index = ((pick * members.len() as f64) as usize).min(members.len() - 1);
        Drawn {
            letter: members[index],
            rarity,
        }
    }
}
