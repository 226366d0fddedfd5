//! # Rarity Table
//!
//! Static classification of letters into rarity tiers.
//!
//! Each tier carries the two constants the rest of the engine prices with:
//!
//! - `powder_value` - powder gained when one letter of the tier is burned as
//!   synthesis fuel
//! - `acquisition_cost` - powder a board slot of the tier is worth while it
//!   is still unfilled
//!
//! The table is built once (from the reference values or a TOML catalog) and
//! is never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SimError, SimResult};

/// Number of distinct letter symbols.
pub const ALPHABET_SIZE: usize = 26;

// ============================================================================
// Letter
// ============================================================================

/// One of the 26 upper-case letters `A-Z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Letter(u8);

impl Letter {
    /// Creates a letter from a character. Lower-case input is accepted and
    /// normalized.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownLetter` for anything outside `A-Z`.
    pub fn new(c: char) -> SimResult<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Ok(Self(upper as u8 - b'A'))
        } else {
            Err(SimError::UnknownLetter(c))
        }
    }

    /// Returns the letter's position in the alphabet (`A` = 0).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the letter as an upper-case character.
    #[inline]
    #[must_use]
    pub const fn as_char(self) -> char {
        (b'A' + self.0) as char
    }

    /// Parses every character of `word` as a letter.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownLetter` on the first invalid character.
    pub fn parse_word(word: &str) -> SimResult<Vec<Self>> {
        word.chars().map(Self::new).collect()
    }
}

impl TryFrom<char> for Letter {
    type Error = SimError;

    fn try_from(c: char) -> SimResult<Self> {
        Self::new(c)
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> Self {
        letter.as_char()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ============================================================================
// Rarity
// ============================================================================

/// Rarity tier of a letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Rarity {
    /// Rare letters (advanced boxes, 0.8% of synthesis yields).
    Rare = 0,
    /// Medium letters (~4.5% of normal boxes).
    Medium = 1,
    /// Common letters (~95% of normal boxes).
    Common = 2,
}

impl Rarity {
    /// All tiers in canonical order: Rare, Medium, Common.
    pub const ALL: [Self; 3] = [Self::Rare, Self::Medium, Self::Common];

    /// Lower-case tier name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rare => "rare",
            Self::Medium => "medium",
            Self::Common => "common",
        }
    }

    /// Powder gained per letter of this tier consumed by synthesis, in the
    /// reference configuration.
    #[inline]
    #[must_use]
    pub const fn reference_powder_value(self) -> u64 {
        match self {
            Self::Rare => 255,
            Self::Medium => 75,
            Self::Common => 5,
        }
    }

    /// Powder an unfilled board slot of this tier is worth, in the reference
    /// configuration.
    #[inline]
    #[must_use]
    pub const fn reference_acquisition_cost(self) -> u64 {
        match self {
            Self::Rare => 5000,
            Self::Medium => 1500,
            Self::Common => 100,
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rarity {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rare" => Ok(Self::Rare),
            "medium" => Ok(Self::Medium),
            "common" => Ok(Self::Common),
            other => Err(SimError::InvalidConfig(format!("unknown rarity: {other:?}"))),
        }
    }
}

// ============================================================================
// RaritySet
// ============================================================================

/// A set of rarity tiers, stored as a bit mask.
///
/// Serialized as a list of tier names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Rarity>", into = "Vec<Rarity>")]
pub struct RaritySet(u8);

impl RaritySet {
    /// No tiers.
    pub const EMPTY: Self = Self(0);
    /// Every tier.
    pub const ALL: Self = Self(0b111);

    /// A set holding a single tier.
    #[inline]
    #[must_use]
    pub const fn only(rarity: Rarity) -> Self {
        Self(rarity.bit())
    }

    /// Adds a tier to the set.
    #[inline]
    #[must_use]
    pub const fn with(self, rarity: Rarity) -> Self {
        Self(self.0 | rarity.bit())
    }

    /// Checks if a tier is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, rarity: Rarity) -> bool {
        (self.0 & rarity.bit()) != 0
    }

    /// Returns true if no tier is in the set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the tiers in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Rarity> {
        Rarity::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Rarity> for RaritySet {
    fn from_iter<I: IntoIterator<Item = Rarity>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl From<Vec<Rarity>> for RaritySet {
    fn from(rarities: Vec<Rarity>) -> Self {
        rarities.into_iter().collect()
    }
}

impl From<RaritySet> for Vec<Rarity> {
    fn from(set: RaritySet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for RaritySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Rarity::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

// ============================================================================
// RarityTable
// ============================================================================

/// Letters and prices of one rarity tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Member letters, in canonical (declaration) order.
    pub letters: Vec<Letter>,
    /// Powder gained per letter consumed by synthesis.
    pub powder_value: u64,
    /// Powder an unfilled slot of this tier is worth.
    pub acquisition_cost: u64,
}

impl Tier {
    fn reference(rarity: Rarity, letters: &str) -> Self {
        Self {
            letters: letters.bytes().map(|b| Letter(b - b'A')).collect(),
            powder_value: rarity.reference_powder_value(),
            acquisition_cost: rarity.reference_acquisition_cost(),
        }
    }
}

/// Serialized shape of a [`RarityTable`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct TierTable {
    rare: Tier,
    medium: Tier,
    common: Tier,
}

/// Classification of letters into rarity tiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TierTable", into = "TierTable")]
pub struct RarityTable {
    /// Tiers indexed by `Rarity as usize`.
    tiers: [Tier; 3],
    /// Letter index -> tier.
    lookup: [Option<Rarity>; ALPHABET_SIZE],
    /// All classified letters: Rare block, Medium block, Common block.
    canonical: Vec<Letter>,
}

impl RarityTable {
    /// Builds a table from its three tiers.
    ///
    /// # Errors
    ///
    /// Returns `SimError::DuplicateLetter` if a letter appears twice, or
    /// `SimError::EmptyTier` if a tier has no letters (every tier is reachable
    /// by at least one draw table).
    pub fn new(rare: Tier, medium: Tier, common: Tier) -> SimResult<Self> {
        let tiers = [rare, medium, common];
        let mut lookup = [None; ALPHABET_SIZE];
        let mut canonical = Vec::with_capacity(ALPHABET_SIZE);

        for rarity in Rarity::ALL {
            let tier = &tiers[rarity as usize];
            if tier.letters.is_empty() {
                return Err(SimError::EmptyTier(rarity.name()));
            }
            for &letter in &tier.letters {
                let entry = &mut lookup[letter.index()];
                if entry.is_some() {
                    return Err(SimError::DuplicateLetter(letter.as_char()));
                }
                *entry = Some(rarity);
                canonical.push(letter);
            }
        }

        Ok(Self {
            tiers,
            lookup,
            canonical,
        })
    }

    /// The reference configuration: 4 rare, 5 medium and 17 common letters.
    #[must_use]
    pub fn reference() -> Self {
        let rare = Tier::reference(Rarity::Rare, "KPTU");
        let medium = Tier::reference(Rarity::Medium, "AINSV");
        let common = Tier::reference(Rarity::Common, "BERCDFGHJLMOQWXYZ");
        match Self::new(rare, medium, common) {
            Ok(table) => table,
            Err(e) => unreachable!("reference rarity table is valid: {e}"),
        }
    }

    /// Returns the tier of a letter, if it is classified.
    #[inline]
    #[must_use]
    pub fn rarity_of(&self, letter: Letter) -> Option<Rarity> {
        self.lookup[letter.index()]
    }

    /// Returns a tier's definition.
    #[inline]
    #[must_use]
    pub fn tier(&self, rarity: Rarity) -> &Tier {
        &self.tiers[rarity as usize]
    }

    /// Member letters of a tier.
    #[inline]
    #[must_use]
    pub fn letters(&self, rarity: Rarity) -> &[Letter] {
        &self.tier(rarity).letters
    }

    /// Powder gained per consumed letter of a tier.
    #[inline]
    #[must_use]
    pub fn powder_value(&self, rarity: Rarity) -> u64 {
        self.tier(rarity).powder_value
    }

    /// Powder an unfilled slot of a tier is worth.
    #[inline]
    #[must_use]
    pub fn acquisition_cost(&self, rarity: Rarity) -> u64 {
        self.tier(rarity).acquisition_cost
    }

    /// Every classified letter in canonical order.
    #[inline]
    #[must_use]
    pub fn canonical_letters(&self) -> &[Letter] {
        &self.canonical
    }
}

impl Default for RarityTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl TryFrom<TierTable> for RarityTable {
    type Error = SimError;

    fn try_from(table: TierTable) -> SimResult<Self> {
        Self::new(table.rare, table.medium, table.common)
    }
}

impl From<RarityTable> for TierTable {
    fn from(table: RarityTable) -> Self {
        let [rare, medium, common] = table.tiers;
        Self {
            rare,
            medium,
            common,
        }
    }
}
