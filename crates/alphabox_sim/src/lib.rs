//! # ALPHABOX Simulation
//!
//! Pure Rust core of the ALPHABOX letter-collection game.
//!
//! ## Design Principles
//!
//! 1. **Injected randomness** - Every sample comes from a [`RandomSource`]
//! 2. **Integer economy** - Costs, values and balances are `u64`; floats only
//!    appear in draw probabilities
//! 3. **Complete history** - A run returns its full [`EventLog`]; nothing
//!    else survives the call
//! 4. **External configuration** - Catalogs and run settings load from TOML
//!
//! ## Example
//!
//! ```rust,ignore
//! use alphabox_sim::{RngSource, SimConfig, SimulationEngine};
//!
//! let engine = SimulationEngine::reference();
//! let config = SimConfig::default();
//! let log = engine.run(&config, &mut RngSource::from_entropy())?;
//!
//! println!("{:?}", log.summary());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod board;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod draw;
pub mod engine;
pub mod error;
pub mod event;
pub mod inventory;
pub mod rarity;
pub mod stats;

pub use board::{Board, BoardSnapshot, Word};
pub use catalog::{Catalog, REFERENCE_WORDS};
pub use config::{SimConfig, DEFAULT_ADVANCED_BOX_PROBABILITY};
pub use cost::RequiredCost;
pub use draw::{DrawMode, DrawTable, Drawn, RandomSource, RngSource, SequenceSource, WeightedDraw};
pub use engine::{SimulationEngine, SYNTHESIS_INPUT};
pub use error::{SimError, SimResult};
pub use event::{Event, EventKind, EventLog, RunSummary};
pub use inventory::{Inventory, LetterCount};
pub use rarity::{Letter, Rarity, RarityTable, RaritySet, Tier, ALPHABET_SIZE};
pub use stats::{BatchStats, Spread};
