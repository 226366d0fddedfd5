//! # ALPHABOX
//!
//! Front end for the ALPHABOX letter-box simulator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                              alphabox                               │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌─────────────────┐   EventLog   ┌──────────────────────┐          │
//! │  │  alphabox_sim   │─────────────>│  alphabox_playback   │          │
//! │  │                 │              │                      │          │
//! │  │  • Catalog      │              │  • Controller        │          │
//! │  │  • Engine       │              │  • Scheduler         │          │
//! │  │  • BatchStats   │              │  • ReplayView        │          │
//! │  └─────────────────┘              └──────────┬───────────┘          │
//! │                                              │ PlaybackMessage      │
//! │                                              ▼                      │
//! │                                   ┌──────────────────────┐          │
//! │                                   │  TerminalPrinter     │          │
//! │                                   └──────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `events`: presenter-to-terminal message channel
//! - `options`: command line choices to run configuration
//! - `terminal`: text rendering of a replay
//! - `error`: front-end errors

pub mod error;
pub mod events;
pub mod options;
pub mod terminal;

// Re-export the layers
pub use alphabox_playback as playback;
pub use alphabox_sim as sim;

pub use error::{AppError, AppResult};
pub use events::{ChannelPresenter, MessageReceiver, PlaybackBus, PlaybackMessage};
pub use options::RunOptions;
pub use terminal::TerminalPrinter;
