//! # ALPHABOX Playback
//!
//! Paced replay of a finished event log.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  Arc<EventLog>  ┌────────────────────┐  apply(i, e)  ┌─────────────┐
//! │ Simulation   │ ──────────────▶ │ PlaybackController │ ────────────▶ │ Presenter   │
//! │ Engine       │                 │  (state + cursor)  │               │ (ReplayView)│
//! └──────────────┘                 └────────────────────┘               └─────────────┘
//!                                        │      ▲
//!                                  after │      │ step
//!                                        ▼      │
//!                                  ┌────────────────┐
//!                                  │   Scheduler    │
//!                                  │ tokio / manual │
//!                                  └────────────────┘
//! ```
//!
//! The engine finishes the whole run before playback starts; the controller
//! only decides *when* each event reaches the presenter.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod controller;
pub mod scheduler;
pub mod view;

pub use controller::{PlaybackController, PlaybackState, Presenter, DEFAULT_INTERVAL, MIN_INTERVAL};
pub use scheduler::{CancelToken, ManualScheduler, Scheduler, Task, TokioScheduler};
pub use view::{ReplayView, SynthesisResult};
