//! # Event Log
//!
//! Every state-changing step of a run is recorded as one [`Event`]. The log
//! is the complete, causally ordered history of the run: applying its events
//! in order reproduces the final inventory, board, counters and powder.
//!
//! ## Wire Shape
//!
//! Events serialize with a `kind` tag and camelCase fields:
//!
//! ```text
//! { "kind": "draw",         "letter", "rarity", "drawCount", "inventorySnapshot" }
//! { "kind": "advancedDraw", "letter", "rarity", "advancedDrawCount", "inventorySnapshot" }
//! { "kind": "placement",    "boardSnapshot", "inventorySnapshot" }
//! { "kind": "synthesis",    "synthesisCount", "itemsUsed", "synthesizedLetter",
//!                           "powderGain", "powderBalance", "inventorySnapshot" }
//! { "kind": "complete",     "drawCount", "advancedDrawCount", "synthesisCount", "powderBalance" }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::BoardSnapshot;
use crate::inventory::Inventory;
use crate::rarity::{Letter, Rarity};

/// One state transition of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Event {
    /// A normal box was opened.
    #[serde(rename_all = "camelCase")]
    Draw {
        /// Letter drawn.
        letter: Letter,
        /// Its tier.
        rarity: Rarity,
        /// Normal boxes opened so far, including this one.
        draw_count: u64,
        /// Inventory after the draw.
        inventory_snapshot: Inventory,
    },

    /// An advanced box was opened.
    #[serde(rename_all = "camelCase")]
    AdvancedDraw {
        /// Letter drawn.
        letter: Letter,
        /// Its tier (always rare).
        rarity: Rarity,
        /// Advanced boxes opened so far, including this one.
        advanced_draw_count: u64,
        /// Inventory after the draw.
        inventory_snapshot: Inventory,
    },

    /// A placement pass filled at least one slot.
    #[serde(rename_all = "camelCase")]
    Placement {
        /// Board after the pass.
        board_snapshot: BoardSnapshot,
        /// Inventory after the pass.
        inventory_snapshot: Inventory,
    },

    /// Five letters were burned for powder and one bonus letter.
    #[serde(rename_all = "camelCase")]
    Synthesis {
        /// Syntheses so far, including this one.
        synthesis_count: u64,
        /// Letters consumed, in removal order.
        items_used: Vec<Letter>,
        /// The bonus letter.
        synthesized_letter: Letter,
        /// Powder produced by this synthesis.
        powder_gain: u64,
        /// Powder balance after this synthesis.
        powder_balance: u64,
        /// Inventory after consumption and yield.
        inventory_snapshot: Inventory,
    },

    /// The run finished.
    #[serde(rename_all = "camelCase")]
    Complete {
        /// Total normal boxes.
        draw_count: u64,
        /// Total advanced boxes.
        advanced_draw_count: u64,
        /// Total syntheses.
        synthesis_count: u64,
        /// Final powder balance.
        powder_balance: u64,
    },
}

/// Discriminant of an [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`Event::Draw`].
    Draw,
    /// [`Event::AdvancedDraw`].
    AdvancedDraw,
    /// [`Event::Placement`].
    Placement,
    /// [`Event::Synthesis`].
    Synthesis,
    /// [`Event::Complete`].
    Complete,
}

impl EventKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::AdvancedDraw => "advancedDraw",
            Self::Placement => "placement",
            Self::Synthesis => "synthesis",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Event {
    /// Returns the event's kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Draw { .. } => EventKind::Draw,
            Self::AdvancedDraw { .. } => EventKind::AdvancedDraw,
            Self::Placement { .. } => EventKind::Placement,
            Self::Synthesis { .. } => EventKind::Synthesis,
            Self::Complete { .. } => EventKind::Complete,
        }
    }

    /// Inventory snapshot carried by the event, if any.
    #[must_use]
    pub const fn inventory(&self) -> Option<&Inventory> {
        match self {
            Self::Draw {
                inventory_snapshot, ..
            }
            | Self::AdvancedDraw {
                inventory_snapshot, ..
            }
            | Self::Placement {
                inventory_snapshot, ..
            }
            | Self::Synthesis {
                inventory_snapshot, ..
            } => Some(inventory_snapshot),
            Self::Complete { .. } => None,
        }
    }

    /// Returns true for the terminal event.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// Final counters of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Normal boxes opened.
    pub draw_count: u64,
    /// Advanced boxes opened.
    pub advanced_draw_count: u64,
    /// Syntheses performed.
    pub synthesis_count: u64,
    /// Final powder balance.
    pub powder_balance: u64,
    /// Number of events in the log.
    pub event_count: usize,
}

/// The ordered, immutable event history of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Wraps an already-ordered list of events.
    #[must_use]
    pub const fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub(crate) fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of events.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the log has no events.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// All events, in order.
    #[inline]
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterates the events in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Returns true if the last event is `complete`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.events.last().is_some_and(Event::is_complete)
    }

    /// Counts events of one kind.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    /// Final counters, read from the terminal `complete` event.
    #[must_use]
    pub fn summary(&self) -> Option<RunSummary> {
        match self.events.last()? {
            Event::Complete {
                draw_count,
                advanced_draw_count,
                synthesis_count,
                powder_balance,
            } => Some(RunSummary {
                draw_count: *draw_count,
                advanced_draw_count: *advanced_draw_count,
                synthesis_count: *synthesis_count,
                powder_balance: *powder_balance,
                event_count: self.events.len(),
            }),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<Event> for EventLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}
