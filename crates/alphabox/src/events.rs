//! # Playback Messages
//!
//! Hands replayed events from the playback controller to the thread that
//! owns the terminal.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────┐      ┌─────────────┐      ┌─────────────────┐
//! │ PlaybackController │─────>│  Message    │─────>│ TerminalPrinter │
//! │ (scheduler thread) │      │  Channel    │      │  (main thread)  │
//! └────────────────────┘      └─────────────┘      └─────────────────┘
//! ```
//!
//! The channel is unbounded: with a zero interval the controller applies the
//! whole log inside `play`, before the main thread starts reading.

use crossbeam_channel::{unbounded, Receiver, Sender};

use alphabox_playback::{PlaybackState, Presenter};
use alphabox_sim::Event;

/// One presenter callback, as a value.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackMessage {
    /// An event was replayed.
    Applied {
        /// Position in the log.
        index: usize,
        /// The event.
        event: Event,
    },

    /// The controller changed state.
    StateChanged(PlaybackState),

    /// The controller was reset.
    Cleared,
}

/// Channel pair connecting a controller to a consumer.
pub struct PlaybackBus;

impl PlaybackBus {
    /// Creates a connected presenter and receiver.
    #[must_use]
    pub fn create_pair() -> (ChannelPresenter, MessageReceiver) {
        let (sender, receiver) = unbounded();
        (ChannelPresenter { sender }, MessageReceiver { receiver })
    }
}

/// Presenter that forwards every callback over a channel.
#[derive(Clone)]
pub struct ChannelPresenter {
    sender: Sender<PlaybackMessage>,
}

impl ChannelPresenter {
    fn send(&self, message: PlaybackMessage) {
        if self.sender.send(message).is_err() {
            tracing::debug!("Playback receiver dropped; message discarded");
        }
    }
}

impl Presenter for ChannelPresenter {
    fn apply(&mut self, index: usize, event: &Event) {
        self.send(PlaybackMessage::Applied {
            index,
            event: event.clone(),
        });
    }

    fn on_state_change(&mut self, state: PlaybackState) {
        self.send(PlaybackMessage::StateChanged(state));
    }

    fn clear(&mut self) {
        self.send(PlaybackMessage::Cleared);
    }
}

/// Receiving end of a [`PlaybackBus`].
#[derive(Clone)]
pub struct MessageReceiver {
    receiver: Receiver<PlaybackMessage>,
}

impl MessageReceiver {
    /// Blocks for the next message. `None` once every presenter is gone.
    #[inline]
    #[must_use]
    pub fn recv(&self) -> Option<PlaybackMessage> {
        self.receiver.recv().ok()
    }

    /// Receives all pending messages without blocking.
    #[must_use]
    pub fn drain(&self) -> Vec<PlaybackMessage> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending messages.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}
