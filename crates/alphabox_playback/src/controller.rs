//! # Playback Controller
//!
//! Replays a finished [`EventLog`] one event at a time, pausing a fixed
//! interval between events.
//!
//! ## States
//!
//! ```text
//!            play                 pause
//!   ┌──────┐ ────▶ ┌─────────┐ ─────────▶ ┌────────┐
//!   │ Idle │       │ Running │            │ Paused │
//!   └──────┘ ◀──── └─────────┘ ◀───────── └────────┘
//!      ▲     stop       │         resume       │
//!      │                │ end of log           │ stop
//!      │                ▼                      │
//!      │          ┌───────────┐                │
//!      └───reset──│ Completed │                │
//!                 └───────────┘                ▼
//!                                            Idle
//! ```
//!
//! `reset` is accepted in every state. Every other call on a completed
//! controller is ignored.
//!
//! ## Cancellation
//!
//! Each scheduled step carries the generation it was scheduled under. Any
//! `pause`, `stop` or `reset` bumps the generation and cancels the pending
//! token, and steps compare their generation under the controller lock
//! before touching anything. A step that lost the race is a no-op.
//!
//! ## Presenter Re-entrancy
//!
//! Presenter callbacks run with the controller lock held. A presenter must
//! not call back into the controller from inside a callback.

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use alphabox_sim::{Event, EventLog};

use crate::scheduler::{CancelToken, Scheduler};

/// Intervals below this replay the rest of the log synchronously.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Interval used until the caller picks one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

/// Controller lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// No log loaded.
    Idle,
    /// Stepping through the log.
    Running,
    /// Log loaded, cursor kept, no step scheduled.
    Paused,
    /// The whole log has been applied.
    Completed,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
        })
    }
}

/// Receives replayed events.
pub trait Presenter: Send + 'static {
    /// Called once per event, in log order.
    fn apply(&mut self, index: usize, event: &Event);

    /// Called after every state transition.
    fn on_state_change(&mut self, _state: PlaybackState) {}

    /// Called on `reset`: drop all presentation state.
    fn clear(&mut self) {}
}

struct Inner<P> {
    state: PlaybackState,
    log: Option<Arc<EventLog>>,
    cursor: usize,
    interval: Duration,
    generation: u64,
    pending: Option<CancelToken>,
    presenter: P,
}

impl<P: Presenter> Inner<P> {
    fn transition(&mut self, state: PlaybackState) {
        if self.state != state {
            tracing::debug!("Playback {} -> {}", self.state, state);
            self.state = state;
            self.presenter.on_state_change(state);
        }
    }

    /// Invalidates any scheduled step.
    fn cancel_pending(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

struct Shared<P> {
    scheduler: Arc<dyn Scheduler>,
    inner: Mutex<Inner<P>>,
}

/// Paces an event log out to a [`Presenter`].
///
/// Cloning yields another handle to the same controller.
pub struct PlaybackController<P> {
    shared: Arc<Shared<P>>,
}

impl<P> Clone for PlaybackController<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: Presenter> PlaybackController<P> {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(scheduler: Arc<dyn Scheduler>, presenter: P) -> Self {
        Self {
            shared: Arc::new(Shared {
                scheduler,
                inner: Mutex::new(Inner {
                    state: PlaybackState::Idle,
                    log: None,
                    cursor: 0,
                    interval: DEFAULT_INTERVAL,
                    generation: 0,
                    pending: None,
                    presenter,
                }),
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.shared.inner.lock().state
    }

    /// Number of events applied so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.shared.inner.lock().cursor
    }

    /// Delay between events.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.shared.inner.lock().interval
    }

    /// Runs `f` against the presenter.
    pub fn with_presenter<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.shared.inner.lock().presenter)
    }

    /// Starts replaying `log` from its first event. Only accepted when idle.
    ///
    /// The first event is applied before this returns. With an interval
    /// below [`MIN_INTERVAL`] the whole log is applied before this returns.
    pub fn play(&self, log: impl Into<Arc<EventLog>>, interval: Duration) -> bool {
        let mut inner = self.shared.inner.lock();
        if inner.state != PlaybackState::Idle {
            tracing::warn!("Ignoring play while {}", inner.state);
            return false;
        }

        let log = log.into();
        tracing::info!("Replaying {} events every {:?}", log.len(), interval);
        inner.cancel_pending();
        inner.log = Some(log);
        inner.cursor = 0;
        inner.interval = interval;
        inner.transition(PlaybackState::Running);
        Self::pump(&self.shared, &mut inner);
        true
    }

    /// Suspends a running replay, keeping its position.
    pub fn pause(&self) -> bool {
        let mut inner = self.shared.inner.lock();
        if inner.state != PlaybackState::Running {
            tracing::warn!("Ignoring pause while {}", inner.state);
            return false;
        }
        inner.cancel_pending();
        inner.transition(PlaybackState::Paused);
        true
    }

    /// Continues a paused replay after the current interval.
    pub fn resume(&self) -> bool {
        let mut inner = self.shared.inner.lock();
        if inner.state != PlaybackState::Paused {
            tracing::warn!("Ignoring resume while {}", inner.state);
            return false;
        }
        inner.transition(PlaybackState::Running);
        if inner.interval < MIN_INTERVAL {
            Self::pump(&self.shared, &mut inner);
        } else {
            Self::schedule(&self.shared, &mut inner);
        }
        true
    }

    /// Abandons the replay: drops the log and position. No further event is
    /// applied, even one already scheduled.
    pub fn stop(&self) -> bool {
        let mut inner = self.shared.inner.lock();
        match inner.state {
            PlaybackState::Running | PlaybackState::Paused => {
                Self::halt(&mut inner);
                true
            }
            PlaybackState::Idle | PlaybackState::Completed => {
                tracing::warn!("Ignoring stop while {}", inner.state);
                false
            }
        }
    }

    /// Stops (from any state) and clears the presenter.
    pub fn reset(&self) {
        let mut inner = self.shared.inner.lock();
        Self::halt(&mut inner);
        inner.presenter.clear();
        tracing::debug!("Playback reset");
    }

    /// Changes the delay between events. Applies from the next scheduled
    /// step; a step already waiting keeps its delay.
    pub fn set_interval(&self, interval: Duration) -> bool {
        let mut inner = self.shared.inner.lock();
        if inner.state == PlaybackState::Completed {
            tracing::warn!("Ignoring interval change on a completed replay");
            return false;
        }
        inner.interval = interval;
        true
    }

    fn halt(inner: &mut Inner<P>) {
        inner.cancel_pending();
        inner.log = None;
        inner.cursor = 0;
        inner.transition(PlaybackState::Idle);
    }

    /// Applies events from the cursor until a step has been scheduled or the
    /// log is exhausted.
    fn pump(shared: &Arc<Shared<P>>, inner: &mut Inner<P>) {
        loop {
            let Some(log) = inner.log.clone() else {
                return;
            };
            let Some(event) = log.get(inner.cursor) else {
                inner.transition(PlaybackState::Completed);
                return;
            };

            let index = inner.cursor;
            inner.presenter.apply(index, event);
            inner.cursor += 1;

            if event.is_complete() || inner.cursor >= log.len() {
                tracing::info!("Replay finished after {} events", inner.cursor);
                inner.transition(PlaybackState::Completed);
                return;
            }

            if inner.interval >= MIN_INTERVAL {
                Self::schedule(shared, inner);
                return;
            }
        }
    }

    fn schedule(shared: &Arc<Shared<P>>, inner: &mut Inner<P>) {
        let generation = inner.generation;
        let weak: Weak<Shared<P>> = Arc::downgrade(shared);
        let token = shared.scheduler.after(
            inner.interval,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Self::step(&shared, generation);
                }
            }),
        );
        inner.pending = Some(token);
    }

    fn step(shared: &Arc<Shared<P>>, generation: u64) {
        let mut inner = shared.inner.lock();
        if inner.generation != generation || inner.state != PlaybackState::Running {
            return;
        }
        inner.pending = None;
        Self::pump(shared, &mut inner);
    }
}
