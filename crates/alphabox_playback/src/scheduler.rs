//! # Schedulers
//!
//! Deferred execution behind one small trait, so the controller never
//! touches a clock directly.
//!
//! - [`TokioScheduler`]: sleeps on a tokio runtime, for real playback
//! - [`ManualScheduler`]: a virtual clock advanced by hand, for tests
//!
//! Every scheduled task comes with a [`CancelToken`]. A cancelled task is
//! never run, even if its delay has already elapsed. Cancelling a tokio
//! task also aborts its timer, so no sleeping task outlives a `stop`.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Cancellation handle for a scheduled task.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    abort: Option<AbortHandle>,
}

impl CancelToken {
    /// Creates a live token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the task. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    /// Returns true once [`CancelToken::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Runs tasks after a delay.
pub trait Scheduler: Send + Sync {
    /// Runs `task` once `delay` has elapsed, unless the returned token is
    /// cancelled first.
    fn after(&self, delay: Duration, task: Task) -> CancelToken;
}

// =============================================================================
// TOKIO
// =============================================================================

/// Scheduler backed by tokio timers.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    /// Schedules onto the given runtime.
    #[must_use]
    pub const fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Schedules onto the runtime the caller is running in, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, task: Task) -> CancelToken {
        let guard = CancelToken::new();
        let cancelled = Arc::clone(&guard.cancelled);
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !guard.is_cancelled() {
                task();
            }
        });
        CancelToken {
            cancelled,
            abort: Some(join.abort_handle()),
        }
    }
}

// =============================================================================
// MANUAL
// =============================================================================

struct Pending {
    due: Duration,
    seq: u64,
    token: CancelToken,
    task: Task,
}

#[derive(Default)]
struct Queue {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Queue {
    /// Removes the earliest live task due at or before `limit`.
    fn pop_due(&mut self, limit: Option<Duration>) -> Option<Pending> {
        self.pending.retain(|p| !p.token.is_cancelled());
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| limit.map_or(true, |l| p.due <= l))
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(index))
    }
}

/// Deterministic scheduler with a virtual clock.
///
/// Nothing runs until the test calls [`ManualScheduler::advance`],
/// [`ManualScheduler::run_next`] or [`ManualScheduler::run_all`]. Tasks run
/// on the calling thread, outside the queue lock, so a task may schedule
/// further tasks.
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<Queue>,
}

impl ManualScheduler {
    /// Creates an empty scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.queue.lock().now
    }

    /// Number of scheduled, uncancelled tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .pending
            .iter()
            .filter(|p| !p.token.is_cancelled())
            .count()
    }

    /// Moves the clock forward by `by`, running every task that falls due on
    /// the way (including tasks scheduled by those tasks). Returns the number
    /// of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        loop {
            let next = {
                let mut queue = self.queue.lock();
                let next = queue.pop_due(Some(target));
                if let Some(p) = &next {
                    queue.now = p.due;
                }
                next
            };
            match next {
                Some(p) => {
                    (p.task)();
                    ran += 1;
                }
                None => break,
            }
        }
        self.queue.lock().now = target;
        ran
    }

    /// Runs the earliest pending task, moving the clock to its due time.
    /// Returns false if nothing is pending.
    pub fn run_next(&self) -> bool {
        let next = {
            let mut queue = self.queue.lock();
            let next = queue.pop_due(None);
            if let Some(p) = &next {
                queue.now = queue.now.max(p.due);
            }
            next
        };
        next.map_or(false, |p| {
            (p.task)();
            true
        })
    }

    /// Runs tasks until none are pending. Returns the number run.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay: Duration, task: Task) -> CancelToken {
        let token = CancelToken::new();
        let mut queue = self.queue.lock();
        let seq = queue.next_seq;
        queue.next_seq += 1;
        let due = queue.now + delay;
        queue.pending.push(Pending {
            due,
            seq,
            token: token.clone(),
            task,
        });
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Task) {
        let hits = Arc::new(AtomicUsize::new(0));
        let make = {
            let hits = Arc::clone(&hits);
            move || -> Task {
                let hits = Arc::clone(&hits);
                Box::new(move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                })
            }
        };
        (hits, make)
    }

    #[test]
    fn test_manual_runs_only_due_tasks() {
        let scheduler = ManualScheduler::new();
        let (hits, task) = counter();
        let _a = scheduler.after(Duration::from_millis(10), task());
        let _b = scheduler.after(Duration::from_millis(30), task());

        assert_eq!(scheduler.advance(Duration::from_millis(9)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.now(), Duration::from_millis(10));

        assert_eq!(scheduler.run_all(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.now(), Duration::from_millis(30));
    }

    #[test]
    fn test_cancelled_task_never_runs() {
        let scheduler = ManualScheduler::new();
        let (hits, task) = counter();
        let token = scheduler.after(Duration::ZERO, task());
        token.cancel();

        assert!(token.is_cancelled());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.run_all(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_tasks_may_schedule_tasks() {
        let scheduler = Arc::new(ManualScheduler::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let inner_hits = Arc::clone(&hits);
        let inner_scheduler = Arc::clone(&scheduler);
        let _token = scheduler.after(
            Duration::from_millis(5),
            Box::new(move || {
                inner_hits.fetch_add(1, Ordering::SeqCst);
                let again = Arc::clone(&inner_hits);
                let _next = inner_scheduler.after(
                    Duration::from_millis(5),
                    Box::new(move || {
                        again.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(10)), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_tokio_cancel_releases_sleeping_task() {
        let scheduler = TokioScheduler::current().unwrap();
        let held = Arc::new(());
        let captured = Arc::clone(&held);
        let token = scheduler.after(
            Duration::from_secs(3600),
            Box::new(move || drop(captured)),
        );
        assert_eq!(Arc::strong_count(&held), 2);

        token.cancel();
        for _ in 0..100 {
            if Arc::strong_count(&held) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(Arc::strong_count(&held), 1, "aborted task must drop its closure");
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_tokio_runs_uncancelled_task() {
        let scheduler = TokioScheduler::current().unwrap();
        let (hits, task) = counter();
        let _token = scheduler.after(Duration::from_millis(1), task());
        for _ in 0..200 {
            if hits.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_equal_due_times_run_in_schedule_order() {
        let scheduler = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..4 {
            let order = Arc::clone(&order);
            let _token = scheduler.after(Duration::from_millis(1), Box::new(move || order.lock().push(i)));
        }
        scheduler.run_all();
        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }
}
