//! Trailing-edge debouncing with cancellation.
//!
//! Each [`Debouncer::trigger`] replaces any request still waiting out its
//! quiet period; only the last one in a burst reaches the action. A request
//! whose timer has already fired is never cancelled by later triggers.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::debug;

type Action<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

struct Pending {
    ticket: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct State {
    next_ticket: u64,
    pending: Option<Pending>,
    disposed: bool,
}

/// Delays an async action until triggers stop arriving for `delay`.
///
/// Must be triggered from within a Tokio runtime. Dropping the debouncer
/// disposes it.
pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    state: Arc<Mutex<State>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            action: Arc::new(move |args: T| -> BoxFuture<'static, ()> {
                Box::pin(action(args))
            }),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Schedule the action with `args`, replacing any pending request.
    ///
    /// Returns `false` (and schedules nothing) once disposed.
    pub fn trigger(&self, args: T) -> bool {
        let mut state = lock(&self.state);
        if state.disposed {
            debug!("debouncer disposed, trigger ignored");
            return false;
        }
        if let Some(prev) = state.pending.take() {
            prev.handle.abort();
            debug!(ticket = prev.ticket, "superseded pending trigger");
        }

        state.next_ticket += 1;
        let ticket = state.next_ticket;
        let delay = self.delay;
        let action = Arc::clone(&self.action);
        let shared = Arc::clone(&self.state);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = lock(&shared);
                let current = state.pending.as_ref().is_some_and(|p| p.ticket == ticket);
                if !current || state.disposed {
                    return;
                }
                // Fired: from here on the request is no longer cancellable.
                state.pending = None;
            }
            debug!(ticket, "debounce window elapsed, firing");
            action(args).await;
        });

        state.pending = Some(Pending { ticket, handle });
        true
    }

    /// Drop the pending request, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut state = lock(&self.state);
        match state.pending.take() {
            Some(pending) => {
                pending.handle.abort();
                debug!(ticket = pending.ticket, "pending trigger cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.state).pending.is_some()
    }
}

impl<T> Debouncer<T> {
    /// Cancel any pending request and refuse further triggers. Idempotent.
    pub fn dispose(&self) {
        let mut state = lock(&self.state);
        if let Some(pending) = state.pending.take() {
            pending.handle.abort();
        }
        state.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.state).disposed
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
