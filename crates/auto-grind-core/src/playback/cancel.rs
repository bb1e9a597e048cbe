use std::{
    sync::{Arc, Condvar, Mutex},
    time::Instant,
};

/// How a timed wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The deadline passed.
    Elapsed,
    /// [`CancelToken::cancel`] was called.
    Cancelled,
}

/// Cancellation flag with a deadline-bounded blocking wait.
///
/// `cancel` wakes any waiter immediately, so stop latency does not depend on
/// how far away the next event is.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    /// Token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel and wake every waiter.
    pub fn cancel(&self) {
        let (flag, cvar) = &*self.inner;
        // A poisoned flag is still a valid bool.
        let mut cancelled = flag.lock().unwrap_or_else(|e| e.into_inner());
        *cancelled = true;
        cvar.notify_all();
    }

    /// Whether [`CancelToken::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block until `deadline` or cancellation, whichever comes first.
    ///
    /// Cancellation is checked before the deadline, so a cancelled token
    /// returns [`WaitOutcome::Cancelled`] even for a deadline in the past.
    pub fn wait_until(&self, deadline: Instant) -> WaitOutcome {
        let (flag, cvar) = &*self.inner;
        let mut cancelled = flag.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if *cancelled {
                return WaitOutcome::Cancelled;
            }
            let now = Instant::now();
            if now >= deadline {
                return WaitOutcome::Elapsed;
            }
            let (guard, _) = cvar
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            cancelled = guard;
        }
    }
}
