use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative cancellation signal shared between a search and its caller.
///
/// Collection polls the signal periodically (every
/// `SearchSettings::cancellation_check_interval` collected documents). Once
/// the signal is observed, each partition stops collecting and keeps what it
/// gathered so far. The search result then flags those partitions as truncated.
///
/// Cloning a `Cancellation` yields a handle on the same signal.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Creates a signal that only fires when `cancel` is called.
    pub fn new() -> Cancellation {
        Cancellation::default()
    }

    /// Creates a signal that fires at `deadline`, or earlier if `cancel` is called.
    pub fn with_deadline(deadline: Instant) -> Cancellation {
        Cancellation {
            cancelled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    /// Creates a signal that fires once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Cancellation {
        Cancellation::with_deadline(Instant::now() + timeout)
    }

    /// Requests every search observing this signal to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once `cancel` has been called or the deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::Cancellation;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let cancellation = Cancellation::new();
        let handle = cancellation.clone();
        assert!(!cancellation.is_cancelled());
        handle.cancel();
        assert!(cancellation.is_cancelled());
    }

    #[test]
    fn test_deadline() {
        assert!(Cancellation::with_deadline(Instant::now()).is_cancelled());
        assert!(!Cancellation::with_timeout(Duration::from_secs(3600)).is_cancelled());
    }
}
