//! Compute-once cells.

use std::fmt;
use std::sync::OnceLock;

/// A value computed on first access and cached thereafter.
///
/// The initializer runs at most once per cell, even when several threads
/// race on the first [`get`](Memoized::get); losers block until the winner
/// has published the value, then all observe the same result.
pub struct Memoized<T> {
    cell: OnceLock<T>,
    init: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T> Memoized<T> {
    /// Creates a cell that computes its value with `init`.
    pub fn new(init: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceLock::new(),
            init: Box::new(init),
        }
    }

    /// Returns the value, computing it if this is the first access.
    pub fn get(&self) -> &T {
        self.cell.get_or_init(|| (self.init)())
    }

    /// Returns `true` once the value has been computed.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memoized<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Memoized").field(value).finish(),
            None => f.write_str("Memoized(<uninit>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};

    #[test]
    fn test_computes_lazily_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = Memoized::new(move || counter.fetch_add(1, Ordering::SeqCst) + 100);

        assert!(!memo.is_initialized());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(*memo.get(), 100);
        assert_eq!(*memo.get(), 100);
        assert!(memo.is_initialized());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_access() {
        const THREADS: usize = 16;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = Memoized::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            format!("value-{n}")
        });
        let barrier = Barrier::new(THREADS);

        let seen: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        memo.get().clone()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(seen.iter().all(|v| v == "value-0"));
    }
}
