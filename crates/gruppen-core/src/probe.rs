//! Injectable instrumentation for gathered tasks.
//!
//! A [`ConcurrencyProbe`] is cloned into every task that should be observed.
//! Each task holds a [`ProbeGuard`] for as long as it runs; the probe counts
//! invocations, tracks how many guards are alive, and remembers the peak.
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

#[derive(Debug, Clone, Default)]
pub struct ConcurrencyProbe {
    inner: Arc<ProbeInner>,
}

#[derive(Debug, Default)]
struct ProbeInner {
    invocations: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of one task execution.
    pub fn enter(&self) -> ProbeGuard {
        self.inner.invocations.fetch_add(1, Ordering::SeqCst);
        let now = self.inner.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(now, Ordering::SeqCst);
        ProbeGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Total number of [`enter`](Self::enter) calls since creation or the last reset.
    pub fn invocations(&self) -> usize {
        self.inner.invocations.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously alive guards observed.
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    /// Zero all counters. Guards still alive keep decrementing `active` on drop,
    /// so only reset between scenarios.
    pub fn reset(&self) {
        self.inner.invocations.store(0, Ordering::SeqCst);
        self.inner.active.store(0, Ordering::SeqCst);
        self.inner.peak.store(0, Ordering::SeqCst);
    }
}

/// Keeps a task counted as active until dropped.
#[must_use = "the task stops being counted as active once the guard is dropped"]
#[derive(Debug)]
pub struct ProbeGuard {
    inner: Arc<ProbeInner>,
}

impl Drop for ProbeGuard {
    fn drop(&mut self) {
        self.inner.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_active_and_peak() {
        let probe = ConcurrencyProbe::new();

        let a = probe.enter();
        let b = probe.enter();
        assert_eq!(probe.active(), 2);
        drop(a);
        let c = probe.enter();
        assert_eq!(probe.active(), 2);
        drop(b);
        drop(c);

        assert_eq!(probe.active(), 0);
        assert_eq!(probe.peak(), 2);
        assert_eq!(probe.invocations(), 3);
    }

    #[test]
    fn clones_share_counters() {
        let probe = ConcurrencyProbe::new();
        let other = probe.clone();
        let _g = other.enter();
        assert_eq!(probe.invocations(), 1);
        assert_eq!(probe.active(), 1);
    }

    #[test]
    fn reset_zeroes_counters() {
        let probe = ConcurrencyProbe::new();
        drop(probe.enter());
        drop(probe.enter());

        probe.reset();
        assert_eq!(probe.invocations(), 0);
        assert_eq!(probe.peak(), 0);
        assert_eq!(probe.active(), 0);
    }
}
