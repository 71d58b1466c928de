use std::sync::OnceLock;

use crate::error::TaskError;

/// Single-assignment holder for the first task error.
///
/// The first [`record`](FirstErrorLatch::record) wins; every later error is dropped.
#[derive(Debug, Default)]
pub struct FirstErrorLatch {
    slot: OnceLock<TaskError>,
}

impl FirstErrorLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `err` if the latch is still empty.
    ///
    /// Returns `true` when this call set the latch.
    pub fn record(&self, err: TaskError) -> bool {
        self.slot.set(err).is_ok()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn get(&self) -> Option<&TaskError> {
        self.slot.get()
    }

    pub fn into_inner(self) -> Option<TaskError> {
        self.slot.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{sync::Arc, thread};

    #[test]
    fn first_record_wins() {
        let latch = FirstErrorLatch::new();
        assert!(!latch.is_set());

        assert!(latch.record(TaskError::fail("first")));
        assert!(!latch.record(TaskError::fail("second")));
        assert!(!latch.record(TaskError::Canceled));

        assert_eq!(latch.into_inner(), Some(TaskError::fail("first")));
    }

    #[test]
    fn concurrent_records_keep_exactly_one() {
        let latch = Arc::new(FirstErrorLatch::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let latch = Arc::clone(&latch);
                thread::spawn(move || latch.record(TaskError::fail(format!("err-{i}"))))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert!(matches!(latch.get(), Some(TaskError::Fail { .. })));
    }
}
