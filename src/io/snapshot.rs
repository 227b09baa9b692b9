//! Last-known-value snapshot cells for asynchronous inputs.
//!
//! Sensor and control data arrive from producer threads at arbitrary
//! rates; the estimation loop reads a consistent copy of each stream at
//! the start of every cycle. A cell holds only the latest value, so a
//! slow consumer sees fresh data and a slow producer leaves the previous
//! value in place.

use std::sync::{Arc, Mutex};

/// Shared single-value cell: writers replace, readers copy.
///
/// Clone the cell to hand one end to a producer thread; all clones share
/// the same slot. Reading never consumes the value, so repeated snapshots
/// between publishes return the same last-known data.
#[derive(Debug)]
pub struct SnapshotCell<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for SnapshotCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotCell<T> {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the cell's value. Last write wins.
    pub fn publish(&self, value: T) {
        *self.lock() = Some(value);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<T>> {
        // A poisoned lock only means a producer panicked mid-replace of an
        // Option; the stored value is still coherent.
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T: Clone> SnapshotCell<T> {
    /// Copy the latest value, or `None` if nothing was ever published.
    pub fn snapshot(&self) -> Option<T> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_cell_snapshots_none() {
        let cell: SnapshotCell<u32> = SnapshotCell::new();
        assert_eq!(cell.snapshot(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let cell = SnapshotCell::new();
        cell.publish(1);
        cell.publish(2);
        assert_eq!(cell.snapshot(), Some(2));
    }

    #[test]
    fn test_snapshot_does_not_consume() {
        let cell = SnapshotCell::new();
        cell.publish(vec![1, 2, 3]);
        assert_eq!(cell.snapshot(), Some(vec![1, 2, 3]));
        assert_eq!(cell.snapshot(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_clones_share_the_slot() {
        let consumer = SnapshotCell::new();
        let producer = consumer.clone();

        let handle = thread::spawn(move || {
            producer.publish(42u32);
        });
        handle.join().expect("producer thread");

        assert_eq!(consumer.snapshot(), Some(42));
    }
}
