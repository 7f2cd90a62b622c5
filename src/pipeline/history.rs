//! Bounded rolling history for metric readings.
//!
//! Fixed-capacity FIFO window over the most recent values, the unit graph
//! widgets render from. Properties:
//!
//! - **Bounded**: `len() == min(samples_seen, capacity)`, always.
//! - **Oldest-first**: iteration runs left-to-right in time, matching how
//!   history curves are drawn.
//! - **Empty start**: no zero pre-fill; a curve grows from the left edge as
//!   real samples arrive.
//!
//! # Example
//!
//! ```rust,ignore
//! use deskviz::pipeline::HistoryBuffer;
//!
//! let mut history = HistoryBuffer::new(25);
//! for i in 0..40 {
//!     history.push(f64::from(i));
//! }
//! assert_eq!(history.len(), 25);
//! assert_eq!(history.latest(), Some(&39.0));
//! ```

use std::collections::VecDeque;

/// A fixed-capacity rolling window of the most recent values.
///
/// Pushing at capacity discards the oldest value. Scalar widgets store
/// `f64` readings; the network widget stores per-interface counter sets.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    /// Backing store; front is oldest, back is newest.
    data: VecDeque<T>,
    /// Maximum capacity (never exceeded).
    capacity: usize,
}

impl<T> HistoryBuffer<T> {
    /// Creates a new history buffer with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be greater than 0");
        Self { data: VecDeque::with_capacity(capacity), capacity }
    }

    /// Pushes a value, evicting the oldest if at capacity. O(1) amortized.
    pub fn push(&mut self, value: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(value);
    }

    /// Returns the most recent value, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.data.back()
    }

    /// Returns the oldest retained value, if any.
    #[must_use]
    pub fn oldest(&self) -> Option<&T> {
        self.data.front()
    }

    /// Returns the current number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if no value has been pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the buffer is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    /// Returns the maximum capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns an iterator over the values from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Clears all elements, keeping the capacity.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: Clone> HistoryBuffer<T> {
    /// Returns the window as an owned vector, oldest first.
    ///
    /// Snapshots cloned into the publication channel use this.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}

impl<T> Default for HistoryBuffer<T> {
    /// Default capacity of 25, the standard perf-graph window.
    fn default() -> Self {
        Self::new(25)
    }
}
