use std::collections::VecDeque;
use std::fmt;

/// A fixed-size window over the most recent values pushed into it.
///
/// The first push seeds every slot with the same value so a freshly opened
/// chart starts out as a flat line instead of a single point.
#[derive(Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Adds a value, evicting the oldest one once the window is full
    pub fn push(&mut self, item: T) {
        if self.buffer.is_empty() {
            self.buffer.extend(std::iter::repeat(item).take(self.capacity));
        } else {
            self.buffer.push_back(item);
        }

        while self.buffer.len() > self.capacity {
            self.buffer.pop_front();
        }
    }

    /// Snapshot of the window, oldest first
    pub fn contents(&self) -> Vec<T> {
        self.buffer.iter().cloned().collect()
    }
}

impl<T> RollingWindow<T> {
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: fmt::Debug> fmt::Debug for RollingWindow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
