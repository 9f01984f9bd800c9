//! A capacity-bounded append log.

use std::collections::VecDeque;

/// An append-only sequence that drops its oldest element once full.
///
/// Unlike a plain ring buffer the newest element stays mutable, which lets
/// late output (deferred commands, tutorial renders) land on an existing
/// record.
#[derive(Clone)]
pub struct BoundedLog<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// Creates an empty log. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Appends an element, evicting the oldest when at capacity.
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn extend(&mut self, iter: impl IntoIterator<Item = T>) {
        for item in iter {
            self.push(item);
        }
    }

    /// Index 0 is the oldest element.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    #[inline]
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.items.back_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for BoundedLog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedLog")
            .field("len", &self.items.len())
            .field("capacity", &self.capacity)
            .field("elements", &self.items)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_capacity() {
        let mut log = BoundedLog::new(3);
        log.push(1);
        log.push(2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut log = BoundedLog::new(3);
        log.extend([1, 2, 3, 4, 5]);
        assert_eq!(log.to_vec(), vec![3, 4, 5]);
        assert_eq!(log.get(0), Some(&3));
        assert_eq!(log.len(), log.capacity());
    }

    #[test]
    fn test_last_mut() {
        let mut log = BoundedLog::new(2);
        log.push(String::from("a"));
        if let Some(last) = log.last_mut() {
            last.push('b');
        }
        assert_eq!(log.last().map(String::as_str), Some("ab"));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut log = BoundedLog::new(0);
        log.push(1);
        log.push(2);
        assert_eq!(log.to_vec(), vec![2]);
    }

    #[test]
    fn test_clear() {
        let mut log = BoundedLog::new(4);
        log.extend([1, 2]);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.last(), None);
    }

    #[test]
    fn test_debug_format() {
        let mut log = BoundedLog::new(3);
        log.push(1);
        let debug_str = format!("{:?}", log);
        assert!(debug_str.contains("BoundedLog"));
        assert!(debug_str.contains("capacity: 3"));
    }
}
