//! Bounded collection utilities for samples

use std::collections::VecDeque;

/// Helper trait for bounded VecDeque operations
pub(crate) trait BoundedPush<T> {
    /// Push a value, evicting from the front until at most `max_size` remain
    fn push_bounded(&mut self, value: T, max_size: usize) -> usize;
}

impl<T> BoundedPush<T> for VecDeque<T> {
    #[inline]
    fn push_bounded(&mut self, value: T, max_size: usize) -> usize {
        let mut evicted = 0;
        while !self.is_empty() && self.len() >= max_size {
            self.pop_front();
            evicted += 1;
        }
        self.push_back(value);
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_bounded_evicts_oldest() {
        let mut buf: VecDeque<u32> = VecDeque::new();
        for i in 0..5 {
            buf.push_bounded(i, 3);
        }
        assert_eq!(buf, VecDeque::from(vec![2, 3, 4]));
    }

    #[test]
    fn test_push_bounded_reports_evictions() {
        let mut buf: VecDeque<u32> = VecDeque::from(vec![1, 2, 3, 4]);
        // Cap lowered below the current length
        assert_eq!(buf.push_bounded(5, 2), 3);
        assert_eq!(buf, VecDeque::from(vec![4, 5]));
    }
}
