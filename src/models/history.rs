// ============================================================================
// Structure : HistoryBuffer
// ============================================================================
// Ring buffer borné : garde les N dernières entrées, la plus récente en tête
//
// CONCEPT RUST : VecDeque
// - push_front / pop_back en O(1)
// - Parfait pour un historique "newest-first" avec éviction FIFO
// ============================================================================

use std::collections::VecDeque;

/// Historique borné, plus récent en premier
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryBuffer<T> {
    /// Crée un buffer vide de capacité `capacity` (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Ajoute une entrée en tête ; si le buffer déborde, la plus ancienne
    /// est retirée et retournée
    pub fn push(&mut self, entry: T) -> Option<T> {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entrée la plus récente
    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Itère du plus récent au plus ancien
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_five_most_recent_newest_first() {
        let mut buffer = HistoryBuffer::new(5);

        let mut evicted = Vec::new();
        for i in 1..=6 {
            if let Some(old) = buffer.push(i) {
                evicted.push(old);
            }
        }

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![6, 5, 4, 3, 2]);
        assert_eq!(evicted, vec![1]);
        assert_eq!(buffer.latest(), Some(&6));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut buffer = HistoryBuffer::new(0);
        buffer.push("a");
        buffer.push("b");
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec!["b"]);
    }
}
