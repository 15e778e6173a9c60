use std::collections::VecDeque;

use super::Board;

/// Value-only record of a past session state, restored by undo.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HistorySnapshot {
    pub score: u64,
    pub highest_level_reached: u32,
    pub grid: Board,
}

/// Bounded undo stack.
///
/// Pushing beyond capacity drops the oldest entry; popping returns the most
/// recent one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<HistorySnapshot>,
    capacity: usize,
}

impl History {
    /// Creates an empty history. A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuilds a history from persisted entries (oldest first), keeping only
    /// the newest `capacity` of them.
    pub fn from_entries(capacity: usize, entries: impl IntoIterator<Item = HistorySnapshot>) -> Self {
        let mut history = Self::new(capacity);
        for entry in entries {
            history.push(entry);
        }
        history
    }

    pub fn push(&mut self, snapshot: HistorySnapshot) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<HistorySnapshot> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&HistorySnapshot> {
        self.entries.back()
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

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &HistorySnapshot> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(score: u64) -> HistorySnapshot {
        HistorySnapshot {
            score,
            highest_level_reached: 4,
            grid: Board::empty(),
        }
    }

    #[test]
    fn eleventh_push_drops_the_oldest() {
        let mut history = History::new(10);
        for score in 0..11 {
            history.push(snapshot(score));
        }

        assert_eq!(history.len(), 10);
        let scores: Vec<_> = history.iter().map(|s| s.score).collect();
        assert_eq!(scores, (1..11).collect::<Vec<_>>());
    }

    #[test]
    fn pop_returns_most_recent_first() {
        let mut history = History::new(3);
        history.push(snapshot(1));
        history.push(snapshot(2));

        assert_eq!(history.pop().map(|s| s.score), Some(2));
        assert_eq!(history.pop().map(|s| s.score), Some(1));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn from_entries_keeps_newest() {
        let history = History::from_entries(2, (0..5).map(snapshot));
        let scores: Vec<_> = history.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![3, 4]);
    }

    #[test]
    fn zero_capacity_still_holds_one_entry() {
        let mut history = History::new(0);
        history.push(snapshot(7));
        history.push(snapshot(8));
        assert_eq!(history.len(), 1);
        assert_eq!(history.peek().map(|s| s.score), Some(8));
    }
}
