//! Open set backed by a binary heap.
//!
//! Entries are keyed by `(f, h, index)` ascending. When a queued cell finds a
//! cheaper route it is pushed again with the new key; superseded entries stay
//! in the heap and are dropped when they surface.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::state::SearchState;

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f32);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f_cost: FloatOrd,
    h_cost: FloatOrd,
    index: usize,
    g_cost: FloatOrd,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then_with(|| self.h_cost.cmp(&other.h_cost))
            .then_with(|| self.index.cmp(&other.index))
            .then_with(|| self.g_cost.cmp(&other.g_cost))
    }
}

#[derive(Debug, Clone)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<OpenEntry>>,
}

impl Frontier {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Drop every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Heap entries, including superseded ones not yet popped.
    pub fn queued(&self) -> usize {
        self.heap.len()
    }

    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    pub fn contains(&self, state: &SearchState, index: usize) -> bool {
        state.in_open(index)
    }

    /// Queue `index` with the costs currently stored in `state`.
    pub fn insert(&mut self, state: &mut SearchState, index: usize) {
        state.set_open(index, true);
        self.heap.push(Reverse(OpenEntry {
            f_cost: FloatOrd(state.f_cost(index)),
            h_cost: FloatOrd(state.h_cost(index)),
            index,
            g_cost: FloatOrd(state.g_cost(index)),
        }));
    }

    /// Pop the live cell with the lowest `f`, then `h`, then index. The cell
    /// leaves the open set but is not marked visited.
    pub fn extract_min(&mut self, state: &mut SearchState) -> Option<usize> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            let index = entry.index;
            if !state.in_open(index) || state.is_visited(index) {
                continue;
            }
            if entry.g_cost.0.to_bits() != state.g_cost(index).to_bits() {
                continue;
            }
            state.set_open(index, false);
            return Some(index);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_f_then_lowest_h() {
        let mut state = SearchState::new(4);
        let mut frontier = Frontier::with_capacity(4);

        // f = 5 with h = 3, f = 5 with h = 1, f = 4.
        state.relax(0, 2.0, 3.0, 0.0, 3);
        state.relax(1, 4.0, 1.0, 0.0, 3);
        state.relax(2, 1.0, 2.0, 1.0, 3);
        frontier.insert(&mut state, 0);
        frontier.insert(&mut state, 1);
        frontier.insert(&mut state, 2);

        assert_eq!(frontier.extract_min(&mut state), Some(2));
        assert_eq!(frontier.extract_min(&mut state), Some(1));
        assert_eq!(frontier.extract_min(&mut state), Some(0));
        assert_eq!(frontier.extract_min(&mut state), None);
    }

    #[test]
    fn equal_keys_fall_back_to_index() {
        let mut state = SearchState::new(3);
        let mut frontier = Frontier::with_capacity(3);
        for index in [2, 0, 1] {
            state.relax(index, 1.0, 1.0, 0.0, 0);
            frontier.insert(&mut state, index);
        }
        assert_eq!(frontier.extract_min(&mut state), Some(0));
        assert_eq!(frontier.extract_min(&mut state), Some(1));
        assert_eq!(frontier.extract_min(&mut state), Some(2));
    }

    #[test]
    fn superseded_entries_are_skipped() {
        let mut state = SearchState::new(2);
        let mut frontier = Frontier::with_capacity(2);

        state.relax(0, 10.0, 0.0, 0.0, 1);
        frontier.insert(&mut state, 0);
        state.relax(1, 6.0, 0.0, 0.0, 0);
        frontier.insert(&mut state, 1);

        // Cell 0 improves while queued.
        state.relax(0, 3.0, 0.0, 0.0, 1);
        frontier.insert(&mut state, 0);
        assert_eq!(frontier.queued(), 3);
        assert!(frontier.contains(&state, 0));

        assert_eq!(frontier.extract_min(&mut state), Some(0));
        assert!(!frontier.contains(&state, 0));
        assert_eq!(frontier.extract_min(&mut state), Some(1));
        assert_eq!(frontier.extract_min(&mut state), None);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut state = SearchState::new(8);
        let mut frontier = Frontier::with_capacity(8);
        for index in 0..8 {
            state.relax(index, index as f32, 0.0, 0.0, 0);
            frontier.insert(&mut state, index);
        }
        let capacity = frontier.capacity();
        frontier.clear();
        assert_eq!(frontier.queued(), 0);
        assert_eq!(frontier.capacity(), capacity);
    }
}
