//! Stable day-ordered queue of pending actions.
//!
//! Actions pop in ascending day order. Actions sharing a day pop in the order
//! they were pushed, including actions pushed again after being deferred.

use crate::action::Action;
use stake_ledger::Day;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
struct Entry {
    day: Day,
    seq: u64,
    action: Action,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.day, self.seq).cmp(&(other.day, other.seq))
    }
}

/// Min-queue keyed by `(day, insertion sequence)`.
///
/// Actions scheduled past the horizon are dropped on push.
#[derive(Debug, Clone)]
pub struct ActionQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
    horizon: Day,
    dropped: usize,
}

impl ActionQueue {
    /// Creates an empty queue that accepts actions up to and including `horizon`.
    #[must_use]
    pub fn new(horizon: Day) -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            horizon,
            dropped: 0,
        }
    }

    /// Last day an action may be scheduled on.
    pub const fn horizon(&self) -> Day {
        self.horizon
    }

    /// Schedules `action` on `day`. Returns false if the day is past the horizon.
    pub fn push(&mut self, day: Day, action: Action) -> bool {
        if day > self.horizon {
            self.dropped += 1;
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { day, seq, action }));
        true
    }

    /// Removes the earliest action.
    pub fn pop(&mut self) -> Option<(Day, Action)> {
        self.heap
            .pop()
            .map(|Reverse(entry)| (entry.day, entry.action))
    }

    /// Day of the earliest action.
    pub fn peek_day(&self) -> Option<Day> {
        self.heap.peek().map(|Reverse(entry)| entry.day)
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pushes rejected for being past the horizon.
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain(queue: &mut ActionQueue) -> Vec<(Day, String)> {
        std::iter::from_fn(|| queue.pop())
            .map(|(day, action)| (day, action.owner))
            .collect()
    }

    #[test]
    fn pops_in_day_order() {
        let mut queue = ActionQueue::new(100);
        queue.push(5, Action::stake("c", 0));
        queue.push(1, Action::stake("a", 0));
        queue.push(3, Action::stake("b", 0));

        assert_eq!(queue.peek_day(), Some(1));
        let days: Vec<Day> = drain(&mut queue).into_iter().map(|(d, _)| d).collect();
        assert_eq!(days, vec![1, 3, 5]);
    }

    #[test]
    fn equal_days_keep_push_order() {
        let mut queue = ActionQueue::new(100);
        queue.push(2, Action::stake("first", 0));
        queue.push(1, Action::stake("early", 0));
        queue.push(2, Action::stake("second", 0));
        queue.push(2, Action::unstake("third", 0));

        let owners: Vec<String> = drain(&mut queue).into_iter().map(|(_, o)| o).collect();
        assert_eq!(owners, vec!["early", "first", "second", "third"]);
    }

    #[test]
    fn reinserted_action_goes_behind_same_day_peers() {
        let mut queue = ActionQueue::new(100);
        queue.push(1, Action::unstake("deferred", 0));
        queue.push(4, Action::stake("waiting", 0));

        let (_, action) = queue.pop().unwrap();
        queue.push(4, action);

        let owners: Vec<String> = drain(&mut queue).into_iter().map(|(_, o)| o).collect();
        assert_eq!(owners, vec!["waiting", "deferred"]);
    }

    #[test]
    fn past_horizon_is_dropped() {
        let mut queue = ActionQueue::new(10);
        assert!(queue.push(10, Action::stake("a", 0)));
        assert!(!queue.push(11, Action::stake("b", 0)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.horizon(), 10);
    }

    proptest! {
        #[test]
        fn matches_stable_sort(days in prop::collection::vec(1u64..20, 0..64)) {
            let mut queue = ActionQueue::new(20);
            for (i, day) in days.iter().enumerate() {
                queue.push(*day, Action::stake(i.to_string(), 0));
            }

            let mut expected: Vec<(Day, String)> = days
                .iter()
                .enumerate()
                .map(|(i, day)| (*day, i.to_string()))
                .collect();
            expected.sort_by_key(|(day, _)| *day);

            prop_assert_eq!(drain(&mut queue), expected);
            prop_assert!(queue.is_empty());
        }
    }
}
