use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

struct Entry<T> {
    due: Duration,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    // Reversed so the heap pops the earliest (then oldest) entry first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fire-and-forget delayed payloads on a virtual clock.
///
/// There is deliberately no way to cancel an entry: once scheduled it will
/// be handed back by [`TimerQueue::advance`].
pub struct TimerQueue<T> {
    now: Duration,
    next_seq: u64,
    entries: BinaryHeap<Entry<T>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            entries: BinaryHeap::new(),
        }
    }

    pub fn schedule(&mut self, delay: Duration, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            due: self.now + delay,
            seq,
            payload,
        });
    }

    /// Move the clock forward and return every payload now due, earliest first.
    pub fn advance(&mut self, dt: Duration) -> Vec<T> {
        self.now += dt;
        let mut due = Vec::new();
        while self.entries.peek().is_some_and(|entry| entry.due <= self.now) {
            if let Some(entry) = self.entries.pop() {
                due.push(entry.payload);
            }
        }
        due
    }

    #[cfg(test)]
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
