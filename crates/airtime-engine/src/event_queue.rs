//! Event queue with deterministic ordering.
//!
//! The queue is a binary min-heap keyed by `(time, sequence)`: events are
//! delivered in nondecreasing virtual-time order, with same-time ties
//! broken by insertion order. This stable tie-break is what makes runs
//! reproducible: two simulations fed the same schedule resume stations
//! in exactly the same order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use airtime_core::{SimTime, StationId};

/// Key for ordering events in the queue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EventKey {
    /// When this event should be delivered.
    pub time: SimTime,
    /// Insertion sequence number, for FIFO ordering at the same time.
    pub sequence: u64,
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => self.sequence.cmp(&other.sequence),
            ord => ord,
        }
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// What an event delivers to its target station.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPayload {
    /// A timed wait elapsed; the station resumes its control loop.
    Wake,
    /// The channel concluded one of the station's transmissions.
    TransmissionOutcome {
        /// The transmission epoch this outcome belongs to. Stations
        /// ignore outcomes whose epoch does not match their current
        /// transmission.
        epoch: u64,
        /// `true` when the transmission completed without a collision.
        successful: bool,
        /// Virtual time remaining in the transmission when the collision
        /// was detected. Zero on success.
        time_left: SimTime,
    },
}

/// An event waiting in the queue.
#[derive(Clone, Copy, Debug)]
pub struct ScheduledEvent {
    /// Delivery time and tie-break sequence.
    pub key: EventKey,
    /// The station this event is delivered to.
    pub target: StationId,
    /// The delivered payload.
    pub payload: EventPayload,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ScheduledEvent {}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Deterministic min-heap of scheduled events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<ScheduledEvent>>,
    next_sequence: u64,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` for delivery to `target` at `time`.
    pub fn push(&mut self, time: SimTime, target: StationId, payload: EventPayload) {
        let key = EventKey {
            time,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.heap.push(Reverse(ScheduledEvent {
            key,
            target,
            payload,
        }));
    }

    /// Remove and return the earliest event, if any.
    pub fn pop(&mut self) -> Option<ScheduledEvent> {
        self.heap.pop().map(|Reverse(ev)| ev)
    }

    /// Delivery time of the earliest event, if any.
    pub fn next_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|Reverse(ev)| ev.key.time)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue holds no events.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop all pending events and restart the sequence counter, so a
    /// fresh repetition reproduces the same tie-break order.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn micros(v: u64) -> SimTime {
        SimTime::from_micros(v)
    }

    #[test]
    fn earlier_time_pops_first() {
        let mut queue = EventQueue::new();
        queue.push(micros(20), StationId(0), EventPayload::Wake);
        queue.push(micros(10), StationId(1), EventPayload::Wake);
        assert_eq!(queue.pop().unwrap().target, StationId(1));
        assert_eq!(queue.pop().unwrap().target, StationId(0));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn same_time_ties_are_fifo() {
        let mut queue = EventQueue::new();
        for id in 0..4 {
            queue.push(micros(5), StationId(id), EventPayload::Wake);
        }
        for id in 0..4 {
            assert_eq!(queue.pop().unwrap().target, StationId(id));
        }
    }

    #[test]
    fn next_time_peeks_without_removing() {
        let mut queue = EventQueue::new();
        assert_eq!(queue.next_time(), None);
        queue.push(micros(7), StationId(0), EventPayload::Wake);
        assert_eq!(queue.next_time(), Some(micros(7)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn clear_restarts_the_sequence_counter() {
        let mut queue = EventQueue::new();
        queue.push(micros(1), StationId(0), EventPayload::Wake);
        queue.clear();
        assert!(queue.is_empty());
        queue.push(micros(1), StationId(9), EventPayload::Wake);
        assert_eq!(queue.pop().unwrap().key.sequence, 0);
    }

    proptest! {
        /// Pops come out in nondecreasing (time, sequence) order no
        /// matter the push order.
        #[test]
        fn pops_are_sorted(times in prop::collection::vec(0u64..1000, 1..64)) {
            let mut queue = EventQueue::new();
            for (i, t) in times.iter().enumerate() {
                queue.push(micros(*t), StationId(i as u32), EventPayload::Wake);
            }
            let mut last: Option<EventKey> = None;
            while let Some(ev) = queue.pop() {
                if let Some(prev) = last {
                    prop_assert!(prev < ev.key);
                }
                last = Some(ev.key);
            }
        }
    }
}
