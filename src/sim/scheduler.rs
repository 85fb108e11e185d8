use crate::neighborhood::{NodeId, Snapshot};
use crate::time::{SimTime, TimerId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Beacon {
        receiver: NodeId,
        sender: NodeId,
        snapshot: Snapshot,
    },
    Timer {
        node: NodeId,
        timer: TimerId,
    },
}

#[derive(Debug)]
struct Scheduled {
    time: SimTime,
    seq: u64,
    event: SimEvent,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // BinaryHeap is a max-heap; earliest time first, FIFO on ties
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Discrete event queue with cancellable timers.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
    next_timer: u64,
    cancelled: HashSet<TimerId>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_timer(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        id
    }

    pub fn schedule_at(&mut self, time: SimTime, event: SimEvent) {
        self.heap.push(Scheduled {
            time,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    pub fn cancel(&mut self, timer: TimerId) {
        self.cancelled.insert(timer);
    }

    pub fn peek_time(&mut self) -> Option<SimTime> {
        self.drop_cancelled();
        self.heap.peek().map(|s| s.time)
    }

    pub fn pop(&mut self) -> Option<(SimTime, SimEvent)> {
        self.drop_cancelled();
        self.heap.pop().map(|s| (s.time, s.event))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn drop_cancelled(&mut self) {
        while let Some(top) = self.heap.peek() {
            match &top.event {
                SimEvent::Timer { timer, .. } if self.cancelled.contains(timer) => {
                    self.heap.pop();
                }
                _ => break,
            }
        }
    }
}
