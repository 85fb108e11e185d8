use crate::neighborhood::NodeId;
use crate::time::{SimTime, TimerId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NeighborhoodError {
    /// A timer other than the table's own TTL timer was delivered to it.
    /// This is a wiring defect and ends processing for the owning node.
    #[error("node {owner_id}: unknown timer {timer:?} received (ttl timer is {expected:?})")]
    UnknownTimer {
        owner_id: NodeId,
        timer: TimerId,
        expected: Option<TimerId>,
    },

    #[error("max_age must be positive, got {0}")]
    InvalidMaxAge(SimTime),

    #[error("cell_size must be positive and finite, got {0}")]
    InvalidCellSize(f64),

    #[error("node {owner_id}: entry {node_id} present at {now} but received at {received_time} (max_age {max_age})")]
    InvariantViolation {
        owner_id: NodeId,
        node_id: NodeId,
        now: SimTime,
        received_time: SimTime,
        max_age: SimTime,
    },
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("beacon for unknown receiver {0}")]
    UnknownNode(NodeId),

    #[error("beacon from {sender} to {receiver} received at {received_time} before its creation at {creation_time}")]
    ReceivedBeforeCreation {
        sender: NodeId,
        receiver: NodeId,
        creation_time: SimTime,
        received_time: SimTime,
    },

    #[error(transparent)]
    Neighborhood(#[from] NeighborhoodError),
}
