//! Decision table for cell-occupancy events.
//!
//! A record without prior snapshot was never counted in a cell, so expiring it
//! needs no cleanup in the density map (`Dropped`). A record with prior
//! snapshot was counted and must be subtracted (`Removed`). A cell change is
//! reported as leave followed by enter so per-cell counts never underflow.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransitionEvent {
    EnterCell,
    LeaveCell,
    StayInCell,
    Removed,
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Enter,
    Dropped,
    Stay,
    Move,
    Removed,
}

impl Transition {
    /// Events to emit, in order.
    pub fn events(&self) -> &'static [TransitionEvent] {
        match self {
            Transition::Enter => &[TransitionEvent::EnterCell],
            Transition::Dropped => &[TransitionEvent::Dropped],
            Transition::Stay => &[TransitionEvent::StayInCell],
            Transition::Move => &[TransitionEvent::LeaveCell, TransitionEvent::EnterCell],
            Transition::Removed => &[TransitionEvent::Removed],
        }
    }

    pub fn removes_entry(&self) -> bool {
        matches!(self, Transition::Dropped | Transition::Removed)
    }
}

/// `cell_changed` is ignored for expired records and for first sightings.
pub fn transition(has_prior: bool, expired: bool, cell_changed: bool) -> Transition {
    match (has_prior, expired) {
        (false, false) => Transition::Enter,
        (false, true) => Transition::Dropped,
        (true, true) => Transition::Removed,
        (true, false) if cell_changed => Transition::Move,
        (true, false) => Transition::Stay,
    }
}

/// Event for an entry found past its TTL during a sweep.
pub fn expiry(has_prior: bool) -> TransitionEvent {
    if has_prior {
        TransitionEvent::Removed
    } else {
        TransitionEvent::Dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting() {
        assert_eq!(transition(false, false, false), Transition::Enter);
        assert_eq!(transition(false, false, true), Transition::Enter);
        assert_eq!(transition(false, true, false), Transition::Dropped);
        assert_eq!(transition(false, true, true), Transition::Dropped);
    }

    #[test]
    fn test_known_node() {
        assert_eq!(transition(true, false, false), Transition::Stay);
        assert_eq!(transition(true, false, true), Transition::Move);
        assert_eq!(transition(true, true, false), Transition::Removed);
        assert_eq!(transition(true, true, true), Transition::Removed);
    }

    #[test]
    fn test_move_leaves_before_entering() {
        assert_eq!(
            Transition::Move.events(),
            &[TransitionEvent::LeaveCell, TransitionEvent::EnterCell]
        );
        assert!(!Transition::Move.removes_entry());
        assert!(Transition::Dropped.removes_entry());
        assert!(Transition::Removed.removes_entry());
    }

    #[test]
    fn test_expiry() {
        assert_eq!(expiry(true), TransitionEvent::Removed);
        assert_eq!(expiry(false), TransitionEvent::Dropped);
    }
}
