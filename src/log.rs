use crate::neighborhood::{BeaconReceptionInfo, NeighborhoodEntryListener, NodeId, TransitionEvent};
use crate::time::SimTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeSample {
    pub owner_id: NodeId,
    pub time: SimTime,
    pub size: usize,
}

/// Result recorder shared by all tables of a simulation run.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    event_counts: HashMap<TransitionEvent, u64>,
    size_samples: Vec<SizeSample>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            event_counts: HashMap::new(),
            size_samples: Vec::new(),
        }
    }

    fn post_event(&mut self, event: TransitionEvent) {
        *self.event_counts.entry(event).or_insert(0) += 1;
    }

    pub fn get_event_count(&self, event: TransitionEvent) -> u64 {
        self.event_counts.get(&event).copied().unwrap_or(0)
    }

    pub fn get_size_samples(&self) -> &[SizeSample] {
        &self.size_samples
    }

    pub fn clear(&mut self) {
        self.event_counts.clear();
        self.size_samples.clear();
    }

    // aggregate over samples taken in [begin, end)
    pub fn aggregate(&self, begin: SimTime, end: SimTime) -> BTreeMap<String, f64> {
        let mut result = BTreeMap::new();

        for (name, event) in [
            ("enter_cell", TransitionEvent::EnterCell),
            ("leave_cell", TransitionEvent::LeaveCell),
            ("stay_in_cell", TransitionEvent::StayInCell),
            ("removed", TransitionEvent::Removed),
            ("dropped", TransitionEvent::Dropped),
        ] {
            result.insert(name.to_string(), self.get_event_count(event) as f64);
        }

        let samples: Vec<&SizeSample> = self
            .size_samples
            .iter()
            .filter(|s| s.time >= begin && s.time < end)
            .collect();

        let sum: usize = samples.iter().map(|s| s.size).sum();
        let max = samples.iter().map(|s| s.size).max().unwrap_or(0);
        let average = if samples.is_empty() {
            0.0
        } else {
            sum as f64 / samples.len() as f64
        };

        result.insert("size_samples".to_string(), samples.len() as f64);
        result.insert("average_table_size".to_string(), average);
        result.insert("max_table_size".to_string(), max as f64);

        result
    }
}

impl NeighborhoodEntryListener for EventLog {
    fn on_enter_cell(&mut self, _info: &BeaconReceptionInfo) {
        self.post_event(TransitionEvent::EnterCell);
    }

    fn on_leave_cell(&mut self, _info: &BeaconReceptionInfo) {
        self.post_event(TransitionEvent::LeaveCell);
    }

    fn on_stay_in_cell(&mut self, _info: &BeaconReceptionInfo) {
        self.post_event(TransitionEvent::StayInCell);
    }

    fn on_removed(&mut self, _info: &BeaconReceptionInfo) {
        self.post_event(TransitionEvent::Removed);
    }

    fn on_dropped(&mut self, _info: &BeaconReceptionInfo) {
        self.post_event(TransitionEvent::Dropped);
    }

    fn on_table_changed(&mut self, owner_id: NodeId, size: usize, now: SimTime) {
        self.size_samples.push(SizeSample {
            owner_id,
            time: now,
            size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> SimTime {
        SimTime::from_secs_f64(s)
    }

    #[test]
    fn test_counts_events() {
        let mut log = EventLog::new();
        let info = BeaconReceptionInfo::new(1);
        log.on_enter_cell(&info);
        log.on_enter_cell(&info);
        log.on_leave_cell(&info);
        log.on_dropped(&info);

        assert_eq!(log.get_event_count(TransitionEvent::EnterCell), 2);
        assert_eq!(log.get_event_count(TransitionEvent::LeaveCell), 1);
        assert_eq!(log.get_event_count(TransitionEvent::Removed), 0);

        let result = log.aggregate(SimTime::ZERO, secs(10.0));
        assert_eq!(result["enter_cell"], 2.0);
        assert_eq!(result["dropped"], 1.0);
        assert_eq!(result["size_samples"], 0.0);
        assert_eq!(result["average_table_size"], 0.0);
    }

    #[test]
    fn test_aggregate_size_samples_in_range() {
        let mut log = EventLog::new();
        log.on_table_changed(0, 1, secs(1.0));
        log.on_table_changed(0, 3, secs(2.0));
        log.on_table_changed(1, 5, secs(3.0));
        log.on_table_changed(1, 9, secs(10.0));

        let result = log.aggregate(secs(1.0), secs(10.0));
        assert_eq!(result["size_samples"], 3.0);
        assert_eq!(result["average_table_size"], 3.0);
        assert_eq!(result["max_table_size"], 5.0);

        log.clear();
        assert!(log.get_size_samples().is_empty());
    }
}
