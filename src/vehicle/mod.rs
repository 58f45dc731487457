//! The mutable actor driven through an intersection: an arrival time, an
//! ordered trajectory of CZ identifiers, and a small state machine.

use serde::{Deserialize, Serialize};

/// `position_index` reaching this value means the vehicle has departed
/// through the `"$"` sentinel vertex.
pub const DEPARTED: i64 = -1;

/// A vehicle's progress through its trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleState {
    NotArrived,
    Ready,
    Blocked,
    Moving,
    Left,
}

/// A serializable vehicle record, matching the external traffic-description
/// field list one-to-one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: String,
    pub earliest_arrival_time: u64,
    pub trajectory: Vec<String>,
    pub src_lane_id: String,
    pub dst_lane_id: String,
    pub vertex_passing_time: u64,
}

/// A vehicle travelling through the intersection.
///
/// `position_index` ranges over `[-1, trajectory.len()]`: `-1` means "not
/// yet entered" (`"^"`), `trajectory.len()` means "departed" (`"$"`).
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: String,
    pub earliest_arrival_time: u64,
    pub trajectory: Vec<String>,
    pub src_lane_id: String,
    pub dst_lane_id: String,
    pub vertex_passing_time: u64,
    pub state: VehicleState,
    pub position_index: i64,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        earliest_arrival_time: u64,
        trajectory: Vec<String>,
        src_lane_id: impl Into<String>,
        dst_lane_id: impl Into<String>,
        vertex_passing_time: u64,
    ) -> Self {
        Vehicle {
            id: id.into(),
            earliest_arrival_time,
            trajectory,
            src_lane_id: src_lane_id.into(),
            dst_lane_id: dst_lane_id.into(),
            vertex_passing_time,
            state: VehicleState::NotArrived,
            position_index: -1,
        }
    }

    pub fn from_record(record: VehicleRecord) -> Self {
        Vehicle::new(
            record.id,
            record.earliest_arrival_time,
            record.trajectory,
            record.src_lane_id,
            record.dst_lane_id,
            record.vertex_passing_time,
        )
    }

    pub fn to_record(&self) -> VehicleRecord {
        VehicleRecord {
            id: self.id.clone(),
            earliest_arrival_time: self.earliest_arrival_time,
            trajectory: self.trajectory.clone(),
            src_lane_id: self.src_lane_id.clone(),
            dst_lane_id: self.dst_lane_id.clone(),
            vertex_passing_time: self.vertex_passing_time,
        }
    }

    /// Resets state and position for a `restart()`.
    pub fn reset(&mut self) {
        self.state = VehicleState::NotArrived;
        self.position_index = -1;
    }

    /// True once the vehicle has reached the `"$"` sentinel.
    pub fn has_departed(&self) -> bool {
        self.position_index == self.trajectory.len() as i64
    }

    /// The CZ id currently occupied, or `None` if not yet entered or
    /// already departed.
    pub fn current_cz(&self) -> Option<&str> {
        if self.position_index < 0 || self.has_departed() {
            None
        } else {
            Some(self.trajectory[self.position_index as usize].as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vehicle_starts_not_arrived_and_unentered() {
        let v = Vehicle::new("v1", 0, vec!["A".to_string(), "B".to_string()], "in", "out", 10);
        assert_eq!(v.state, VehicleState::NotArrived);
        assert_eq!(v.position_index, -1);
        assert!(v.current_cz().is_none());
        assert!(!v.has_departed());
    }

    #[test]
    fn departed_when_position_equals_trajectory_len() {
        let mut v = Vehicle::new("v1", 0, vec!["A".to_string()], "in", "out", 10);
        v.position_index = 1;
        assert!(v.has_departed());
        assert!(v.current_cz().is_none());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut v = Vehicle::new("v1", 0, vec!["A".to_string()], "in", "out", 10);
        v.position_index = 1;
        v.state = VehicleState::Left;
        v.reset();
        assert_eq!(v.position_index, -1);
        assert_eq!(v.state, VehicleState::NotArrived);
    }

    #[test]
    fn record_round_trip() {
        let record = VehicleRecord {
            id: "v1".into(),
            earliest_arrival_time: 0,
            trajectory: vec!["A".into(), "B".into()],
            src_lane_id: "in".into(),
            dst_lane_id: "out".into(),
            vertex_passing_time: 10,
        };
        let v = Vehicle::from_record(record.clone());
        let back = v.to_record();
        assert_eq!(back.id, record.id);
        assert_eq!(back.trajectory, record.trajectory);
    }
}
