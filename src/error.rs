//! Crate-wide error enums, one per fallible subsystem.
//!
//! Following the conventions of this codebase's ambient error handling:
//! plain enums with a hand-written [`std::fmt::Display`] and a blanket
//! [`std::error::Error`] impl — no external error-derive crate.

use std::fmt;

/// Returned by [`crate::simulator::Simulator::add_vehicle`] and
/// [`crate::intersection::Intersection`] construction helpers when the
/// caller's input is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Referenced a lane id that was never registered on the intersection.
    UnknownLane { lane_id: String },
    /// Referenced a CZ id that was never registered on the intersection.
    UnknownCz { cz_id: String },
    /// A vehicle trajectory was empty.
    EmptyTrajectory { vehicle_id: String },
    /// Two consecutive CZs in a trajectory are not adjacent in the intersection.
    NonAdjacentCzs {
        vehicle_id: String,
        from_cz: String,
        to_cz: String,
    },
    /// The trajectory's first CZ does not lie on the declared source lane.
    TrajectoryNotOnSrcLane {
        vehicle_id: String,
        cz_id: String,
        lane_id: String,
    },
    /// The trajectory's last CZ does not lie on the declared destination lane.
    TrajectoryNotOnDstLane {
        vehicle_id: String,
        cz_id: String,
        lane_id: String,
    },
    /// A vehicle id was already registered in this run.
    DuplicateVehicleId { vehicle_id: String },
    /// A time-valued field (arrival time, passing time) was negative or zero
    /// where a positive value is required.
    NegativeOrZeroTime { vehicle_id: String, field: &'static str },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownLane { lane_id } => {
                write!(f, "unknown lane id: {lane_id}")
            }
            ConfigurationError::UnknownCz { cz_id } => write!(f, "unknown CZ id: {cz_id}"),
            ConfigurationError::EmptyTrajectory { vehicle_id } => {
                write!(f, "vehicle {vehicle_id} has an empty trajectory")
            }
            ConfigurationError::NonAdjacentCzs {
                vehicle_id,
                from_cz,
                to_cz,
            } => write!(
                f,
                "vehicle {vehicle_id}: CZ {from_cz} is not adjacent to {to_cz}"
            ),
            ConfigurationError::TrajectoryNotOnSrcLane {
                vehicle_id,
                cz_id,
                lane_id,
            } => write!(
                f,
                "vehicle {vehicle_id}: trajectory starts at {cz_id}, not on src lane {lane_id}"
            ),
            ConfigurationError::TrajectoryNotOnDstLane {
                vehicle_id,
                cz_id,
                lane_id,
            } => write!(
                f,
                "vehicle {vehicle_id}: trajectory ends at {cz_id}, not on dst lane {lane_id}"
            ),
            ConfigurationError::DuplicateVehicleId { vehicle_id } => {
                write!(f, "duplicate vehicle id: {vehicle_id}")
            }
            ConfigurationError::NegativeOrZeroTime { vehicle_id, field } => write!(
                f,
                "vehicle {vehicle_id}: field {field} must be non-negative (positive for passing_time)"
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Returned when an API is called while the [`crate::simulator::Simulator`]
/// is in a state that does not permit it (e.g. `add_vehicle` while running).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    AddVehicleWhileRunning,
    StepBeforeStart,
    RemoveVehicleAfterStart { vehicle_id: String },
    StartAfterAlreadyStarted,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidStateError::AddVehicleWhileRunning => {
                write!(f, "cannot add a vehicle while the simulator is running")
            }
            InvalidStateError::StepBeforeStart => {
                write!(f, "cannot step the simulator before it has been started")
            }
            InvalidStateError::RemoveVehicleAfterStart { vehicle_id } => write!(
                f,
                "cannot remove vehicle {vehicle_id} after the simulator has started"
            ),
            InvalidStateError::StartAfterAlreadyStarted => {
                write!(f, "start() may only be called once, from INITIALIZED")
            }
        }
    }
}

impl std::error::Error for InvalidStateError {}

/// Internal consistency error raised by TCG construction. Distinct from
/// [`ConfigurationError`] because it signals a bug in this crate rather
/// than bad caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TcgError {
    VertexNotExecutable,
}

impl fmt::Display for TcgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TcgError::VertexNotExecutable => {
                write!(f, "start_execute called on a vertex that is not ready")
            }
        }
    }
}

impl std::error::Error for TcgError {}
