use serde::{Deserialize, Serialize};

/// Lifecycle status of a [`crate::simulator::Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulatorStatus {
    Initialized,
    Running,
    Terminated,
    Deadlock,
}
