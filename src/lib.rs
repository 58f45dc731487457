//! Core of a discrete-event scheduler for vehicle traffic through an
//! intersection of conflict zones (CZs).
//!
//! Two subsystems do the heavy lifting:
//!
//! - [`tcg`] — the Timing Conflict Graph: a directed multigraph of
//!   `(vehicle, CZ)` reservation vertices, connected by four typed edges
//!   that encode same-vehicle ordering, mutual exclusion and commit order.
//! - [`simulator`] — a deterministic, time-indexed stepping engine that
//!   drives the TCG one vertex at a time and tracks delay metrics.
//!
//! On top of those, [`env`] exposes a Gym-style reinforcement-learning
//! adapter and [`qlearning`] a tabular ε-greedy trainer for it.
//!
//! ```rust
//! use tcg_intersection_sim::intersection::Intersection;
//! use tcg_intersection_sim::vehicle::Vehicle;
//! use tcg_intersection_sim::simulator::Simulator;
//!
//! let mut intersection = Intersection::new();
//! intersection.add_cz("A");
//! intersection.add_cz("B");
//! intersection.add_adjacency("A", "B", 1).unwrap();
//! intersection.add_src_lane("in", vec!["A".to_string()]);
//! intersection.add_dst_lane("out", vec!["B".to_string()]);
//!
//! let mut sim = Simulator::new(intersection);
//! sim.add_vehicle(Vehicle::new(
//!     "v1",
//!     0,
//!     vec!["A".to_string(), "B".to_string()],
//!     "in",
//!     "out",
//!     10,
//! )).unwrap();
//! sim.start().unwrap();
//! ```

pub mod env;
pub mod error;
pub mod intersection;
pub mod qlearning;
pub mod simulator;
pub mod tcg;
pub mod utils;
pub mod vehicle;
pub mod verbose;

pub use error::{ConfigurationError, InvalidStateError};
pub use intersection::Intersection;
pub use simulator::{Simulator, SimulatorStatus};
pub use tcg::Tcg;
pub use vehicle::{Vehicle, VehicleState};
