//! # Environment adapter
//!
//! Presents a [`Simulator`] as a Gym-style reinforcement-learning
//! environment with a discrete action space and an encoded discrete state.
//!
//! Grounded on the call pattern of a tabular Q-learning trainer driving
//! this adapter: `reset`, `step`, `is_effective_action_of_state`,
//! `decode_state`/`decode_action` (`environment.py` itself was not among
//! the retrieved reference sources; the trainer's usage is treated as the
//! authoritative contract).

use indexmap::IndexMap;

use crate::simulator::{Simulator, SimulatorStatus};
use crate::vehicle::VehicleState;
use crate::{log_additional, log_main};

/// Large fixed penalty applied to `cost` when a step causes a `DEADLOCK`,
/// so that the optimal policy always avoids it.
pub const DEADLOCK_PENALTY: i64 = 1_000_000;

/// `(next_state, cost, done, info)` returned by [`Environment::step`].
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub next_state: u64,
    pub cost: i64,
    pub done: bool,
    pub info: StepInfo,
}

/// Auxiliary, non-normative information about the step just taken.
#[derive(Debug, Clone)]
pub struct StepInfo {
    pub status: SimulatorStatus,
    pub timestamp: i64,
}

/// A Gym-style wrapper around a [`Simulator`].
///
/// State encoding: per vehicle (in insertion order), `position_index + 1`
/// (so `-1..=len` becomes `0..=len+1`) mixed-radix with `state as u8`
/// (`0..=4`), combined into one `u64`. The simulator `timestamp` is not
/// part of the state — two runs at different timestamps with identical
/// per-vehicle `(position, state)` map to the same state id.
///
/// Action encoding: `{0..=N}` where vehicle ids occupy `0..N` in insertion
/// order and `N` is the reserved no-op.
pub struct Environment {
    simulator: Simulator,
    vehicle_order: Vec<String>,
}

impl Environment {
    pub fn new(simulator: Simulator) -> Self {
        let vehicle_order: Vec<String> = simulator.vehicle_ids().into_iter().collect();
        Environment {
            simulator,
            vehicle_order,
        }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// `{0..=N}`: one slot per vehicle plus the reserved no-op.
    pub fn action_space_size(&self) -> usize {
        self.vehicle_order.len() + 1
    }

    /// Grown on demand: `(len(trajectory)+2)^1 * 5` possibilities per
    /// vehicle, multiplied across all vehicles. Returned as an upper bound,
    /// not a claim that every combination is reachable.
    pub fn observation_space_size(&self) -> u64 {
        let mut size: u64 = 1;
        for vehicle_id in &self.vehicle_order {
            if let Some(vehicle) = self.simulator.vehicle(vehicle_id) {
                let position_radix = vehicle.trajectory.len() as u64 + 2;
                size = size.saturating_mul(position_radix).saturating_mul(5);
            }
        }
        size
    }

    /// Calls `simulator.restart()`, returns the encoded initial state.
    pub fn reset(&mut self) -> u64 {
        self.simulator.restart();
        log_main!(
            crate::verbose::EVENT_ENV_RESET,
            "environment reset",
            action_space_size = self.action_space_size(),
        );
        self.encode_state()
    }

    /// Decodes `action` to a target vehicle id (or no-op), calls
    /// `simulator.step(vehicle_id)`, returns `(next_state, cost, done, info)`.
    /// On `DEADLOCK`, `cost` receives [`DEADLOCK_PENALTY`].
    pub fn step(&mut self, action: usize) -> StepOutcome {
        let cost_before = self.simulator.get_cumulative_delayed_time();
        let target = self.decode_action(action);
        self.simulator.step(target.as_deref());

        let status = self.simulator.status();
        let done = matches!(status, SimulatorStatus::Terminated | SimulatorStatus::Deadlock);
        let mut cost = self.simulator.get_cumulative_delayed_time() - cost_before;
        if status == SimulatorStatus::Deadlock {
            cost += DEADLOCK_PENALTY;
        }

        log_additional!(
            crate::verbose::EVENT_ENV_STEP,
            "environment step",
            action = action,
            cost = cost,
            done = done,
        );

        StepOutcome {
            next_state: self.encode_state(),
            cost,
            done,
            info: StepInfo {
                status,
                timestamp: self.simulator.timestamp(),
            },
        }
    }

    /// Bijection `{0..N} ∪ {no-op} ↔ vehicle ids`. `None` is the no-op.
    pub fn encode_action(&self, vehicle_id: Option<&str>) -> usize {
        match vehicle_id {
            None => self.vehicle_order.len(),
            Some(id) => self
                .vehicle_order
                .iter()
                .position(|v| v == id)
                .unwrap_or(self.vehicle_order.len()),
        }
    }

    /// Inverse of [`Environment::encode_action`].
    pub fn decode_action(&self, action: usize) -> Option<String> {
        self.vehicle_order.get(action).cloned()
    }

    /// True iff decoding `action` in the *current* simulator state yields a
    /// currently executable vertex.
    pub fn is_effective_action_of_state(&mut self, action: usize) -> bool {
        match self.decode_action(action) {
            None => true, // the no-op is always effective
            Some(vehicle_id) => self
                .simulator
                .executable_vehicle_ids()
                .contains(&vehicle_id),
        }
    }

    /// Mixed-radix encoding of `(position_index, state)` per vehicle, in
    /// insertion order.
    pub fn encode_state(&self) -> u64 {
        let mut state_id: u64 = 0;
        for vehicle_id in &self.vehicle_order {
            let Some(vehicle) = self.simulator.vehicle(vehicle_id) else {
                continue;
            };
            let position_radix = vehicle.trajectory.len() as u64 + 2;
            let position_digit = (vehicle.position_index + 1) as u64;
            let state_digit = vehicle_state_digit(vehicle.state);
            state_id = state_id * position_radix + position_digit;
            state_id = state_id * 5 + state_digit;
        }
        state_id
    }

    /// Inverse of [`Environment::encode_state`]: per-vehicle
    /// `(position_index, state)` pairs, in insertion order.
    pub fn decode_state(&self, mut state_id: u64) -> IndexMap<String, (i64, VehicleState)> {
        let mut digits = Vec::with_capacity(self.vehicle_order.len());
        for vehicle_id in self.vehicle_order.iter().rev() {
            let Some(vehicle) = self.simulator.vehicle(vehicle_id) else {
                continue;
            };
            let position_radix = vehicle.trajectory.len() as u64 + 2;
            let state_digit = state_id % 5;
            state_id /= 5;
            let position_digit = state_id % position_radix;
            state_id /= position_radix;
            digits.push((vehicle_id.clone(), position_digit as i64 - 1, digit_to_vehicle_state(state_digit)));
        }
        digits.into_iter().rev().collect()
    }
}

fn vehicle_state_digit(state: VehicleState) -> u64 {
    match state {
        VehicleState::NotArrived => 0,
        VehicleState::Ready => 1,
        VehicleState::Blocked => 2,
        VehicleState::Moving => 3,
        VehicleState::Left => 4,
    }
}

fn digit_to_vehicle_state(digit: u64) -> VehicleState {
    match digit {
        0 => VehicleState::NotArrived,
        1 => VehicleState::Ready,
        2 => VehicleState::Blocked,
        3 => VehicleState::Moving,
        _ => VehicleState::Left,
    }
}
