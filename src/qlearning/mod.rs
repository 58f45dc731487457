//! # Q-learning loop
//!
//! Standard tabular ε-greedy training over an [`Environment`]. Grounded on
//! a reference trainer's episode loop: reset, loop until done, pick among
//! effective actions (ε uniformly at random, else the argmin Q-value),
//! apply the `Q[s,a] ← (1−α)Q[s,a] + α(cost + γ·min_a' Q[s',a'])` update.

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::env::Environment;
use crate::log_main;
use crate::utils::rand::thread_rng;

/// A sparse, grow-on-demand Q-table keyed by encoded state id. Missing
/// `(state, action)` entries read as `0.0` (optimistic-enough for a
/// minimum-cost objective where unexplored actions should not be
/// penalised relative to explored ones).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QTable {
    values: IndexMap<u64, Vec<f64>>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn row_mut(&mut self, state: u64, action_space_size: usize) -> &mut Vec<f64> {
        self.values
            .entry(state)
            .or_insert_with(|| vec![0.0; action_space_size])
    }

    pub fn value(&self, state: u64, action: usize) -> f64 {
        self.values
            .get(&state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    /// The action with the lowest Q-value among `effective_actions`
    /// (ties broken by lowest action index).
    pub fn argmin(&self, state: u64, effective_actions: &[usize]) -> Option<usize> {
        effective_actions
            .iter()
            .copied()
            .min_by(|&a, &b| {
                self.value(state, a)
                    .partial_cmp(&self.value(state, b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn min_value(&self, state: u64, effective_actions: &[usize]) -> f64 {
        effective_actions
            .iter()
            .map(|&a| self.value(state, a))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn save(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn load(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Hyperparameters of the tabular trainer. Defaults match this crate's
/// reference values: `alpha = 0.1`, `gamma = 0.9`, `epsilon = 0.3`.
#[derive(Debug, Clone, Copy)]
pub struct QLearningParams {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
}

impl Default for QLearningParams {
    fn default() -> Self {
        QLearningParams {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.3,
        }
    }
}

/// Outcome of one full training episode.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeStats {
    pub steps: u64,
    pub total_cost: i64,
}

/// Runs a single ε-greedy training episode against `env`, updating
/// `table` in place.
pub fn train_episode(
    env: &mut Environment,
    table: &mut QTable,
    params: QLearningParams,
) -> EpisodeStats {
    let mut state = env.reset();
    let mut steps = 0u64;
    let mut total_cost = 0i64;
    let action_space_size = env.action_space_size();

    loop {
        let effective_actions: Vec<usize> = (0..action_space_size)
            .filter(|&a| env.is_effective_action_of_state(a))
            .collect();
        if effective_actions.is_empty() {
            break;
        }

        let action = if thread_rng().random::<f64>() < params.epsilon {
            effective_actions[thread_rng().random_range(0..effective_actions.len())]
        } else {
            table.argmin(state, &effective_actions).unwrap()
        };

        let outcome = env.step(action);
        steps += 1;
        total_cost += outcome.cost;

        let next_effective: Vec<usize> = (0..action_space_size)
            .filter(|&a| env.is_effective_action_of_state(a))
            .collect();
        let future = if next_effective.is_empty() {
            0.0
        } else {
            table.min_value(outcome.next_state, &next_effective)
        };

        let row = table.row_mut(state, action_space_size);
        let current = row[action];
        row[action] = (1.0 - params.alpha) * current
            + params.alpha * (outcome.cost as f64 + params.gamma * future);

        state = outcome.next_state;
        if outcome.done {
            break;
        }
    }

    log_main!(
        crate::verbose::EVENT_QLEARN_EPISODE,
        "completed training episode",
        steps = steps,
        total_cost = total_cost,
    );

    EpisodeStats { steps, total_cost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::Intersection;
    use crate::simulator::Simulator;
    use crate::vehicle::Vehicle;

    fn two_vehicle_env() -> Environment {
        let mut intersection = Intersection::new();
        intersection.add_cz("X");
        intersection.add_src_lane("in", vec!["X".to_string()]);
        intersection.add_dst_lane("out", vec!["X".to_string()]);
        let mut sim = Simulator::new(intersection);
        sim.add_vehicle(Vehicle::new("v1", 0, vec!["X".to_string()], "in", "out", 10))
            .unwrap();
        sim.add_vehicle(Vehicle::new("v2", 0, vec!["X".to_string()], "in", "out", 10))
            .unwrap();
        sim.start().unwrap();
        Environment::new(sim)
    }

    #[test]
    fn training_episode_terminates_and_grows_table() {
        let mut env = two_vehicle_env();
        let mut table = QTable::new();
        let stats = train_episode(&mut env, &mut table, QLearningParams::default());
        assert!(stats.steps > 0);
        assert!(!table.is_empty());
    }

    #[test]
    fn table_round_trips_through_json() {
        let mut env = two_vehicle_env();
        let mut table = QTable::new();
        train_episode(&mut env, &mut table, QLearningParams::default());
        let json = table.save().unwrap();
        let reloaded = QTable::load(&json).unwrap();
        assert_eq!(reloaded.len(), table.len());
    }
}
