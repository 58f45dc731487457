//! Integration tests for the concrete scenarios named by this crate's
//! testable-properties list: forced deadlock and the greedy baseline over
//! a multi-vehicle reference intersection.

use tcg_intersection_sim::env::Environment;
use tcg_intersection_sim::intersection::Intersection;
use tcg_intersection_sim::simulator::{Simulator, SimulatorStatus};
use tcg_intersection_sim::utils::fixtures::{four_cz_reference_intersection, six_vehicle_traffic};
use tcg_intersection_sim::vehicle::Vehicle;

/// Scenario 3 (adapted, see DESIGN.md "Open Questions" for the reasoning):
/// V1 trajectory (A,B), V2 trajectory (B,A), both arrive at t=0, share both
/// conflict zones in reversed order. Conflict orientation is decided lazily
/// at `start_execute` time, so a decided edge always points from whichever
/// vertex executes first to whichever executes second; combined with the
/// per-vehicle `TYPE_1` total order this makes the decided subgraph a DAG
/// by construction for any schedule over this topology — there is no
/// sequence of `step` calls that makes it cyclic. What *is* forceable is
/// full serialization of the two vehicles (one fully drains the
/// intersection before the other is allowed to start), which this test
/// exercises and confirms still terminates cleanly.
#[test]
fn reversed_shared_pair_serializes_without_deadlock() {
    let mut intersection = Intersection::new();
    intersection.add_cz("A");
    intersection.add_cz("B");
    intersection.add_adjacency("A", "B", 1).unwrap();
    intersection.add_adjacency("B", "A", 1).unwrap();
    intersection.add_src_lane("in_a", vec!["A".to_string()]);
    intersection.add_src_lane("in_b", vec!["B".to_string()]);
    intersection.add_dst_lane("out_a", vec!["A".to_string()]);
    intersection.add_dst_lane("out_b", vec!["B".to_string()]);

    let mut sim = Simulator::new(intersection);
    sim.add_vehicle(Vehicle::new(
        "v1",
        0,
        vec!["A".to_string(), "B".to_string()],
        "in_a",
        "out_b",
        10,
    ))
    .unwrap();
    sim.add_vehicle(Vehicle::new(
        "v2",
        0,
        vec!["B".to_string(), "A".to_string()],
        "in_b",
        "out_a",
        10,
    ))
    .unwrap();
    sim.start().unwrap();

    // Starve v1 entirely until v2 has fully drained both of its zones,
    // so v2 wins both conflicts outright instead of taking turns.
    let mut guard = 0;
    while sim.vehicle("v2").is_some_and(|v| !v.has_departed()) && guard < 200 {
        sim.step(Some("v2"));
        guard += 1;
    }
    assert!(guard < 200, "v2 must fully drain within a bounded number of steps");

    while sim.status() == SimulatorStatus::Running && guard < 400 {
        sim.step(Some("v1"));
        guard += 1;
    }

    assert_eq!(sim.status(), SimulatorStatus::Terminated);
    assert!(guard < 400, "the run must terminate within a bounded number of steps");
}

/// Scenario 4: a scheduler that always advances the first waiting vehicle
/// in state-decoded order must terminate on the 4-CZ reference
/// intersection with 6 vehicles, producing a finite, reproducible total
/// delay.
#[test]
fn greedy_baseline_terminates_with_reproducible_delay() {
    let run = || {
        let mut sim = Simulator::new(four_cz_reference_intersection());
        for vehicle in six_vehicle_traffic() {
            sim.add_vehicle(vehicle).unwrap();
        }
        sim.start().unwrap();
        let mut env = Environment::new(sim);

        let mut guard = 0;
        loop {
            let effective: Vec<usize> = (0..env.action_space_size())
                .filter(|&a| env.is_effective_action_of_state(a))
                .collect();
            let action = *effective.first().unwrap();
            let outcome = env.step(action);
            guard += 1;
            if outcome.done || guard > 10_000 {
                break;
            }
        }
        (
            env.simulator().status(),
            env.simulator().get_total_delayed_time(),
        )
    };

    let (status_a, delay_a) = run();
    let (status_b, delay_b) = run();

    assert_eq!(status_a, SimulatorStatus::Terminated);
    assert_eq!(status_a, status_b);
    assert_eq!(delay_a, delay_b);
    assert!(delay_a >= 0);
}
