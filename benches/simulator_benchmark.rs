use tcg_intersection_sim::intersection::Intersection;
use tcg_intersection_sim::simulator::{Simulator, SimulatorStatus};
use tcg_intersection_sim::vehicle::Vehicle;

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn four_cz_intersection() -> Intersection {
    let mut intersection = Intersection::new();
    for cz in ["A", "B", "X", "Y"] {
        intersection.add_cz(cz);
    }
    intersection.add_adjacency("A", "X", 1).unwrap();
    intersection.add_adjacency("X", "B", 1).unwrap();
    intersection.add_adjacency("Y", "X", 1).unwrap();
    intersection.add_adjacency("X", "A", 1).unwrap();
    intersection.add_src_lane("north", vec!["A".to_string(), "X".to_string()]);
    intersection.add_src_lane("west", vec!["Y".to_string(), "X".to_string()]);
    intersection.add_dst_lane("south", vec!["B".to_string()]);
    intersection.add_dst_lane("east", vec!["A".to_string()]);
    intersection
}

fn build_simulator(vehicle_count: usize) -> Simulator {
    let mut sim = Simulator::new(four_cz_intersection());
    for i in 0..vehicle_count {
        let (trajectory, src, dst): (Vec<String>, &str, &str) = if i % 2 == 0 {
            (vec!["A".to_string(), "X".to_string(), "B".to_string()], "north", "south")
        } else {
            (vec!["Y".to_string(), "X".to_string(), "A".to_string()], "west", "east")
        };
        sim.add_vehicle(Vehicle::new(format!("v{i}"), (i as u64) * 2, trajectory, src, dst, 5))
            .unwrap();
    }
    sim.start().unwrap();
    sim
}

/// Drives the TCG build + the full `start`/`step` loop (vertex/edge
/// construction, earliest-entering-time recomputation, deadlock check) to
/// completion for a fixed vehicle count, using a greedy first-executable
/// policy.
pub fn benchmark_simulator_run(c: &mut Criterion) {
    c.bench_function("simulator_run_20_vehicles", |b| {
        b.iter(|| {
            let mut sim = build_simulator(black_box(20));
            while sim.status() == SimulatorStatus::Running {
                let executable = sim.executable_vehicle_ids();
                let moved = executable.first().cloned();
                sim.step(black_box(moved.as_deref()));
            }
            black_box(sim.get_total_delayed_time())
        })
    });
}

/// Isolates `Tcg::build` (vertex/edge arena construction and TYPE_3 pairing)
/// from the rest of the step loop.
pub fn benchmark_tcg_build(c: &mut Criterion) {
    c.bench_function("tcg_build_20_vehicles", |b| {
        b.iter(|| {
            let mut sim = Simulator::new(four_cz_intersection());
            for i in 0..20 {
                let (trajectory, src, dst): (Vec<String>, &str, &str) = if i % 2 == 0 {
                    (vec!["A".to_string(), "X".to_string(), "B".to_string()], "north", "south")
                } else {
                    (vec!["Y".to_string(), "X".to_string(), "A".to_string()], "west", "east")
                };
                sim.add_vehicle(Vehicle::new(format!("v{i}"), (i as u64) * 2, trajectory, src, dst, 5))
                    .unwrap();
            }
            black_box(sim.start().unwrap());
        })
    });
}

criterion_group!(benches, benchmark_simulator_run, benchmark_tcg_build);
criterion_main!(benches);
