//! Fixture builders for a small test intersection and vehicle set, used by
//! this crate's own tests and doctests. Not traffic generation — the
//! vehicles returned here are fixed, not randomly produced.

use crate::intersection::Intersection;
use crate::vehicle::Vehicle;

/// Two conflict zones `A -> B`, transit time 1.
///
/// ```text
/// [in] -- A -- B -- [out]
/// ```
pub fn two_cz_intersection() -> Intersection {
    let mut intersection = Intersection::new();
    intersection.add_cz("A");
    intersection.add_cz("B");
    intersection.add_adjacency("A", "B", 1).unwrap();
    intersection.add_src_lane("in", vec!["A".to_string()]);
    intersection.add_dst_lane("out", vec!["B".to_string()]);
    intersection
}

/// The four-CZ reference intersection used by the greedy-baseline test
/// scenario: two crossing lanes sharing a central conflict zone.
///
/// ```text
///        N_in
///         |
///         A
///         |
/// W_in--- X ---E_out
///         |
///         B
///         |
///        S_out
/// ```
pub fn four_cz_reference_intersection() -> Intersection {
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

/// Six vehicles routed through [`four_cz_reference_intersection`] with
/// staggered arrival times, for the greedy-baseline scenario.
pub fn six_vehicle_traffic() -> Vec<Vehicle> {
    (0..6)
        .map(|i| {
            let (trajectory, src, dst): (Vec<String>, &str, &str) = if i % 2 == 0 {
                (vec!["A".to_string(), "X".to_string(), "B".to_string()], "north", "south")
            } else {
                (vec!["Y".to_string(), "X".to_string(), "A".to_string()], "west", "east")
            };
            Vehicle::new(format!("v{i}"), i as u64 * 2, trajectory, src, dst, 5)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_cz_intersection_is_adjacent() {
        let intersection = two_cz_intersection();
        assert!(intersection.adjacent("A", "B"));
        assert_eq!(intersection.transit_time("A", "B"), Some(1));
    }

    #[test]
    fn six_vehicle_traffic_has_unique_ids() {
        let vehicles = six_vehicle_traffic();
        let mut ids: Vec<&str> = vehicles.iter().map(|v| v.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }
}
