//! Static description of an intersection: conflict zones (CZs), lane
//! structures and the CZ adjacency relation used to validate vehicle
//! trajectories and to derive TYPE_1 edge waiting times.
//!
//! This module replaces the cellular-automata `GridRoads`/`Cell` pair of the
//! codebase this crate grew out of: CZs carry no spatial coordinates, only
//! identity and adjacency (see the intersection's Non-goals around
//! continuous kinematics).

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// A structured, serializable description of an intersection, suitable for
/// loading from JSON. Adjacency triples are `(from_cz, to_cz, transit_time)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntersectionDescription {
    pub cz_ids: Vec<String>,
    pub src_lanes: IndexMap<String, Vec<String>>,
    pub dst_lanes: IndexMap<String, Vec<String>>,
    pub adjacency: Vec<(String, String, u64)>,
}

/// Static description of an intersection.
///
/// Holds the set of CZ identifiers, the `src_lane_id → ordered CZ sequence`
/// and `dst_lane_id → CZ set` mappings, and the CZ adjacency relation
/// (including the TYPE_1 transit time between adjacent CZs).
///
/// # Example
///
/// ```rust
/// use tcg_intersection_sim::intersection::Intersection;
///
/// let mut intersection = Intersection::new();
/// intersection.add_cz("A");
/// intersection.add_cz("B");
/// intersection.add_adjacency("A", "B", 1).unwrap();
/// assert!(intersection.adjacent("A", "B"));
/// assert_eq!(intersection.transit_time("A", "B"), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Intersection {
    cz_ids: IndexSet<String>,
    src_lanes: IndexMap<String, Vec<String>>,
    dst_lanes: IndexMap<String, Vec<String>>,
    // (from_cz, to_cz) -> transit_time
    adjacency: IndexMap<(String, String), u64>,
}

impl Intersection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an `Intersection` from a serialized description, validating
    /// that adjacency endpoints reference registered CZs.
    pub fn from_description(desc: IntersectionDescription) -> Result<Self, ConfigurationError> {
        let mut intersection = Intersection::new();
        for cz in desc.cz_ids {
            intersection.add_cz(&cz);
        }
        for (lane_id, czs) in desc.src_lanes {
            intersection.add_src_lane(&lane_id, czs);
        }
        for (lane_id, czs) in desc.dst_lanes {
            intersection.add_dst_lane(&lane_id, czs);
        }
        for (from_cz, to_cz, transit_time) in desc.adjacency {
            intersection.add_adjacency(&from_cz, &to_cz, transit_time)?;
        }
        Ok(intersection)
    }

    /// Registers a conflict zone identifier. Idempotent.
    pub fn add_cz(&mut self, cz_id: impl Into<String>) {
        self.cz_ids.insert(cz_id.into());
    }

    /// Declares a source lane as an ordered sequence of CZ ids.
    pub fn add_src_lane(&mut self, lane_id: impl Into<String>, czs: Vec<String>) {
        self.src_lanes.insert(lane_id.into(), czs);
    }

    /// Declares a destination lane as a set of CZ ids.
    pub fn add_dst_lane(&mut self, lane_id: impl Into<String>, czs: Vec<String>) {
        self.dst_lanes.insert(lane_id.into(), czs);
    }

    /// Registers that `from_cz` is adjacent to `to_cz` with the given
    /// TYPE_1 transit time. Fails if either CZ is unregistered.
    pub fn add_adjacency(
        &mut self,
        from_cz: impl Into<String>,
        to_cz: impl Into<String>,
        transit_time: u64,
    ) -> Result<(), ConfigurationError> {
        let from_cz = from_cz.into();
        let to_cz = to_cz.into();
        if !self.cz_ids.contains(&from_cz) {
            return Err(ConfigurationError::UnknownCz { cz_id: from_cz });
        }
        if !self.cz_ids.contains(&to_cz) {
            return Err(ConfigurationError::UnknownCz { cz_id: to_cz });
        }
        self.adjacency.insert((from_cz, to_cz), transit_time);
        Ok(())
    }

    pub fn cz_ids(&self) -> impl Iterator<Item = &str> {
        self.cz_ids.iter().map(String::as_str)
    }

    pub fn has_cz(&self, cz_id: &str) -> bool {
        self.cz_ids.contains(cz_id)
    }

    pub fn src_lane(&self, lane_id: &str) -> Option<&[String]> {
        self.src_lanes.get(lane_id).map(Vec::as_slice)
    }

    pub fn dst_lane(&self, lane_id: &str) -> Option<&[String]> {
        self.dst_lanes.get(lane_id).map(Vec::as_slice)
    }

    /// True iff `to_cz` is reachable from `from_cz` in one TYPE_1 hop.
    pub fn adjacent(&self, from_cz: &str, to_cz: &str) -> bool {
        self.adjacency
            .contains_key(&(from_cz.to_string(), to_cz.to_string()))
    }

    /// The TYPE_1 transit time between two adjacent CZs, or `None` if they
    /// are not adjacent.
    pub fn transit_time(&self, from_cz: &str, to_cz: &str) -> Option<u64> {
        self.adjacency
            .get(&(from_cz.to_string(), to_cz.to_string()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_requires_known_czs() {
        let mut intersection = Intersection::new();
        intersection.add_cz("A");
        let err = intersection.add_adjacency("A", "B", 1).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownCz {
                cz_id: "B".to_string()
            }
        );
    }

    #[test]
    fn lanes_round_trip() {
        let mut intersection = Intersection::new();
        intersection.add_cz("A");
        intersection.add_cz("B");
        intersection.add_src_lane("in", vec!["A".to_string()]);
        intersection.add_dst_lane("out", vec!["B".to_string()]);
        assert_eq!(intersection.src_lane("in"), Some(&["A".to_string()][..]));
        assert_eq!(intersection.dst_lane("out"), Some(&["B".to_string()][..]));
        assert!(intersection.src_lane("missing").is_none());
    }

    #[test]
    fn description_round_trip() {
        let desc = IntersectionDescription {
            cz_ids: vec!["A".into(), "B".into()],
            src_lanes: IndexMap::from([("in".to_string(), vec!["A".to_string()])]),
            dst_lanes: IndexMap::from([("out".to_string(), vec!["B".to_string()])]),
            adjacency: vec![("A".to_string(), "B".to_string(), 1)],
        };
        let intersection = Intersection::from_description(desc).unwrap();
        assert!(intersection.adjacent("A", "B"));
        assert_eq!(intersection.transit_time("A", "B"), Some(1));
    }
}
