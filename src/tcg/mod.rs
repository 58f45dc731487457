//! # Timing Conflict Graph
//!
//! The central data structure of this crate: a directed multigraph whose
//! vertices are `(vehicle, CZ)` reservation intents and whose four typed
//! edges encode same-vehicle ordering, mutual exclusion, and commit order.
//!
//! Vertices and edges live in arenas owned by [`Tcg`] and are addressed by
//! stable integer indices ([`VertexId`], [`EdgeId`]) rather than
//! `Rc<RefCell<_>>` cycles — cross references (`(vehicle_id, cz_id) →
//! vertex`) go through a hash map, per this crate's re-architecture away
//! from cyclic references.
//!
//! **Most of time end-developer should not call [`Tcg::start_execute`] or
//! [`Tcg::finish_execute`] directly; [`crate::simulator::Simulator::step`]
//! drives them.**

pub mod edge;
pub mod vertex;

pub use edge::{Edge, EdgeId, EdgeType};
pub use vertex::{Vertex, VertexId, VertexState};

use indexmap::IndexMap;

use crate::error::TcgError;
use crate::intersection::Intersection;
use crate::vehicle::Vehicle;
use crate::{log_additional, log_all};

/// The Timing Conflict Graph built from an [`Intersection`] and a set of
/// [`Vehicle`]s.
#[derive(Debug, Clone)]
pub struct Tcg {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
    vertex_lookup: IndexMap<(String, Option<String>), VertexId>,
    vehicle_vertices: IndexMap<String, Vec<VertexId>>,
}

impl Tcg {
    /// Builds the TCG: one vertex chain (TYPE_1-linked, terminated by a
    /// `"$"` sentinel) per vehicle, plus a mirrored TYPE_3 half-edge pair
    /// for every two vertices of different vehicles sharing a CZ.
    ///
    /// Assumes every vehicle's trajectory has already been validated
    /// against `intersection` (see
    /// [`crate::simulator::Simulator::add_vehicle`]).
    pub fn build(intersection: &Intersection, vehicles: &IndexMap<String, Vehicle>) -> Self {
        let mut tcg = Tcg {
            vertices: Vec::new(),
            edges: Vec::new(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
            vertex_lookup: IndexMap::new(),
            vehicle_vertices: IndexMap::new(),
        };

        let mut cz_to_vertices: IndexMap<String, Vec<VertexId>> = IndexMap::new();

        for vehicle in vehicles.values() {
            let mut own_vertices = Vec::with_capacity(vehicle.trajectory.len() + 1);
            let mut prev: Option<(VertexId, String)> = None;

            for cz_id in &vehicle.trajectory {
                let vertex_id = tcg.push_vertex(Vertex::new(
                    vehicle.id.clone(),
                    Some(cz_id.clone()),
                    vehicle.vertex_passing_time,
                ));
                tcg.vertex_lookup
                    .insert((vehicle.id.clone(), Some(cz_id.clone())), vertex_id);
                own_vertices.push(vertex_id);
                cz_to_vertices
                    .entry(cz_id.clone())
                    .or_default()
                    .push(vertex_id);

                if let Some((prev_id, prev_cz)) = &prev {
                    let waiting_time = intersection.transit_time(prev_cz, cz_id).unwrap_or(0);
                    tcg.add_type1_edge(*prev_id, vertex_id, waiting_time);
                }
                prev = Some((vertex_id, cz_id.clone()));
            }

            let sentinel_id = tcg.push_vertex(Vertex::new(vehicle.id.clone(), None, 0));
            tcg.vertex_lookup
                .insert((vehicle.id.clone(), None), sentinel_id);
            own_vertices.push(sentinel_id);
            if let Some((prev_id, _)) = prev {
                tcg.add_type1_edge(prev_id, sentinel_id, 0);
            }

            tcg.vehicle_vertices.insert(vehicle.id.clone(), own_vertices);
        }

        for vertices_sharing_cz in cz_to_vertices.values() {
            for i in 0..vertices_sharing_cz.len() {
                for j in (i + 1)..vertices_sharing_cz.len() {
                    let a = vertices_sharing_cz[i];
                    let b = vertices_sharing_cz[j];
                    if tcg.vertices[a].vehicle_id == tcg.vertices[b].vehicle_id {
                        continue;
                    }
                    tcg.add_type3_pair(a, b);
                }
            }
        }

        log_additional!(
            crate::verbose::EVENT_TCG_BUILD,
            "built timing conflict graph",
            vertices = tcg.vertices.len(),
            edges = tcg.edges.len(),
        );

        tcg
    }

    fn push_vertex(&mut self, vertex: Vertex) -> VertexId {
        self.vertices.push(vertex);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        self.vertices.len() - 1
    }

    fn add_type1_edge(&mut self, from: VertexId, to: VertexId, waiting_time: u64) -> EdgeId {
        let edge_id = self.edges.len();
        self.edges
            .push(Edge::new(from, to, EdgeType::Type1, true, waiting_time, None));
        self.out_edges[from].push(edge_id);
        self.in_edges[to].push(edge_id);
        edge_id
    }

    fn add_type3_pair(&mut self, a: VertexId, b: VertexId) {
        let forward_id = self.edges.len();
        let backward_id = forward_id + 1;
        self.edges.push(Edge::new(
            a,
            b,
            EdgeType::Type3,
            false,
            0,
            Some(backward_id),
        ));
        self.edges
            .push(Edge::new(b, a, EdgeType::Type3, false, 0, Some(forward_id)));
        self.out_edges[a].push(forward_id);
        self.in_edges[b].push(forward_id);
        self.out_edges[b].push(backward_id);
        self.in_edges[a].push(backward_id);
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Iterates all vertex ids in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        0..self.vertices.len()
    }

    /// `O(1)` lookup of the vertex for `(vehicle_id, cz_id)`. Pass `None`
    /// for `cz_id` to look up the `"$"` sentinel.
    pub fn get_vertex_by_vehicle_cz_pair(
        &self,
        vehicle_id: &str,
        cz_id: Option<&str>,
    ) -> Option<VertexId> {
        self.vertex_lookup
            .get(&(vehicle_id.to_string(), cz_id.map(str::to_string)))
            .copied()
    }

    /// First real (non-sentinel) vertex of a vehicle's trajectory.
    pub fn vehicle_first_vertex(&self, vehicle_id: &str) -> Option<VertexId> {
        self.vehicle_vertices.get(vehicle_id)?.first().copied()
    }

    /// The TYPE_1 waiting time of the edge from `from` to `to`, if one exists.
    pub fn out_edge_waiting_time_to(&self, from: VertexId, to: VertexId) -> Option<u64> {
        self.out_edges[from]
            .iter()
            .map(|&id| &self.edges[id])
            .find(|e| e.to == to && e.edge_type == EdgeType::Type1)
            .map(|e| e.waiting_time)
    }

    /// The TYPE_1 successor of `vertex_id` (the next vertex in the owning
    /// vehicle's trajectory, or its `"$"` sentinel) and the waiting time of
    /// that edge. `None` only for a sentinel itself, which has no TYPE_1
    /// out-edge.
    pub fn type1_successor(&self, vertex_id: VertexId) -> Option<(VertexId, u64)> {
        self.out_edges[vertex_id]
            .iter()
            .map(|&id| &self.edges[id])
            .find(|e| e.edge_type == EdgeType::Type1)
            .map(|e| (e.to, e.waiting_time))
    }

    /// `(source_vertex, edge.waiting_time, source_vertex.passing_time)` for
    /// every decided, non-tombstoned in-edge of `vertex_id`.
    pub fn decided_in_edge_sources(
        &self,
        vertex_id: VertexId,
    ) -> impl Iterator<Item = (VertexId, u64, u64)> + '_ {
        self.decided_in_edges(vertex_id)
            .map(|e| (e.from, e.waiting_time, self.vertices[e.from].passing_time))
    }

    fn decided_in_edges(&self, vertex_id: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.in_edges[vertex_id]
            .iter()
            .map(move |&id| &self.edges[id])
            .filter(|e| e.decided && !e.removed)
    }

    fn decided_out_edges(&self, vertex_id: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.out_edges[vertex_id]
            .iter()
            .map(move |&id| &self.edges[id])
            .filter(|e| e.decided && !e.removed)
    }

    /// In-edges (decided or not) incident to `vertex_id`, used by
    /// [`Tcg::start_execute`] to find undecided TYPE_3 half-edges to orient.
    fn undecided_out_edges(&self, vertex_id: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges[vertex_id].iter().copied().filter(|&id| {
            let e = &self.edges[id];
            !e.decided && !e.removed && e.edge_type == EdgeType::Type3
        })
    }

    /// Precondition: `vertex.state == NonExecuted` and every decided
    /// in-edge's source is `Executed`. Orients every undecided TYPE_3 pair
    /// incident to `vertex` towards `vertex`'s neighbour and marks
    /// `vertex` `Executing`.
    pub fn start_execute(&mut self, vertex_id: VertexId) -> Result<(), TcgError> {
        if self.vertices[vertex_id].state != VertexState::NonExecuted {
            return Err(TcgError::VertexNotExecutable);
        }
        let ready = self.decided_in_edges(vertex_id).all(|e| {
            self.vertices[e.from].state == VertexState::Executed
        });
        if !ready {
            return Err(TcgError::VertexNotExecutable);
        }

        let to_orient: Vec<EdgeId> = self.undecided_out_edges(vertex_id).collect();
        for edge_id in to_orient {
            let mirror_id = self.edges[edge_id].mirror;
            self.edges[edge_id].edge_type = EdgeType::Type4;
            self.edges[edge_id].decided = true;
            if let Some(mirror_id) = mirror_id {
                self.edges[mirror_id].removed = true;
            }
        }
        self.vertices[vertex_id].state = VertexState::Executing;
        log_all!(
            crate::verbose::EVENT_TCG_START_EXECUTE,
            "started executing vertex",
            vertex = vertex_id,
        );
        Ok(())
    }

    pub fn finish_execute(&mut self, vertex_id: VertexId) {
        self.vertices[vertex_id].state = VertexState::Executed;
        log_all!(
            crate::verbose::EVENT_TCG_FINISH_EXECUTE,
            "finished executing vertex",
            vertex = vertex_id,
        );
    }

    /// Resets every vertex to `NonExecuted` and restores decided
    /// TYPE_2/TYPE_4 edges to undecided TYPE_3 pairs; TYPE_1 edges are
    /// untouched.
    pub fn reset_vertices_state(&mut self) {
        for vertex in &mut self.vertices {
            vertex.state = VertexState::NonExecuted;
            vertex.entering_time = None;
            vertex.entering_time_wo_delay = None;
            vertex.earliest_entering_time = None;
        }
        for edge in &mut self.edges {
            if edge.edge_type == EdgeType::Type1 {
                continue;
            }
            edge.edge_type = EdgeType::Type3;
            edge.decided = false;
            edge.removed = false;
        }
    }

    /// DFS cycle detection over decided edges only (TYPE_1, TYPE_2,
    /// TYPE_4), three-colour marking. Returns `true` iff the decided
    /// subgraph is not a DAG.
    pub fn check_deadlock(&self) -> bool {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Color {
            White,
            Gray,
            Black,
        }
        let mut color = vec![Color::White; self.vertices.len()];

        for start in self.vertex_ids() {
            if color[start] != Color::White {
                continue;
            }
            // Iterative DFS: stack of (vertex, next out-edge index to visit).
            let mut stack: Vec<(VertexId, usize)> = vec![(start, 0)];
            color[start] = Color::Gray;
            while let Some(&mut (v, ref mut next)) = stack.last_mut() {
                let out: Vec<VertexId> = self.decided_out_edges(v).map(|e| e.to).collect();
                if *next < out.len() {
                    let w = out[*next];
                    *next += 1;
                    match color[w] {
                        Color::White => {
                            color[w] = Color::Gray;
                            stack.push((w, 0));
                        }
                        Color::Gray => return true,
                        Color::Black => {}
                    }
                } else {
                    color[v] = Color::Black;
                    stack.pop();
                }
            }
        }
        false
    }
}
