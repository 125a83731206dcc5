//! The road network store: vertices, quarry stockpiles, and polyline-embedded edges.
//!
//! Vertex positions, edge polylines with their endpoint orientation, quarry
//! capacities, per-edge quarry assignments and the ancestry of split-created
//! edges all live here; the shortest path tables live in [`crate::distance`].

use crate::*;
use crate::data;
use crate::geometry;
use crate::meta::Tolerance;

use geo::{Coordinate, LineString, Point};
use geo::algorithm::euclidean_distance::EuclideanDistance;
use indexmap::{IndexMap, IndexSet};

/// Key of an undirected edge: the unordered pair of its endpoints.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EdgeKey(VertexId, VertexId);

impl EdgeKey {
	pub fn new(u: VertexId, v: VertexId) -> Self {
		if u <= v {
			Self(u, v)
		} else {
			Self(v, u)
		}
	}
	/// Both endpoints, in no meaningful order
	pub fn ends(&self) -> (VertexId, VertexId) {
		(self.0, self.1)
	}
	/// Assuming `v` is one end of the edge, the other end
	pub fn other(&self, v: VertexId) -> VertexId {
		if v == self.0 {
			self.1
		} else {
			self.0
		}
	}
}

impl std::fmt::Display for EdgeKey {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "({}, {})", self.0, self.1)
	}
}

/// An edge of the network together with its planar embedding.
///
/// `line` starts at the position of `first` and ends at the position of
/// `last`; `weight` is its Euclidean length.
#[derive(Clone, Debug)]
pub struct Edge {
	pub first: VertexId,
	pub last: VertexId,
	pub line: LineString<f64>,
	pub weight: N64,
}

impl Edge {
	pub fn key(&self) -> EdgeKey {
		EdgeKey::new(self.first, self.last)
	}
}

/// The two edges produced by [`RoadNetwork::split_edge`], joined at the fresh vertex `cut`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SplitEdges {
	pub cut: VertexId,
	/// Sub-edge keeping the first point of the parent polyline
	pub first: EdgeKey,
	/// Sub-edge keeping the last point of the parent polyline
	pub last: EdgeKey,
}

pub struct RoadNetwork {
	vertices: IndexMap<VertexId, Point<f64>>,
	quarries: IndexMap<VertexId, N64>,
	edges: IndexMap<EdgeKey, Edge>,
	adjacency: IndexMap<VertexId, IndexSet<VertexId>>,
	assignments: IndexMap<EdgeKey, VertexId>,
	origins: IndexMap<EdgeKey, EdgeKey>,
	next_id: VertexId,
	tolerance: Tolerance,
}

impl RoadNetwork {
	/// Validates and loads an input document.
	pub fn new(data: &data::RoadGraph, tolerance: Tolerance) -> SolveResult<Self> {
		let mut network = Self {
			vertices: IndexMap::with_capacity(data.nodes.len()),
			quarries: IndexMap::new(),
			edges: IndexMap::with_capacity(data.roads.len()),
			adjacency: IndexMap::new(),
			assignments: IndexMap::new(),
			origins: IndexMap::new(),
			next_id: 0,
			tolerance,
		};
		for n in &data.nodes {
			if !(n.coordinates.0.is_finite() && n.coordinates.1.is_finite()) {
				return Err(SolveError::InvalidInput(format!("node {} has non-finite coordinates", n.id)));
			}
			if network.vertices.insert(n.id, Point::new(n.coordinates.0, n.coordinates.1)).is_some() {
				return Err(SolveError::InvalidInput(format!("duplicate node {}", n.id)));
			}
			network.next_id = network.next_id.max(n.id + 1);
		}
		// quarries go in by ascending id so that no table depends on input order
		let mut quarries: Vec<_> = data.quarries.iter().try_map_all(|q| {
			if !network.vertices.contains_key(&q.node) {
				return Err(SolveError::InvalidInput(format!("quarry at unknown node {}", q.node)));
			}
			if !q.capacity.raw().is_finite() || q.capacity <= n64(0.0) {
				return Err(SolveError::InvalidInput(format!("quarry {} has non-positive capacity {}", q.node, q.capacity)));
			}
			Ok((q.node, q.capacity))
		})?.collect();
		quarries.sort_unstable_by_key(|(q, _)| *q);
		for (q, capacity) in quarries {
			if network.quarries.insert(q, capacity).is_some() {
				return Err(SolveError::InvalidInput(format!("duplicate quarry {}", q)));
			}
		}
		for road in &data.roads {
			let line = LineString(road.polyline.iter().try_map_all(|&(x, y)| if x.is_finite() && y.is_finite() {
				Ok(Coordinate { x, y })
			} else {
				Err(SolveError::InvalidInput(format!("edge ({}, {}) has non-finite coordinates", road.p1, road.p2)))
			})?.collect());
			network.add_edge(road.p1, road.p2, line)?;
		}
		Ok(network)
	}

	pub fn vertex_count(&self) -> usize {
		self.vertices.len()
	}
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}
	pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Point<f64>)> {
		self.vertices.iter().map(|(v, p)| (*v, p))
	}
	pub fn position(&self, v: VertexId) -> Option<&Point<f64>> {
		self.vertices.get(&v)
	}
	pub fn is_quarry(&self, v: VertexId) -> bool {
		self.quarries.contains_key(&v)
	}
	/// All quarries with their remaining capacities, by ascending id
	pub fn quarries(&self) -> impl Iterator<Item = (VertexId, N64)> + '_ {
		self.quarries.iter().map(|(q, c)| (*q, *c))
	}
	pub fn capacity(&self, q: VertexId) -> N64 {
		self.quarries[&q]
	}
	/// Consumes `volume` of the quarry's stockpile, bottoming out at zero
	pub fn debit(&mut self, q: VertexId, volume: N64) {
		let capacity = &mut self.quarries[&q];
		*capacity = std::cmp::max(n64(0.0), *capacity - volume);
	}
	/// Declares the quarry's stockpile spent
	pub fn exhaust(&mut self, q: VertexId) {
		self.quarries[&q] = n64(0.0);
	}

	pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
		self.edges.get(key)
	}
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.values()
	}
	/// Neighbouring vertices of `v` with the weights of the connecting edges
	pub fn neighbours(&self, v: VertexId) -> impl Iterator<Item = (VertexId, N64)> + '_ {
		self.adjacency.get(&v).into_iter().flat_map(move |ns| ns.iter().map(move |u| (*u, self.edges[&EdgeKey::new(v, *u)].weight)))
	}

	/// Binds an edge to the quarry supplying it; terminal state of an edge
	pub fn assign(&mut self, key: EdgeKey, quarry: VertexId) {
		self.assignments.insert(key, quarry);
	}
	pub fn assignment(&self, key: &EdgeKey) -> Option<VertexId> {
		self.assignments.get(key).copied()
	}
	/// The pre-split input edge this edge descends from
	pub fn origin_of(&self, key: &EdgeKey) -> Option<EdgeKey> {
		self.origins.get(key).copied()
	}

	/// Adds an edge embedded as `line`, oriented from `first` to `last`.
	pub fn add_edge(&mut self, first: VertexId, last: VertexId, line: LineString<f64>) -> SolveResult<EdgeKey> {
		if first == last {
			return Err(SolveError::InvalidInput(format!("self-edge at node {}", first)));
		}
		if line.0.len() < 2 {
			return Err(SolveError::InvalidInput(format!("edge ({}, {}) has a degenerate polyline", first, last)));
		}
		for (v, p) in &[(first, line.0[0]), (last, *line.0.last().unwrap())] {
			match self.vertices.get(v) {
				None => return Err(SolveError::InvalidInput(format!("edge ({}, {}) touches unknown node {}", first, last, v))),
				Some(at) if !self.tolerance.zero(at.euclidean_distance(&Point::from(*p))) => {
					return Err(SolveError::InvalidInput(format!("polyline of edge ({}, {}) does not end at node {}", first, last, v)));
				}
				_ => {}
			}
		}
		let key = EdgeKey::new(first, last);
		if self.edges.contains_key(&key) {
			return Err(SolveError::InvalidInput(format!("duplicate edge ({}, {})", first, last)));
		}
		let weight = n64(geometry::length(&line));
		self.edges.insert(key, Edge { first, last, line, weight });
		self.adjacency.entry(first).or_default().insert(last);
		self.adjacency.entry(last).or_default().insert(first);
		self.origins.insert(key, key);
		Ok(key)
	}

	/// Removes an edge; its assignment and ancestry records go with it.
	pub fn delete_edge(&mut self, key: &EdgeKey) -> bool {
		if let Some(e) = self.edges.shift_remove(key) {
			if let Some(ns) = self.adjacency.get_mut(&e.first) {
				ns.shift_remove(&e.last);
			}
			if let Some(ns) = self.adjacency.get_mut(&e.last) {
				ns.shift_remove(&e.first);
			}
			self.origins.shift_remove(key);
			self.assignments.shift_remove(key);
			true
		} else {
			false
		}
	}

	/// Replaces edge `key` by two edges joined at a fresh ordinary vertex
	/// placed `new_length` along the polyline from its first point (from its
	/// last point when `from_end`).
	///
	/// The sub-polylines keep the parent's orientation and their lengths sum
	/// to the parent's weight; both descendants inherit the parent's origin.
	pub fn split_edge(&mut self, key: EdgeKey, new_length: N64, from_end: bool) -> SolveResult<SplitEdges> {
		let edge = self.edges.get(&key).cloned().ok_or_else(|| SolveError::InvalidInput(format!("split of unknown edge {}", key)))?;
		let cut_at = if from_end { edge.weight - new_length } else { new_length };
		let cut_point = geometry::interpolate(&edge.line, cut_at.raw());
		let (head, tail) = geometry::split_at_point(&edge.line, &cut_point, &self.tolerance)?;
		let origin = self.origins[&key];
		let cut = self.next_id;
		self.next_id += 1;
		self.vertices.insert(cut, Point::from(*head.0.last().unwrap()));
		self.delete_edge(&key);
		let first = self.add_edge(edge.first, cut, head)?;
		let last = self.add_edge(cut, edge.last, tail)?;
		self.origins.insert(first, origin);
		self.origins.insert(last, origin);
		Ok(SplitEdges { cut, first, last })
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::data::{Node, Quarry, RoadGraph, RoadSegment};

	fn node(id: VertexId, x: f64, y: f64) -> Node {
		Node { id, coordinates: (x, y) }
	}

	fn straight(p1: VertexId, p2: VertexId, from: (f64, f64), to: (f64, f64)) -> RoadSegment {
		RoadSegment { p1, p2, polyline: vec![from, to] }
	}

	fn corridor() -> RoadGraph {
		RoadGraph {
			nodes: vec![node(0, 0.0, 0.0), node(1, 10.0, 0.0), node(2, 20.0, 0.0)],
			quarries: vec![Quarry { node: 0, capacity: n64(100.0) }],
			roads: vec![straight(0, 1, (0.0, 0.0), (10.0, 0.0)), straight(1, 2, (10.0, 0.0), (20.0, 0.0))],
		}
	}

	fn network(g: &RoadGraph) -> RoadNetwork {
		RoadNetwork::new(g, Default::default()).unwrap()
	}

	#[test]
	fn test_load() {
		let n = network(&corridor());
		assert_eq!(n.vertex_count(), 3);
		assert_eq!(n.edge_count(), 2);
		assert!(n.is_quarry(0));
		assert!(!n.is_quarry(1));
		assert_eq!(n.capacity(0), n64(100.0));
		let e = n.edge(&EdgeKey::new(1, 0)).unwrap();
		assert_eq!((e.first, e.last), (0, 1));
		assert_eq!(e.weight, n64(10.0));
		assert_eq!(n.origin_of(&e.key()), Some(e.key()));
		let mut ns: Vec<_> = n.neighbours(1).collect();
		ns.sort();
		assert_eq!(ns, vec![(0, n64(10.0)), (2, n64(10.0))]);
	}

	#[test]
	fn test_rejects_bad_input() {
		let mut g = corridor();
		g.roads.push(straight(1, 1, (10.0, 0.0), (10.0, 0.0)));
		assert!(RoadNetwork::new(&g, Default::default()).is_err(), "self-edge");
		let mut g = corridor();
		g.roads.push(straight(0, 1, (0.0, 0.0), (10.0, 0.0)));
		assert!(RoadNetwork::new(&g, Default::default()).is_err(), "duplicate edge");
		let mut g = corridor();
		g.roads[0].polyline[1] = (9.0, 0.0);
		assert!(RoadNetwork::new(&g, Default::default()).is_err(), "endpoint mismatch");
		let mut g = corridor();
		g.quarries[0].capacity = n64(0.0);
		assert!(RoadNetwork::new(&g, Default::default()).is_err(), "empty quarry");
		let mut g = corridor();
		g.roads.push(straight(0, 7, (0.0, 0.0), (1.0, 1.0)));
		assert!(RoadNetwork::new(&g, Default::default()).is_err(), "unknown node");
		let mut g = corridor();
		g.nodes.push(node(1, 10.0, 0.0));
		assert!(RoadNetwork::new(&g, Default::default()).is_err(), "duplicate node");
	}

	#[test]
	fn test_split_edge() {
		let mut n = network(&corridor());
		let parent = EdgeKey::new(0, 1);
		let parts = n.split_edge(parent, n64(2.5), false).unwrap();
		assert_eq!(parts.cut, 3);
		assert_eq!(n.vertex_count(), 4);
		assert_eq!(n.edge_count(), 3);
		assert!(n.edge(&parent).is_none());
		assert_eq!(*n.position(3).unwrap(), Point::new(2.5, 0.0));
		let head = n.edge(&parts.first).unwrap();
		let tail = n.edge(&parts.last).unwrap();
		assert_eq!((head.first, head.last), (0, 3));
		assert_eq!((tail.first, tail.last), (3, 1));
		assert_eq!((head.weight, tail.weight), (n64(2.5), n64(7.5)));
		// both descendants trace back to the replaced input edge
		assert_eq!(n.origin_of(&parts.first), Some(parent));
		assert_eq!(n.origin_of(&parts.last), Some(parent));
		// and so do grandchildren
		let parts2 = n.split_edge(parts.last, n64(2.0), false).unwrap();
		assert_eq!(parts2.cut, 4);
		assert_eq!(n.origin_of(&parts2.first), Some(parent));
		assert_eq!(n.origin_of(&parts2.last), Some(parent));
	}

	#[test]
	fn test_split_edge_from_end() {
		let mut n = network(&corridor());
		let parts = n.split_edge(EdgeKey::new(0, 1), n64(2.5), true).unwrap();
		// 2.5 units measured from vertex 1
		assert_eq!(*n.position(parts.cut).unwrap(), Point::new(7.5, 0.0));
		assert_eq!(n.edge(&parts.first).unwrap().weight, n64(7.5));
		assert_eq!(n.edge(&parts.last).unwrap().weight, n64(2.5));
	}

	#[test]
	fn test_split_edge_rejects_degenerate() {
		let mut n = network(&corridor());
		assert!(n.split_edge(EdgeKey::new(0, 1), n64(10.0), false).is_err());
		assert!(n.split_edge(EdgeKey::new(0, 1), n64(1e-12), false).is_err());
		assert_eq!(n.edge_count(), 2);
	}

	#[test]
	fn test_delete_edge() {
		let mut n = network(&corridor());
		assert!(n.delete_edge(&EdgeKey::new(0, 1)));
		assert!(!n.delete_edge(&EdgeKey::new(0, 1)));
		assert_eq!(n.edge_count(), 1);
		assert_eq!(n.neighbours(1).collect::<Vec<_>>(), vec![(2, n64(10.0))]);
	}
}
