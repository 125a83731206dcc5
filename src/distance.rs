//! Shortest path tables from every quarry, with local repair on edge splits.
//!
//! Loaded once by Dijkstra runs from each quarry. Afterwards the tables are
//! kept in sync with edge splits by a purely local update: a split vertex sits
//! on the replaced edge, so its shortest path to any quarry leaves through one
//! of the old endpoints, whose own distances do not change.

use crate::*;
use crate::meta::Tolerance;
use crate::network::RoadNetwork;

use std::collections::HashMap;
use indexmap::IndexMap;
use priority_queue::PriorityQueue;

/// Distance to one quarry, and the neighbour a shortest path leaves through
/// (`None` at the quarry itself).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct QuarryPath {
	pub distance: N64,
	pub next: Option<VertexId>,
}

/// For every vertex, a [`QuarryPath`] per reachable quarry.
#[derive(Clone, Debug, Default)]
pub struct DistanceTable {
	tables: IndexMap<VertexId, IndexMap<VertexId, QuarryPath>>,
}

impl DistanceTable {
	/// Runs Dijkstra from every quarry over the whole network.
	///
	/// Fails with [`SolveError::Unreachable`] if some vertex cannot be
	/// supplied by any quarry at all.
	pub fn load(network: &RoadNetwork) -> SolveResult<Self> {
		let mut tables: IndexMap<VertexId, IndexMap<VertexId, QuarryPath>> = network.vertices().map(|(v, _)| (v, IndexMap::new())).collect();
		for (quarry, _) in network.quarries() {
			for (v, path) in Self::from_quarry(network, quarry) {
				tables.get_mut(&v).unwrap().insert(quarry, path);
			}
		}
		for (v, table) in &tables {
			if table.is_empty() {
				return Err(SolveError::Unreachable(*v));
			}
		}
		Ok(Self { tables })
	}

	/// Single-source Dijkstra yielding, per reached vertex, the distance and
	/// the tree parent - which is the next vertex on the way back to `quarry`.
	fn from_quarry(network: &RoadNetwork, quarry: VertexId) -> IndexMap<VertexId, QuarryPath> {
		let mut dp: HashMap<VertexId, QuarryPath> = HashMap::new();
		dp.insert(quarry, QuarryPath { distance: n64(0.0), next: None });
		let mut q = PriorityQueue::new();
		q.push(quarry, n64(0.0));
		let mut reached = IndexMap::new();
		while let Some((u, _)) = q.pop() {
			let pu = *dp.get(&u).unwrap();
			reached.insert(u, pu);
			for (v, weight) in network.neighbours(u) {
				let d = pu.distance + weight;
				if dp.get(&v).map_or(true, |pv| pv.distance > d) {
					dp.insert(v, QuarryPath { distance: d, next: Some(u) });
					q.push(v, -d);
				}
			}
		}
		reached
	}

	/// Derives the tables of the split vertex `cut` and repairs the endpoint
	/// pointers that crossed the replaced edge.
	///
	/// `uw` and `wv` are the weights of the new sub-edges on the `u` and `v`
	/// sides. Must run right after the corresponding
	/// [`split_edge`](RoadNetwork::split_edge), before any further lookup.
	pub fn on_split(&mut self, u: VertexId, v: VertexId, cut: VertexId, uw: N64, wv: N64) {
		let us = self.tables.get(&u).cloned().unwrap_or_default();
		let vs = self.tables.get(&v).cloned().unwrap_or_default();
		let mut quarries: Vec<VertexId> = us.keys().chain(vs.keys()).copied().collect();
		quarries.sort_unstable();
		quarries.dedup();
		let mut ws = IndexMap::new();
		for q in quarries {
			let path = match (us.get(&q), vs.get(&q)) {
				(Some(pu), Some(pv)) => {
					if pu.distance + uw < pv.distance + wv {
						QuarryPath { distance: pu.distance + uw, next: Some(u) }
					} else {
						QuarryPath { distance: pv.distance + wv, next: Some(v) }
					}
				}
				(Some(pu), None) => QuarryPath { distance: pu.distance + uw, next: Some(u) },
				(None, Some(pv)) => QuarryPath { distance: pv.distance + wv, next: Some(v) },
				(None, None) => continue,
			};
			ws.insert(q, path);
		}
		self.tables.insert(cut, ws);
		// shortest paths that crossed the replaced edge now pass through the cut first
		for (a, b) in &[(u, v), (v, u)] {
			if let Some(table) = self.tables.get_mut(a) {
				for path in table.values_mut() {
					if path.next == Some(*b) {
						path.next = Some(cut);
					}
				}
			}
		}
	}

	pub fn distance(&self, v: VertexId, quarry: VertexId) -> Option<N64> {
		self.tables.get(&v)?.get(&quarry).map(|p| p.distance)
	}
	pub fn path(&self, v: VertexId, quarry: VertexId) -> Option<&QuarryPath> {
		self.tables.get(&v)?.get(&quarry)
	}
	/// Distance from `v` to the closest quarry of all
	pub fn min_distance(&self, v: VertexId) -> Option<N64> {
		self.tables.get(&v)?.values().map(|p| p.distance).min()
	}
	/// The closest quarry of `v` that still has material; ties go to the lowest id
	pub fn nearest_nonempty_quarry(&self, network: &RoadNetwork, tolerance: &Tolerance, v: VertexId) -> Option<VertexId> {
		self.tables.get(&v)?
			.iter()
			.filter(|(q, _)| !tolerance.zero_n(network.capacity(**q)))
			.min_by_key(|(q, p)| (p.distance, **q))
			.map(|(q, _)| *q)
	}
	pub fn vertex_count(&self) -> usize {
		self.tables.len()
	}
}
