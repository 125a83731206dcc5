//! The edges splitter: assigns every piece of every road to the quarry that builds it.
//!
//! Roads are processed by increasing distance to the nearest quarry. Each road
//! either gets bound whole to one quarry, or is cut where the service regions
//! of two quarries meet (a watershed split), or where the supplying quarry's
//! stockpile runs dry (a capacity split); the cut pieces are processed
//! recursively, nearest side first.

use crate::*;
use crate::cost;
use crate::data;
use crate::distance::DistanceTable;
use crate::network::{EdgeKey, RoadNetwork, SplitEdges};

use itertools::Itertools;

pub struct EdgesSplitter {
	network: RoadNetwork,
	distances: DistanceTable,
	params: Parameters,
}

impl EdgesSplitter {
	pub fn new(network: RoadNetwork, params: Parameters) -> Self {
		Self {
			network,
			distances: Default::default(),
			params,
		}
	}

	pub fn network(&self) -> &RoadNetwork {
		&self.network
	}
	pub fn distances(&self) -> &DistanceTable {
		&self.distances
	}

	/// Runs the computation to completion, or to the first fatal error.
	///
	/// On error the network keeps the partially calculated state for inspection.
	pub fn calculate(&mut self) -> SolveResult<()> {
		self.distances = DistanceTable::load(&self.network)?;
		log::info!("Loaded distance tables for {} vertices and {} quarries", self.distances.vertex_count(), self.network.quarries().count());
		for key in self.traversal_order() {
			log::debug!("Constructing edge {}", key);
			self.construct_edge(key, 0)?;
		}
		log::info!("Assigned {} edges; remaining capacities: {}", self.network.edge_count(), self.network.quarries().map(|(q, c)| format!("{}: {:.1}", q, c)).join(", "));
		Ok(())
	}

	/// The calculated network in document form.
	pub fn solution(&self) -> data::Solution {
		data::Solution {
			nodes: self.network.vertices().map(|(id, p)| data::Node { id, coordinates: (p.x(), p.y()) }).collect(),
			roads: self.network.edges().map(|e| data::AssignedRoad {
				p1: e.first,
				p2: e.last,
				polyline: e.line.0.iter().map(|c| (c.x, c.y)).collect(),
				quarry: self.network.assignment(&e.key()),
				origin: self.network.origin_of(&e.key()).unwrap().ends(),
			}).collect(),
			quarries: self.network.quarries().map(|(node, capacity)| data::QuarryBalance { node, capacity }).collect(),
			origin_costs: cost::costs_by_origin(&self.network, &self.distances, &self.params).into_iter().map(|(key, cost)| {
				let (p1, p2) = key.ends();
				data::OriginCost { p1, p2, cost }
			}).collect(),
			total_cost: cost::network_cost(&self.network, &self.distances, &self.params),
		}
	}

	/// Input edges by ascending distance to the nearest quarry, ties by input order.
	///
	/// Computed before any splitting; the pieces an edge is cut into are
	/// handled by the recursion, not queued.
	fn traversal_order(&self) -> Vec<EdgeKey> {
		let mut scored: Vec<(N64, usize, EdgeKey)> = self.network.edges().enumerate().map(|(i, e)| {
			let (u, v) = e.key().ends();
			let score = std::cmp::min(
				self.distances.min_distance(u).unwrap_or_else(N64::infinity),
				self.distances.min_distance(v).unwrap_or_else(N64::infinity),
			);
			(score, i, e.key())
		}).collect();
		scored.sort();
		scored.into_iter().map(|(.., key)| key).collect()
	}

	fn nearest(&self, v: VertexId) -> SolveResult<VertexId> {
		self.distances.nearest_nonempty_quarry(&self.network, &self.params.tolerance, v).ok_or(SolveError::CapacityExhausted(v))
	}

	/// Distance from `v` to a quarry known to be reachable from it
	fn dist(&self, v: VertexId, quarry: VertexId) -> N64 {
		self.distances.distance(v, quarry).unwrap()
	}

	fn dist_or_inf(&self, v: VertexId, quarry: VertexId) -> N64 {
		self.distances.distance(v, quarry).unwrap_or_else(N64::infinity)
	}

	/// Splits an edge and brings the distance tables along.
	///
	/// `new_length` is measured from the near endpoint, which is the
	/// polyline's last point when `inverted`.
	fn split(&mut self, key: EdgeKey, new_length: N64, inverted: bool) -> SolveResult<SplitEdges> {
		let parts = self.network.split_edge(key, new_length, inverted)?;
		let (uw, wv) = (self.network.edge(&parts.first).unwrap().weight, self.network.edge(&parts.last).unwrap().weight);
		self.distances.on_split(parts.first.other(parts.cut), parts.last.other(parts.cut), parts.cut, uw, wv);
		log::trace!("Split edge {} at {} into {} and {}", key, new_length, parts.first, parts.last);
		Ok(parts)
	}

	/// Builds one edge: binds it to a quarry, or cuts it and recurses.
	fn construct_edge(&mut self, key: EdgeKey, depth: usize) -> SolveResult<()> {
		if depth > self.params.max_split_depth {
			let (u, v) = key.ends();
			return Err(SolveError::RunawaySplitting { u, v, depth: self.params.max_split_depth });
		}
		let tolerance = self.params.tolerance;
		let (mut u, mut v, length) = {
			let e = self.network.edge(&key).unwrap();
			(e.first, e.last, e.weight)
		};
		let mut qu = self.nearest(u)?;
		let mut qv = self.nearest(v)?;
		// u is always the end nearest to its own quarry
		let mut inverted = false;
		if self.dist(u, qu) > self.dist(v, qv) {
			std::mem::swap(&mut u, &mut v);
			std::mem::swap(&mut qu, &mut qv);
			inverted = true;
		}
		// when the far end is effectively equidistant from both quarries, keep
		// the near end's - this collapses spurious splits
		if tolerance.close_n(self.dist_or_inf(v, qu), self.dist(v, qv)) {
			qv = qu;
		}
		let du = self.dist(u, qu);
		let dv = self.dist(v, qv);
		if qu != qv || !tolerance.close_n(dv, du + length) {
			// the two ends are served by different quarries, or by the same one
			// along paths that do not traverse this edge: cut where the
			// delivered path lengths from both sides meet
			let watershed = (length + (dv - du)) / n64(2.0);
			let parts = self.split(key, watershed, inverted)?;
			let (near, far) = if inverted { (parts.last, parts.first) } else { (parts.first, parts.last) };
			self.construct_edge(near, depth + 1)?;
			self.construct_edge(far, depth + 1)?;
		} else {
			let quarry = qu;
			let volume = length * n64(self.params.volume_per_length());
			let capacity = self.network.capacity(quarry);
			if volume < capacity || tolerance.close_n(volume, capacity) {
				self.network.debit(quarry, volume);
				self.network.assign(key, quarry);
				log::debug!("Edge {} built from quarry {}", key, quarry);
			} else {
				// not enough material for the whole edge
				let supportable = capacity / n64(self.params.volume_per_length());
				if tolerance.close_n(supportable, length) {
					// the shortfall is below the geometric tolerance
					self.network.debit(quarry, volume);
					self.network.assign(key, quarry);
				} else if tolerance.zero_n(supportable) {
					// too little for any piece: drain the quarry and pick again
					self.network.exhaust(quarry);
					self.construct_edge(key, depth + 1)?;
				} else {
					let parts = self.split(key, supportable, inverted)?;
					let (near, far) = if inverted { (parts.last, parts.first) } else { (parts.first, parts.last) };
					self.network.exhaust(quarry);
					self.network.assign(near, quarry);
					log::debug!("Edge {} built from quarry {}, exhausting it", near, quarry);
					self.construct_edge(far, depth + 1)?;
				}
			}
		}
		Ok(())
	}
}
