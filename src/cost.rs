//! Haul cost accounting over a calculated network.
//!
//! The haul for a road piece grows linearly along it, starting from the
//! distance of its near end to the feeding quarry; integrating gives
//! `length·distance + length²/2`, scaled by the road profile and unit cost.

use crate::*;
use crate::distance::DistanceTable;
use crate::network::{EdgeKey, RoadNetwork};

use indexmap::IndexMap;

/// Cost of laying one road piece of length `length` whose near end lies
/// `distance` away from the feeding quarry.
pub fn edge_cost(length: N64, distance: N64, params: &Parameters) -> N64 {
	n64(params.road_width * params.road_height * params.unit_cost) * (length * distance + length * length / n64(2.0))
}

/// Costs of all assigned edges, grouped by the input edge they descend from.
///
/// This is what the network builder weighs its candidate graphs with.
pub fn costs_by_origin(network: &RoadNetwork, distances: &DistanceTable, params: &Parameters) -> IndexMap<EdgeKey, N64> {
	let mut costs = IndexMap::new();
	for edge in network.edges() {
		let key = edge.key();
		if let (Some(quarry), Some(origin)) = (network.assignment(&key), network.origin_of(&key)) {
			let (u, v) = key.ends();
			let near = match (distances.distance(u, quarry), distances.distance(v, quarry)) {
				(Some(du), Some(dv)) => std::cmp::min(du, dv),
				(Some(du), None) => du,
				(None, Some(dv)) => dv,
				(None, None) => continue,
			};
			let slot = costs.entry(origin).or_insert_with(|| n64(0.0));
			*slot = *slot + edge_cost(edge.weight, near, params);
		}
	}
	costs
}

/// Total haul cost of every assigned edge.
pub fn network_cost(network: &RoadNetwork, distances: &DistanceTable, params: &Parameters) -> N64 {
	costs_by_origin(network, distances, params).values().cloned().sum()
}
