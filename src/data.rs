//! Data types for the road network documents
//!
//! JSON in, JSON out; the shapes below are the whole contract between the
//! solver and its callers.

use crate::*;

use serde::*;

/// A road network vertex embedded in the plane
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Node {
	pub id: VertexId,
	pub coordinates: (f64, f64),
}

/// Material stockpile colocated with a vertex
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Quarry {
	pub node: VertexId,
	pub capacity: N64,
}

/// An input road edge
///
/// The polyline's first coordinate is the position of `p1` and its last one
/// the position of `p2`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct RoadSegment {
	pub p1: VertexId,
	pub p2: VertexId,
	pub polyline: Vec<(f64, f64)>,
}

/// The input document: a road network with quarries
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct RoadGraph {
	pub nodes: Vec<Node>,
	pub quarries: Vec<Quarry>,
	pub roads: Vec<RoadSegment>,
}

/// A calculated road edge, supplied by `quarry` and descended from the input edge `origin`
///
/// `quarry` is only absent in partially calculated networks written out for diagnostics.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct AssignedRoad {
	pub p1: VertexId,
	pub p2: VertexId,
	pub polyline: Vec<(f64, f64)>,
	pub quarry: Option<VertexId>,
	pub origin: (VertexId, VertexId),
}

/// What is left of a quarry's stockpile
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct QuarryBalance {
	pub node: VertexId,
	pub capacity: N64,
}

/// Haul cost of all calculated descendants of one input edge
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct OriginCost {
	pub p1: VertexId,
	pub p2: VertexId,
	pub cost: N64,
}

/// The output document: the calculated network
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Solution {
	pub nodes: Vec<Node>,
	pub roads: Vec<AssignedRoad>,
	pub quarries: Vec<QuarryBalance>,
	pub origin_costs: Vec<OriginCost>,
	pub total_cost: N64,
}
