//! Fatal error taxonomy of the solver

use crate::*;
use thiserror::Error;

/// Errors surfaced by network loading and [`calculate`](crate::splitter::EdgesSplitter::calculate).
///
/// All of them terminate the computation; the network is left in the partially
/// calculated state it had when the error was raised, which the caller may
/// still inspect and render.
#[derive(Debug, Error)]
pub enum SolveError {
	/// The input document contradicts itself
	#[error("invalid input: {0}")]
	InvalidInput(String),
	/// An ordinary vertex has no path to any quarry
	#[error("vertex {0} has no path to any quarry")]
	Unreachable(VertexId),
	/// Every quarry reachable from the vertex is out of material
	#[error("no quarry with remaining capacity reachable from vertex {0}")]
	CapacityExhausted(VertexId),
	/// Edge splitting did not converge
	#[error("splitting of edge ({u}, {v}) exceeded depth {depth}")]
	RunawaySplitting { u: VertexId, v: VertexId, depth: usize },
	/// A cut was requested outside the interior of an edge
	#[error("geometry: {0}")]
	Geometry(String),
}

pub type SolveResult<T> = std::result::Result<T, SolveError>;
