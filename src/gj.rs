//! GeoJSON conversion functions
//!
//! Converts road graph and solution documents to GeoJSON, mainly for
//! visualization: calculated roads carry their feeding quarry as a property,
//! so a renderer can color the network by supplier.

use crate::*;
use crate::data;

use geojson::*;
use indexmap::{IndexMap, indexmap};

fn line(polyline: &[(f64, f64)]) -> Geometry {
	Geometry::new(Value::LineString(polyline.iter().map(|(x, y)| vec![*x, *y]).collect()))
}

/// Calculated roads as a feature collection, one `LineString` per road piece
/// with its `quarry` and `origin` properties.
pub fn solution_roads_to_geojson(solution: &data::Solution) -> FeatureCollection {
	FeatureCollection {
		features: solution.roads.iter().map(|road| Feature {
			geometry: Some(line(&road.polyline)),
			properties: Some(indexmap!{
				"quarry".to_string() => serde_json::to_value(road.quarry).unwrap(),
				"origin".to_string() => serde_json::to_value(road.origin).unwrap()
			}.into_iter().collect()),
			bbox: None,
			foreign_members: None,
			id: None,
		}).collect(),
		bbox: None,
		foreign_members: None,
	}
}

/// Quarries as `Point` features annotated with their remaining capacity.
pub fn solution_quarries_to_geojson(solution: &data::Solution) -> FeatureCollection {
	let coords: IndexMap<_, _> = solution.nodes.iter().map(|n| (n.id, n.coordinates)).collect();
	FeatureCollection {
		features: solution.quarries.iter().map(|q| {
			let (x, y) = coords[&q.node];
			Feature {
				geometry: Some(Geometry::new(Value::Point(vec![x, y]))),
				properties: Some(indexmap!{ "capacity".to_string() => serde_json::to_value(q.capacity).unwrap() }.into_iter().collect()),
				bbox: None,
				foreign_members: None,
				id: None,
			}
		}).collect(),
		bbox: None,
		foreign_members: None,
	}
}

/// A raw, uncalculated road graph: plain road lines plus quarry points with
/// their initial capacities.
pub fn roads_to_geojson(g: &data::RoadGraph) -> FeatureCollection {
	let coords: IndexMap<_, _> = g.nodes.iter().map(|n| (n.id, n.coordinates)).collect();
	FeatureCollection {
		features: g.roads.iter().map(|road| Feature {
			geometry: Some(line(&road.polyline)),
			properties: None,
			bbox: None,
			foreign_members: None,
			id: None,
		}).chain(g.quarries.iter().map(|q| {
			let (x, y) = coords[&q.node];
			Feature {
				geometry: Some(Geometry::new(Value::Point(vec![x, y]))),
				properties: Some(indexmap!{ "capacity".to_string() => serde_json::to_value(q.capacity).unwrap() }.into_iter().collect()),
				bbox: None,
				foreign_members: None,
				id: None,
			}
		})).collect(),
		bbox: None,
		foreign_members: None,
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_roads_to_geojson() {
		let g = data::RoadGraph {
			nodes: vec![
				data::Node { id: 0, coordinates: (0.0, 0.0) },
				data::Node { id: 1, coordinates: (10.0, 0.0) },
			],
			quarries: vec![data::Quarry { node: 0, capacity: n64(100.0) }],
			roads: vec![data::RoadSegment { p1: 0, p2: 1, polyline: vec![(0.0, 0.0), (10.0, 0.0)] }],
		};
		let fc = roads_to_geojson(&g);
		assert_eq!(fc.features.len(), 2);
		assert!(matches!(fc.features[0].geometry.as_ref().unwrap().value, Value::LineString(_)));
		assert!(matches!(fc.features[1].geometry.as_ref().unwrap().value, Value::Point(_)));
		assert_eq!(fc.features[1].property("capacity").and_then(|c| c.as_f64()), Some(100.0));
	}
}
