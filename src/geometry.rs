//! Polyline kernel: lengths, linear referencing, and splitting in two.
//!
//! Polylines are `geo` line strings with at least 2 points. Arc lengths are
//! measured from the first point.

use crate::*;
use crate::meta::Tolerance;

use geo::{Coordinate, LineString, Point};
use geo::algorithm::euclidean_distance::EuclideanDistance;
use geo::algorithm::euclidean_length::EuclideanLength;

/// Euclidean length of a polyline
pub fn length(line: &LineString<f64>) -> f64 {
	line.euclidean_length()
}

/// Arc length at which the projection of `p` falls on `line`
pub fn project(line: &LineString<f64>, p: &Point<f64>) -> f64 {
	let mut best = f64::INFINITY;
	let mut best_s = 0.0;
	let mut walked = 0.0;
	for seg in line.lines() {
		let seg_length = seg.euclidean_length();
		let (dx, dy) = (seg.end.x - seg.start.x, seg.end.y - seg.start.y);
		let t = if seg_length > 0.0 {
			(((p.x() - seg.start.x) * dx + (p.y() - seg.start.y) * dy) / (seg_length * seg_length)).max(0.0).min(1.0)
		} else {
			0.0
		};
		let closest = Point::new(seg.start.x + t * dx, seg.start.y + t * dy);
		let d = p.euclidean_distance(&closest);
		if d < best {
			best = d;
			best_s = walked + t * seg_length;
		}
		walked += seg_length;
	}
	best_s
}

/// Point at arc length `s` from the start of `line`, with `s` clamped into `[0, length]`
pub fn interpolate(line: &LineString<f64>, s: f64) -> Point<f64> {
	let mut remaining = s.max(0.0);
	for seg in line.lines() {
		let seg_length = seg.euclidean_length();
		if remaining <= seg_length && seg_length > 0.0 {
			let t = remaining / seg_length;
			return Point::new(seg.start.x + t * (seg.end.x - seg.start.x), seg.start.y + t * (seg.end.y - seg.start.y));
		}
		remaining -= seg_length;
	}
	Point::from(*line.0.last().unwrap())
}

/// Cut `line` at arc length `s` from its start.
///
/// The concatenation of the two returned polylines reproduces `line`. A cut
/// falling within tolerance of an interior vertex shares that vertex instead
/// of inserting a duplicate; a cut within tolerance of either end is refused,
/// as it would produce a degenerate zero-length polyline.
pub fn split_at_length(line: &LineString<f64>, s: f64, tolerance: &Tolerance) -> SolveResult<(LineString<f64>, LineString<f64>)> {
	let total = length(line);
	if s <= 0.0 || s >= total || tolerance.zero(s) || tolerance.close(s, total) {
		return Err(SolveError::Geometry(format!("cut at {} outside the interior of a polyline of length {}", s, total)));
	}
	let coords = &line.0;
	let mut walked = 0.0;
	for (i, seg) in line.lines().enumerate() {
		let seg_length = seg.euclidean_length();
		let here = walked + seg_length;
		// the cut lands on the vertex closing this segment - share it
		if tolerance.close(here, s) {
			return Ok((LineString(coords[..=i + 1].to_vec()), LineString(coords[i + 1..].to_vec())));
		}
		if here > s {
			let t = (s - walked) / seg_length;
			let cut = Coordinate {
				x: seg.start.x + t * (seg.end.x - seg.start.x),
				y: seg.start.y + t * (seg.end.y - seg.start.y),
			};
			let mut head = coords[..=i].to_vec();
			head.push(cut);
			let mut tail = vec![cut];
			tail.extend_from_slice(&coords[i + 1..]);
			return Ok((LineString(head), LineString(tail)));
		}
		walked = here;
	}
	Err(SolveError::Geometry(format!("cut at {} ran past the end of a polyline of length {}", s, total)))
}

/// Cut `line` at the projection of `p`, per [`project`]
pub fn split_at_point(line: &LineString<f64>, p: &Point<f64>, tolerance: &Tolerance) -> SolveResult<(LineString<f64>, LineString<f64>)> {
	split_at_length(line, project(line, p), tolerance)
}

#[cfg(test)]
mod test {
	use super::*;

	fn bent() -> LineString<f64> {
		// (0,0) -> (3,4) -> (9,12): lengths 5 + 10
		LineString::from(vec![(0.0, 0.0), (3.0, 4.0), (9.0, 12.0)])
	}

	#[test]
	fn test_length() {
		assert_eq!(length(&LineString::from(vec![(0.0, 0.0), (10.0, 0.0)])), 10.0);
		assert_eq!(length(&bent()), 15.0);
	}

	#[test]
	fn test_project() {
		let line = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
		assert_eq!(project(&line, &Point::new(2.5, 5.0)), 2.5);
		assert_eq!(project(&line, &Point::new(-2.0, 1.0)), 0.0);
		assert_eq!(project(&line, &Point::new(12.0, 0.0)), 10.0);
		assert!((project(&bent(), &Point::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
	}

	#[test]
	fn test_interpolate() {
		let line = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
		assert_eq!(interpolate(&line, 2.5), Point::new(2.5, 0.0));
		assert_eq!(interpolate(&line, -1.0), Point::new(0.0, 0.0));
		assert_eq!(interpolate(&line, 11.0), Point::new(10.0, 0.0));
		assert_eq!(interpolate(&bent(), 10.0), Point::new(6.0, 8.0));
	}

	#[test]
	fn test_split_mid_segment() {
		let tol = Tolerance::default();
		let (head, tail) = split_at_length(&bent(), 10.0, &tol).unwrap();
		assert_eq!(head.0, vec![Coordinate { x: 0.0, y: 0.0 }, Coordinate { x: 3.0, y: 4.0 }, Coordinate { x: 6.0, y: 8.0 }]);
		assert_eq!(tail.0, vec![Coordinate { x: 6.0, y: 8.0 }, Coordinate { x: 9.0, y: 12.0 }]);
		assert!(tol.close(length(&head) + length(&tail), 15.0));
	}

	#[test]
	fn test_split_shares_existing_vertex() {
		let tol = Tolerance::default();
		let (head, tail) = split_at_length(&bent(), 5.0, &tol).unwrap();
		assert_eq!(head.0.len(), 2);
		assert_eq!(tail.0.len(), 2);
		assert_eq!(head.0[1], Coordinate { x: 3.0, y: 4.0 });
		assert_eq!(tail.0[0], Coordinate { x: 3.0, y: 4.0 });
		// within tolerance of the vertex counts as the vertex
		let (head, _) = split_at_length(&bent(), 5.0 + 1e-10, &tol).unwrap();
		assert_eq!(head.0.len(), 2);
	}

	#[test]
	fn test_split_rejects_degenerate_cuts() {
		let tol = Tolerance::default();
		for s in &[0.0, -1.0, 15.0, 16.0, 1e-10, 15.0 - 1e-10] {
			assert!(split_at_length(&bent(), *s, &tol).is_err(), "cut at {} should be refused", s);
		}
	}

	#[test]
	fn test_split_at_point() {
		let tol = Tolerance::default();
		let line = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
		let (head, tail) = split_at_point(&line, &Point::new(2.5, 3.0), &tol).unwrap();
		assert_eq!(head.0.last(), Some(&Coordinate { x: 2.5, y: 0.0 }));
		assert_eq!(tail.0.first(), Some(&Coordinate { x: 2.5, y: 0.0 }));
	}
}
