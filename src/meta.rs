//! Meta parameters for the quarry road construction solver

use crate::*;
use serde::*;

/// Absolute + relative tolerance for float comparisons.
///
/// Every comparison the solver makes "within tolerance" goes through one value
/// of this type, so all modules agree on what equal means.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Tolerance {
	#[serde(default = "defaults::absolute")]
	pub absolute: f64,
	#[serde(default = "defaults::relative")]
	pub relative: f64,
}

impl Default for Tolerance {
	fn default() -> Self {
		Self {
			absolute: defaults::absolute(),
			relative: defaults::relative(),
		}
	}
}

impl Tolerance {
	/// `|a - b| <= absolute + relative·max(|a|, |b|)`; non-finite values are only equal to themselves
	pub fn close(&self, a: f64, b: f64) -> bool {
		if !a.is_finite() || !b.is_finite() {
			return a == b;
		}
		(a - b).abs() <= self.absolute + self.relative * a.abs().max(b.abs())
	}
	pub fn close_n(&self, a: N64, b: N64) -> bool {
		self.close(a.raw(), b.raw())
	}
	pub fn zero(&self, a: f64) -> bool {
		self.close(a, 0.0)
	}
	pub fn zero_n(&self, a: N64) -> bool {
		self.zero(a.raw())
	}
}

/// Parameters of a solver run
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Parameters {
	/// Road profile width, in length units
	#[serde(default = "defaults::road_width")]
	pub road_width: f64,
	/// Road profile height, in length units
	#[serde(default = "defaults::road_height")]
	pub road_height: f64,
	/// Cost of hauling one volume unit of material over one length unit
	#[serde(default = "defaults::unit_cost")]
	pub unit_cost: f64,
	#[serde(default)]
	pub tolerance: Tolerance,
	/// Bail out of edge splitting past this recursion depth
	#[serde(default = "defaults::max_split_depth")]
	pub max_split_depth: usize,
}

impl Default for Parameters {
	fn default() -> Self {
		Self {
			road_width: defaults::road_width(),
			road_height: defaults::road_height(),
			unit_cost: defaults::unit_cost(),
			tolerance: Default::default(),
			max_split_depth: defaults::max_split_depth(),
		}
	}
}

impl Parameters {
	/// Material volume consumed by one length unit of road
	pub fn volume_per_length(&self) -> f64 {
		self.road_width * self.road_height
	}
}

mod defaults {
	pub fn absolute() -> f64 {
		1e-8
	}
	pub fn relative() -> f64 {
		1e-5
	}
	pub fn road_width() -> f64 {
		1.0
	}
	pub fn road_height() -> f64 {
		1.0
	}
	pub fn unit_cost() -> f64 {
		1.0
	}
	pub fn max_split_depth() -> usize {
		64
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_close() {
		let tol = Tolerance::default();
		assert!(tol.close(1.0, 1.0 + 1e-9));
		assert!(tol.close(1e6, 1e6 + 1.0));
		assert!(!tol.close(1.0, 1.01));
		assert!(tol.zero(1e-9));
		assert!(!tol.zero(1e-3));
	}

	#[test]
	fn test_close_infinities() {
		let tol = Tolerance::default();
		assert!(!tol.close(f64::INFINITY, 1e300));
		assert!(tol.close(f64::INFINITY, f64::INFINITY));
		assert!(!tol.close(f64::INFINITY, f64::NEG_INFINITY));
	}

	#[test]
	fn test_defaults_from_empty_doc() {
		let params: Parameters = serde_yaml::from_str("{}").unwrap();
		assert_eq!(params, Parameters::default());
		let params: Parameters = serde_yaml::from_str("road_width: 3.0\nroad_height: 0.5").unwrap();
		assert_eq!(params.volume_per_length(), 1.5);
		assert_eq!(params.max_split_depth, defaults::max_split_depth());
	}
}
