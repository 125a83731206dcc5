//! # _dig 'em up & lay 'em down_
//!
//! CLI for designing quarry-fed road networks: every piece of every road gets
//! assigned to the quarry that supplies its material, roads are split where the
//! supplying quarry changes or runs dry, and the haul is priced. Also converts
//! the results to GeoJSON.

use clap::{App, Arg, SubCommand, crate_version};
mod cost;
mod data;
mod distance;
mod error;
mod geometry;
mod gj;
mod meta;
mod network;
mod splitter;
pub use try_all::{TryAll, TryMapAll};
pub use noisy_float::prelude::{N64, n64, Float};
pub use error::{SolveError, SolveResult};
pub use meta::Parameters;

/// Id of a network vertex. Vertices created by edge splits continue the input numbering.
pub type VertexId = u64;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(untagged)]
enum Wut {
	Solution(data::Solution),
	Roads(data::RoadGraph),
}

fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"));
	let matches = App::new("Quarry Roads Compute")
							.version(crate_version!())
							.about("Dig it, haul it, lay it down!")
							.subcommand(SubCommand::with_name("solve")
								.about("Assign a feeding quarry to every piece of every road")
								.arg(Arg::with_name("road-graph")
										.takes_value(true)
										.required(true)
										.index(1)
										.help("Road Graph JSON"))
								.arg(Arg::with_name("meta")
										.takes_value(true)
										.required(true)
										.index(2)
										.help("Solver parameters YAML"))
								.arg(Arg::with_name("output")
										.takes_value(true)
										.required(true)
										.index(3)
										.help("Output solution JSON"))
							)
							.subcommand(SubCommand::with_name("geojson")
								.about("Convert road graphs and computed solutions into GeoJSONs")
								.arg(Arg::with_name("wut")
										.takes_value(true)
										.required(true)
										.index(1)
										.help("Road graph or computed solution JSON"))
								.arg(Arg::with_name("prefix")
										.takes_value(true)
										.required(true)
										.index(2)
										.help(r#"GeoJSON files prefix - the generated files will be named alike "{prefix}.{...}.geojson""#))
							)
							.get_matches();
	log::info!("Loading...");
	if let Some(matches) = matches.subcommand_matches("solve") {
		log::trace!("tracing enabled");
		let roads: data::RoadGraph = serde_json::from_reader(&std::fs::File::open(matches.value_of("road-graph").unwrap())?).expect("Road graph invalid JSON");
		let params: meta::Parameters = serde_yaml::from_reader(&std::fs::File::open(matches.value_of("meta").unwrap())?).expect("Meta parameters invalid YAML");
		log::info!("Loaded configuration");
		let network = match network::RoadNetwork::new(&roads, params.tolerance) {
			Ok(network) => network,
			Err(e) => {
				log::error!("{}", e);
				std::process::exit(1);
			}
		};
		let mut splitter = splitter::EdgesSplitter::new(network, params);
		let outcome = splitter.calculate();
		serde_json::to_writer(&std::fs::File::create(matches.value_of("output").unwrap())?, &splitter.solution()).unwrap();
		match outcome {
			Ok(()) => log::info!("Constructed quarry assignments"),
			Err(e) => {
				log::error!("{}", e);
				log::warn!("Wrote the partially calculated network");
				std::process::exit(1);
			}
		}
	} else if let Some(matches) = matches.subcommand_matches("geojson") {
		let pref = matches.value_of("prefix").unwrap();
		let wut: Wut = serde_json::from_reader(&std::fs::File::open(matches.value_of("wut").unwrap())?).expect("WUT invalid JSON");
		log::info!("Loaded configuration");
		match wut {
			Wut::Solution(solution) => {
				serde_json::to_writer(&std::fs::File::create(format!("{}.roads.geojson", pref))?, &gj::solution_roads_to_geojson(&solution)).unwrap();
				serde_json::to_writer(&std::fs::File::create(format!("{}.quarries.geojson", pref))?, &gj::solution_quarries_to_geojson(&solution)).unwrap();
			}
			Wut::Roads(roads) => {
				serde_json::to_writer(&std::fs::File::create(format!("{}.geojson", pref))?, &gj::roads_to_geojson(&roads)).unwrap();
			}
		}
	}
	Ok(())
}
