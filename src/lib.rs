//! # u-cvrptw
//!
//! Capacitated vehicle routing with time windows: cumulative resource
//! dimensions propagated along routes, cheapest-insertion construction, and
//! a time-bounded local search.
//!
//! ## Modules
//!
//! - [`models`] — Problem data (Node, Vehicle, Problem) and solutions (Route, Solution)
//! - [`distance`] — Integer cost matrices
//! - [`index`] — Node ↔ route position mapping with vehicle start/end sentinels
//! - [`evaluation`] — Arc and node evaluators registered by handle
//! - [`dimension`] — Cumulative dimensions and bound propagation
//! - [`model`] — The routing model tying evaluators and dimensions together
//! - [`constructive`] — First solution heuristics
//! - [`local_search`] — Neighborhoods, metaheuristics and the search engine
//! - [`extract`] — Per-vehicle solution reports
//! - [`solver`] — End-to-end solve with optional parallel restarts
//! - [`io`] — JSON problem and solution documents
//! - [`config`] — Solver parameters
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use u_cvrptw::config::SolverConfig;
//! use u_cvrptw::io::ProblemInput;
//! use u_cvrptw::solver::Solver;
//!
//! let input = ProblemInput::from_json_str(r#"{
//!     "distance_matrix": [[0, 5, 7], [5, 0, 4], [7, 4, 0]],
//!     "time_matrix": [[0, 2, 3], [2, 0, 2], [3, 2, 0]],
//!     "demands": [0, 2, 2],
//!     "vehicle_capacities": [4, 4],
//!     "num_vehicles": 2,
//!     "depot": 0,
//!     "vehicle_distances": 100,
//!     "time_windows": [[0, 30], [0, 10], [4, 12]]
//! }"#).unwrap();
//!
//! let problem = input.into_problem().unwrap();
//! let solved = Solver::new(SolverConfig::default()).solve(&problem).unwrap();
//!
//! assert!(solved.is_complete());
//! let output = solved.output();
//! assert_eq!(output.routes.len(), 2);
//! ```

pub mod config;
pub mod constructive;
pub mod dimension;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod extract;
pub mod index;
pub mod io;
pub mod local_search;
pub mod model;
pub mod models;
pub mod solver;
