//! Local search over feasible solutions.
//!
//! - [`insert`] — Route unrouted nodes
//! - [`relocate`] — Move one node within or between routes
//! - [`exchange`] — Swap two nodes
//! - [`two_opt`] — Reverse a segment inside a route
//! - [`cross_exchange`] — Swap route tails (2-opt*)
//!
//! [`LocalSearch`] sweeps these neighborhoods under a [`Metaheuristic`]
//! until no move is accepted, a budget runs out, or the caller stops it.

mod cross_exchange;
mod engine;
mod exchange;
mod insert;
mod metaheuristic;
mod moves;
mod relocate;
mod two_opt;

pub use engine::{LocalSearch, SearchOutcome, SearchState, SearchStats};
pub use metaheuristic::{from_config, GreedyDescent, Metaheuristic, SimulatedAnnealing, TabuList};
pub use moves::{Move, MoveKey};
