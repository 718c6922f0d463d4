//! Domain model types for capacitated vehicle routing with time windows.
//!
//! Problem data (nodes, vehicles, cost matrices) is immutable once built;
//! routes and solutions carry the propagated dimension state of the search.

mod node;
mod problem;
mod route;
mod solution;
mod vehicle;

pub use node::{Node, TimeWindow};
pub use problem::Problem;
pub use route::Route;
pub use solution::Solution;
pub use vehicle::Vehicle;
