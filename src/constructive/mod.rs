//! Constructive heuristics for building a first solution.
//!
//! - [`cheapest_insertion`] — Global cheapest feasible insertion
//! - [`path_cheapest_arc`] — Route-by-route cheapest feasible extension
//!
//! Both leave nodes that fit nowhere unrouted and report them through
//! [`AssignmentStatus::Partial`] instead of failing.

mod cheapest_insertion;
mod path_cheapest_arc;

pub use cheapest_insertion::cheapest_insertion;
pub use path_cheapest_arc::path_cheapest_arc;

pub(crate) use cheapest_insertion::{insertion_delta, removal_delta};

use crate::config::FirstSolutionStrategy;
use crate::error::RoutingError;
use crate::model::RoutingModel;
use crate::models::Solution;

/// Whether construction placed every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentStatus {
    /// Every node is routed.
    Complete,
    /// Some nodes fit in no route; the solution is best-effort.
    Partial {
        /// Nodes left out, ascending.
        unrouted: Vec<usize>,
    },
}

impl AssignmentStatus {
    /// `Complete` for an empty list, `Partial` otherwise.
    pub fn from_unrouted(mut unrouted: Vec<usize>) -> Self {
        if unrouted.is_empty() {
            Self::Complete
        } else {
            unrouted.sort_unstable();
            Self::Partial { unrouted }
        }
    }

    /// Returns `true` if every node is routed.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Result of a construction heuristic.
#[derive(Debug, Clone)]
pub struct Construction {
    /// Best-effort solution; always feasible in every dimension.
    pub solution: Solution,
    /// Whether any node was left out.
    pub status: AssignmentStatus,
}

/// Runs the configured construction heuristic.
pub fn construct(
    model: &RoutingModel,
    strategy: FirstSolutionStrategy,
) -> Result<Construction, RoutingError> {
    match strategy {
        FirstSolutionStrategy::CheapestInsertion => cheapest_insertion(model),
        FirstSolutionStrategy::PathCheapestArc => path_cheapest_arc(model),
    }
}
