//! Error types for model setup and solving.
//!
//! Setup problems are fatal and surface before any search starts. A node
//! that construction cannot place is *not* an error here: it is reported as
//! [`AssignmentStatus::Partial`](crate::constructive::AssignmentStatus) next to
//! the best-effort solution.

use std::fmt::{self, Display};

use crate::evaluation::EvaluatorHandle;

/// Malformed problem, vehicle, or dimension setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A per-vehicle vector does not have one entry per vehicle.
    VehicleCountMismatch {
        /// Number of vehicles in the model.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },
    /// An evaluator handle was not issued by this model's cost model.
    UnknownEvaluator(EvaluatorHandle),
    /// A cost matrix row has the wrong length.
    MatrixNotSquare {
        /// Which matrix.
        name: &'static str,
        /// Number of rows.
        rows: usize,
        /// Offending row.
        row: usize,
        /// Length of that row.
        len: usize,
    },
    /// A per-node input does not match the node count.
    SizeMismatch {
        /// Which input.
        name: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// The depot index is not a valid node.
    DepotOutOfRange {
        /// Requested depot.
        depot: usize,
        /// Number of nodes.
        num_nodes: usize,
    },
    /// The depot must not carry demand.
    DepotDemandNonZero(i64),
    /// At least one vehicle is required.
    NoVehicles,
    /// Vehicle capacities must be non-negative.
    NegativeCapacity {
        /// Offending vehicle.
        vehicle: usize,
    },
    /// A time window with `earliest > latest`.
    InvalidTimeWindow {
        /// Offending node.
        node: usize,
    },
    /// No arc-cost evaluator has been set on the model.
    MissingArcCostEvaluator,
    /// A dimension with this name already exists.
    DuplicateDimension(String),
    /// No dimension with this name exists.
    UnknownDimension(String),
    /// A solver parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Accepted range.
        expected: &'static str,
    },
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VehicleCountMismatch { expected, actual } => write!(
                f,
                "expected {expected} per-vehicle values, got {actual}"
            ),
            Self::UnknownEvaluator(h) => write!(f, "unknown evaluator handle {}", h.get()),
            Self::MatrixNotSquare {
                name,
                rows,
                row,
                len,
            } => write!(
                f,
                "{name} matrix is not square: {rows} rows but row {row} has {len} entries"
            ),
            Self::SizeMismatch {
                name,
                expected,
                actual,
            } => write!(f, "{name} has {actual} entries, expected {expected}"),
            Self::DepotOutOfRange { depot, num_nodes } => {
                write!(f, "depot {depot} is out of range for {num_nodes} nodes")
            }
            Self::DepotDemandNonZero(d) => write!(f, "depot demand must be 0, got {d}"),
            Self::NoVehicles => write!(f, "at least one vehicle is required"),
            Self::NegativeCapacity { vehicle } => {
                write!(f, "vehicle {vehicle} has a negative capacity")
            }
            Self::InvalidTimeWindow { node } => {
                write!(f, "time window of node {node} has earliest > latest")
            }
            Self::MissingArcCostEvaluator => write!(f, "no arc cost evaluator set"),
            Self::DuplicateDimension(name) => write!(f, "dimension '{name}' already exists"),
            Self::UnknownDimension(name) => write!(f, "no dimension named '{name}'"),
            Self::InvalidParameter { name, expected } => {
                write!(f, "parameter {name} must be {expected}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Why a cumulative bound could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundFailure {
    /// The requested range has `lo > hi`.
    Inverted,
    /// The requested range does not intersect the current bounds.
    Empty,
}

/// A manually applied cumulative bound is self-contradictory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfeasibleBoundError {
    /// Name of the dimension.
    pub dimension: String,
    /// Position whose range was narrowed.
    pub position: usize,
    /// Requested lower bound.
    pub lo: i64,
    /// Requested upper bound.
    pub hi: i64,
    /// What went wrong.
    pub failure: BoundFailure,
}

impl Display for InfeasibleBoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failure {
            BoundFailure::Inverted => write!(
                f,
                "range [{}, {}] on '{}' position {} is inverted",
                self.lo, self.hi, self.dimension, self.position
            ),
            BoundFailure::Empty => write!(
                f,
                "range [{}, {}] on '{}' position {} leaves no feasible value",
                self.lo, self.hi, self.dimension, self.position
            ),
        }
    }
}

impl std::error::Error for InfeasibleBoundError {}

/// Top-level error returned by the solver.
#[derive(Debug)]
pub enum RoutingError {
    /// Model setup is malformed.
    Configuration(ConfigurationError),
    /// A cumulative bound is contradictory.
    InfeasibleBound(InfeasibleBoundError),
    /// Some nodes could not be placed by any vehicle.
    NoFeasibleSolution {
        /// Nodes left out of every route.
        unrouted: Vec<usize>,
    },
    /// Problem or solution JSON could not be (de)serialized.
    Json(serde_json::Error),
}

impl Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration error: {e}"),
            Self::InfeasibleBound(e) => write!(f, "infeasible bound: {e}"),
            Self::NoFeasibleSolution { unrouted } => write!(
                f,
                "no feasible solution: {} node(s) could not be routed {:?}",
                unrouted.len(),
                unrouted
            ),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for RoutingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::InfeasibleBound(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::NoFeasibleSolution { .. } => None,
        }
    }
}

impl From<ConfigurationError> for RoutingError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<InfeasibleBoundError> for RoutingError {
    fn from(e: InfeasibleBoundError) -> Self {
        Self::InfeasibleBound(e)
    }
}

impl From<serde_json::Error> for RoutingError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
