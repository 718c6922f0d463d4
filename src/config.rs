//! Solver configuration.
//!
//! Every field has a default, so a partial JSON object deserializes into a
//! complete configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Heuristic producing the first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstSolutionStrategy {
    /// Global cheapest feasible insertion.
    #[default]
    CheapestInsertion,
    /// Extend each route with the cheapest feasible next node.
    PathCheapestArc,
}

impl FirstSolutionStrategy {
    /// The other strategy; parallel restarts alternate between them.
    pub fn alternate(self) -> Self {
        match self {
            Self::CheapestInsertion => Self::PathCheapestArc,
            Self::PathCheapestArc => Self::CheapestInsertion,
        }
    }
}

/// Acceptance rule of the local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaheuristicKind {
    /// Accept strictly improving moves only.
    #[default]
    GreedyDescent,
    /// Metropolis acceptance with a tabu list of reverse moves.
    SimulatedAnnealing,
}

/// Which matrix prices the objective's arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcCostSource {
    /// Time when a time matrix or windows are present, distance otherwise.
    #[default]
    Auto,
    /// Distance matrix.
    Distance,
    /// Time matrix.
    Time,
}

/// Search and model parameters.
///
/// # Examples
///
/// ```
/// use u_cvrptw::config::{MetaheuristicKind, SolverConfig};
///
/// let config = SolverConfig::default()
///     .with_time_limit_ms(200)
///     .with_metaheuristic(MetaheuristicKind::SimulatedAnnealing)
///     .with_seed(7);
/// assert_eq!(config.time_limit().as_millis(), 200);
///
/// let parsed: SolverConfig = serde_json::from_str(r#"{"max_wait_time": 10}"#).unwrap();
/// assert_eq!(parsed.max_wait_time, 10);
/// assert_eq!(parsed.distance_span_coefficient, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// First solution heuristic.
    pub first_solution_strategy: FirstSolutionStrategy,
    /// Local search acceptance rule.
    pub metaheuristic: MetaheuristicKind,
    /// Starting temperature for simulated annealing.
    pub initial_temperature: f64,
    /// Geometric cooling factor applied after each sweep, in `(0, 1)`.
    pub cooling_factor: f64,
    /// Number of recent reverse moves kept tabu.
    pub tabu_tenure: usize,
    /// Wall-clock budget of the local search in milliseconds.
    pub time_limit_ms: u64,
    /// Maximum number of neighborhood sweeps.
    pub max_sweeps: usize,
    /// Random seed.
    pub seed: u64,
    /// Independent parallel search instances.
    pub workers: usize,
    /// Slack of the Time dimension (permitted waiting per stop).
    pub max_wait_time: i64,
    /// Capacity of the Time dimension; unbounded if `None`.
    pub time_horizon: Option<i64>,
    /// Fleet-wide span cost coefficient of the Distance dimension.
    pub distance_span_coefficient: i64,
    /// Objective penalty per unrouted node. Reported only; search ranks
    /// solutions by unrouted count first.
    pub unrouted_penalty: i64,
    /// Arc cost used by the objective.
    pub arc_cost: ArcCostSource,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            first_solution_strategy: FirstSolutionStrategy::default(),
            metaheuristic: MetaheuristicKind::default(),
            initial_temperature: 100.0,
            cooling_factor: 0.95,
            tabu_tenure: 16,
            time_limit_ms: 1000,
            max_sweeps: 10_000,
            seed: 42,
            workers: 1,
            max_wait_time: 30,
            time_horizon: None,
            distance_span_coefficient: 100,
            unrouted_penalty: 1_000_000,
            arc_cost: ArcCostSource::default(),
        }
    }
}

impl SolverConfig {
    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.cooling_factor.is_nan() || self.cooling_factor <= 0.0 || self.cooling_factor >= 1.0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "cooling_factor",
                expected: "in (0, 1)",
            });
        }
        if self.initial_temperature.is_nan() || self.initial_temperature <= 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "initial_temperature",
                expected: "positive",
            });
        }
        if self.max_wait_time < 0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "max_wait_time",
                expected: "non-negative",
            });
        }
        if self.time_horizon.is_some_and(|h| h < 0) {
            return Err(ConfigurationError::InvalidParameter {
                name: "time_horizon",
                expected: "non-negative",
            });
        }
        if self.unrouted_penalty < 0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "unrouted_penalty",
                expected: "non-negative",
            });
        }
        Ok(())
    }

    /// Local search wall-clock budget.
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    /// Sets the first solution heuristic.
    pub fn with_first_solution_strategy(mut self, strategy: FirstSolutionStrategy) -> Self {
        self.first_solution_strategy = strategy;
        self
    }

    /// Sets the acceptance rule.
    pub fn with_metaheuristic(mut self, kind: MetaheuristicKind) -> Self {
        self.metaheuristic = kind;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the sweep budget.
    pub fn with_max_sweeps(mut self, sweeps: usize) -> Self {
        self.max_sweeps = sweeps;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of parallel workers (at least 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the permitted waiting time per stop.
    pub fn with_max_wait_time(mut self, wait: i64) -> Self {
        self.max_wait_time = wait;
        self
    }

    /// Sets the Time dimension capacity.
    pub fn with_time_horizon(mut self, horizon: i64) -> Self {
        self.time_horizon = Some(horizon);
        self
    }

    /// Sets the Distance span cost coefficient.
    pub fn with_distance_span_coefficient(mut self, coefficient: i64) -> Self {
        self.distance_span_coefficient = coefficient;
        self
    }

    /// Sets the per-node unrouted penalty.
    pub fn with_unrouted_penalty(mut self, penalty: i64) -> Self {
        self.unrouted_penalty = penalty;
        self
    }

    /// Sets the objective's arc cost.
    pub fn with_arc_cost(mut self, source: ArcCostSource) -> Self {
        self.arc_cost = source;
        self
    }
}
