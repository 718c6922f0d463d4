//! First-improvement local search driver.
//!
//! # Algorithm
//!
//! A sweep visits the neighborhoods in a fixed order: insert unrouted,
//! relocate, exchange, 2-opt, cross-exchange. Each neighborhood enumerates
//! its moves against the solution as it stands when the neighborhood
//! starts; every move is then resolved against the current solution, built
//! out of place, repropagated, and handed to the [`Metaheuristic`]. An
//! accepted move replaces the affected routes in one step, so the current
//! solution is never observed half-modified.
//!
//! The search stops when a sweep accepts nothing ([`SearchState::Exhausted`]),
//! when the time or sweep budget runs out ([`SearchState::TimedOut`]), or when
//! the stop flag is raised ([`SearchState::Cancelled`]). Budgets and the stop
//! flag are checked between moves, never inside one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};

use super::metaheuristic::{GreedyDescent, Metaheuristic};
use super::moves::{Locator, Move};
use super::{cross_exchange, exchange, insert, relocate, two_opt};
use crate::model::RoutingModel;
use crate::models::{Route, Solution};

/// Budget checks happen every this many evaluated moves within a sweep.
const CHECK_INTERVAL: u64 = 64;

/// Lifecycle of a [`LocalSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchState {
    /// Not started.
    Idle,
    /// Sweeping neighborhoods.
    Improving,
    /// The time limit or sweep budget ran out.
    TimedOut,
    /// A full sweep accepted no move.
    Exhausted,
    /// The stop flag was raised.
    Cancelled,
}

impl SearchState {
    /// Returns `true` for the states a run ends in.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::TimedOut | Self::Exhausted | Self::Cancelled)
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Improving => "improving",
            Self::TimedOut => "timed out",
            Self::Exhausted => "exhausted",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Sweeps started.
    pub sweeps: u64,
    /// Moves that resolved against the current solution and were evaluated.
    pub evaluated: u64,
    /// Moves committed.
    pub accepted: u64,
    /// Moves rejected because a dimension became infeasible.
    pub infeasible: u64,
    /// Times the best objective improved.
    pub improvements: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl SearchStats {
    /// Feasible moves the metaheuristic turned down.
    pub fn rejected(&self) -> u64 {
        self.evaluated
            .saturating_sub(self.accepted)
            .saturating_sub(self.infeasible)
    }
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} sweeps, {} evaluated, {} accepted, {} infeasible, {} rejected, {:?}",
            self.sweeps,
            self.evaluated,
            self.accepted,
            self.infeasible,
            self.rejected(),
            self.elapsed
        )
    }
}

/// Result of [`LocalSearch::run`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best solution seen, by objective.
    pub best: Solution,
    /// Terminal state.
    pub state: SearchState,
    /// Run counters.
    pub stats: SearchStats,
}

/// Neighborhood move generators, in sweep order.
type Generator = fn(&RoutingModel, &Solution) -> Vec<Move>;

const NEIGHBORHOODS: [(&str, Generator); 5] = [
    ("insert", insert::moves),
    ("relocate", relocate::moves),
    ("exchange", exchange_moves),
    ("two_opt", two_opt_moves),
    ("cross_exchange", cross_exchange_moves),
];

fn exchange_moves(_: &RoutingModel, solution: &Solution) -> Vec<Move> {
    exchange::moves(solution)
}

fn two_opt_moves(_: &RoutingModel, solution: &Solution) -> Vec<Move> {
    two_opt::moves(solution)
}

fn cross_exchange_moves(_: &RoutingModel, solution: &Solution) -> Vec<Move> {
    cross_exchange::moves(solution)
}

/// Local search over a [`RoutingModel`].
///
/// # Examples
///
/// ```
/// use u_cvrptw::config::SolverConfig;
/// use u_cvrptw::distance::CostMatrix;
/// use u_cvrptw::local_search::{LocalSearch, SearchState};
/// use u_cvrptw::model::RoutingModel;
/// use u_cvrptw::models::Problem;
///
/// let rows = (0..5)
///     .map(|i: i64| (0..5).map(|j: i64| (i - j).abs()).collect())
///     .collect();
/// let d = CostMatrix::from_rows("distance", rows).unwrap();
/// let problem = Problem::new(d, vec![0, 1, 1, 1, 1], vec![10], 0).unwrap();
/// let model = RoutingModel::from_problem(&problem, &SolverConfig::default()).unwrap();
///
/// let start = model.solution_from_routes(vec![vec![2, 4, 1, 3]]).unwrap();
/// let mut search = LocalSearch::new(&model);
/// let outcome = search.run(start.clone());
///
/// assert_eq!(outcome.state, SearchState::Exhausted);
/// assert!(outcome.best.objective() < start.objective());
/// ```
pub struct LocalSearch<'a> {
    model: &'a RoutingModel,
    metaheuristic: Box<dyn Metaheuristic>,
    time_limit: Duration,
    max_sweeps: u64,
    stop: Option<Arc<AtomicBool>>,
    state: SearchState,
}

impl<'a> LocalSearch<'a> {
    /// Creates a greedy descent search without a time limit.
    pub fn new(model: &'a RoutingModel) -> Self {
        Self {
            model,
            metaheuristic: Box::new(GreedyDescent),
            time_limit: Duration::MAX,
            max_sweeps: u64::MAX,
            stop: None,
            state: SearchState::Idle,
        }
    }

    /// Sets the acceptance policy.
    pub fn with_metaheuristic(mut self, metaheuristic: Box<dyn Metaheuristic>) -> Self {
        self.metaheuristic = metaheuristic;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the sweep budget.
    pub fn with_max_sweeps(mut self, sweeps: u64) -> Self {
        self.max_sweeps = sweeps;
        self
    }

    /// Sets a flag that stops the search when raised.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        self.state
    }

    fn cancelled(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|s| s.load(Ordering::Relaxed))
    }

    /// Improves `initial` until a terminal state is reached.
    ///
    /// `initial` must be feasible in every dimension; its routes are only
    /// ever replaced by feasible ones.
    pub fn run(&mut self, initial: Solution) -> SearchOutcome {
        let started = Instant::now();
        let model = self.model;
        let mut stats = SearchStats::default();

        self.state = SearchState::Improving;
        self.metaheuristic.on_start();

        // nodes are only ever inserted, so `best` and `current` share their
        // unrouted count and the metaheuristic compares routing costs
        let mut current = initial;
        let mut current_cost = current.routing_cost();
        let mut best = current.clone();
        let mut best_key = current.cost_key();
        let mut locator = Locator::new(&current, model.num_nodes());

        info!(
            "local search ({}): start objective {}",
            self.metaheuristic.name(),
            current.objective()
        );

        let state = 'search: loop {
            if self.cancelled() {
                break SearchState::Cancelled;
            }
            if started.elapsed() >= self.time_limit || stats.sweeps >= self.max_sweeps {
                break SearchState::TimedOut;
            }
            stats.sweeps += 1;
            let mut accepted = 0u64;

            for (name, generate) in NEIGHBORHOODS {
                let mut committed = 0u64;
                for mv in generate(model, &current) {
                    if stats.evaluated % CHECK_INTERVAL == CHECK_INTERVAL - 1 {
                        if self.cancelled() {
                            break 'search SearchState::Cancelled;
                        }
                        if started.elapsed() >= self.time_limit {
                            break 'search SearchState::TimedOut;
                        }
                    }
                    let Some(candidate) = mv.apply(&current, &locator) else {
                        continue;
                    };
                    stats.evaluated += 1;

                    let mut routes: Vec<Route> = Vec::with_capacity(candidate.routes.len());
                    let mut feasible = true;
                    for (vehicle, nodes) in candidate.routes {
                        match model.evaluate_route(vehicle, nodes) {
                            Ok(route) => routes.push(route),
                            Err(_) => {
                                feasible = false;
                                break;
                            }
                        }
                    }
                    if !feasible {
                        stats.infeasible += 1;
                        continue;
                    }

                    // routing a node outranks any cost change
                    let candidate_cost = current.routing_cost_with(&routes);
                    if candidate.inserted.is_none()
                        && !self
                            .metaheuristic
                            .accept(mv.key(), current_cost, candidate_cost, best_key.1)
                    {
                        continue;
                    }

                    let reverse = mv.reverse_key(&locator);
                    for route in routes {
                        current.replace_route(route);
                    }
                    if let Some(node) = candidate.inserted {
                        current.remove_unrouted(node);
                    }
                    current_cost = current.routing_cost();
                    locator = Locator::new(&current, model.num_nodes());
                    self.metaheuristic.on_accept(reverse);
                    stats.accepted += 1;
                    committed += 1;

                    let key = current.cost_key();
                    if key < best_key {
                        best = current.clone();
                        best_key = key;
                        stats.improvements += 1;
                    }
                }
                if committed > 0 {
                    debug!("sweep {}: {} accepted {} move(s)", stats.sweeps, name, committed);
                }
                accepted += committed;
            }

            self.metaheuristic.on_sweep_end();
            debug!(
                "sweep {}: current {} best {} ({} accepted)",
                stats.sweeps,
                current.objective(),
                best.objective(),
                accepted
            );
            if accepted == 0 {
                break SearchState::Exhausted;
            }
        };

        stats.elapsed = started.elapsed();
        self.state = state;
        info!(
            "local search ({}): {}, best objective {} [{}]",
            self.metaheuristic.name(),
            state,
            best.objective(),
            stats
        );
        SearchOutcome { best, state, stats }
    }
}

impl std::fmt::Debug for LocalSearch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSearch")
            .field("metaheuristic", &self.metaheuristic.name())
            .field("time_limit", &self.time_limit)
            .field("max_sweeps", &self.max_sweeps)
            .field("state", &self.state)
            .finish()
    }
}
