//! End-to-end solve: construction, local search, extraction.
//!
//! Each phase hands its solution to the next by value. With more than one
//! worker the whole pipeline runs once per worker on the rayon pool; every
//! worker owns its solution and only the shared, immutable
//! [`RoutingModel`] is borrowed across threads.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use rayon::prelude::*;

use crate::config::SolverConfig;
use crate::constructive::{construct, AssignmentStatus};
use crate::error::RoutingError;
use crate::extract::{extract, SolutionView, SolveStats};
use crate::io::SolutionOutput;
use crate::local_search::{from_config, LocalSearch, SearchOutcome, SearchState};
use crate::model::RoutingModel;
use crate::models::{Problem, Solution};

/// Solver entry point.
///
/// # Examples
///
/// ```
/// use u_cvrptw::config::SolverConfig;
/// use u_cvrptw::distance::CostMatrix;
/// use u_cvrptw::models::Problem;
/// use u_cvrptw::solver::Solver;
///
/// let d = CostMatrix::from_rows("distance", vec![
///     vec![0, 2, 9, 10],
///     vec![1, 0, 6, 4],
///     vec![15, 7, 0, 8],
///     vec![6, 3, 12, 0],
/// ]).unwrap();
/// let problem = Problem::new(d, vec![0, 1, 1, 1], vec![3], 0).unwrap();
///
/// let solved = Solver::new(SolverConfig::default()).solve(&problem).unwrap();
/// assert!(solved.is_complete());
/// assert_eq!(solved.solution.route(0).len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
    stop: Option<Arc<AtomicBool>>,
}

/// Outcome of [`Solver::solve`].
#[derive(Debug, Clone)]
pub struct Solved {
    /// Best solution found.
    pub solution: Solution,
    /// Report of `solution`.
    pub view: SolutionView,
    /// Worker that produced `solution`.
    pub worker: usize,
}

impl Solved {
    /// Whether every node is routed.
    pub fn status(&self) -> &AssignmentStatus {
        &self.view.stats.status
    }

    /// How the winning local search ended.
    pub fn state(&self) -> SearchState {
        self.view.stats.state
    }

    /// Returns `true` if every node is routed.
    pub fn is_complete(&self) -> bool {
        self.solution.is_complete()
    }

    /// Turns a partial assignment into [`RoutingError::NoFeasibleSolution`].
    pub fn require_complete(self) -> Result<Self, RoutingError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(RoutingError::NoFeasibleSolution {
                unrouted: self.solution.unrouted().to_vec(),
            })
        }
    }

    /// Output document of the solution.
    pub fn output(&self) -> SolutionOutput {
        SolutionOutput::from_view(&self.view)
    }
}

struct WorkerResult {
    worker: usize,
    outcome: SearchOutcome,
}

impl Solver {
    /// Creates a solver.
    pub fn new(config: SolverConfig) -> Self {
        Self { config, stop: None }
    }

    /// Sets a flag that stops every worker's local search when raised.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Builds the CVRPTW model for `problem` and solves it.
    pub fn solve(&self, problem: &Problem) -> Result<Solved, RoutingError> {
        let started = Instant::now();
        self.config.validate()?;
        let model = RoutingModel::from_problem(problem, &self.config)?;
        self.solve_model_from(&model, started)
    }

    /// Solves an already built model.
    pub fn solve_model(&self, model: &RoutingModel) -> Result<Solved, RoutingError> {
        self.config.validate()?;
        self.solve_model_from(model, Instant::now())
    }

    fn solve_model_from(&self, model: &RoutingModel, started: Instant) -> Result<Solved, RoutingError> {
        model.validate()?;
        let workers = self.config.workers.max(1);
        info!(
            "solving {} nodes with {} vehicles on {} worker(s)",
            model.num_nodes(),
            model.num_vehicles(),
            workers
        );

        let results: Vec<WorkerResult> = if workers == 1 {
            vec![self.run_worker(model, 0)?]
        } else {
            (0..workers)
                .into_par_iter()
                .map(|w| self.run_worker(model, w))
                .collect::<Result<_, _>>()?
        };

        // fewest unrouted, then routing cost, then lowest worker index
        let best = results
            .into_iter()
            .min_by_key(|r| (r.outcome.best.cost_key(), r.worker))
            .ok_or(RoutingError::NoFeasibleSolution {
                unrouted: Vec::new(),
            })?;

        let solution = best.outcome.best;
        let stats = SolveStats {
            calculation_time: started.elapsed(),
            state: best.outcome.state,
            search: best.outcome.stats,
            status: AssignmentStatus::from_unrouted(solution.unrouted().to_vec()),
        };
        let view = extract(model, &solution, stats);
        info!(
            "solved: objective {}, {} vehicle(s) used, {} unrouted, worker {}, {:?}",
            view.objective,
            solution.num_used_vehicles(),
            solution.unrouted().len(),
            best.worker,
            view.stats.calculation_time
        );
        Ok(Solved {
            solution,
            view,
            worker: best.worker,
        })
    }

    fn run_worker(&self, model: &RoutingModel, worker: usize) -> Result<WorkerResult, RoutingError> {
        let strategy = if worker % 2 == 0 {
            self.config.first_solution_strategy
        } else {
            self.config.first_solution_strategy.alternate()
        };
        let seed = self.config.seed.wrapping_add(worker as u64);

        let construction = construct(model, strategy)?;
        let mut search = LocalSearch::new(model)
            .with_metaheuristic(from_config(&self.config, seed))
            .with_time_limit(self.config.time_limit())
            .with_max_sweeps(self.config.max_sweeps as u64);
        if let Some(stop) = &self.stop {
            search = search.with_stop_flag(Arc::clone(stop));
        }
        let outcome = search.run(construction.solution);
        Ok(WorkerResult { worker, outcome })
    }
}
