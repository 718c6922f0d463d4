//! Routing model: index mapping, evaluators, dimensions, and the objective.

use log::debug;

use crate::config::{ArcCostSource, SolverConfig};
use crate::dimension::{CumulRange, DimensionEngine, DimensionId, DimensionViolation};
use crate::error::{ConfigurationError, InfeasibleBoundError, RoutingError};
use crate::evaluation::{ArcEvaluator, CostModel, Demands, EvaluatorHandle, NodeEvaluator};
use crate::index::{IndexManager, Position};
use crate::models::{Problem, Route, Solution};

/// Name of the route distance dimension.
pub const DISTANCE: &str = "Distance";
/// Name of the vehicle load dimension.
pub const CAPACITY: &str = "Capacity";
/// Name of the arrival time dimension.
pub const TIME: &str = "Time";

/// Everything the search needs to evaluate a route.
///
/// The model is immutable during search and shared by reference between
/// construction, local search, extraction, and parallel workers.
///
/// # Examples
///
/// ```
/// use u_cvrptw::distance::CostMatrix;
/// use u_cvrptw::evaluation::Demands;
/// use u_cvrptw::model::RoutingModel;
///
/// let mut model = RoutingModel::new(3, 1, 0);
/// let d = model.register_arc_evaluator(CostMatrix::from_rows("d", vec![
///     vec![0, 2, 3],
///     vec![2, 0, 4],
///     vec![3, 4, 0],
/// ]).unwrap());
/// let q = model.register_node_evaluator(Demands::new(vec![0, 3, 3]));
/// model.set_arc_cost_evaluator(d).unwrap();
/// model.add_dimension(q, 0, vec![5], true, "Capacity").unwrap();
///
/// assert!(model.evaluate_route(0, vec![1]).is_ok());
/// // 6 units on a vehicle of capacity 5
/// assert!(model.evaluate_route(0, vec![1, 2]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RoutingModel {
    index: IndexManager,
    costs: CostModel,
    dimensions: DimensionEngine,
    arc_cost: Option<EvaluatorHandle>,
    unrouted_penalty: i64,
}

impl RoutingModel {
    /// Creates an empty model for `num_nodes` nodes and `num_vehicles` vehicles.
    pub fn new(num_nodes: usize, num_vehicles: usize, depot: usize) -> Self {
        let index = IndexManager::new(num_vehicles, num_nodes, depot);
        let dimensions = DimensionEngine::new(&index);
        Self {
            index,
            costs: CostModel::new(),
            dimensions,
            arc_cost: None,
            unrouted_penalty: SolverConfig::default().unrouted_penalty,
        }
    }

    /// Builds the Distance, Capacity and (when time data exists) Time
    /// dimensions for a CVRPTW instance.
    pub fn from_problem(problem: &Problem, config: &SolverConfig) -> Result<Self, RoutingError> {
        let mut model = Self::new(problem.num_nodes(), problem.num_vehicles(), problem.depot());
        let num_vehicles = problem.num_vehicles();

        let distance = model.register_arc_evaluator(problem.distances().clone());
        let distance_caps = problem
            .vehicles()
            .iter()
            .map(|v| v.max_distance().unwrap_or(CumulRange::UNBOUNDED_MAX))
            .collect();
        let d = model.add_dimension(distance, 0, distance_caps, true, DISTANCE)?;
        model.set_span_cost_coefficient(d, config.distance_span_coefficient);

        let demand = model.register_node_evaluator(Demands::new(problem.demands()));
        model.add_dimension(demand, 0, problem.capacities(), true, CAPACITY)?;

        let mut arc = distance;
        if problem.has_time() {
            let time = model.register_arc_evaluator(problem.times().clone());
            let horizon = config.time_horizon.unwrap_or(CumulRange::UNBOUNDED_MAX);
            let t = model.add_dimension(
                time,
                config.max_wait_time,
                vec![horizon; num_vehicles],
                false,
                TIME,
            )?;
            for node in problem.nodes() {
                if let Some(tw) = node.time_window() {
                    let p = model.index.node_position(node.id());
                    model.set_cumul_range(t, p, tw.earliest(), tw.latest())?;
                }
            }
            if let Some(tw) = problem.depot_window().copied() {
                for v in 0..num_vehicles {
                    let start = model.index.start_of(v);
                    let end = model.index.end_of(v);
                    model.set_cumul_range(t, start, tw.earliest(), tw.latest())?;
                    model.set_cumul_range(t, end, tw.earliest(), tw.latest())?;
                }
            }
            if config.arc_cost != ArcCostSource::Distance {
                arc = time;
            }
        }
        model.set_arc_cost_evaluator(arc)?;
        model.set_unrouted_penalty(config.unrouted_penalty);

        debug!(
            "model: {} nodes, {} vehicles, {} dimensions",
            problem.num_nodes(),
            num_vehicles,
            model.dimensions.dimensions().len()
        );
        Ok(model)
    }

    /// Registers a pairwise evaluator.
    pub fn register_arc_evaluator<E: ArcEvaluator + 'static>(&mut self, evaluator: E) -> EvaluatorHandle {
        self.costs.register_arc(evaluator)
    }

    /// Registers a node-anchored evaluator.
    pub fn register_node_evaluator<E: NodeEvaluator + 'static>(&mut self, evaluator: E) -> EvaluatorHandle {
        self.costs.register_node(evaluator)
    }

    /// Sets the evaluator pricing every arc of the objective, for all vehicles.
    pub fn set_arc_cost_evaluator(&mut self, handle: EvaluatorHandle) -> Result<(), ConfigurationError> {
        self.costs.check(handle)?;
        self.arc_cost = Some(handle);
        Ok(())
    }

    /// Registers a dimension.
    pub fn add_dimension(
        &mut self,
        evaluator: EvaluatorHandle,
        slack_max: i64,
        capacities: Vec<i64>,
        start_at_zero: bool,
        name: &str,
    ) -> Result<DimensionId, ConfigurationError> {
        self.dimensions
            .register_dimension(&self.costs, evaluator, slack_max, capacities, start_at_zero, name)
    }

    /// Narrows a dimension's range at `position`.
    pub fn set_cumul_range(
        &mut self,
        dimension: DimensionId,
        position: Position,
        lo: i64,
        hi: i64,
    ) -> Result<(), InfeasibleBoundError> {
        self.dimensions
            .set_cumul_range(&self.index, dimension, position, lo, hi)
    }

    /// Sets a dimension's span cost coefficient.
    pub fn set_span_cost_coefficient(&mut self, dimension: DimensionId, coefficient: i64) {
        self.dimensions.set_span_cost_coefficient(dimension, coefficient);
    }

    /// Sets the objective penalty per unrouted node.
    pub fn set_unrouted_penalty(&mut self, penalty: i64) {
        self.unrouted_penalty = penalty;
    }

    /// Checks that the model is ready to solve.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.index.num_vehicles() == 0 {
            return Err(ConfigurationError::NoVehicles);
        }
        self.arc_cost
            .map(|_| ())
            .ok_or(ConfigurationError::MissingArcCostEvaluator)
    }

    /// Node/position mapping.
    pub fn index(&self) -> &IndexManager {
        &self.index
    }

    /// Evaluator registry.
    pub fn costs(&self) -> &CostModel {
        &self.costs
    }

    /// Dimension engine.
    pub fn dimensions(&self) -> &DimensionEngine {
        &self.dimensions
    }

    /// Handle of the dimension called `name`.
    pub fn dimension_id(&self, name: &str) -> Result<DimensionId, ConfigurationError> {
        self.dimensions
            .by_name(name)
            .ok_or_else(|| ConfigurationError::UnknownDimension(name.to_string()))
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.index.num_vehicles()
    }

    /// Number of nodes including the depot.
    pub fn num_nodes(&self) -> usize {
        self.index.num_nodes()
    }

    /// Depot node.
    pub fn depot(&self) -> usize {
        self.index.depot()
    }

    /// Penalty per unrouted node.
    pub fn unrouted_penalty(&self) -> i64 {
        self.unrouted_penalty
    }

    /// Objective cost of the arc `from → to`.
    ///
    /// # Panics
    ///
    /// Panics if no arc cost evaluator is set; call [`validate`](Self::validate) first.
    #[inline]
    pub fn arc_cost(&self, from: usize, to: usize) -> i64 {
        let handle = self.arc_cost.expect("arc cost evaluator set before solving");
        self.costs.transit(handle, from, to)
    }

    /// Arc cost of `depot → nodes → depot`; zero for an unused vehicle.
    pub fn route_arc_cost(&self, nodes: &[usize]) -> i64 {
        if nodes.is_empty() {
            return 0;
        }
        let depot = self.depot();
        let mut cost = self.arc_cost(depot, nodes[0]);
        for w in nodes.windows(2) {
            cost = cost.saturating_add(self.arc_cost(w[0], w[1]));
        }
        cost.saturating_add(self.arc_cost(nodes[nodes.len() - 1], depot))
    }

    /// Propagates every dimension along `nodes` for `vehicle` and prices it.
    pub fn evaluate_route(&self, vehicle: usize, nodes: Vec<usize>) -> Result<Route, DimensionViolation> {
        let schedule = self
            .dimensions
            .propagate(&self.index, &self.costs, vehicle, &nodes)?;
        let cost = self.route_arc_cost(&nodes);
        Ok(Route::new(vehicle, nodes, schedule, cost))
    }

    /// Returns `true` if `nodes` is feasible for `vehicle` in every dimension.
    pub fn is_feasible(&self, vehicle: usize, nodes: &[usize]) -> bool {
        self.dimensions
            .propagate(&self.index, &self.costs, vehicle, nodes)
            .is_ok()
    }

    /// A solution with every vehicle unused and every node unrouted.
    pub fn empty_solution(&self) -> Result<Solution, RoutingError> {
        let all: Vec<usize> = (0..self.num_nodes()).filter(|&n| n != self.depot()).collect();
        let mut routes = Vec::with_capacity(self.num_vehicles());
        for v in 0..self.num_vehicles() {
            match self.evaluate_route(v, Vec::new()) {
                Ok(route) => routes.push(route),
                Err(_) => return Err(RoutingError::NoFeasibleSolution { unrouted: all }),
            }
        }
        Ok(Solution::new(routes, all, self.unrouted_penalty)
            .with_span_costs(self.dimensions.span_coefficients()))
    }

    /// Builds a solution from per-vehicle node sequences.
    ///
    /// Nodes missing from every sequence are recorded as unrouted. Fails if a
    /// sequence violates a dimension.
    pub fn solution_from_routes(&self, sequences: Vec<Vec<usize>>) -> Result<Solution, DimensionViolation> {
        let mut seen = vec![false; self.num_nodes()];
        let mut routes = Vec::with_capacity(self.num_vehicles());
        for (v, nodes) in sequences.into_iter().enumerate() {
            for &n in &nodes {
                seen[n] = true;
            }
            routes.push(self.evaluate_route(v, nodes)?);
        }
        let unrouted = (0..self.num_nodes())
            .filter(|&n| n != self.depot() && !seen[n])
            .collect();
        Ok(Solution::new(routes, unrouted, self.unrouted_penalty)
            .with_span_costs(self.dimensions.span_coefficients()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostMatrix;

    fn problem() -> Problem {
        let d = CostMatrix::from_rows(
            "distance",
            vec![
                vec![0, 3, 4, 5],
                vec![3, 0, 5, 4],
                vec![4, 5, 0, 3],
                vec![5, 4, 3, 0],
            ],
        )
        .expect("square");
        Problem::new(d, vec![0, 2, 3, 4], vec![6, 6], 0).expect("valid")
    }

    #[test]
    fn test_from_problem_dimensions() {
        let model = RoutingModel::from_problem(&problem(), &SolverConfig::default()).expect("model");
        assert!(model.dimension_id(DISTANCE).is_ok());
        assert!(model.dimension_id(CAPACITY).is_ok());
        assert!(model.dimension_id(TIME).is_err());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_from_problem_with_time() {
        let p = problem()
            .with_time_windows(&[[0, 50], [5, 10], [0, 50], [0, 50]])
            .expect("windows");
        let config = SolverConfig::default().with_max_wait_time(0);
        let model = RoutingModel::from_problem(&p, &config).expect("model");
        let t = model.dimension_id(TIME).expect("time");
        // the vehicle may leave later to hit [5, 10] without waiting
        let route = model.evaluate_route(0, vec![1]).expect("feasible");
        assert_eq!(route.schedule().cumul(t, 1).min, 5);
        assert_eq!(route.schedule().start(t).min, 2);
    }

    #[test]
    fn test_span_cost_is_fleet_wide() {
        let config = SolverConfig::default().with_distance_span_coefficient(10);
        let model = RoutingModel::from_problem(&problem(), &config).expect("model");
        let route = model.evaluate_route(0, vec![1, 2]).expect("5 <= 6");
        // arcs 3 + 5 + 4 = 12
        assert_eq!(route.cost(), 12);

        let one = model.solution_from_routes(vec![vec![1, 2], vec![]]).expect("feasible");
        assert_eq!(one.routing_cost(), 12 + 12 * 10);
        // arcs 6 + 8, longest route 8
        let split = model.solution_from_routes(vec![vec![1], vec![2]]).expect("feasible");
        assert_eq!(split.span_cost(), 80);
        assert_eq!(split.routing_cost(), 14 + 80);
        assert!(split.cost_key() < one.cost_key());
    }

    #[test]
    fn test_distance_limit() {
        let p = problem().with_max_distance(10);
        let model = RoutingModel::from_problem(&p, &SolverConfig::default()).expect("model");
        assert!(model.is_feasible(0, &[1]));
        // 3 + 5 + 4 = 12 > 10
        assert!(!model.is_feasible(0, &[1, 2]));
    }

    #[test]
    fn test_empty_solution() {
        let model = RoutingModel::from_problem(&problem(), &SolverConfig::default()).expect("model");
        let sol = model.empty_solution().expect("empty routes are feasible");
        assert_eq!(sol.unrouted(), &[1, 2, 3]);
        assert_eq!(sol.objective(), 3 * model.unrouted_penalty());
    }

    #[test]
    fn test_solution_from_routes() {
        let model = RoutingModel::from_problem(&problem(), &SolverConfig::default()).expect("model");
        let sol = model
            .solution_from_routes(vec![vec![1, 2], vec![]])
            .expect("feasible");
        assert_eq!(sol.unrouted(), &[3]);
        assert!(model.solution_from_routes(vec![vec![1, 2, 3], vec![]]).is_err());
    }

    #[test]
    fn test_missing_arc_cost() {
        let model = RoutingModel::new(3, 1, 0);
        assert_eq!(model.validate(), Err(ConfigurationError::MissingArcCostEvaluator));
    }
}
