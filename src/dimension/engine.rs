//! Cumulative bound propagation along routes.
//!
//! For each dimension the engine keeps one static range per position and,
//! on request, propagates a route forward and backward to obtain the
//! tightest `[min, max]` interval at every route position. Route state is
//! recomputed from scratch on each mutation; there are no incremental diffs.

use std::fmt;

use log::trace;

use super::{CumulRange, Dimension, DimensionId};
use crate::error::{BoundFailure, ConfigurationError, InfeasibleBoundError};
use crate::evaluation::{CostModel, EvaluatorHandle};
use crate::index::{IndexManager, Position};

/// Propagated cumulative intervals of one route.
///
/// An arena of per-dimension arrays indexed by route position: position 0
/// is the vehicle start, the last position its end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteSchedule {
    cumuls: Vec<Vec<CumulRange>>,
}

impl RouteSchedule {
    /// Interval of `dimension` at route position `i`.
    pub fn cumul(&self, dimension: DimensionId, i: usize) -> CumulRange {
        self.cumuls[dimension.0][i]
    }

    /// All intervals of `dimension` along the route.
    pub fn cumuls(&self, dimension: DimensionId) -> &[CumulRange] {
        &self.cumuls[dimension.0]
    }

    /// Interval at the vehicle start.
    pub fn start(&self, dimension: DimensionId) -> CumulRange {
        self.cumuls[dimension.0][0]
    }

    /// Interval at the vehicle end.
    pub fn end(&self, dimension: DimensionId) -> CumulRange {
        let c = &self.cumuls[dimension.0];
        c[c.len() - 1]
    }

    /// Number of dimensions tracked.
    pub fn num_dimensions(&self) -> usize {
        self.cumuls.len()
    }
}

/// Fleet-wide span cost of a set of route schedules.
///
/// For each `(dimension, coefficient)` pair this charges
/// `(max end cumul − min start cumul) × coefficient` over all schedules,
/// on realized (earliest) values. Pass only the schedules of used vehicles;
/// no schedules cost nothing.
pub fn global_span_cost<'r, I>(coefficients: &[(DimensionId, i64)], schedules: I) -> i64
where
    I: IntoIterator<Item = &'r RouteSchedule>,
    I::IntoIter: Clone,
{
    let schedules = schedules.into_iter();
    let mut total = 0i64;
    for &(dimension, coefficient) in coefficients {
        let bounds = schedules.clone().fold(None, |acc: Option<(i64, i64)>, s| {
            let (start, end) = (s.start(dimension).min, s.end(dimension).min);
            Some(acc.map_or((start, end), |(lo, hi)| (lo.min(start), hi.max(end))))
        });
        if let Some((lo, hi)) = bounds {
            total = total.saturating_add(hi.saturating_sub(lo).saturating_mul(coefficient));
        }
    }
    total
}

/// First violated dimension and position found during propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionViolation {
    /// Violated dimension.
    pub dimension: DimensionId,
    /// Index along the route (0 = start).
    pub route_index: usize,
    /// Position variable at that index.
    pub position: Position,
}

impl fmt::Display for DimensionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dimension {} infeasible at route index {} (position {})",
            self.dimension.0, self.route_index, self.position
        )
    }
}

/// Registry of dimensions and their bound propagation.
///
/// # Examples
///
/// ```
/// use u_cvrptw::distance::CostMatrix;
/// use u_cvrptw::dimension::DimensionEngine;
/// use u_cvrptw::evaluation::CostModel;
/// use u_cvrptw::index::IndexManager;
///
/// let index = IndexManager::new(1, 2, 0);
/// let mut costs = CostModel::new();
/// let time = costs.register_arc(CostMatrix::from_rows("t", vec![vec![0, 3], vec![3, 0]]).unwrap());
///
/// let mut engine = DimensionEngine::new(&index);
/// let dim = engine.register_dimension(&costs, time, 10, vec![100], true, "Time").unwrap();
/// engine.set_cumul_range(&index, dim, index.node_position(1), 5, 10).unwrap();
///
/// let schedule = engine.propagate(&index, &costs, 0, &[1]).unwrap();
/// // arrive at 3, wait until 5
/// assert_eq!(schedule.cumul(dim, 1).min, 5);
/// ```
#[derive(Debug, Clone)]
pub struct DimensionEngine {
    num_vehicles: usize,
    num_positions: usize,
    dimensions: Vec<Dimension>,
}

impl DimensionEngine {
    /// Creates an engine sized for `index`.
    pub fn new(index: &IndexManager) -> Self {
        Self {
            num_vehicles: index.num_vehicles(),
            num_positions: index.num_positions(),
            dimensions: Vec::new(),
        }
    }

    /// Registers a dimension.
    ///
    /// Fails if `capacities` does not have one entry per vehicle, if the
    /// evaluator is unknown, or if the name is taken.
    pub fn register_dimension(
        &mut self,
        costs: &CostModel,
        evaluator: EvaluatorHandle,
        slack_max: i64,
        capacities: Vec<i64>,
        start_at_zero: bool,
        name: &str,
    ) -> Result<DimensionId, ConfigurationError> {
        if capacities.len() != self.num_vehicles {
            return Err(ConfigurationError::VehicleCountMismatch {
                expected: self.num_vehicles,
                actual: capacities.len(),
            });
        }
        costs.check(evaluator)?;
        if self.by_name(name).is_some() {
            return Err(ConfigurationError::DuplicateDimension(name.to_string()));
        }

        self.dimensions.push(Dimension::new(
            name.to_string(),
            evaluator,
            slack_max.max(0),
            capacities,
            start_at_zero,
            self.num_positions,
        ));
        Ok(DimensionId(self.dimensions.len() - 1))
    }

    /// Sets the span cost coefficient of `dimension`.
    pub fn set_span_cost_coefficient(&mut self, dimension: DimensionId, coefficient: i64) {
        self.dimensions[dimension.0].set_span_cost_coefficient(coefficient);
    }

    /// Narrows the feasible range of `dimension` at `position`.
    pub fn set_cumul_range(
        &mut self,
        index: &IndexManager,
        dimension: DimensionId,
        position: Position,
        lo: i64,
        hi: i64,
    ) -> Result<(), InfeasibleBoundError> {
        let dim = &mut self.dimensions[dimension.0];
        let error = |failure| InfeasibleBoundError {
            dimension: dim.name().to_string(),
            position,
            lo,
            hi,
            failure,
        };
        if lo > hi {
            return Err(error(BoundFailure::Inverted));
        }

        let narrowed = dim.range(position).intersect(CumulRange::new(lo, hi));
        let reachable = match index.vehicle_of(position) {
            Some(vehicle) => dim.bound(position, vehicle, index.is_start(position)),
            None => {
                let widest = (0..self.num_vehicles)
                    .map(|v| dim.capacity(v))
                    .max()
                    .unwrap_or(0);
                dim.range(position).intersect(CumulRange::new(0, widest))
            }
        };
        if narrowed.intersect(reachable).is_empty() {
            return Err(error(BoundFailure::Empty));
        }

        dim.set_range(position, narrowed);
        Ok(())
    }

    /// Propagates every dimension along the route `start → nodes → end`.
    ///
    /// Returns the propagated intervals, or the first violation found.
    pub fn propagate(
        &self,
        index: &IndexManager,
        costs: &CostModel,
        vehicle: usize,
        nodes: &[usize],
    ) -> Result<RouteSchedule, DimensionViolation> {
        let positions = index.route_positions(vehicle, nodes);
        let mut cumuls = Vec::with_capacity(self.dimensions.len());
        for (d, dim) in self.dimensions.iter().enumerate() {
            let id = DimensionId(d);
            let ranges = propagate_dimension(dim, index, costs, vehicle, &positions)
                .map_err(|route_index| {
                    let violation = DimensionViolation {
                        dimension: id,
                        route_index,
                        position: positions[route_index],
                    };
                    trace!("vehicle {vehicle}: '{}' {violation}", dim.name());
                    violation
                })?;
            cumuls.push(ranges);
        }
        Ok(RouteSchedule { cumuls })
    }

    /// `(max cumul − min cumul) × coefficient` over the realized (earliest)
    /// schedule of a route.
    pub fn span_cost(&self, schedule: &RouteSchedule, dimension: DimensionId) -> i64 {
        let coefficient = self.dimensions[dimension.0].span_cost_coefficient();
        if coefficient == 0 {
            return 0;
        }
        let values = schedule.cumuls(dimension).iter().map(|r| r.min);
        let (lo, hi) = values.fold((i64::MAX, i64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        hi.saturating_sub(lo).saturating_mul(coefficient)
    }

    /// Dimensions carrying a non-zero span cost coefficient.
    pub fn span_coefficients(&self) -> Vec<(DimensionId, i64)> {
        self.dimensions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.span_cost_coefficient() != 0)
            .map(|(i, d)| (DimensionId(i), d.span_cost_coefficient()))
            .collect()
    }

    /// Dimension by handle.
    pub fn dimension(&self, dimension: DimensionId) -> &Dimension {
        &self.dimensions[dimension.0]
    }

    /// Handle of the dimension called `name`.
    pub fn by_name(&self, name: &str) -> Option<DimensionId> {
        self.dimensions
            .iter()
            .position(|d| d.name() == name)
            .map(DimensionId)
    }

    /// All dimensions in registration order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Dimension handles in registration order.
    pub fn ids(&self) -> impl Iterator<Item = DimensionId> {
        (0..self.dimensions.len()).map(DimensionId)
    }
}

/// Forward/backward pass for one dimension; `Err` carries the route index
/// of the first empty interval.
fn propagate_dimension(
    dim: &Dimension,
    index: &IndexManager,
    costs: &CostModel,
    vehicle: usize,
    positions: &[Position],
) -> Result<Vec<CumulRange>, usize> {
    let m = positions.len();
    let slack = dim.slack_max();
    let transits: Vec<i64> = positions
        .windows(2)
        .map(|w| costs.transit(dim.evaluator(), index.node_of(w[0]), index.node_of(w[1])))
        .collect();

    let mut cur = Vec::with_capacity(m);
    let first = dim.bound(positions[0], vehicle, true);
    if first.is_empty() {
        return Err(0);
    }
    cur.push(first);

    for i in 1..m {
        let prev = cur[i - 1];
        let t = transits[i - 1];
        let reach = CumulRange::new(
            prev.min.saturating_add(t),
            prev.max.saturating_add(t).saturating_add(slack),
        );
        let r = dim.bound(positions[i], vehicle, false).intersect(reach);
        if r.is_empty() {
            return Err(i);
        }
        cur.push(r);
    }

    for i in (0..m - 1).rev() {
        let next = cur[i + 1];
        let t = transits[i];
        let back = CumulRange::new(
            next.min.saturating_sub(t).saturating_sub(slack),
            next.max.saturating_sub(t),
        );
        let r = cur[i].intersect(back);
        if r.is_empty() {
            return Err(i);
        }
        cur[i] = r;
    }

    Ok(cur)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostMatrix;
    use crate::evaluation::Demands;

    /// depot 0 and nodes 1, 2; travel 3 between any two distinct nodes.
    fn setup(num_vehicles: usize) -> (IndexManager, CostModel, EvaluatorHandle, EvaluatorHandle) {
        let index = IndexManager::new(num_vehicles, 3, 0);
        let mut costs = CostModel::new();
        let m = CostMatrix::from_rows("t", vec![vec![0, 3, 3], vec![3, 0, 3], vec![3, 3, 0]])
            .expect("square");
        let time = costs.register_arc(m);
        let demand = costs.register_node(Demands::new(vec![0, 4, 7]));
        (index, costs, time, demand)
    }

    #[test]
    fn test_register_capacity_mismatch() {
        let (index, costs, time, _) = setup(2);
        let mut engine = DimensionEngine::new(&index);
        let err = engine
            .register_dimension(&costs, time, 0, vec![10], true, "Time")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::VehicleCountMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_register_unknown_evaluator() {
        let (index, costs, _, _) = setup(1);
        let mut other = CostModel::new();
        other.register_arc(|_: usize, _: usize| 0);
        other.register_arc(|_: usize, _: usize| 0);
        let foreign = other.register_arc(|_: usize, _: usize| 0);
        let mut engine = DimensionEngine::new(&index);
        assert!(matches!(
            engine.register_dimension(&costs, foreign, 0, vec![10], true, "X"),
            Err(ConfigurationError::UnknownEvaluator(_))
        ));
    }

    #[test]
    fn test_register_duplicate_name() {
        let (index, costs, time, _) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        engine
            .register_dimension(&costs, time, 0, vec![10], true, "Time")
            .expect("first");
        assert_eq!(
            engine.register_dimension(&costs, time, 0, vec![10], true, "Time"),
            Err(ConfigurationError::DuplicateDimension("Time".into()))
        );
    }

    #[test]
    fn test_set_cumul_range_inverted() {
        let (index, costs, time, _) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, time, 0, vec![100], false, "Time")
            .expect("registered");
        let err = engine
            .set_cumul_range(&index, dim, 0, 10, 5)
            .unwrap_err();
        assert_eq!(err.failure, BoundFailure::Inverted);
    }

    #[test]
    fn test_set_cumul_range_empty() {
        let (index, costs, time, _) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, time, 0, vec![100], false, "Time")
            .expect("registered");
        engine.set_cumul_range(&index, dim, 0, 0, 10).expect("first");
        let err = engine.set_cumul_range(&index, dim, 0, 20, 30).unwrap_err();
        assert_eq!(err.failure, BoundFailure::Empty);
        // beyond every vehicle's capacity
        let err = engine.set_cumul_range(&index, dim, 1, 200, 300).unwrap_err();
        assert_eq!(err.failure, BoundFailure::Empty);
    }

    #[test]
    fn test_start_at_zero_rejects_late_start_range() {
        let (index, costs, time, _) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, time, 0, vec![100], true, "Distance")
            .expect("registered");
        let err = engine
            .set_cumul_range(&index, dim, index.start_of(0), 5, 10)
            .unwrap_err();
        assert_eq!(err.failure, BoundFailure::Empty);
    }

    #[test]
    fn test_capacity_dimension() {
        let (index, costs, _, demand) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, demand, 0, vec![10], true, "Capacity")
            .expect("registered");
        let s = engine.propagate(&index, &costs, 0, &[1]).expect("4 <= 10");
        assert_eq!(s.end(dim), CumulRange::point(4));
        let v = engine.propagate(&index, &costs, 0, &[1, 2]).unwrap_err();
        // load reaches 11 at the end
        assert_eq!(v.route_index, 3);
        assert_eq!(v.position, index.end_of(0));
    }

    #[test]
    fn test_unreachable_window_without_slack() {
        let (index, costs, time, _) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, time, 0, vec![100], true, "Time")
            .expect("registered");
        engine
            .set_cumul_range(&index, dim, index.node_position(1), 5, 10)
            .expect("range");
        let v = engine.propagate(&index, &costs, 0, &[1]).unwrap_err();
        assert_eq!(v.dimension, dim);
        assert_eq!(v.position, index.node_position(1));
    }

    #[test]
    fn test_slack_is_permitted_wait() {
        let (index, costs, time, _) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, time, 2, vec![100], true, "Time")
            .expect("registered");
        engine
            .set_cumul_range(&index, dim, index.node_position(1), 5, 10)
            .expect("range");
        // arrival 3, wait 2 → 5
        let s = engine.propagate(&index, &costs, 0, &[1]).expect("wait fits");
        assert_eq!(s.cumul(dim, 1).min, 5);
        assert_eq!(s.cumul(dim, 1).max, 5);

        // a window opening at 6 needs a wait of 3 > slack 2
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, time, 2, vec![100], true, "Time")
            .expect("registered");
        engine
            .set_cumul_range(&index, dim, index.node_position(1), 6, 10)
            .expect("range");
        assert!(engine.propagate(&index, &costs, 0, &[1]).is_err());
    }

    #[test]
    fn test_free_start_allows_late_departure() {
        let (index, costs, time, _) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, time, 0, vec![100], false, "Time")
            .expect("registered");
        engine
            .set_cumul_range(&index, dim, index.node_position(1), 20, 25)
            .expect("range");
        let s = engine.propagate(&index, &costs, 0, &[1]).expect("depart at 17");
        assert_eq!(s.start(dim), CumulRange::new(17, 22));
        assert_eq!(s.cumul(dim, 1), CumulRange::new(20, 25));
        assert_eq!(s.end(dim), CumulRange::new(23, 28));
    }

    #[test]
    fn test_capacity_bounds_time_horizon() {
        let (index, costs, time, _) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        engine
            .register_dimension(&costs, time, 0, vec![5], true, "Time")
            .expect("registered");
        // 0 → 1 → 0 takes 6 > horizon 5
        assert!(engine.propagate(&index, &costs, 0, &[1]).is_err());
    }

    #[test]
    fn test_empty_route_start_at_zero() {
        let (index, costs, time, demand) = setup(2);
        let mut engine = DimensionEngine::new(&index);
        let t = engine
            .register_dimension(&costs, time, 0, vec![100, 100], true, "Time")
            .expect("registered");
        let q = engine
            .register_dimension(&costs, demand, 0, vec![0, 0], true, "Capacity")
            .expect("registered");
        let s = engine.propagate(&index, &costs, 1, &[]).expect("trivial");
        assert_eq!(s.start(t), CumulRange::point(0));
        assert_eq!(s.end(t), CumulRange::point(0));
        assert_eq!(s.end(q), CumulRange::point(0));
    }

    #[test]
    fn test_span_cost() {
        let (index, costs, time, _) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, time, 0, vec![100], true, "Distance")
            .expect("registered");
        let s = engine.propagate(&index, &costs, 0, &[1, 2]).expect("feasible");
        assert_eq!(engine.span_cost(&s, dim), 0);
        engine.set_span_cost_coefficient(dim, 100);
        // span 0 → 9
        assert_eq!(engine.span_cost(&s, dim), 900);
        assert_eq!(engine.span_coefficients(), vec![(dim, 100)]);
    }

    #[test]
    fn test_global_span_cost() {
        let (index, costs, time, _) = setup(2);
        let mut engine = DimensionEngine::new(&index);
        let dim = engine
            .register_dimension(&costs, time, 0, vec![100, 100], true, "Distance")
            .expect("registered");
        engine.set_span_cost_coefficient(dim, 10);
        let coefficients = engine.span_coefficients();
        let long = engine.propagate(&index, &costs, 0, &[1, 2]).expect("feasible");
        let short = engine.propagate(&index, &costs, 1, &[1]).expect("feasible");

        assert_eq!(global_span_cost(&coefficients, [&long]), engine.span_cost(&long, dim));
        // only the longest route counts, not the sum
        assert_eq!(global_span_cost(&coefficients, [&long, &short]), long.end(dim).min * 10);
        assert_eq!(global_span_cost(&coefficients, std::iter::empty()), 0);
        assert_eq!(global_span_cost(&[], [&long]), 0);
    }

    #[test]
    fn test_by_name() {
        let (index, costs, time, demand) = setup(1);
        let mut engine = DimensionEngine::new(&index);
        let t = engine
            .register_dimension(&costs, time, 0, vec![100], false, "Time")
            .expect("registered");
        let q = engine
            .register_dimension(&costs, demand, 0, vec![100], true, "Capacity")
            .expect("registered");
        assert_eq!(engine.by_name("Time"), Some(t));
        assert_eq!(engine.by_name("Capacity"), Some(q));
        assert_eq!(engine.by_name("Distance"), None);
        assert_eq!(engine.dimension(q).name(), "Capacity");
    }
}
