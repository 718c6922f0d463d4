//! Global cheapest feasible insertion.
//!
//! # Algorithm
//!
//! Starting from all vehicles unused, repeatedly evaluate every
//! (vehicle, unrouted node, insertion position) triple and apply the one
//! with the lowest added arc cost
//!
//! ```text
//! delta = c(prev, u) + c(u, next) - c(prev, next)
//! ```
//!
//! among those that keep every dimension feasible. Ties go to the lowest
//! vehicle, then the lowest node, then the earliest position. Nodes that fit
//! nowhere are left unrouted.
//!
//! # Complexity
//!
//! O(n² · (n + V)) delta evaluations; dimension propagation only runs for
//! candidates that beat the current best.

use log::{info, warn};

use super::{AssignmentStatus, Construction};
use crate::error::RoutingError;
use crate::model::RoutingModel;
use crate::models::Route;

/// Builds a first solution by global cheapest feasible insertion.
///
/// # Examples
///
/// ```
/// use u_cvrptw::config::SolverConfig;
/// use u_cvrptw::constructive::cheapest_insertion;
/// use u_cvrptw::distance::CostMatrix;
/// use u_cvrptw::model::RoutingModel;
/// use u_cvrptw::models::Problem;
///
/// let d = CostMatrix::from_rows("distance", vec![
///     vec![0, 2, 4, 6],
///     vec![2, 0, 2, 4],
///     vec![4, 2, 0, 2],
///     vec![6, 4, 2, 0],
/// ]).unwrap();
/// let problem = Problem::new(d, vec![0, 1, 1, 1], vec![10], 0).unwrap();
/// let model = RoutingModel::from_problem(&problem, &SolverConfig::default()).unwrap();
///
/// let construction = cheapest_insertion(&model).unwrap();
/// assert!(construction.status.is_complete());
/// assert_eq!(construction.solution.route(0).len(), 3);
/// ```
pub fn cheapest_insertion(model: &RoutingModel) -> Result<Construction, RoutingError> {
    model.validate()?;
    let mut solution = model.empty_solution()?;
    let mut unrouted: Vec<usize> = solution.unrouted().to_vec();

    while !unrouted.is_empty() {
        let mut best: Option<(i64, usize, Route)> = None;

        for v in 0..model.num_vehicles() {
            let route = solution.route(v).nodes();
            for &node in &unrouted {
                for pos in 0..=route.len() {
                    let delta = insertion_delta(model, route, pos, node);
                    if best.as_ref().is_some_and(|b| delta >= b.0) {
                        continue;
                    }
                    let mut candidate = route.to_vec();
                    candidate.insert(pos, node);
                    if let Ok(r) = model.evaluate_route(v, candidate) {
                        best = Some((delta, node, r));
                    }
                }
            }
        }

        match best {
            Some((_, node, route)) => {
                unrouted.retain(|&n| n != node);
                solution.remove_unrouted(node);
                solution.replace_route(route);
            }
            None => break,
        }
    }

    let status = AssignmentStatus::from_unrouted(unrouted);
    match &status {
        AssignmentStatus::Complete => info!(
            "cheapest insertion: all nodes routed, objective {}",
            solution.objective()
        ),
        AssignmentStatus::Partial { unrouted } => warn!(
            "cheapest insertion: {} node(s) left unrouted {:?}",
            unrouted.len(),
            unrouted
        ),
    }
    Ok(Construction { solution, status })
}

/// Added arc cost of inserting `node` at `pos` in `route`.
pub(crate) fn insertion_delta(model: &RoutingModel, route: &[usize], pos: usize, node: usize) -> i64 {
    let depot = model.depot();
    if route.is_empty() {
        return model.arc_cost(depot, node).saturating_add(model.arc_cost(node, depot));
    }
    let prev = if pos == 0 { depot } else { route[pos - 1] };
    let next = if pos == route.len() { depot } else { route[pos] };
    model
        .arc_cost(prev, node)
        .saturating_add(model.arc_cost(node, next))
        .saturating_sub(model.arc_cost(prev, next))
}

/// Arc cost saved by removing the node at `pos` from `route`.
pub(crate) fn removal_delta(model: &RoutingModel, route: &[usize], pos: usize) -> i64 {
    let depot = model.depot();
    let node = route[pos];
    if route.len() == 1 {
        let round_trip = model.arc_cost(depot, node).saturating_add(model.arc_cost(node, depot));
        return 0i64.saturating_sub(round_trip);
    }
    let prev = if pos == 0 { depot } else { route[pos - 1] };
    let next = if pos == route.len() - 1 { depot } else { route[pos + 1] };
    model
        .arc_cost(prev, next)
        .saturating_sub(model.arc_cost(prev, node))
        .saturating_sub(model.arc_cost(node, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::distance::CostMatrix;
    use crate::models::Problem;

    fn line(capacities: Vec<i64>, demands: Vec<i64>) -> RoutingModel {
        // nodes on a line at 0, 1, 2, 3
        let rows = (0..4)
            .map(|i: i64| (0..4).map(|j: i64| (i - j).abs()).collect())
            .collect();
        let d = CostMatrix::from_rows("distance", rows).expect("square");
        let p = Problem::new(d, demands, capacities, 0).expect("valid");
        let config = SolverConfig::default().with_distance_span_coefficient(0);
        RoutingModel::from_problem(&p, &config).expect("model")
    }

    #[test]
    fn test_single_vehicle_visits_all() {
        let model = line(vec![10], vec![0, 1, 1, 1]);
        let c = cheapest_insertion(&model).expect("constructed");
        assert!(c.status.is_complete());
        // ties keep the earliest position, so the line is walked backwards
        assert_eq!(c.solution.route(0).nodes(), &[3, 2, 1]);
        assert_eq!(c.solution.objective(), 6);
    }

    #[test]
    fn test_capacity_forces_second_vehicle() {
        let model = line(vec![2, 2], vec![0, 1, 1, 1]);
        let c = cheapest_insertion(&model).expect("constructed");
        assert!(c.status.is_complete());
        assert_eq!(c.solution.num_used_vehicles(), 2);
        for r in c.solution.routes() {
            assert!(r.len() <= 2);
        }
    }

    #[test]
    fn test_over_capacity_is_partial() {
        // total demand 9 > fleet capacity 6
        let model = line(vec![3, 3], vec![0, 3, 3, 3]);
        let c = cheapest_insertion(&model).expect("constructed");
        match c.status {
            AssignmentStatus::Partial { ref unrouted } => assert_eq!(unrouted.len(), 1),
            AssignmentStatus::Complete => panic!("expected a partial assignment"),
        }
        assert_eq!(c.solution.num_served(), 2);
        assert_eq!(c.solution.unrouted().len(), 1);
    }

    #[test]
    fn test_tie_breaks_on_lowest_vehicle() {
        let model = line(vec![10, 10], vec![0, 1, 1, 1]);
        let c = cheapest_insertion(&model).expect("constructed");
        assert_eq!(c.solution.route(0).len(), 3);
        assert!(c.solution.route(1).is_empty());
    }

    #[test]
    fn test_deltas() {
        let model = line(vec![10], vec![0, 1, 1, 1]);
        assert_eq!(insertion_delta(&model, &[], 0, 2), 4);
        // 0 → 1 → 3 → 0, insert 2 between 1 and 3: 1 + 1 - 2
        assert_eq!(insertion_delta(&model, &[1, 3], 1, 2), 0);
        assert_eq!(removal_delta(&model, &[1, 2, 3], 1), 0);
        assert_eq!(removal_delta(&model, &[2], 0), -4);
    }

    #[test]
    fn test_deltas_saturate() {
        let big = i64::MAX / 2 + 1;
        let mut model = RoutingModel::new(3, 1, 0);
        let rows = vec![vec![0, big, 1], vec![big, 0, big], vec![1, big, 0]];
        let d = model.register_arc_evaluator(CostMatrix::from_rows("distance", rows).expect("square"));
        model.set_arc_cost_evaluator(d).expect("registered");
        assert_eq!(insertion_delta(&model, &[], 0, 1), i64::MAX);
        assert_eq!(insertion_delta(&model, &[2], 1, 1), i64::MAX - 1);
        assert_eq!(removal_delta(&model, &[1], 0), -i64::MAX);
        assert_eq!(removal_delta(&model, &[2, 1], 1), -i64::MAX);
    }
}
