//! Path cheapest arc construction.
//!
//! # Algorithm
//!
//! Vehicles are filled one after another. Each route grows from the depot by
//! appending the unrouted node reached by the cheapest arc from the current
//! route end, among nodes that keep every dimension feasible. A vehicle is
//! closed when no node can be appended.
//!
//! # Complexity
//!
//! O(n² log n) arc evaluations plus one propagation per tried candidate.

use log::{info, warn};

use super::{AssignmentStatus, Construction};
use crate::error::RoutingError;
use crate::model::RoutingModel;

/// Builds a first solution by extending routes with the cheapest feasible arc.
///
/// # Examples
///
/// ```
/// use u_cvrptw::config::SolverConfig;
/// use u_cvrptw::constructive::path_cheapest_arc;
/// use u_cvrptw::distance::CostMatrix;
/// use u_cvrptw::model::RoutingModel;
/// use u_cvrptw::models::Problem;
///
/// let d = CostMatrix::from_rows("distance", vec![
///     vec![0, 1, 2, 3],
///     vec![1, 0, 1, 2],
///     vec![2, 1, 0, 1],
///     vec![3, 2, 1, 0],
/// ]).unwrap();
/// let problem = Problem::new(d, vec![0, 1, 1, 1], vec![10], 0).unwrap();
/// let model = RoutingModel::from_problem(&problem, &SolverConfig::default()).unwrap();
///
/// let construction = path_cheapest_arc(&model).unwrap();
/// assert_eq!(construction.solution.route(0).nodes(), &[1, 2, 3]);
/// ```
pub fn path_cheapest_arc(model: &RoutingModel) -> Result<Construction, RoutingError> {
    model.validate()?;
    let mut solution = model.empty_solution()?;
    let mut unrouted: Vec<usize> = solution.unrouted().to_vec();
    let depot = model.depot();

    for v in 0..model.num_vehicles() {
        if unrouted.is_empty() {
            break;
        }
        let mut nodes: Vec<usize> = Vec::new();
        let mut current = None;

        loop {
            let last = nodes.last().copied().unwrap_or(depot);
            let mut candidates: Vec<(i64, usize)> = unrouted
                .iter()
                .map(|&n| (model.arc_cost(last, n), n))
                .collect();
            candidates.sort_unstable();

            let next = candidates.into_iter().find_map(|(_, n)| {
                let mut extended = nodes.clone();
                extended.push(n);
                model.evaluate_route(v, extended).ok().map(|r| (n, r))
            });

            match next {
                Some((n, route)) => {
                    nodes.push(n);
                    unrouted.retain(|&u| u != n);
                    solution.remove_unrouted(n);
                    current = Some(route);
                }
                None => break,
            }
        }

        if let Some(route) = current {
            solution.replace_route(route);
        }
    }

    let status = AssignmentStatus::from_unrouted(unrouted);
    match &status {
        AssignmentStatus::Complete => info!(
            "path cheapest arc: all nodes routed, objective {}",
            solution.objective()
        ),
        AssignmentStatus::Partial { unrouted } => warn!(
            "path cheapest arc: {} node(s) left unrouted {:?}",
            unrouted.len(),
            unrouted
        ),
    }
    Ok(Construction { solution, status })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::distance::CostMatrix;
    use crate::models::Problem;

    fn line(capacities: Vec<i64>, demands: Vec<i64>) -> RoutingModel {
        let rows = (0..4)
            .map(|i: i64| (0..4).map(|j: i64| (i - j).abs()).collect())
            .collect();
        let d = CostMatrix::from_rows("distance", rows).expect("square");
        let p = Problem::new(d, demands, capacities, 0).expect("valid");
        RoutingModel::from_problem(&p, &SolverConfig::default()).expect("model")
    }

    #[test]
    fn test_walks_nearest_first() {
        let model = line(vec![10], vec![0, 1, 1, 1]);
        let c = path_cheapest_arc(&model).expect("constructed");
        assert!(c.status.is_complete());
        assert_eq!(c.solution.route(0).nodes(), &[1, 2, 3]);
    }

    #[test]
    fn test_fills_vehicles_in_order() {
        let model = line(vec![2, 2], vec![0, 1, 1, 1]);
        let c = path_cheapest_arc(&model).expect("constructed");
        assert_eq!(c.solution.route(0).nodes(), &[1, 2]);
        assert_eq!(c.solution.route(1).nodes(), &[3]);
    }

    #[test]
    fn test_partial_when_fleet_too_small() {
        let model = line(vec![3], vec![0, 2, 2, 2]);
        let c = path_cheapest_arc(&model).expect("constructed");
        assert_eq!(
            c.status,
            AssignmentStatus::Partial {
                unrouted: vec![2, 3]
            }
        );
    }
}
