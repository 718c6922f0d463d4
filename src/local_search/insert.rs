//! Insertion of unrouted nodes.
//!
//! Nodes left out by construction get another chance every sweep: each
//! unrouted node is tried at every position of every route, cheapest added
//! arc cost first. Any feasible insertion lowers the objective by the
//! unrouted penalty minus the added route cost.

use super::moves::{Candidate, Locator, Move};
use crate::constructive::insertion_delta;
use crate::model::RoutingModel;
use crate::models::Solution;

/// Enumerates insert moves, ordered by estimated arc cost.
pub(crate) fn moves(model: &RoutingModel, solution: &Solution) -> Vec<Move> {
    let mut scored = Vec::new();
    for &node in solution.unrouted() {
        for route in solution.routes() {
            let nodes = route.nodes();
            for pos in 0..=nodes.len() {
                let after = pos.checked_sub(1).map(|i| nodes[i]);
                let delta = insertion_delta(model, nodes, pos, node);
                scored.push((
                    delta,
                    Move::Insert {
                        node,
                        vehicle: route.vehicle(),
                        after,
                    },
                ));
            }
        }
    }
    // stable: ties keep enumeration order
    scored.sort_by_key(|(delta, _)| *delta);
    scored.into_iter().map(|(_, mv)| mv).collect()
}

pub(crate) fn apply(
    solution: &Solution,
    locator: &Locator,
    node: usize,
    vehicle: usize,
    after: Option<usize>,
) -> Option<Candidate> {
    if locator.locate(node).is_some() {
        return None;
    }
    let pos = locator.insertion_index(vehicle, after)?;
    let mut nodes = solution.route(vehicle).nodes().to_vec();
    nodes.insert(pos, node);
    Some(Candidate {
        routes: vec![(vehicle, nodes)],
        inserted: Some(node),
    })
}
