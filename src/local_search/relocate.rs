//! Node relocation within and between routes.
//!
//! # Algorithm
//!
//! Each routed node is removed from its route and reinserted after every
//! other node of every route, or right after the depot. Candidates are
//! tried in order of estimated arc cost
//!
//! ```text
//! delta = removal(prev, u, next) + insertion(prev', u, next')
//! ```
//!
//! but acceptance is always decided on the exact objective after
//! propagation.
//!
//! # Complexity
//!
//! O(n · (n + V)) candidates per sweep.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::moves::{Candidate, Locator, Move};
use crate::constructive::{insertion_delta, removal_delta};
use crate::model::RoutingModel;
use crate::models::Solution;

pub(crate) fn moves(model: &RoutingModel, solution: &Solution) -> Vec<Move> {
    let mut scored = Vec::new();
    for from in solution.routes() {
        let from_nodes = from.nodes();
        for (i, &node) in from_nodes.iter().enumerate() {
            let removal = removal_delta(model, from_nodes, i);
            for to in solution.routes() {
                let to_nodes = to.nodes();
                for pos in 0..=to_nodes.len() {
                    let after = pos.checked_sub(1).map(|k| to_nodes[k]);
                    if after == Some(node) {
                        continue;
                    }
                    let same = from.vehicle() == to.vehicle();
                    // reinserting where it already is
                    if same && pos == i {
                        continue;
                    }
                    let estimate = if same {
                        0
                    } else {
                        removal.saturating_add(insertion_delta(model, to_nodes, pos, node))
                    };
                    scored.push((
                        estimate,
                        Move::Relocate {
                            node,
                            vehicle: to.vehicle(),
                            after,
                        },
                    ));
                }
            }
        }
    }
    scored.sort_by_key(|(estimate, _)| *estimate);
    scored.into_iter().map(|(_, mv)| mv).collect()
}

pub(crate) fn apply(
    solution: &Solution,
    locator: &Locator,
    node: usize,
    vehicle: usize,
    after: Option<usize>,
) -> Option<Candidate> {
    if after == Some(node) {
        return None;
    }
    let (from, i) = locator.locate(node)?;
    let to_pos = locator.insertion_index(vehicle, after)?;

    if from == vehicle {
        let original = solution.route(from).nodes();
        let mut nodes = original.to_vec();
        nodes.remove(i);
        let pos = if to_pos > i { to_pos - 1 } else { to_pos };
        nodes.insert(pos, node);
        if nodes == original {
            return None;
        }
        return Some(Candidate::single(from, nodes));
    }

    let mut from_nodes = solution.route(from).nodes().to_vec();
    from_nodes.remove(i);
    let mut to_nodes = solution.route(vehicle).nodes().to_vec();
    to_nodes.insert(to_pos, node);
    Some(Candidate::pair((from, from_nodes), (vehicle, to_nodes)))
}
