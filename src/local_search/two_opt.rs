//! Intra-route 2-opt.
//!
//! # Algorithm
//!
//! For each pair of edges (i, i+1) and (j, j+1) in a route, reverse the
//! segment between them:
//!
//! ```text
//! [.., r[i], r[i+1], .., r[j], r[j+1], ..] → [.., r[i], r[j], .., r[i+1], r[j+1], ..]
//! ```
//!
//! With time windows a reversal changes every arrival time inside the
//! segment, so each candidate is re-propagated before acceptance.
//!
//! # Complexity
//!
//! O(n²) candidates per route per sweep.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::moves::{Candidate, Locator, Move};
use crate::models::Solution;

pub(crate) fn moves(solution: &Solution) -> Vec<Move> {
    let mut out = Vec::new();
    for route in solution.routes() {
        let nodes = route.nodes();
        for i in 0..nodes.len() {
            for j in i + 1..nodes.len() {
                out.push(Move::TwoOpt {
                    vehicle: route.vehicle(),
                    first: nodes[i],
                    last: nodes[j],
                });
            }
        }
    }
    out
}

pub(crate) fn apply(
    solution: &Solution,
    locator: &Locator,
    vehicle: usize,
    first: usize,
    last: usize,
) -> Option<Candidate> {
    let (v1, i) = locator.locate(first)?;
    let (v2, j) = locator.locate(last)?;
    if v1 != vehicle || v2 != vehicle || i >= j {
        return None;
    }
    let mut nodes = solution.route(vehicle).nodes().to_vec();
    nodes[i..=j].reverse();
    Some(Candidate::single(vehicle, nodes))
}
