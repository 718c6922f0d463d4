//! Node exchange: two routed nodes trade places.
//!
//! Works within a route and across routes. Every unordered pair of routed
//! nodes is one candidate.

use super::moves::{Candidate, Locator, Move};
use crate::models::Solution;

pub(crate) fn moves(solution: &Solution) -> Vec<Move> {
    let mut routed: Vec<usize> = solution
        .routes()
        .iter()
        .flat_map(|r| r.nodes().iter().copied())
        .collect();
    routed.sort_unstable();

    let mut out = Vec::with_capacity(routed.len() * routed.len().saturating_sub(1) / 2);
    for (k, &a) in routed.iter().enumerate() {
        for &b in &routed[k + 1..] {
            out.push(Move::Exchange { a, b });
        }
    }
    out
}

pub(crate) fn apply(solution: &Solution, locator: &Locator, a: usize, b: usize) -> Option<Candidate> {
    if a == b {
        return None;
    }
    let (va, i) = locator.locate(a)?;
    let (vb, j) = locator.locate(b)?;

    if va == vb {
        let mut nodes = solution.route(va).nodes().to_vec();
        nodes.swap(i, j);
        return Some(Candidate::single(va, nodes));
    }

    let mut ra = solution.route(va).nodes().to_vec();
    let mut rb = solution.route(vb).nodes().to_vec();
    ra[i] = b;
    rb[j] = a;
    Some(Candidate::pair((va, ra), (vb, rb)))
}
