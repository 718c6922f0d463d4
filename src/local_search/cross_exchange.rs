//! Inter-route tail exchange (2-opt*).
//!
//! # Algorithm
//!
//! Given routes R1 = [a₁, ..., aᵢ, aᵢ₊₁, ..., aₙ] and
//! R2 = [b₁, ..., bⱼ, bⱼ₊₁, ..., bₘ], produce:
//!
//! R1' = [a₁, ..., aᵢ, bⱼ₊₁, ..., bₘ]
//! R2' = [b₁, ..., bⱼ, aᵢ₊₁, ..., aₙ]
//!
//! Cut points include "before the first node", so whole routes can move to
//! a different vehicle, which matters for heterogeneous fleets.
//!
//! # Complexity
//!
//! O(n² · V²) candidates per sweep.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use super::moves::{Candidate, Locator, Move};
use crate::models::Solution;

pub(crate) fn moves(solution: &Solution) -> Vec<Move> {
    let routes = solution.routes();
    let mut out = Vec::new();
    for (v1, r1) in routes.iter().enumerate() {
        for (v2, r2) in routes.iter().enumerate().skip(v1 + 1) {
            if r1.is_empty() && r2.is_empty() {
                continue;
            }
            let cuts1 = std::iter::once(None).chain(r1.nodes().iter().copied().map(Some));
            for after1 in cuts1 {
                let cuts2 = std::iter::once(None).chain(r2.nodes().iter().copied().map(Some));
                for after2 in cuts2 {
                    out.push(Move::CrossExchange {
                        v1,
                        v2,
                        after1,
                        after2,
                    });
                }
            }
        }
    }
    out
}

pub(crate) fn apply(
    solution: &Solution,
    locator: &Locator,
    v1: usize,
    v2: usize,
    after1: Option<usize>,
    after2: Option<usize>,
) -> Option<Candidate> {
    if v1 == v2 {
        return None;
    }
    let cut1 = locator.insertion_index(v1, after1)?;
    let cut2 = locator.insertion_index(v2, after2)?;
    let r1 = solution.route(v1).nodes();
    let r2 = solution.route(v2).nodes();
    // both tails empty: nothing moves
    if cut1 == r1.len() && cut2 == r2.len() {
        return None;
    }

    let mut n1 = Vec::with_capacity(cut1 + r2.len() - cut2);
    n1.extend_from_slice(&r1[..cut1]);
    n1.extend_from_slice(&r2[cut2..]);
    let mut n2 = Vec::with_capacity(cut2 + r1.len() - cut1);
    n2.extend_from_slice(&r2[..cut2]);
    n2.extend_from_slice(&r1[cut1..]);
    Some(Candidate::pair((v1, n1), (v2, n2)))
}
