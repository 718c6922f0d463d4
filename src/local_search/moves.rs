//! Move representation shared by all neighborhoods.
//!
//! Moves name the nodes they touch rather than their positions, so a move
//! generated at the start of a sweep can still be resolved against the
//! solution after earlier moves of the same sweep were applied. A move
//! that no longer makes sense resolves to `None` and is skipped.

use super::{cross_exchange, exchange, insert, relocate, two_opt};
use crate::models::Solution;

/// Where each routed node currently sits: `(vehicle, index in route)`.
#[derive(Debug, Clone)]
pub(crate) struct Locator {
    slots: Vec<Option<(usize, usize)>>,
}

impl Locator {
    pub(crate) fn new(solution: &Solution, num_nodes: usize) -> Self {
        let mut slots = vec![None; num_nodes];
        for route in solution.routes() {
            for (i, &n) in route.nodes().iter().enumerate() {
                slots[n] = Some((route.vehicle(), i));
            }
        }
        Self { slots }
    }

    /// Vehicle and index of `node`, `None` if unrouted.
    #[inline]
    pub(crate) fn locate(&self, node: usize) -> Option<(usize, usize)> {
        self.slots[node]
    }

    /// Index right after `after` in `vehicle`'s route; 0 for `None`.
    ///
    /// `None` if `after` is not on that route.
    #[inline]
    pub(crate) fn insertion_index(&self, vehicle: usize, after: Option<usize>) -> Option<usize> {
        match after {
            None => Some(0),
            Some(p) => match self.slots[p] {
                Some((v, i)) if v == vehicle => Some(i + 1),
                _ => None,
            },
        }
    }
}

/// New node sequences for the routes a move touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    /// `(vehicle, nodes)` for each affected route.
    pub routes: Vec<(usize, Vec<usize>)>,
    /// Node taken out of the unrouted set, if any.
    pub inserted: Option<usize>,
}

impl Candidate {
    pub(crate) fn single(vehicle: usize, nodes: Vec<usize>) -> Self {
        Self {
            routes: vec![(vehicle, nodes)],
            inserted: None,
        }
    }

    pub(crate) fn pair(a: (usize, Vec<usize>), b: (usize, Vec<usize>)) -> Self {
        Self {
            routes: vec![a, b],
            inserted: None,
        }
    }
}

/// Attribute of a move, used by the tabu list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    /// `node` placed on `vehicle`'s route.
    NodeToVehicle(usize, usize),
    /// Two nodes swapped (smaller id first).
    Swap(usize, usize),
    /// Segment `first..=last` of `vehicle`'s route reversed.
    Reverse(usize, usize, usize),
    /// Tails of two routes swapped after the given predecessors.
    Cross(usize, usize, Option<usize>, Option<usize>),
}

/// A neighborhood move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Route an unrouted node on `vehicle` right after `after` (`None` = start).
    Insert {
        /// Unrouted node.
        node: usize,
        /// Target vehicle.
        vehicle: usize,
        /// Predecessor on the target route.
        after: Option<usize>,
    },
    /// Move a routed node right after `after` on `vehicle`'s route.
    Relocate {
        /// Moved node.
        node: usize,
        /// Target vehicle (may be its current one).
        vehicle: usize,
        /// Predecessor on the target route.
        after: Option<usize>,
    },
    /// Swap the places of two routed nodes.
    Exchange {
        /// First node.
        a: usize,
        /// Second node.
        b: usize,
    },
    /// Reverse the segment from `first` to `last` inside one route.
    TwoOpt {
        /// Route owner.
        vehicle: usize,
        /// First node of the segment.
        first: usize,
        /// Last node of the segment.
        last: usize,
    },
    /// Swap the tails of two routes following `after1` and `after2`.
    CrossExchange {
        /// First vehicle.
        v1: usize,
        /// Second vehicle.
        v2: usize,
        /// Last kept node of the first route (`None` = keep nothing).
        after1: Option<usize>,
        /// Last kept node of the second route.
        after2: Option<usize>,
    },
}

impl Move {
    /// Builds the new sequences of the affected routes, or `None` if the
    /// move no longer applies to `solution`.
    pub(crate) fn apply(&self, solution: &Solution, locator: &Locator) -> Option<Candidate> {
        match *self {
            Self::Insert {
                node,
                vehicle,
                after,
            } => insert::apply(solution, locator, node, vehicle, after),
            Self::Relocate {
                node,
                vehicle,
                after,
            } => relocate::apply(solution, locator, node, vehicle, after),
            Self::Exchange { a, b } => exchange::apply(solution, locator, a, b),
            Self::TwoOpt {
                vehicle,
                first,
                last,
            } => two_opt::apply(solution, locator, vehicle, first, last),
            Self::CrossExchange {
                v1,
                v2,
                after1,
                after2,
            } => cross_exchange::apply(solution, locator, v1, v2, after1, after2),
        }
    }

    /// Attribute checked against the tabu list; inserts are never tabu.
    pub fn key(&self) -> Option<MoveKey> {
        match *self {
            Self::Insert { .. } => None,
            Self::Relocate { node, vehicle, .. } => Some(MoveKey::NodeToVehicle(node, vehicle)),
            Self::Exchange { a, b } => Some(MoveKey::Swap(a.min(b), a.max(b))),
            Self::TwoOpt {
                vehicle,
                first,
                last,
            } => Some(MoveKey::Reverse(vehicle, first, last)),
            Self::CrossExchange {
                v1,
                v2,
                after1,
                after2,
            } => Some(MoveKey::Cross(v1, v2, after1, after2)),
        }
    }

    /// Attribute of the move that would undo this one, evaluated before
    /// the move is applied.
    pub(crate) fn reverse_key(&self, locator: &Locator) -> Option<MoveKey> {
        match *self {
            Self::Insert { .. } => None,
            Self::Relocate { node, .. } => locator
                .locate(node)
                .map(|(from, _)| MoveKey::NodeToVehicle(node, from)),
            Self::TwoOpt {
                vehicle,
                first,
                last,
            } => Some(MoveKey::Reverse(vehicle, last, first)),
            // swapping again, or swapping the same tails again, undoes these
            Self::Exchange { .. } | Self::CrossExchange { .. } => self.key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::RouteSchedule;
    use crate::models::Route;

    fn solution(routes: Vec<Vec<usize>>, unrouted: Vec<usize>) -> Solution {
        let routes = routes
            .into_iter()
            .enumerate()
            .map(|(v, nodes)| Route::new(v, nodes, RouteSchedule::default(), 0))
            .collect();
        Solution::new(routes, unrouted, 0)
    }

    #[test]
    fn test_locator() {
        let s = solution(vec![vec![3, 1], vec![2]], vec![4]);
        let loc = Locator::new(&s, 5);
        assert_eq!(loc.locate(1), Some((0, 1)));
        assert_eq!(loc.locate(2), Some((1, 0)));
        assert_eq!(loc.locate(4), None);
        assert_eq!(loc.insertion_index(0, None), Some(0));
        assert_eq!(loc.insertion_index(0, Some(3)), Some(1));
        assert_eq!(loc.insertion_index(1, Some(3)), None);
    }

    #[test]
    fn test_reverse_keys() {
        let s = solution(vec![vec![3, 1], vec![2]], vec![]);
        let loc = Locator::new(&s, 4);
        let mv = Move::Relocate {
            node: 1,
            vehicle: 1,
            after: None,
        };
        assert_eq!(mv.key(), Some(MoveKey::NodeToVehicle(1, 1)));
        assert_eq!(mv.reverse_key(&loc), Some(MoveKey::NodeToVehicle(1, 0)));

        let mv = Move::TwoOpt {
            vehicle: 0,
            first: 3,
            last: 1,
        };
        assert_eq!(mv.reverse_key(&loc), Some(MoveKey::Reverse(0, 1, 3)));

        let mv = Move::Exchange { a: 2, b: 1 };
        assert_eq!(mv.key(), Some(MoveKey::Swap(1, 2)));
        assert_eq!(mv.reverse_key(&loc), mv.key());
    }
}
