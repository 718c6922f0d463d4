//! Route type.

use crate::dimension::RouteSchedule;

/// An ordered sequence of node visits for one vehicle.
///
/// The depot at both ends is implicit and not stored in `nodes`. A route is
/// only ever built by [`RoutingModel::evaluate_route`](crate::model::RoutingModel::evaluate_route),
/// so its schedule and cost always match its node sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    vehicle: usize,
    nodes: Vec<usize>,
    schedule: RouteSchedule,
    cost: i64,
}

impl Route {
    pub(crate) fn new(vehicle: usize, nodes: Vec<usize>, schedule: RouteSchedule, cost: i64) -> Self {
        Self {
            vehicle,
            nodes,
            schedule,
            cost,
        }
    }

    /// Vehicle serving this route.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Visited nodes in order, depot excluded.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Propagated cumulative intervals (start, nodes..., end).
    pub fn schedule(&self) -> &RouteSchedule {
        &self.schedule
    }

    /// Arc cost of this route. Span costs are charged fleet-wide by
    /// [`Solution`](super::Solution).
    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// Number of visits, depot excluded.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the vehicle is unused.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
