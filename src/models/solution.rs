//! Solution type.

use super::Route;
use crate::dimension::{global_span_cost, DimensionId};

/// A complete assignment: one route per vehicle plus any unrouted nodes.
///
/// Solutions are plain owned values handed from construction to local
/// search to extraction; each parallel worker owns its own copy.
///
/// Solutions are ranked by [`cost_key`](Self::cost_key): fewer unrouted
/// nodes first, then lower routing cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    routes: Vec<Route>,
    unrouted: Vec<usize>,
    unrouted_penalty: i64,
    span_coefficients: Vec<(DimensionId, i64)>,
}

impl Solution {
    /// Creates a solution. `routes[v]` must belong to vehicle `v`.
    pub fn new(routes: Vec<Route>, mut unrouted: Vec<usize>, unrouted_penalty: i64) -> Self {
        debug_assert!(routes.iter().enumerate().all(|(v, r)| r.vehicle() == v));
        unrouted.sort_unstable();
        Self {
            routes,
            unrouted,
            unrouted_penalty,
            span_coefficients: Vec::new(),
        }
    }

    /// Charges a fleet-wide span cost on each `(dimension, coefficient)`.
    pub fn with_span_costs(mut self, coefficients: Vec<(DimensionId, i64)>) -> Self {
        self.span_coefficients = coefficients;
        self
    }

    /// Routes indexed by vehicle.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Route of `vehicle`.
    pub fn route(&self, vehicle: usize) -> &Route {
        &self.routes[vehicle]
    }

    /// Nodes not served by any route, ascending.
    pub fn unrouted(&self) -> &[usize] {
        &self.unrouted
    }

    /// Returns `true` if every node is routed.
    pub fn is_complete(&self) -> bool {
        self.unrouted.is_empty()
    }

    /// Number of nodes served.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    /// Number of vehicles with at least one visit.
    pub fn num_used_vehicles(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Arc costs of every route plus the fleet-wide span costs.
    pub fn routing_cost(&self) -> i64 {
        self.routing_cost_with(&[])
    }

    /// [`routing_cost`](Self::routing_cost) with each route in `replaced`
    /// standing in for the current route of its vehicle.
    pub fn routing_cost_with(&self, replaced: &[Route]) -> i64 {
        let routes = self.routes.iter().map(|r| {
            replaced
                .iter()
                .find(|n| n.vehicle() == r.vehicle())
                .unwrap_or(r)
        });
        let arcs = routes.clone().map(Route::cost).fold(0i64, i64::saturating_add);
        let span = global_span_cost(
            &self.span_coefficients,
            routes.filter(|r| !r.is_empty()).map(Route::schedule),
        );
        arcs.saturating_add(span)
    }

    /// Fleet-wide span costs alone.
    pub fn span_cost(&self) -> i64 {
        global_span_cost(
            &self.span_coefficients,
            self.routes.iter().filter(|r| !r.is_empty()).map(Route::schedule),
        )
    }

    /// Routing cost plus the penalty for unrouted nodes.
    pub fn objective(&self) -> i64 {
        let penalty = (self.unrouted.len() as i64).saturating_mul(self.unrouted_penalty);
        self.routing_cost().saturating_add(penalty)
    }

    /// Ranking key: unrouted count, then routing cost.
    ///
    /// Routing a node always outranks any routing cost, so a feasible
    /// insertion is never refused because the penalty is too small.
    pub fn cost_key(&self) -> (usize, i64) {
        (self.unrouted.len(), self.routing_cost())
    }

    /// Penalty charged per unrouted node.
    pub fn unrouted_penalty(&self) -> i64 {
        self.unrouted_penalty
    }

    /// Replaces the route of its vehicle.
    pub(crate) fn replace_route(&mut self, route: Route) {
        let v = route.vehicle();
        self.routes[v] = route;
    }

    /// Marks `node` as routed.
    pub(crate) fn remove_unrouted(&mut self, node: usize) {
        self.unrouted.retain(|&n| n != node);
    }
}
