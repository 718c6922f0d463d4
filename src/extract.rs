//! Read-only projection of a solution into per-vehicle reports.

use std::time::Duration;

use crate::constructive::AssignmentStatus;
use crate::dimension::CumulRange;
use crate::local_search::{SearchState, SearchStats};
use crate::model::{RoutingModel, CAPACITY, DISTANCE, TIME};
use crate::models::Solution;

/// Cumulative intervals of one dimension along a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionTrace {
    /// Dimension name.
    pub name: String,
    /// `[min, max]` at each stop, depot start and end included.
    pub ranges: Vec<CumulRange>,
}

/// Report for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleView {
    /// Vehicle index.
    pub vehicle: usize,
    /// Visit order with the depot at both ends.
    pub nodes: Vec<usize>,
    /// One trace per dimension, in registration order.
    pub dimensions: Vec<DimensionTrace>,
    /// Route distance.
    pub distance: i64,
    /// Total demand carried.
    pub load: i64,
    /// Earliest return time, when the model has a time dimension.
    pub route_time: Option<i64>,
    /// Arc cost of the route; span costs are fleet-wide.
    pub cost: i64,
}

impl VehicleView {
    /// Trace of the dimension called `name`.
    pub fn dimension(&self, name: &str) -> Option<&DimensionTrace> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Returns `true` if the vehicle serves no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 2
    }
}

/// Facts about the solve that produced a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveStats {
    /// Wall-clock time from model build to extraction.
    pub calculation_time: Duration,
    /// How the local search ended.
    pub state: SearchState,
    /// Local search counters.
    pub search: SearchStats,
    /// Whether the returned solution routes every node, after local search.
    pub status: AssignmentStatus,
}

impl Default for SolveStats {
    fn default() -> Self {
        Self {
            calculation_time: Duration::ZERO,
            state: SearchState::Idle,
            search: SearchStats::default(),
            status: AssignmentStatus::Complete,
        }
    }
}

/// Everything a caller needs to report a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionView {
    /// One view per vehicle, indexed by vehicle.
    pub vehicles: Vec<VehicleView>,
    /// Nodes left out, ascending.
    pub unrouted: Vec<usize>,
    /// Objective value.
    pub objective: i64,
    /// Longest route distance.
    pub max_route_distance: i64,
    /// Solve statistics.
    pub stats: SolveStats,
}

/// Projects `solution` into a [`SolutionView`].
///
/// Reads the schedules already stored on the routes; nothing is propagated
/// again and neither argument is modified.
pub fn extract(model: &RoutingModel, solution: &Solution, stats: SolveStats) -> SolutionView {
    let engine = model.dimensions();
    let depot = model.depot();
    let distance = engine.by_name(DISTANCE);
    let capacity = engine.by_name(CAPACITY);
    let time = engine.by_name(TIME);

    let vehicles: Vec<VehicleView> = solution
        .routes()
        .iter()
        .map(|route| {
            let schedule = route.schedule();
            let span = |id| {
                let (s, e) = (schedule.start(id), schedule.end(id));
                e.min.saturating_sub(s.min)
            };

            let mut nodes = Vec::with_capacity(route.len() + 2);
            nodes.push(depot);
            nodes.extend_from_slice(route.nodes());
            nodes.push(depot);

            let dimensions = engine
                .ids()
                .map(|id| DimensionTrace {
                    name: engine.dimension(id).name().to_string(),
                    ranges: schedule.cumuls(id).to_vec(),
                })
                .collect();

            VehicleView {
                vehicle: route.vehicle(),
                nodes,
                dimensions,
                distance: distance.map_or_else(|| model.route_arc_cost(route.nodes()), span),
                load: capacity.map_or(0, span),
                route_time: time.map(|id| schedule.end(id).min),
                cost: route.cost(),
            }
        })
        .collect();

    let max_route_distance = vehicles.iter().map(|v| v.distance).max().unwrap_or(0);
    SolutionView {
        vehicles,
        unrouted: solution.unrouted().to_vec(),
        objective: solution.objective(),
        max_route_distance,
        stats,
    }
}
