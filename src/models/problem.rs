//! Immutable routing problem data.

use super::{Node, TimeWindow, Vehicle};
use crate::distance::CostMatrix;
use crate::error::ConfigurationError;

/// A validated CVRPTW instance: nodes, fleet, and pairwise costs.
///
/// Travel time defaults to the distance matrix (speed = 1) when no explicit
/// time matrix is supplied.
///
/// # Examples
///
/// ```
/// use u_cvrptw::distance::CostMatrix;
/// use u_cvrptw::models::Problem;
///
/// let d = CostMatrix::from_rows("distance", vec![
///     vec![0, 2, 3],
///     vec![2, 0, 4],
///     vec![3, 4, 0],
/// ]).unwrap();
/// let problem = Problem::new(d, vec![0, 1, 1], vec![5], 0).unwrap();
/// assert_eq!(problem.num_nodes(), 3);
/// assert_eq!(problem.num_vehicles(), 1);
/// assert_eq!(problem.travel_time(1, 2), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Problem {
    nodes: Vec<Node>,
    vehicles: Vec<Vehicle>,
    depot: usize,
    distances: CostMatrix,
    times: Option<CostMatrix>,
    depot_window: Option<TimeWindow>,
}

impl Problem {
    /// Creates a problem from a distance matrix, per-node demands and
    /// per-vehicle capacities.
    pub fn new(
        distances: CostMatrix,
        demands: Vec<i64>,
        capacities: Vec<i64>,
        depot: usize,
    ) -> Result<Self, ConfigurationError> {
        let n = distances.size();
        if demands.len() != n {
            return Err(ConfigurationError::SizeMismatch {
                name: "demands",
                expected: n,
                actual: demands.len(),
            });
        }
        if depot >= n {
            return Err(ConfigurationError::DepotOutOfRange {
                depot,
                num_nodes: n,
            });
        }
        if demands[depot] != 0 {
            return Err(ConfigurationError::DepotDemandNonZero(demands[depot]));
        }
        if capacities.is_empty() {
            return Err(ConfigurationError::NoVehicles);
        }
        if let Some(vehicle) = capacities.iter().position(|&c| c < 0) {
            return Err(ConfigurationError::NegativeCapacity { vehicle });
        }

        let nodes = demands
            .into_iter()
            .enumerate()
            .map(|(id, demand)| Node::new(id, demand))
            .collect();
        let vehicles = capacities
            .into_iter()
            .enumerate()
            .map(|(id, capacity)| Vehicle::new(id, capacity))
            .collect();

        Ok(Self {
            nodes,
            vehicles,
            depot,
            distances,
            times: None,
            depot_window: None,
        })
    }

    /// Applies the same route distance limit to every vehicle.
    pub fn with_max_distance(mut self, max: i64) -> Self {
        self.vehicles = self
            .vehicles
            .into_iter()
            .map(|v| v.with_max_distance(max))
            .collect();
        self
    }

    /// Sets an explicit travel time matrix.
    pub fn with_time_matrix(mut self, times: CostMatrix) -> Result<Self, ConfigurationError> {
        if times.size() != self.num_nodes() {
            return Err(ConfigurationError::SizeMismatch {
                name: "time_matrix",
                expected: self.num_nodes(),
                actual: times.size(),
            });
        }
        self.times = Some(times);
        Ok(self)
    }

    /// Sets one `[earliest, latest]` window per node, the depot's included.
    ///
    /// The depot's window bounds every vehicle's start time.
    pub fn with_time_windows(mut self, windows: &[[i64; 2]]) -> Result<Self, ConfigurationError> {
        if windows.len() != self.num_nodes() {
            return Err(ConfigurationError::SizeMismatch {
                name: "time_windows",
                expected: self.num_nodes(),
                actual: windows.len(),
            });
        }
        for (node, &[earliest, latest]) in windows.iter().enumerate() {
            let tw = TimeWindow::new(earliest, latest)
                .ok_or(ConfigurationError::InvalidTimeWindow { node })?;
            if node == self.depot {
                self.depot_window = Some(tw);
            } else {
                self.nodes[node] = self.nodes[node].clone().with_time_window(tw);
            }
        }
        Ok(self)
    }

    /// All nodes, indexed by node id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The fleet, indexed by vehicle id.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Depot node index.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Number of nodes including the depot.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// Distance matrix.
    pub fn distances(&self) -> &CostMatrix {
        &self.distances
    }

    /// Travel time matrix; the distance matrix when none was supplied.
    pub fn times(&self) -> &CostMatrix {
        self.times.as_ref().unwrap_or(&self.distances)
    }

    /// Travel time from `from` to `to`.
    pub fn travel_time(&self, from: usize, to: usize) -> i64 {
        self.times().get(from, to)
    }

    /// Window bounding vehicle start times, if time windows are configured.
    pub fn depot_window(&self) -> Option<&TimeWindow> {
        self.depot_window.as_ref()
    }

    /// Returns `true` if a time matrix or time windows were supplied.
    pub fn has_time(&self) -> bool {
        self.times.is_some() || self.depot_window.is_some()
    }

    /// Per-node demands.
    pub fn demands(&self) -> Vec<i64> {
        self.nodes.iter().map(Node::demand).collect()
    }

    /// Per-vehicle capacities.
    pub fn capacities(&self) -> Vec<i64> {
        self.vehicles.iter().map(Vehicle::capacity).collect()
    }
}
