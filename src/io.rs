//! JSON problem and solution documents.
//!
//! Problems are read either bare or inside a `{"datas": ...}` envelope;
//! solutions are written either bare or as
//! `{"result": ..., "calculation_id": ...}`.

use serde::{Deserialize, Serialize};

use crate::distance::CostMatrix;
use crate::error::{ConfigurationError, RoutingError};
use crate::extract::SolutionView;
use crate::model::TIME;
use crate::models::Problem;

/// Problem document.
///
/// # Examples
///
/// ```
/// use u_cvrptw::io::ProblemInput;
///
/// let json = r#"{"datas": {
///     "distance_matrix": [[0, 4], [4, 0]],
///     "demands": [0, 1],
///     "vehicle_capacities": [5],
///     "num_vehicles": 1,
///     "depot": 0,
///     "vehicle_distances": 100,
///     "calculation_id": 7
/// }}"#;
/// let input = ProblemInput::from_json_str(json).unwrap();
/// assert_eq!(input.calculation_id, Some(7));
///
/// let problem = input.into_problem().unwrap();
/// assert_eq!(problem.vehicles()[0].max_distance(), Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInput {
    /// Square distance matrix.
    pub distance_matrix: Vec<Vec<i64>>,
    /// Square travel time matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_matrix: Option<Vec<Vec<i64>>>,
    /// Demand per node; the depot's must be 0.
    pub demands: Vec<i64>,
    /// Capacity per vehicle.
    pub vehicle_capacities: Vec<i64>,
    /// Fleet size.
    pub num_vehicles: usize,
    /// Depot node.
    #[serde(default)]
    pub depot: usize,
    /// Route distance limit shared by every vehicle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_distances: Option<i64>,
    /// `[earliest, latest]` per node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_windows: Option<Vec<[i64; 2]>>,
    /// Caller's request id, echoed in the output envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Wrapped { datas: ProblemInput },
    Bare(ProblemInput),
}

impl ProblemInput {
    /// Parses a bare or `datas`-wrapped problem.
    pub fn from_json_str(s: &str) -> Result<Self, RoutingError> {
        let doc: InputDocument = serde_json::from_str(s)?;
        Ok(match doc {
            InputDocument::Wrapped { datas } => datas,
            InputDocument::Bare(input) => input,
        })
    }

    /// Validates the document into a [`Problem`].
    pub fn into_problem(self) -> Result<Problem, ConfigurationError> {
        if self.num_vehicles != self.vehicle_capacities.len() {
            return Err(ConfigurationError::VehicleCountMismatch {
                expected: self.num_vehicles,
                actual: self.vehicle_capacities.len(),
            });
        }
        let distances = CostMatrix::from_rows("distance_matrix", self.distance_matrix)?;
        let mut problem = Problem::new(distances, self.demands, self.vehicle_capacities, self.depot)?;
        if let Some(max) = self.vehicle_distances {
            problem = problem.with_max_distance(max);
        }
        if let Some(rows) = self.time_matrix {
            problem = problem.with_time_matrix(CostMatrix::from_rows("time_matrix", rows)?)?;
        }
        if let Some(windows) = &self.time_windows {
            problem = problem.with_time_windows(windows)?;
        }
        Ok(problem)
    }
}

/// One vehicle's entry in a [`SolutionOutput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOutput {
    /// Vehicle index.
    pub vehicle_id: usize,
    /// Visit order, depot at both ends.
    pub routes: Vec<usize>,
    /// `[node, min_arrival, max_arrival]` per stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<[i64; 3]>>,
    /// Earliest return to the depot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_time: Option<i64>,
    /// Route distance.
    pub distance: i64,
    /// Total demand carried.
    pub load: i64,
}

/// Solution document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionOutput {
    /// One entry per vehicle, used or not.
    pub routes: Vec<RouteOutput>,
    /// Longest route distance.
    pub max_route_distance: i64,
    /// Solve time in milliseconds.
    pub calculation_time: u64,
    /// Objective value.
    pub objective: i64,
    /// Nodes no route serves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unrouted: Vec<usize>,
}

#[derive(Serialize)]
struct ResultDocument<'a> {
    result: &'a SolutionOutput,
    calculation_id: i64,
}

impl SolutionOutput {
    /// Flattens a view into the output document.
    pub fn from_view(view: &SolutionView) -> Self {
        let routes = view
            .vehicles
            .iter()
            .map(|v| {
                let times = v.dimension(TIME).map(|trace| {
                    v.nodes
                        .iter()
                        .zip(&trace.ranges)
                        .map(|(&node, r)| [node as i64, r.min, r.max])
                        .collect()
                });
                RouteOutput {
                    vehicle_id: v.vehicle,
                    routes: v.nodes.clone(),
                    times,
                    route_time: v.route_time,
                    distance: v.distance,
                    load: v.load,
                }
            })
            .collect();
        Self {
            routes,
            max_route_distance: view.max_route_distance,
            calculation_time: view.stats.calculation_time.as_millis() as u64,
            objective: view.objective,
            unrouted: view.unrouted.clone(),
        }
    }

    /// Pretty-prints the document, inside a `result` envelope when
    /// `calculation_id` is given.
    pub fn to_json_string(&self, calculation_id: Option<i64>) -> Result<String, RoutingError> {
        let json = match calculation_id {
            Some(calculation_id) => serde_json::to_string_pretty(&ResultDocument {
                result: self,
                calculation_id,
            })?,
            None => serde_json::to_string_pretty(self)?,
        };
        Ok(json)
    }
}
