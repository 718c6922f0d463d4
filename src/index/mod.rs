//! Mapping between node identifiers and route positions.
//!
//! Every non-depot node owns exactly one position. Each vehicle owns two
//! synthetic positions, its start and its end, both located at the depot.
//! Positions are laid out as `[nodes..., starts..., ends...]`, so dimension
//! state can be stored in flat arrays indexed by position.

/// A route position (internal solver variable).
pub type Position = usize;

/// Bijection between nodes and positions for a fixed fleet.
///
/// Out-of-range arguments are programming errors and panic.
///
/// # Examples
///
/// ```
/// use u_cvrptw::index::IndexManager;
///
/// // 4 nodes (depot 0), 2 vehicles
/// let index = IndexManager::new(2, 4, 0);
/// assert_eq!(index.num_positions(), 3 + 4);
/// assert_eq!(index.node_of(index.start_of(1)), 0);
/// assert_eq!(index.node_of(index.position_of(2, 0)), 2);
/// assert_eq!(index.position_of(0, 3), index.end_of(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexManager {
    num_vehicles: usize,
    num_nodes: usize,
    depot: usize,
    node_to_position: Vec<Option<Position>>,
    position_to_node: Vec<usize>,
}

impl IndexManager {
    /// Creates the mapping for `num_vehicles` vehicles and `num_nodes` nodes.
    ///
    /// # Panics
    ///
    /// Panics if `depot >= num_nodes`.
    pub fn new(num_vehicles: usize, num_nodes: usize, depot: usize) -> Self {
        assert!(
            depot < num_nodes,
            "depot {depot} out of range for {num_nodes} nodes"
        );
        let mut node_to_position = vec![None; num_nodes];
        let mut position_to_node = Vec::with_capacity(num_nodes - 1 + 2 * num_vehicles);
        for node in (0..num_nodes).filter(|&n| n != depot) {
            node_to_position[node] = Some(position_to_node.len());
            position_to_node.push(node);
        }
        position_to_node.extend(std::iter::repeat_n(depot, 2 * num_vehicles));

        Self {
            num_vehicles,
            num_nodes,
            depot,
            node_to_position,
            position_to_node,
        }
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Number of nodes including the depot.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Depot node.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Total number of positions, sentinels included.
    pub fn num_positions(&self) -> usize {
        self.position_to_node.len()
    }

    /// Node located at `position`.
    #[inline]
    pub fn node_of(&self, position: Position) -> usize {
        self.position_to_node[position]
    }

    /// Position of a node visit.
    ///
    /// A non-depot node has a single occurrence (0). The depot has `2V`
    /// occurrences: `0..V` are vehicle starts, `V..2V` vehicle ends.
    ///
    /// # Panics
    ///
    /// Panics if the node or the occurrence is out of range.
    pub fn position_of(&self, node: usize, occurrence: usize) -> Position {
        if node == self.depot {
            assert!(
                occurrence < 2 * self.num_vehicles,
                "depot occurrence {occurrence} out of range"
            );
            if occurrence < self.num_vehicles {
                self.start_of(occurrence)
            } else {
                self.end_of(occurrence - self.num_vehicles)
            }
        } else {
            assert_eq!(occurrence, 0, "node {node} has a single occurrence");
            self.node_to_position[node].expect("non-depot nodes always have a position")
        }
    }

    /// Position of a non-depot node.
    #[inline]
    pub fn node_position(&self, node: usize) -> Position {
        self.position_of(node, 0)
    }

    /// Start sentinel of `vehicle`.
    #[inline]
    pub fn start_of(&self, vehicle: usize) -> Position {
        assert!(vehicle < self.num_vehicles, "vehicle {vehicle} out of range");
        self.num_nodes - 1 + vehicle
    }

    /// End sentinel of `vehicle`.
    #[inline]
    pub fn end_of(&self, vehicle: usize) -> Position {
        assert!(vehicle < self.num_vehicles, "vehicle {vehicle} out of range");
        self.num_nodes - 1 + self.num_vehicles + vehicle
    }

    /// Returns `true` if `position` is a vehicle start.
    pub fn is_start(&self, position: Position) -> bool {
        let first = self.num_nodes - 1;
        (first..first + self.num_vehicles).contains(&position)
    }

    /// Returns `true` if `position` is a vehicle end.
    pub fn is_end(&self, position: Position) -> bool {
        let first = self.num_nodes - 1 + self.num_vehicles;
        (first..first + self.num_vehicles).contains(&position)
    }

    /// Vehicle owning a sentinel position, `None` for node positions.
    pub fn vehicle_of(&self, position: Position) -> Option<usize> {
        let first = self.num_nodes - 1;
        if self.is_start(position) {
            Some(position - first)
        } else if self.is_end(position) {
            Some(position - first - self.num_vehicles)
        } else {
            None
        }
    }

    /// Positions of a route: start, each node in order, end.
    pub fn route_positions(&self, vehicle: usize, nodes: &[usize]) -> Vec<Position> {
        let mut positions = Vec::with_capacity(nodes.len() + 2);
        positions.push(self.start_of(vehicle));
        positions.extend(nodes.iter().map(|&n| self.node_position(n)));
        positions.push(self.end_of(vehicle));
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bijection() {
        let index = IndexManager::new(3, 5, 0);
        for node in 1..5 {
            let p = index.position_of(node, 0);
            assert_eq!(index.node_of(p), node);
            assert_eq!(index.vehicle_of(p), None);
        }
        for v in 0..3 {
            assert_eq!(index.node_of(index.start_of(v)), 0);
            assert_eq!(index.node_of(index.end_of(v)), 0);
            assert_eq!(index.vehicle_of(index.start_of(v)), Some(v));
            assert_eq!(index.vehicle_of(index.end_of(v)), Some(v));
            assert!(index.is_start(index.start_of(v)));
            assert!(index.is_end(index.end_of(v)));
        }
        assert_eq!(index.num_positions(), 4 + 6);
    }

    #[test]
    fn test_non_zero_depot() {
        let index = IndexManager::new(1, 4, 2);
        assert_eq!(index.position_of(0, 0), 0);
        assert_eq!(index.position_of(1, 0), 1);
        assert_eq!(index.position_of(3, 0), 2);
        assert_eq!(index.node_of(index.start_of(0)), 2);
    }

    #[test]
    fn test_depot_occurrences() {
        let index = IndexManager::new(2, 3, 0);
        assert_eq!(index.position_of(0, 0), index.start_of(0));
        assert_eq!(index.position_of(0, 1), index.start_of(1));
        assert_eq!(index.position_of(0, 2), index.end_of(0));
        assert_eq!(index.position_of(0, 3), index.end_of(1));
    }

    #[test]
    fn test_route_positions() {
        let index = IndexManager::new(1, 4, 0);
        let positions = index.route_positions(0, &[3, 1]);
        let nodes: Vec<usize> = positions.iter().map(|&p| index.node_of(p)).collect();
        assert_eq!(nodes, vec![0, 3, 1, 0]);
    }

    #[test]
    #[should_panic(expected = "vehicle 2 out of range")]
    fn test_start_out_of_range() {
        let index = IndexManager::new(2, 3, 0);
        index.start_of(2);
    }

    #[test]
    #[should_panic(expected = "single occurrence")]
    fn test_node_occurrence_out_of_range() {
        let index = IndexManager::new(2, 3, 0);
        index.position_of(1, 1);
    }
}
