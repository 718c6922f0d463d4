//! Vehicle type with capacity and distance limits.

/// A vehicle starting and ending its route at the depot.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::Vehicle;
///
/// let v = Vehicle::new(0, 15).with_max_distance(3000);
/// assert_eq!(v.capacity(), 15);
/// assert_eq!(v.max_distance(), Some(3000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    id: usize,
    capacity: i64,
    max_distance: Option<i64>,
}

impl Vehicle {
    /// Creates a vehicle with no distance limit.
    pub fn new(id: usize, capacity: i64) -> Self {
        Self {
            id,
            capacity,
            max_distance: None,
        }
    }

    /// Sets the maximum route distance.
    pub fn with_max_distance(mut self, max: i64) -> Self {
        self.max_distance = Some(max);
        self
    }

    /// Vehicle index.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Maximum route distance, `None` if unbounded.
    pub fn max_distance(&self) -> Option<i64> {
        self.max_distance
    }
}
