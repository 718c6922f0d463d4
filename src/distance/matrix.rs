//! Dense integer cost matrix.

use crate::error::ConfigurationError;

/// A dense n×n integer cost matrix stored in row-major order.
///
/// Costs are asymmetric in general: `get(a, b)` need not equal `get(b, a)`.
///
/// # Examples
///
/// ```
/// use u_cvrptw::distance::CostMatrix;
///
/// let m = CostMatrix::from_rows("distance", vec![vec![0, 4], vec![6, 0]]).unwrap();
/// assert_eq!(m.get(0, 1), 4);
/// assert_eq!(m.get(1, 0), 6);
/// assert_eq!(m.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    data: Vec<i64>,
    size: usize,
}

impl CostMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Builds a matrix from nested rows, rejecting ragged input.
    ///
    /// `name` only labels the error.
    pub fn from_rows(name: &'static str, rows: Vec<Vec<i64>>) -> Result<Self, ConfigurationError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(ConfigurationError::MatrixNotSquare {
                    name,
                    rows: size,
                    row,
                    len: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self { data, size })
    }

    /// Cost from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, cost: i64) {
        self.data[from * self.size + to] = cost;
    }

    /// Number of locations.
    pub fn size(&self) -> usize {
        self.size
    }
}
