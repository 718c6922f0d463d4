//! A single cumulative resource.

use super::CumulRange;
use crate::evaluation::EvaluatorHandle;
use crate::index::Position;

/// Handle of a registered dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DimensionId(pub(crate) usize);

impl DimensionId {
    /// Raw index.
    pub fn get(self) -> usize {
        self.0
    }
}

/// A named cumulative resource (distance, load, time) tracked along routes.
///
/// Between consecutive positions `i → j` the cumulative value obeys
/// `cumul[j] = cumul[i] + transit(i, j) + slack` with `0 ≤ slack ≤ slack_max`.
/// Every cumulative value is bounded by `[0, capacity(vehicle)]` and by any
/// range applied with `set_cumul_range`.
#[derive(Debug, Clone)]
pub struct Dimension {
    name: String,
    evaluator: EvaluatorHandle,
    slack_max: i64,
    capacities: Vec<i64>,
    start_at_zero: bool,
    span_cost_coefficient: i64,
    ranges: Vec<CumulRange>,
}

impl Dimension {
    pub(crate) fn new(
        name: String,
        evaluator: EvaluatorHandle,
        slack_max: i64,
        capacities: Vec<i64>,
        start_at_zero: bool,
        num_positions: usize,
    ) -> Self {
        Self {
            name,
            evaluator,
            slack_max,
            capacities,
            start_at_zero,
            span_cost_coefficient: 0,
            ranges: vec![CumulRange::UNBOUNDED; num_positions],
        }
    }

    /// Dimension name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transit evaluator.
    pub fn evaluator(&self) -> EvaluatorHandle {
        self.evaluator
    }

    /// Maximum idle accumulation between two consecutive positions.
    pub fn slack_max(&self) -> i64 {
        self.slack_max
    }

    /// Upper bound on the cumulative value for `vehicle`.
    pub fn capacity(&self, vehicle: usize) -> i64 {
        self.capacities[vehicle]
    }

    /// Whether every route must start with a cumulative value of zero.
    pub fn start_at_zero(&self) -> bool {
        self.start_at_zero
    }

    /// Coefficient applied to the route span.
    pub fn span_cost_coefficient(&self) -> i64 {
        self.span_cost_coefficient
    }

    /// Range applied to `position` via `set_cumul_range`.
    pub fn range(&self, position: Position) -> CumulRange {
        self.ranges[position]
    }

    pub(crate) fn set_span_cost_coefficient(&mut self, coefficient: i64) {
        self.span_cost_coefficient = coefficient;
    }

    pub(crate) fn set_range(&mut self, position: Position, range: CumulRange) {
        self.ranges[position] = range;
    }

    /// Static bound at `position` for `vehicle`, before propagation.
    #[inline]
    pub(crate) fn bound(&self, position: Position, vehicle: usize, is_start: bool) -> CumulRange {
        let mut r = self.ranges[position].intersect(CumulRange::new(0, self.capacities[vehicle]));
        if is_start && self.start_at_zero {
            r = r.intersect(CumulRange::point(0));
        }
        r
    }
}
