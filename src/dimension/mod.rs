//! Cumulative resources (distance, load, time) tracked along routes.
//!
//! - [`Dimension`] — one resource: transit evaluator, slack, per-vehicle capacity
//! - [`DimensionEngine`] — registration, range narrowing, and route propagation
//! - [`RouteSchedule`] — propagated `[min, max]` intervals of one route

mod engine;
mod range;
mod resource;

pub use engine::{global_span_cost, DimensionEngine, DimensionViolation, RouteSchedule};
pub use range::CumulRange;
pub use resource::{Dimension, DimensionId};
