//! Pluggable arc and node cost evaluators.

mod evaluator;

pub use evaluator::{ArcEvaluator, CostModel, Demands, EvaluatorHandle, NodeEvaluator};
