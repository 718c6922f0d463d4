//! Arc and node cost evaluators registered by handle.

use std::sync::Arc;

use crate::distance::CostMatrix;
use crate::error::ConfigurationError;

/// Pure cost of travelling from one node to another.
///
/// Implementations must be deterministic and side-effect free: the
/// dimension engine re-evaluates them freely during propagation.
pub trait ArcEvaluator: Send + Sync {
    /// Cost of the arc `from → to`.
    fn evaluate(&self, from: usize, to: usize) -> i64;
}

/// Pure cost attached to a single node (e.g. its demand).
pub trait NodeEvaluator: Send + Sync {
    /// Cost of leaving `node`.
    fn evaluate(&self, node: usize) -> i64;
}

impl<F> ArcEvaluator for F
where
    F: Fn(usize, usize) -> i64 + Send + Sync,
{
    fn evaluate(&self, from: usize, to: usize) -> i64 {
        self(from, to)
    }
}

impl<F> NodeEvaluator for F
where
    F: Fn(usize) -> i64 + Send + Sync,
{
    fn evaluate(&self, node: usize) -> i64 {
        self(node)
    }
}

impl ArcEvaluator for CostMatrix {
    fn evaluate(&self, from: usize, to: usize) -> i64 {
        self.get(from, to)
    }
}

/// Per-node values (typically demands) as a node evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demands(Vec<i64>);

impl Demands {
    /// Wraps per-node values.
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl NodeEvaluator for Demands {
    fn evaluate(&self, node: usize) -> i64 {
        self.0[node]
    }
}

/// Opaque handle to a registered evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EvaluatorHandle(usize);

impl EvaluatorHandle {
    /// Raw handle value.
    pub fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone)]
enum Transit {
    Arc(Arc<dyn ArcEvaluator>),
    Node(Arc<dyn NodeEvaluator>),
}

/// Registry of evaluators, shared by dimensions and the objective.
///
/// The same handle may back several dimensions.
///
/// # Examples
///
/// ```
/// use u_cvrptw::distance::CostMatrix;
/// use u_cvrptw::evaluation::{CostModel, Demands};
///
/// let mut costs = CostModel::new();
/// let d = costs.register_arc(CostMatrix::from_rows("d", vec![vec![0, 7], vec![7, 0]]).unwrap());
/// let q = costs.register_node(Demands::new(vec![0, 4]));
/// assert_eq!(costs.transit(d, 0, 1), 7);
/// // node evaluators read the node being left
/// assert_eq!(costs.transit(q, 1, 0), 4);
/// ```
#[derive(Clone, Default)]
pub struct CostModel {
    evaluators: Vec<Transit>,
}

impl std::fmt::Debug for CostModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostModel")
            .field("evaluators", &self.evaluators.len())
            .finish()
    }
}

impl CostModel {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pairwise evaluator.
    pub fn register_arc<E: ArcEvaluator + 'static>(&mut self, evaluator: E) -> EvaluatorHandle {
        self.evaluators.push(Transit::Arc(Arc::new(evaluator)));
        EvaluatorHandle(self.evaluators.len() - 1)
    }

    /// Registers a node-anchored evaluator.
    pub fn register_node<E: NodeEvaluator + 'static>(&mut self, evaluator: E) -> EvaluatorHandle {
        self.evaluators.push(Transit::Node(Arc::new(evaluator)));
        EvaluatorHandle(self.evaluators.len() - 1)
    }

    /// Checks that `handle` was issued by this registry.
    pub fn check(&self, handle: EvaluatorHandle) -> Result<(), ConfigurationError> {
        if handle.0 < self.evaluators.len() {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownEvaluator(handle))
        }
    }

    /// Transit from `from` to `to` under `handle`.
    ///
    /// # Panics
    ///
    /// Panics on an unknown handle; handles are validated at registration.
    #[inline]
    pub fn transit(&self, handle: EvaluatorHandle, from: usize, to: usize) -> i64 {
        match &self.evaluators[handle.0] {
            Transit::Arc(e) => e.evaluate(from, to),
            Transit::Node(e) => e.evaluate(from),
        }
    }

    /// Returns `true` if `handle` refers to a node evaluator.
    pub fn is_node(&self, handle: EvaluatorHandle) -> bool {
        matches!(self.evaluators.get(handle.0), Some(Transit::Node(_)))
    }

    /// Number of registered evaluators.
    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}
