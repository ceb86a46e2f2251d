use tensorgrad_tensor::{TensorError, TensorId};
use thiserror::Error;

/// An error type for tensor operations and gradient propagation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorOpsError {
    /// A forward operation failed.
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// An operation failed while propagating gradients.
    ///
    /// The walk is aborted; leaves already visited keep the gradients
    /// accumulated so far.
    #[error("backward of {op} at node {node} failed: {source}")]
    BackwardFailed {
        /// Name of the operation whose backward failed
        op: &'static str,
        /// The node produced by that operation
        node: TensorId,
        /// The underlying failure
        source: TensorError,
    },

    /// Backward was called on a tensor that does not require grad.
    #[error("tensor {node} does not require grad and has no gradient graph")]
    NoGradientGraph {
        /// The offending root
        node: TensorId,
    },
}
