#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Reverse-mode gradient propagation.
///
/// Provides [`backward::backward`] and [`backward::backward_with_grad`], which
/// walk the graph recorded by the operations and fill the leaves' gradients.
pub mod backward;

/// Error types for tensor operations.
///
/// Defines [`TensorOpsError`] for handling failures during forward dispatch and
/// gradient propagation.
pub mod error;

/// The differentiable operations and their forward/backward rules.
pub mod functions;

/// High-level tensor operations and traits.
///
/// Provides the free functions and the [`TensorOps`] trait that dispatch an
/// operation and record it in the gradient graph.
pub mod ops;

pub use error::TensorOpsError;
pub use ops::TensorOps;
