use thiserror::Error;

/// Coarse classification of a [`TensorError`].
///
/// Several variants can describe the same kind of failure with different context,
/// e.g. a reshape element-count mismatch and a broadcast incompatibility are both
/// shape mismatches. Callers that only care about the kind match on this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong number of tensor inputs, indices or auxiliary arguments.
    Arity,
    /// Element counts or dimension sizes incompatible for the operation.
    ShapeMismatch,
    /// An index outside the valid range of a dimension.
    Index,
    /// A required input (gradient or saved state) is absent.
    NullInput,
    /// An auxiliary argument cannot be normalised to a dimension.
    TypeConversion,
}

/// An error type for tensor construction, views and operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    /// Wrong number of inputs, indices or axes.
    ///
    /// # Examples
    /// - `add` called with a single tensor
    /// - `at` called with fewer indices than the tensor rank
    /// - `transpose` called with an order shorter than the tensor rank
    #[error("{op}: expected {expected} {what}, got {got}")]
    InvalidArity {
        /// Name of the operation that failed
        op: &'static str,
        /// What was counted (inputs, indices, axes)
        what: &'static str,
        /// Expected count
        expected: usize,
        /// Actual count
        got: usize,
    },

    /// A required auxiliary argument was not provided.
    ///
    /// For example `reshape` with an empty target shape.
    #[error("{op}: missing required argument `{argument}`")]
    MissingArgument {
        /// Name of the operation that failed
        op: &'static str,
        /// Name of the missing argument
        argument: &'static str,
    },

    /// Two tensors must have identical shapes but do not.
    #[error("{op}: shape mismatch {lhs:?} != {rhs:?}")]
    ShapeMismatch {
        /// Name of the operation that failed
        op: &'static str,
        /// Shape of the first operand
        lhs: Vec<usize>,
        /// Shape of the second operand
        rhs: Vec<usize>,
    },

    /// The number of elements implied by a shape does not match.
    ///
    /// # Recommended Actions
    /// - Verify the product of shape dimensions equals the element count
    #[error("{op}: shape mismatch, expected {expected} elements, got {got}")]
    ElementCountMismatch {
        /// Name of the operation that failed
        op: &'static str,
        /// Expected number of elements
        expected: usize,
        /// Actual number of elements
        got: usize,
    },

    /// Two shapes cannot be broadcast together.
    #[error(
        "cannot broadcast shapes {lhs:?} and {rhs:?}: incompatible dimensions at axis {axis}: {lhs_dim} vs {rhs_dim}"
    )]
    BroadcastIncompatible {
        /// The longer (primary) shape
        lhs: Vec<usize>,
        /// The shorter shape
        rhs: Vec<usize>,
        /// Axis in the primary shape where the conflict was found
        axis: usize,
        /// Size of the primary shape at `axis`
        lhs_dim: usize,
        /// Size of the other shape at `axis`
        rhs_dim: usize,
    },

    /// A tensor cannot be broadcast (or reduced back) to the requested shape.
    #[error("cannot broadcast shape {from:?} to {to:?}")]
    InvalidBroadcast {
        /// Source shape
        from: Vec<usize>,
        /// Requested shape
        to: Vec<usize>,
    },

    /// The permutation passed to a transpose is not a permutation of `0..rank`.
    #[error("invalid permutation {order:?} for a tensor of rank {rank}")]
    InvalidPermutation {
        /// The offending order
        order: Vec<usize>,
        /// Rank of the tensor
        rank: usize,
    },

    /// Shape and strides do not describe a valid view over the storage.
    #[error("invalid view: {reason}")]
    InvalidView {
        /// Human-readable description of the problem
        reason: String,
    },

    /// Index exceeds tensor bounds.
    ///
    /// # Common Causes
    /// - Off-by-one errors in indexing loops
    /// - Negative indices (not supported)
    #[error("index {index} out of bounds for dimension {dim} with size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: isize,
        /// The dimension being indexed
        dim: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Backward was invoked without an upstream gradient.
    #[error("{op} backward: null upstream gradient")]
    NullInput {
        /// Name of the operation that failed
        op: &'static str,
    },

    /// Backward was invoked on an operation whose context holds no saved state,
    /// i.e. its forward never ran.
    #[error("{op} backward: context has no saved state, forward was never run")]
    EmptyContext {
        /// Name of the operation that failed
        op: &'static str,
    },

    /// An auxiliary argument cannot be converted to a dimension.
    #[error("{op}: could not convert {value} to a dimension")]
    TypeConversion {
        /// Name of the operation that failed
        op: &'static str,
        /// The offending value
        value: isize,
    },
}

impl TensorError {
    /// Creates an InvalidArity error.
    pub fn invalid_arity(op: &'static str, what: &'static str, expected: usize, got: usize) -> Self {
        Self::InvalidArity {
            op,
            what,
            expected,
            got,
        }
    }

    /// Creates a ShapeMismatch error from two shapes.
    pub fn shape_mismatch(op: &'static str, lhs: &[usize], rhs: &[usize]) -> Self {
        Self::ShapeMismatch {
            op,
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Creates an InvalidView error.
    pub fn invalid_view(reason: impl Into<String>) -> Self {
        Self::InvalidView {
            reason: reason.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArity { .. } | Self::MissingArgument { .. } => ErrorKind::Arity,
            Self::ShapeMismatch { .. }
            | Self::ElementCountMismatch { .. }
            | Self::BroadcastIncompatible { .. }
            | Self::InvalidBroadcast { .. }
            | Self::InvalidPermutation { .. }
            | Self::InvalidView { .. } => ErrorKind::ShapeMismatch,
            Self::IndexOutOfBounds { .. } => ErrorKind::Index,
            Self::NullInput { .. } | Self::EmptyContext { .. } => ErrorKind::NullInput,
            Self::TypeConversion { .. } => ErrorKind::TypeConversion,
        }
    }

    /// Returns a user-friendly suggestion for resolving the error.
    pub fn suggestion(&self) -> &str {
        match self.kind() {
            ErrorKind::Arity => "Check the number of tensors, indices or axes passed to the operation",
            ErrorKind::ShapeMismatch => {
                "Check tensor shapes are compatible for the operation. Consider reshaping or broadcasting."
            }
            ErrorKind::Index => "Verify indices are within bounds (0 <= index < dimension_size)",
            ErrorKind::NullInput => "Run the forward pass before backward and pass an upstream gradient",
            ErrorKind::TypeConversion => "Dimensions and axes must be non-negative integers",
        }
    }
}
