//! The differentiable operations.
//!
//! Each operation owns one [`tensorgrad_tensor::Context`] and is used for a
//! single invocation: [`crate::ops::apply`] creates it, runs `forward` and
//! attaches it to the output.

mod add;
mod broadcast;
mod mul;
mod reshape;
mod transpose;

pub use add::AddFn;
pub use broadcast::BroadcastFn;
pub use mul::MulFn;
pub use reshape::ReshapeFn;
pub use transpose::TransposeFn;

use tensorgrad_tensor::{Context, Element, Tensor, TensorError};

pub(crate) fn check_arity<T: Element>(
    op: &'static str,
    inputs: &[&Tensor<T>],
    expected: usize,
) -> Result<(), TensorError> {
    if inputs.len() != expected {
        return Err(TensorError::invalid_arity(op, "inputs", expected, inputs.len()));
    }
    Ok(())
}

/// Validates the preconditions shared by every backward.
pub(crate) fn check_backward<'a, T: Element>(
    op: &'static str,
    ctx: &Context<T>,
    grad_output: Option<&'a Tensor<T>>,
) -> Result<&'a Tensor<T>, TensorError> {
    let grad = grad_output.ok_or(TensorError::NullInput { op })?;
    if ctx.is_empty() {
        return Err(TensorError::EmptyContext { op });
    }
    Ok(grad)
}

/// Reads a shape saved by forward.
pub(crate) fn saved_shape<'a, T: Element>(
    op: &'static str,
    ctx: &'a Context<T>,
    index: usize,
) -> Result<&'a [usize], TensorError> {
    ctx.saved_shape(index).ok_or(TensorError::EmptyContext { op })
}

/// Reads a tensor saved by forward.
pub(crate) fn saved_tensor<'a, T: Element>(
    op: &'static str,
    ctx: &'a Context<T>,
    index: usize,
) -> Result<&'a Tensor<T>, TensorError> {
    ctx.saved_tensor(index).ok_or(TensorError::EmptyContext { op })
}
