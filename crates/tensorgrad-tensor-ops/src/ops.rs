use std::sync::Arc;

use tensorgrad_tensor::{Element, Function, Tensor};

use crate::{
    backward,
    error::TensorOpsError,
    functions::{AddFn, BroadcastFn, MulFn, ReshapeFn, TransposeFn},
};

/// Runs a fresh operation and wires it into the graph.
///
/// When any input requires grad, the output requires grad and keeps the
/// operation as its `grad_fn`. Otherwise the output is a plain leaf. On error
/// no output and no graph edge are produced.
///
/// # Arguments
///
/// * `op` - A newly created operation; it is consumed by this call.
/// * `args` - Auxiliary integer arguments for the operation.
/// * `inputs` - The tensor operands.
pub fn apply<T, F>(mut op: F, args: &[isize], inputs: &[&Tensor<T>]) -> Result<Tensor<T>, TensorOpsError>
where
    T: Element,
    F: Function<T> + 'static,
{
    let output = op.forward(args, inputs)?;

    if inputs.iter().any(|t| t.requires_grad()) {
        let name = op.name();
        let output = output.with_grad_fn(Arc::new(op));
        log::trace!("{name}: recorded graph node {} {:?}", output.id(), output.shape());
        return Ok(output);
    }
    Ok(output)
}

/// Element-wise sum of two tensors of identical shape.
///
/// # Example
///
/// ```
/// use tensorgrad_tensor::Tensor;
/// use tensorgrad_tensor_ops::ops::add;
///
/// let a = Tensor::<i32>::from_shape_vec(&[3], vec![1, 2, 3], true).unwrap();
/// let b = Tensor::<i32>::from_shape_vec(&[3], vec![4, 5, 6], false).unwrap();
/// let c = add(&a, &b).unwrap();
/// assert_eq!(c.to_vec(), vec![5, 7, 9]);
/// assert!(c.requires_grad());
/// ```
pub fn add<T: Element>(lhs: &Tensor<T>, rhs: &Tensor<T>) -> Result<Tensor<T>, TensorOpsError> {
    apply(AddFn::new(), &[], &[lhs, rhs])
}

/// Element-wise product of two tensors of identical shape.
pub fn mul<T: Element>(lhs: &Tensor<T>, rhs: &Tensor<T>) -> Result<Tensor<T>, TensorOpsError> {
    apply(MulFn::new(), &[], &[lhs, rhs])
}

/// Reshapes a tensor, sharing its buffer when its layout allows.
///
/// # Errors
///
/// Fails when `shape` is empty, has a negative entry, or does not hold the
/// same number of elements.
pub fn reshape<T: Element>(tensor: &Tensor<T>, shape: &[isize]) -> Result<Tensor<T>, TensorOpsError> {
    apply(ReshapeFn::new(), shape, &[tensor])
}

/// Permutes the dimensions of a tensor.
///
/// # Example
///
/// ```
/// use tensorgrad_tensor::Tensor;
/// use tensorgrad_tensor_ops::ops::transpose;
///
/// let t = Tensor::<f32>::zeros(&[2, 3], false);
/// let tt = transpose(&t, &[1, 0]).unwrap();
/// assert_eq!(tt.shape(), &[3, 2]);
/// assert_eq!(tt.strides(), &[1, 3]);
/// ```
pub fn transpose<T: Element>(tensor: &Tensor<T>, order: &[isize]) -> Result<Tensor<T>, TensorOpsError> {
    apply(TransposeFn::new(), order, &[tensor])
}

/// Broadcasts a tensor to `shape` without copying.
pub fn broadcast_to<T: Element>(tensor: &Tensor<T>, shape: &[isize]) -> Result<Tensor<T>, TensorOpsError> {
    apply(BroadcastFn::new(), shape, &[tensor])
}

/// Differentiable operations in method form.
pub trait TensorOps<T: Element> {
    /// See [`add`].
    fn add(&self, other: &Tensor<T>) -> Result<Tensor<T>, TensorOpsError>;

    /// See [`mul`].
    fn mul(&self, other: &Tensor<T>) -> Result<Tensor<T>, TensorOpsError>;

    /// See [`reshape`].
    fn reshape(&self, shape: &[isize]) -> Result<Tensor<T>, TensorOpsError>;

    /// See [`transpose`].
    fn transpose(&self, order: &[isize]) -> Result<Tensor<T>, TensorOpsError>;

    /// See [`broadcast_to`].
    fn broadcast_to(&self, shape: &[isize]) -> Result<Tensor<T>, TensorOpsError>;

    /// Propagates a gradient of ones from this tensor to the leaves.
    fn backward(&self) -> Result<(), TensorOpsError>;

    /// Propagates `grad` from this tensor to the leaves.
    fn backward_with_grad(&self, grad: &Tensor<T>) -> Result<(), TensorOpsError>;
}

impl<T: Element> TensorOps<T> for Tensor<T> {
    fn add(&self, other: &Tensor<T>) -> Result<Tensor<T>, TensorOpsError> {
        add(self, other)
    }

    fn mul(&self, other: &Tensor<T>) -> Result<Tensor<T>, TensorOpsError> {
        mul(self, other)
    }

    fn reshape(&self, shape: &[isize]) -> Result<Tensor<T>, TensorOpsError> {
        reshape(self, shape)
    }

    fn transpose(&self, order: &[isize]) -> Result<Tensor<T>, TensorOpsError> {
        transpose(self, order)
    }

    fn broadcast_to(&self, shape: &[isize]) -> Result<Tensor<T>, TensorOpsError> {
        broadcast_to(self, shape)
    }

    fn backward(&self) -> Result<(), TensorOpsError> {
        backward::backward(self)
    }

    fn backward_with_grad(&self, grad: &Tensor<T>) -> Result<(), TensorOpsError> {
        backward::backward_with_grad(self, grad)
    }
}
