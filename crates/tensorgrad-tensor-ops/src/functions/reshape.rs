use tensorgrad_tensor::{
    shape::{cast_to_dims, compute_size, compute_strides},
    Context, Element, Function, Tensor, TensorError,
};

use super::{check_arity, check_backward, saved_shape};

/// Reinterprets a tensor under a new shape with the same number of elements.
///
/// The output has row-major strides over the input's buffer. An input that is
/// not in row-major layout (e.g. a transposed view) is materialised first, so
/// the output reads the elements in the input's logical order.
pub struct ReshapeFn<T: Element> {
    ctx: Context<T>,
}

impl<T: Element> ReshapeFn<T> {
    /// Creates the operation with an empty context.
    pub fn new() -> Self {
        Self { ctx: Context::new() }
    }
}

impl<T: Element> Default for ReshapeFn<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Views `tensor` under `shape` with row-major strides.
fn reshape_view<T: Element>(tensor: &Tensor<T>, shape: &[usize]) -> Result<Tensor<T>, TensorError> {
    tensor.contiguous().view_with(shape, &compute_strides(shape))
}

impl<T: Element> Function<T> for ReshapeFn<T> {
    fn name(&self) -> &'static str {
        "reshape"
    }

    fn forward(&mut self, args: &[isize], inputs: &[&Tensor<T>]) -> Result<Tensor<T>, TensorError> {
        check_arity(self.name(), inputs, 1)?;
        if args.is_empty() {
            return Err(TensorError::MissingArgument {
                op: self.name(),
                argument: "shape",
            });
        }
        let x = inputs[0];
        let shape = cast_to_dims(self.name(), args)?;

        let numel = compute_size(&shape);
        if numel != x.size() {
            return Err(TensorError::ElementCountMismatch {
                op: self.name(),
                expected: x.size(),
                got: numel,
            });
        }

        let output = reshape_view(x, &shape)?;

        self.ctx.record_inputs(inputs);
        self.ctx.save_shapes(&[x.shape()]);
        Ok(output)
    }

    fn backward(&self, grad_output: Option<&Tensor<T>>) -> Result<Vec<Tensor<T>>, TensorError> {
        let grad = check_backward(self.name(), &self.ctx, grad_output)?;
        let shape = saved_shape(self.name(), &self.ctx, 0)?;

        if compute_size(shape) != grad.size() {
            return Err(TensorError::ElementCountMismatch {
                op: self.name(),
                expected: compute_size(shape),
                got: grad.size(),
            });
        }

        let grad_input = reshape_view(grad, shape)?.with_requires_grad(grad.requires_grad());
        Ok(vec![grad_input])
    }

    fn context(&self) -> &Context<T> {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut Context<T> {
        &mut self.ctx
    }
}
