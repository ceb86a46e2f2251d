use tensorgrad_tensor::{Context, Element, Function, Tensor, TensorError};

use super::{check_arity, check_backward, saved_tensor};

/// Element-wise multiplication of two tensors of identical shape.
pub struct MulFn<T: Element> {
    ctx: Context<T>,
}

impl<T: Element> MulFn<T> {
    /// Creates the operation with an empty context.
    pub fn new() -> Self {
        Self { ctx: Context::new() }
    }
}

impl<T: Element> Default for MulFn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Function<T> for MulFn<T> {
    fn name(&self) -> &'static str {
        "mul"
    }

    fn forward(&mut self, _args: &[isize], inputs: &[&Tensor<T>]) -> Result<Tensor<T>, TensorError> {
        check_arity(self.name(), inputs, 2)?;
        let (x, y) = (inputs[0], inputs[1]);
        if x.shape() != y.shape() {
            return Err(TensorError::shape_mismatch(self.name(), x.shape(), y.shape()));
        }

        let output = x.zip_map(y, T::mul_elem)?;

        self.ctx.record_inputs(inputs);
        self.ctx.save_for_backward(&[x, y]);
        self.ctx.save_shapes(&[x.shape(), y.shape()]);
        Ok(output)
    }

    fn backward(&self, grad_output: Option<&Tensor<T>>) -> Result<Vec<Tensor<T>>, TensorError> {
        let grad = check_backward(self.name(), &self.ctx, grad_output)?;
        let x = saved_tensor(self.name(), &self.ctx, 0)?;
        let y = saved_tensor(self.name(), &self.ctx, 1)?;

        // d(x * y)/dx = y, d(x * y)/dy = x
        let grad_x = grad.zip_map(y, T::mul_elem)?.sum_to_shape(x.shape())?;
        let grad_y = grad.zip_map(x, T::mul_elem)?.sum_to_shape(y.shape())?;
        Ok(vec![grad_x, grad_y])
    }

    fn context(&self) -> &Context<T> {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut Context<T> {
        &mut self.ctx
    }
}
