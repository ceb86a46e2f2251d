use tensorgrad_tensor::{Context, Element, Function, Tensor, TensorError};

use super::{check_arity, check_backward, saved_shape};

/// Element-wise addition of two tensors of identical shape.
pub struct AddFn<T: Element> {
    ctx: Context<T>,
}

impl<T: Element> AddFn<T> {
    /// Creates the operation with an empty context.
    pub fn new() -> Self {
        Self { ctx: Context::new() }
    }
}

impl<T: Element> Default for AddFn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Function<T> for AddFn<T> {
    fn name(&self) -> &'static str {
        "add"
    }

    fn forward(&mut self, _args: &[isize], inputs: &[&Tensor<T>]) -> Result<Tensor<T>, TensorError> {
        check_arity(self.name(), inputs, 2)?;
        let (x, y) = (inputs[0], inputs[1]);
        if x.shape() != y.shape() {
            return Err(TensorError::shape_mismatch(self.name(), x.shape(), y.shape()));
        }

        let output = x.zip_map(y, T::add_elem)?;

        self.ctx.record_inputs(inputs);
        self.ctx.save_for_backward(&[x, y]);
        self.ctx.save_shapes(&[x.shape(), y.shape()]);
        Ok(output)
    }

    fn backward(&self, grad_output: Option<&Tensor<T>>) -> Result<Vec<Tensor<T>>, TensorError> {
        let grad = check_backward(self.name(), &self.ctx, grad_output)?;
        let x_shape = saved_shape(self.name(), &self.ctx, 0)?;
        let y_shape = saved_shape(self.name(), &self.ctx, 1)?;
        Ok(vec![grad.sum_to_shape(x_shape)?, grad.sum_to_shape(y_shape)?])
    }

    fn context(&self) -> &Context<T> {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut Context<T> {
        &mut self.ctx
    }
}
