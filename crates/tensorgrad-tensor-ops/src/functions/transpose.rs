use tensorgrad_tensor::{shape::cast_to_dims, Context, Element, Function, Tensor, TensorError};

use super::{check_arity, check_backward, saved_shape};

/// Permutes the dimensions of a tensor without copying.
///
/// `order[i]` names the input dimension that becomes output dimension `i`.
pub struct TransposeFn<T: Element> {
    ctx: Context<T>,
}

impl<T: Element> TransposeFn<T> {
    /// Creates the operation with an empty context.
    pub fn new() -> Self {
        Self { ctx: Context::new() }
    }
}

impl<T: Element> Default for TransposeFn<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    for &axis in order {
        match seen.get_mut(axis) {
            Some(s) if !*s => *s = true,
            _ => return false,
        }
    }
    true
}

fn permuted_view<T: Element>(tensor: &Tensor<T>, order: &[usize]) -> Result<Tensor<T>, TensorError> {
    let shape: Vec<usize> = order.iter().map(|&axis| tensor.shape()[axis]).collect();
    let strides: Vec<usize> = order.iter().map(|&axis| tensor.strides()[axis]).collect();
    tensor.view_with(&shape, &strides)
}

impl<T: Element> Function<T> for TransposeFn<T> {
    fn name(&self) -> &'static str {
        "transpose"
    }

    fn forward(&mut self, args: &[isize], inputs: &[&Tensor<T>]) -> Result<Tensor<T>, TensorError> {
        check_arity(self.name(), inputs, 1)?;
        let x = inputs[0];
        let order = cast_to_dims(self.name(), args)?;

        if order.len() != x.rank() {
            return Err(TensorError::invalid_arity(self.name(), "axes", x.rank(), order.len()));
        }
        if !is_permutation(&order) {
            return Err(TensorError::InvalidPermutation {
                order,
                rank: x.rank(),
            });
        }

        let output = permuted_view(x, &order)?;

        self.ctx.record_inputs(inputs);
        self.ctx.save_shapes(&[order.as_slice()]);
        Ok(output)
    }

    fn backward(&self, grad_output: Option<&Tensor<T>>) -> Result<Vec<Tensor<T>>, TensorError> {
        let grad = check_backward(self.name(), &self.ctx, grad_output)?;
        let order = saved_shape(self.name(), &self.ctx, 0)?;

        if grad.rank() != order.len() {
            return Err(TensorError::InvalidPermutation {
                order: order.to_vec(),
                rank: grad.rank(),
            });
        }

        let mut inverse = vec![0; order.len()];
        for (i, &axis) in order.iter().enumerate() {
            inverse[axis] = i;
        }

        let grad_input = permuted_view(grad, &inverse)?.with_requires_grad(grad.requires_grad());
        Ok(vec![grad_input])
    }

    fn context(&self) -> &Context<T> {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut Context<T> {
        &mut self.ctx
    }
}
