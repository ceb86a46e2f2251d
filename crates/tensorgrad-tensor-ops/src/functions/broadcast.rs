use tensorgrad_tensor::{shape::cast_to_dims, Context, Element, Function, Tensor, TensorError};

use super::{check_arity, check_backward, saved_shape};

/// Broadcasts a tensor to a larger shape through a stride-0 view.
///
/// Backward sums the incoming gradient over every expanded dimension.
pub struct BroadcastFn<T: Element> {
    ctx: Context<T>,
}

impl<T: Element> BroadcastFn<T> {
    /// Creates the operation with an empty context.
    pub fn new() -> Self {
        Self { ctx: Context::new() }
    }
}

impl<T: Element> Default for BroadcastFn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Function<T> for BroadcastFn<T> {
    fn name(&self) -> &'static str {
        "broadcast_to"
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
        let target = cast_to_dims(self.name(), args)?;

        let output = x.expand(&target)?;
        log::trace!("broadcast {:?} -> {:?}", x.shape(), output.shape());

        self.ctx.record_inputs(inputs);
        self.ctx.save_shapes(&[x.shape()]);
        Ok(output)
    }

    fn backward(&self, grad_output: Option<&Tensor<T>>) -> Result<Vec<Tensor<T>>, TensorError> {
        let grad = check_backward(self.name(), &self.ctx, grad_output)?;
        let shape = saved_shape(self.name(), &self.ctx, 0)?;
        Ok(vec![grad.sum_to_shape(shape)?])
    }

    fn context(&self) -> &Context<T> {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut Context<T> {
        &mut self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_forward() -> Result<(), TensorError> {
        let x = Tensor::<i32>::from_shape_vec(&[3], vec![1, 2, 3], false)?;
        let out = BroadcastFn::new().forward(&[2, 3], &[&x])?;
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out.strides(), &[0, 1]);
        assert!(out.shares_storage_with(&x));
        assert_eq!(out.to_vec(), vec![1, 2, 3, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_broadcast_errors() {
        let x = Tensor::<i32>::zeros(&[2, 3], false);
        let mut op = BroadcastFn::new();
        assert_eq!(
            op.forward(&[2, 3, 1, 1], &[&x]).unwrap_err(),
            TensorError::InvalidBroadcast {
                from: vec![2, 3],
                to: vec![2, 3, 1, 1]
            }
        );
        assert_eq!(
            op.forward(&[], &[&x]).unwrap_err(),
            TensorError::MissingArgument {
                op: "broadcast_to",
                argument: "shape"
            }
        );
        assert!(op.forward(&[3], &[&x]).is_err());
        assert!(op.context().is_empty());
    }

    #[test]
    fn test_broadcast_backward() -> Result<(), TensorError> {
        let x = Tensor::<f32>::zeros(&[2, 1], true);
        let mut op = BroadcastFn::new();
        op.forward(&[3, 2, 4], &[&x])?;

        let grads = op.backward(Some(&Tensor::ones(&[3, 2, 4], false)))?;
        assert_eq!(grads[0].shape(), &[2, 1]);
        assert_eq!(grads[0].to_vec(), vec![12.0, 12.0]);
        Ok(())
    }
}
