use crate::{context::Context, dtype::Element, error::TensorError, tensor::Tensor};

/// A differentiable operation.
///
/// One value is created per invocation. `forward` computes the output and
/// fills the operation's [`Context`]; the dispatch layer then attaches the
/// operation to the output as its `grad_fn`, after which it is only read.
///
/// Implementations never set `requires_grad` or `grad_fn` on their outputs.
pub trait Function<T: Element>: Send + Sync {
    /// Short operation name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Computes the output from the inputs.
    ///
    /// # Arguments
    ///
    /// * `args` - Auxiliary integer arguments (target shape, axis order).
    /// * `inputs` - The tensor operands.
    ///
    /// # Errors
    ///
    /// Fails on wrong input arity, incompatible shapes or invalid arguments.
    fn forward(&mut self, args: &[isize], inputs: &[&Tensor<T>]) -> Result<Tensor<T>, TensorError>;

    /// Computes one gradient per recorded input, in input order.
    ///
    /// # Errors
    ///
    /// [`TensorError::NullInput`] when `grad_output` is `None`,
    /// [`TensorError::EmptyContext`] when forward never ran.
    fn backward(&self, grad_output: Option<&Tensor<T>>) -> Result<Vec<Tensor<T>>, TensorError>;

    /// The context filled by forward.
    fn context(&self) -> &Context<T>;

    /// Mutable access to the context, used to unlink the graph on drop.
    fn context_mut(&mut self) -> &mut Context<T>;

    /// The graph edges to the inputs of this invocation.
    fn inputs(&self) -> &[Tensor<T>] {
        self.context().inputs()
    }
}
