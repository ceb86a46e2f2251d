use crate::{dtype::Element, tensor::Tensor};

/// Per-invocation scratch space of an operation.
///
/// Forward records the graph edges to its inputs and stores whatever backward
/// needs: whole tensors for the arithmetic ops, shapes or axis orders for the
/// movement ops. Saved tensors are cheap handle clones sharing their storage.
pub struct Context<T: Element> {
    saved_tensors: Vec<Tensor<T>>,
    saved_shapes: Vec<Vec<usize>>,
    inputs: Vec<Tensor<T>>,
}

impl<T: Element> Context<T> {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self {
            saved_tensors: Vec::new(),
            saved_shapes: Vec::new(),
            inputs: Vec::new(),
        }
    }

    /// Appends tensors needed by backward, in order.
    pub fn save_for_backward(&mut self, tensors: &[&Tensor<T>]) {
        self.saved_tensors.extend(tensors.iter().map(|&t| t.clone()));
    }

    /// Appends shapes (or axis orders) needed by backward, in order.
    pub fn save_shapes(&mut self, shapes: &[&[usize]]) {
        self.saved_shapes.extend(shapes.iter().map(|s| s.to_vec()));
    }

    /// Records the inputs of the invocation, in argument order.
    pub fn record_inputs(&mut self, inputs: &[&Tensor<T>]) {
        self.inputs = inputs.iter().map(|&t| t.clone()).collect();
    }

    /// The tensors saved for backward.
    pub fn saved_tensors(&self) -> &[Tensor<T>] {
        &self.saved_tensors
    }

    /// The shapes saved for backward.
    pub fn saved_shapes(&self) -> &[Vec<usize>] {
        &self.saved_shapes
    }

    /// Returns the `index`-th saved tensor, if any.
    pub fn saved_tensor(&self, index: usize) -> Option<&Tensor<T>> {
        self.saved_tensors.get(index)
    }

    /// Returns the `index`-th saved shape, if any.
    pub fn saved_shape(&self, index: usize) -> Option<&[usize]> {
        self.saved_shapes.get(index).map(Vec::as_slice)
    }

    /// The recorded inputs.
    pub fn inputs(&self) -> &[Tensor<T>] {
        &self.inputs
    }

    /// Removes and returns every tensor handle held by the context.
    ///
    /// Saved shapes are kept.
    pub fn take_tensors(&mut self) -> Vec<Tensor<T>> {
        let mut tensors = std::mem::take(&mut self.saved_tensors);
        tensors.append(&mut self.inputs);
        tensors
    }

    /// True when forward never saved anything.
    pub fn is_empty(&self) -> bool {
        self.saved_tensors.is_empty() && self.saved_shapes.is_empty()
    }
}

impl<T: Element> Default for Context<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> std::fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("saved_tensors", &self.saved_tensors.len())
            .field("saved_shapes", &self.saved_shapes)
            .field("inputs", &self.inputs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_save() {
        let a = Tensor::<f32>::ones(&[2, 3], false);
        let b = Tensor::<f32>::zeros(&[2, 3], false);

        let mut ctx = Context::new();
        assert!(ctx.is_empty());

        ctx.record_inputs(&[&a, &b]);
        ctx.save_for_backward(&[&a, &b]);
        ctx.save_shapes(&[a.shape(), &[1usize, 0][..]]);

        assert!(!ctx.is_empty());
        assert_eq!(ctx.inputs().len(), 2);
        assert_eq!(ctx.saved_tensors().len(), 2);
        assert_eq!(ctx.saved_shape(0), Some(&[2, 3][..]));
        assert_eq!(ctx.saved_shape(1), Some(&[1, 0][..]));
        assert!(ctx.saved_shape(2).is_none());

        // saved tensors share storage with the originals
        assert!(ctx.saved_tensor(0).is_some_and(|t| t.shares_storage_with(&a)));
        assert_eq!(ctx.saved_tensor(1).map(|t| t.id()), Some(b.id()));
    }

    #[test]
    fn test_take_tensors() {
        let a = Tensor::<f32>::ones(&[2], false);
        let mut ctx = Context::new();
        ctx.record_inputs(&[&a]);
        ctx.save_for_backward(&[&a]);
        ctx.save_shapes(&[a.shape()]);

        let taken = ctx.take_tensors();
        assert_eq!(taken.len(), 2);
        assert!(ctx.inputs().is_empty());
        assert!(ctx.saved_tensors().is_empty());
        assert_eq!(ctx.saved_shape(0), Some(&[2][..]));
    }
}
