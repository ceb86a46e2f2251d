//! Reverse-mode gradient propagation.
//!
//! The graph is walked in reverse topological order from the root, so each
//! node has received every contribution from its consumers before its own
//! operation runs. Leaves that require grad accumulate into their gradient
//! cell; intermediate gradients are dropped once propagated.

use std::collections::{hash_map::Entry, HashMap, HashSet};

use tensorgrad_tensor::{Element, Tensor, TensorError, TensorId};

use crate::error::TensorOpsError;

/// Depth-first post-order over the `grad_fn` input edges.
///
/// Every node appears after all of its inputs; shared subgraphs are visited
/// once. The walk keeps its own stack so graph depth is not bounded by the
/// thread stack.
fn build_topo<T: Element>(root: &Tensor<T>) -> Vec<Tensor<T>> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    // (node, inputs already pushed)
    let mut stack = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        if !visited.insert(node.id()) {
            continue;
        }
        let inputs: Vec<Tensor<T>> = node.grad_fn().map(|op| op.inputs().to_vec()).unwrap_or_default();
        stack.push((node, true));
        stack.extend(inputs.into_iter().rev().map(|input| (input, false)));
    }
    order
}

/// Propagates a gradient of ones from `root`.
///
/// For a non-scalar root this is the gradient of the sum of its elements.
///
/// # Errors
///
/// See [`backward_with_grad`].
pub fn backward<T: Element>(root: &Tensor<T>) -> Result<(), TensorOpsError> {
    backward_with_grad(root, &root.ones_like())
}

/// Propagates `grad` from `root` to every leaf that requires grad.
///
/// Gradients accumulate into the leaves across calls; use
/// [`Tensor::zero_grad`] to reset them.
///
/// # Errors
///
/// - [`TensorOpsError::NoGradientGraph`] if `root` does not require grad.
/// - [`TensorOpsError::Tensor`] if `grad` does not have the root's shape.
/// - [`TensorOpsError::BackwardFailed`] if an operation's backward fails.
pub fn backward_with_grad<T: Element>(root: &Tensor<T>, grad: &Tensor<T>) -> Result<(), TensorOpsError> {
    if !root.requires_grad() {
        return Err(TensorOpsError::NoGradientGraph { node: root.id() });
    }
    if grad.shape() != root.shape() {
        return Err(TensorError::shape_mismatch("backward", root.shape(), grad.shape()).into());
    }

    let order = build_topo(root);
    log::debug!("backward from {} over {} nodes", root.id(), order.len());

    let mut pending: HashMap<TensorId, Tensor<T>> = HashMap::new();
    pending.insert(root.id(), grad.clone());

    for node in order.iter().rev() {
        let Some(node_grad) = pending.remove(&node.id()) else {
            continue;
        };

        let Some(op) = node.grad_fn() else {
            if node.requires_grad() {
                node.accumulate_grad(&node_grad)?;
            }
            continue;
        };

        log::trace!("backward through {} at {}", op.name(), node.id());
        let failed = |source: TensorError| TensorOpsError::BackwardFailed {
            op: op.name(),
            node: node.id(),
            source,
        };

        let grads = op.backward(Some(&node_grad)).map_err(failed)?;
        let inputs = op.inputs();
        if grads.len() != inputs.len() {
            return Err(failed(TensorError::invalid_arity(
                op.name(),
                "gradients",
                inputs.len(),
                grads.len(),
            )));
        }

        for (input, input_grad) in inputs.iter().zip(grads) {
            if !input.requires_grad() {
                continue;
            }
            if input_grad.shape() != input.shape() {
                return Err(failed(TensorError::shape_mismatch(
                    op.name(),
                    input.shape(),
                    input_grad.shape(),
                )));
            }
            match pending.entry(input.id()) {
                Entry::Occupied(mut entry) => {
                    let sum = entry.get().zip_map(&input_grad, T::add_elem).map_err(failed)?;
                    entry.insert(sum);
                }
                Entry::Vacant(entry) => {
                    entry.insert(input_grad);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{add, mul};

    #[test]
    fn test_topo_order() -> Result<(), TensorOpsError> {
        let x = Tensor::<f32>::ones(&[2], true);
        let y = Tensor::<f32>::ones(&[2], true);
        let xy = mul(&x, &y)?;
        let z = add(&xy, &x)?;

        let order = build_topo(&z);
        let ids: Vec<TensorId> = order.iter().map(|t| t.id()).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids.last(), Some(&z.id()));

        let pos = |id: TensorId| ids.iter().position(|&i| i == id);
        assert!(pos(x.id()) < pos(xy.id()));
        assert!(pos(y.id()) < pos(xy.id()));
        assert!(pos(xy.id()) < pos(z.id()));
        Ok(())
    }

    #[test]
    fn test_topo_shared_input() -> Result<(), TensorOpsError> {
        let x = Tensor::<f32>::ones(&[2], true);
        let xx = mul(&x, &x)?;
        let z = add(&xx, &xx)?;

        let ids: Vec<TensorId> = build_topo(&z).iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![x.id(), xx.id(), z.id()]);
        Ok(())
    }

    #[test]
    fn test_backward_requires_grad() {
        let x = Tensor::<f32>::ones(&[2], false);
        assert_eq!(
            backward(&x).unwrap_err(),
            TensorOpsError::NoGradientGraph { node: x.id() }
        );
    }

    #[test]
    fn test_backward_seed_shape() {
        let x = Tensor::<f32>::ones(&[2], true);
        let err = backward_with_grad(&x, &Tensor::ones(&[3], false)).unwrap_err();
        assert!(matches!(err, TensorOpsError::Tensor(TensorError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_backward_leaf_root() -> Result<(), TensorOpsError> {
        let x = Tensor::<f32>::zeros(&[3], true);
        backward(&x)?;
        assert_eq!(x.grad().map(|g| g.to_vec()), Some(vec![1.0; 3]));
        Ok(())
    }
}
