use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, PoisonError, RwLock,
};

use crate::{
    dtype::{DType, Element},
    error::TensorError,
    function::Function,
    random,
    shape::{self, StridedOffsets},
    storage::TensorStorage,
};

/// Number of values printed by the `Display` implementation.
const DISPLAY_LIMIT: usize = 8;

static NEXT_TENSOR_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a tensor node.
///
/// Two handles compare equal here only if one is a clone of the other. Views
/// sharing the same storage are still distinct nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorId(u64);

impl TensorId {
    fn next() -> Self {
        Self(NEXT_TENSOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct TensorInner<T: Element> {
    id: TensorId,
    storage: TensorStorage<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    size: usize,
    requires_grad: bool,
    grad: RwLock<Option<Tensor<T>>>,
    grad_fn: Option<Arc<dyn Function<T>>>,
}

impl<T: Element> Drop for TensorInner<T> {
    /// Unlinks the graph above this node with an explicit stack.
    ///
    /// The default drop glue recurses once per graph level and overflows the
    /// thread stack on long chains. Nodes still referenced elsewhere are left
    /// alone.
    fn drop(&mut self) {
        let mut stack: Vec<Arc<dyn Function<T>>> = self.grad_fn.take().into_iter().collect();
        while let Some(mut op) = stack.pop() {
            let Some(func) = Arc::get_mut(&mut op) else {
                continue;
            };
            for tensor in func.context_mut().take_tensors() {
                if let Ok(mut inner) = Arc::try_unwrap(tensor.inner) {
                    stack.extend(inner.grad_fn.take());
                }
            }
        }
    }
}

/// A strided N-dimensional array that can take part in a gradient graph.
///
/// `Tensor` is a cheap-to-clone handle: clones are the same graph node and
/// share everything, including the accumulated gradient. Views created by
/// reshape, transpose or broadcast are new nodes over the same storage.
///
/// Tensors are immutable once built. The only mutable part is the gradient
/// cell, written by backward and [`Tensor::zero_grad`].
///
/// # Example
///
/// ```
/// use tensorgrad_tensor::Tensor;
///
/// let t = Tensor::<f32>::from_shape_vec(&[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false).unwrap();
/// assert_eq!(t.shape(), &[2, 3]);
/// assert_eq!(t.strides(), &[3, 1]);
/// assert_eq!(t.at(&[1, 2]).unwrap(), 6.0);
/// ```
pub struct Tensor<T: Element> {
    inner: Arc<TensorInner<T>>,
}

impl<T: Element> Tensor<T> {
    fn from_parts(
        storage: TensorStorage<T>,
        shape: Vec<usize>,
        strides: Vec<usize>,
        requires_grad: bool,
        grad_fn: Option<Arc<dyn Function<T>>>,
    ) -> Self {
        let size = shape::compute_size(&shape);
        Self {
            inner: Arc::new(TensorInner {
                id: TensorId::next(),
                storage,
                shape,
                strides,
                size,
                requires_grad,
                grad: RwLock::new(None),
                grad_fn,
            }),
        }
    }

    fn from_contiguous_vec(shape: &[usize], data: Vec<T>, requires_grad: bool) -> Self {
        Self::from_parts(
            TensorStorage::from_vec(data),
            shape.to_vec(),
            shape::compute_strides(shape),
            requires_grad,
            None,
        )
    }

    /// Creates a zero-filled leaf tensor with row-major strides.
    ///
    /// An empty shape creates a scalar holding one element.
    pub fn new(shape: &[usize], requires_grad: bool) -> Self {
        Self::from_shape_val(shape, T::zero(), requires_grad)
    }

    /// Creates a leaf tensor filled with zeros.
    pub fn zeros(shape: &[usize], requires_grad: bool) -> Self {
        Self::new(shape, requires_grad)
    }

    /// Creates a leaf tensor filled with ones.
    pub fn ones(shape: &[usize], requires_grad: bool) -> Self {
        Self::from_shape_val(shape, T::one(), requires_grad)
    }

    /// Creates a leaf tensor with values `2r - 1` in `[-1, 1)`.
    ///
    /// `r` is drawn from the process-wide sampler. Integer kinds truncate
    /// toward zero.
    pub fn uniform(shape: &[usize], requires_grad: bool) -> Self {
        let data = random::sample(shape::compute_size(shape))
            .into_iter()
            .map(|r| T::from_f32(2.0 * r - 1.0))
            .collect();
        Self::from_contiguous_vec(shape, data, requires_grad)
    }

    /// Creates a leaf tensor with values `r` in `[0, 1)` drawn from the
    /// process-wide sampler.
    pub fn randn(shape: &[usize], requires_grad: bool) -> Self {
        let data = random::sample(shape::compute_size(shape))
            .into_iter()
            .map(T::from_f32)
            .collect();
        Self::from_contiguous_vec(shape, data, requires_grad)
    }

    /// Creates a leaf tensor from a shape and a row-major vector of values.
    ///
    /// # Errors
    ///
    /// If the number of values does not match the shape, an error is returned.
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>, requires_grad: bool) -> Result<Self, TensorError> {
        let numel = shape::compute_size(shape);
        if numel != data.len() {
            return Err(TensorError::ElementCountMismatch {
                op: "from_shape_vec",
                expected: numel,
                got: data.len(),
            });
        }
        Ok(Self::from_contiguous_vec(shape, data, requires_grad))
    }

    /// Creates a leaf tensor with every element set to `value`.
    pub fn from_shape_val(shape: &[usize], value: T, requires_grad: bool) -> Self {
        let data = vec![value; shape::compute_size(shape)];
        Self::from_contiguous_vec(shape, data, requires_grad)
    }

    /// Creates a rank-0 tensor.
    pub fn scalar(value: T, requires_grad: bool) -> Self {
        Self::from_shape_val(&[], value, requires_grad)
    }

    /// Creates a zero-filled tensor with the same shape. It does not require grad.
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.shape(), false)
    }

    /// Creates a tensor of ones with the same shape. It does not require grad.
    pub fn ones_like(&self) -> Self {
        Self::ones(self.shape(), false)
    }

    /// Identity of this graph node.
    #[inline]
    pub fn id(&self) -> TensorId {
        self.inner.id
    }

    /// The logical shape.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.inner.shape
    }

    /// Element offsets per dimension, 0 for broadcast dimensions.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.inner.strides
    }

    /// Number of logical elements. Can exceed the storage length for broadcast views.
    #[inline]
    pub fn size(&self) -> usize {
        self.inner.size
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.inner.shape.len()
    }

    /// The runtime element kind.
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// The shared buffer.
    #[inline]
    pub fn storage(&self) -> &TensorStorage<T> {
        &self.inner.storage
    }

    /// Whether gradients flow into this tensor.
    #[inline]
    pub fn requires_grad(&self) -> bool {
        self.inner.requires_grad
    }

    /// The operation that produced this tensor, if it is part of a graph.
    pub fn grad_fn(&self) -> Option<&Arc<dyn Function<T>>> {
        self.inner.grad_fn.as_ref()
    }

    /// A tensor is a leaf when no tracked operation produced it.
    pub fn is_leaf(&self) -> bool {
        self.inner.grad_fn.is_none()
    }

    /// Checks if the strides are the row-major strides of the shape.
    pub fn is_standard_layout(&self) -> bool {
        shape::is_standard_layout(self.shape(), self.strides())
    }

    /// Whether both tensors read the same buffer.
    pub fn shares_storage_with(&self, other: &Tensor<T>) -> bool {
        self.storage().ptr_eq(other.storage())
    }

    /// Returns a node sharing this tensor's data, with `grad_fn` attached and
    /// `requires_grad` set.
    ///
    /// This is how the dispatch layer wires an operation into the graph.
    pub fn with_grad_fn(&self, grad_fn: Arc<dyn Function<T>>) -> Self {
        Self::from_parts(
            self.storage().clone(),
            self.shape().to_vec(),
            self.strides().to_vec(),
            true,
            Some(grad_fn),
        )
    }

    /// Returns a leaf sharing this tensor's data, cut from any graph.
    pub fn detach(&self) -> Self {
        self.with_requires_grad(false)
    }

    /// Returns a leaf sharing this tensor's data with the given flag.
    pub fn with_requires_grad(&self, requires_grad: bool) -> Self {
        Self::from_parts(
            self.storage().clone(),
            self.shape().to_vec(),
            self.strides().to_vec(),
            requires_grad,
            None,
        )
    }

    /// Creates a raw view over the same storage with the given layout.
    ///
    /// The view is a leaf that does not require grad; use the operations for
    /// differentiable views.
    ///
    /// # Errors
    ///
    /// Fails if shape and strides differ in length or any addressed offset is
    /// outside the storage.
    pub fn view_with(&self, shape: &[usize], strides: &[usize]) -> Result<Self, TensorError> {
        if shape.len() != strides.len() {
            return Err(TensorError::invalid_view(format!(
                "shape {shape:?} and strides {strides:?} differ in length"
            )));
        }
        if shape::compute_size(shape) > 0 {
            let max_offset = shape
                .iter()
                .zip(strides)
                .try_fold(0usize, |acc, (&d, &s)| (d - 1).checked_mul(s).and_then(|o| acc.checked_add(o)))
                .ok_or_else(|| {
                    TensorError::invalid_view(format!("strides {strides:?} overflow for shape {shape:?}"))
                })?;
            if max_offset >= self.storage().len() {
                return Err(TensorError::invalid_view(format!(
                    "offset {max_offset} outside storage of {} elements",
                    self.storage().len()
                )));
            }
        }
        Ok(Self::from_parts(
            self.storage().clone(),
            shape.to_vec(),
            strides.to_vec(),
            false,
            None,
        ))
    }

    /// Creates a raw broadcast view of this tensor over `target`.
    ///
    /// # Errors
    ///
    /// See [`shape::broadcast_strides`].
    pub fn expand(&self, target: &[usize]) -> Result<Self, TensorError> {
        let strides = shape::broadcast_strides(self.shape(), self.strides(), target)?;
        self.view_with(target, &strides)
    }

    /// Returns the element at the given multi-dimensional index.
    ///
    /// # Errors
    ///
    /// [`TensorError::InvalidArity`] if the number of indices is not the rank,
    /// [`TensorError::IndexOutOfBounds`] if an index is negative or too large.
    pub fn at(&self, indices: &[isize]) -> Result<T, TensorError> {
        if indices.len() != self.rank() {
            return Err(TensorError::invalid_arity("at", "indices", self.rank(), indices.len()));
        }

        let mut offset = 0;
        for (dim, ((&index, &size), &stride)) in indices
            .iter()
            .zip(self.shape())
            .zip(self.strides())
            .enumerate()
        {
            let i = usize::try_from(index)
                .ok()
                .filter(|&i| i < size)
                .ok_or(TensorError::IndexOutOfBounds { index, dim, size })?;
            offset += i * stride;
        }

        self.storage()
            .as_slice()
            .get(offset)
            .copied()
            .ok_or_else(|| TensorError::invalid_view(format!("offset {offset} outside storage")))
    }

    /// Iterates the elements in logical row-major order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let data = self.storage().as_slice();
        StridedOffsets::new(self.shape(), self.strides()).map(move |offset| data[offset])
    }

    /// Copies the elements out in logical row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Returns a tensor with row-major layout over a buffer of exactly `size`
    /// elements.
    ///
    /// Already contiguous tensors are returned as is. Otherwise the data is
    /// copied into a fresh leaf that does not require grad.
    pub fn contiguous(&self) -> Self {
        if self.is_standard_layout() && self.size() == self.storage().len() {
            return self.clone();
        }
        log::debug!(
            "materialising {:?} view with strides {:?}",
            self.shape(),
            self.strides()
        );
        Self::from_contiguous_vec(self.shape(), self.to_vec(), false)
    }

    /// Applies `f` to every element, producing a new contiguous leaf.
    pub fn map<U, F>(&self, f: F) -> Tensor<U>
    where
        U: Element,
        F: Fn(T) -> U,
    {
        let data = self.iter().map(f).collect();
        Tensor::from_contiguous_vec(self.shape(), data, false)
    }

    /// Combines two tensors of identical shape element by element.
    ///
    /// Either side can be a transposed or broadcast view. The result is a new
    /// contiguous leaf.
    ///
    /// # Errors
    ///
    /// [`TensorError::ShapeMismatch`] if the shapes differ.
    pub fn zip_map<F>(&self, other: &Tensor<T>, f: F) -> Result<Self, TensorError>
    where
        F: Fn(T, T) -> T,
    {
        if self.shape() != other.shape() {
            return Err(TensorError::shape_mismatch("zip_map", self.shape(), other.shape()));
        }
        let data = self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect();
        Ok(Self::from_contiguous_vec(self.shape(), data, false))
    }

    /// Sums this tensor down to `target`, the reverse of broadcasting.
    ///
    /// Every dimension that was prepended or expanded from 1 is summed over.
    /// The result is a new contiguous leaf of shape `target`.
    ///
    /// # Errors
    ///
    /// [`TensorError::InvalidBroadcast`] if `target` does not broadcast to this
    /// tensor's shape.
    pub fn sum_to_shape(&self, target: &[usize]) -> Result<Self, TensorError> {
        let out_strides = shape::broadcast_strides(target, &shape::compute_strides(target), self.shape())
            .map_err(|_| TensorError::InvalidBroadcast {
                from: self.shape().to_vec(),
                to: target.to_vec(),
            })?;

        let mut out = vec![T::zero(); shape::compute_size(target)];
        for (value, dst) in self
            .iter()
            .zip(StridedOffsets::new(self.shape(), &out_strides))
        {
            out[dst] = out[dst].add_elem(value);
        }
        Ok(Self::from_contiguous_vec(target, out, false))
    }

    /// The gradient accumulated by backward, if any.
    pub fn grad(&self) -> Option<Tensor<T>> {
        self.inner
            .grad
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the accumulated gradient.
    pub fn zero_grad(&self) {
        *self.inner.grad.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Adds `grad` into the gradient cell.
    ///
    /// # Errors
    ///
    /// [`TensorError::ShapeMismatch`] if `grad` does not have this tensor's shape.
    pub fn accumulate_grad(&self, grad: &Tensor<T>) -> Result<(), TensorError> {
        if grad.shape() != self.shape() {
            return Err(TensorError::shape_mismatch("accumulate_grad", self.shape(), grad.shape()));
        }
        let mut cell = self.inner.grad.write().unwrap_or_else(PoisonError::into_inner);
        let updated = match cell.as_ref() {
            Some(current) => current.zip_map(grad, T::add_elem)?,
            None => grad.contiguous().detach(),
        };
        *cell = Some(updated);
        Ok(())
    }
}

impl<T: Element> Clone for Tensor<T> {
    /// Returns another handle to the same node.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Element> std::fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tensor(shape={:?}, strides={:?}, dtype={}, leaf={}, requires_grad={}, data=[",
            self.shape(),
            self.strides(),
            self.dtype(),
            self.is_leaf(),
            self.requires_grad()
        )?;
        for (i, value) in self.iter().take(DISPLAY_LIMIT).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value:?}")?;
        }
        if self.size() > DISPLAY_LIMIT {
            f.write_str(", ...")?;
        }
        f.write_str("])")
    }
}

impl<T: Element> std::fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("id", &self.id())
            .field("shape", &self.shape())
            .field("strides", &self.strides())
            .field("dtype", &self.dtype())
            .field("requires_grad", &self.requires_grad())
            .field("grad_fn", &self.grad_fn().map(|op| op.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed_leaf() {
        let t = Tensor::<f32>::new(&[2, 3], true);
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.strides(), &[3, 1]);
        assert_eq!(t.size(), 6);
        assert_eq!(t.storage().len(), 6);
        assert!(t.requires_grad());
        assert!(t.is_leaf());
        assert!(t.grad().is_none());
        assert_eq!(t.to_vec(), vec![0.0; 6]);
    }

    #[test]
    fn test_scalar() -> Result<(), TensorError> {
        let t = Tensor::<i32>::scalar(5, false);
        assert_eq!(t.rank(), 0);
        assert_eq!(t.size(), 1);
        assert_eq!(t.at(&[])?, 5);
        Ok(())
    }

    #[test]
    fn test_from_shape_vec_mismatch() {
        let res = Tensor::<i32>::from_shape_vec(&[2, 3], vec![1, 2, 3], false);
        assert_eq!(
            res.unwrap_err(),
            TensorError::ElementCountMismatch {
                op: "from_shape_vec",
                expected: 6,
                got: 3
            }
        );
    }

    #[test]
    fn test_uniform_range() {
        let t = Tensor::<f32>::uniform(&[100], false);
        assert!(t.iter().all(|v| (-1.0..1.0).contains(&v)));

        let t = Tensor::<f64>::randn(&[100], false);
        assert!(t.iter().all(|v| (0.0..1.0).contains(&v)));

        // integer kinds truncate toward zero
        let t = Tensor::<i32>::uniform(&[100], false);
        assert!(t.iter().all(|v| v == 0));
    }

    #[test]
    fn test_at() -> Result<(), TensorError> {
        let t = Tensor::<i32>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6], false)?;
        assert_eq!(t.at(&[0, 0])?, 1);
        assert_eq!(t.at(&[1, 2])?, 6);
        assert_eq!(
            t.at(&[2, 0]),
            Err(TensorError::IndexOutOfBounds {
                index: 2,
                dim: 0,
                size: 2
            })
        );
        assert_eq!(
            t.at(&[0, -1]),
            Err(TensorError::IndexOutOfBounds {
                index: -1,
                dim: 1,
                size: 3
            })
        );
        assert_eq!(t.at(&[1]), Err(TensorError::invalid_arity("at", "indices", 2, 1)));
        Ok(())
    }

    #[test]
    fn test_view_with() -> Result<(), TensorError> {
        let t = Tensor::<i32>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6], false)?;
        let v = t.view_with(&[3, 2], &[1, 3])?;
        assert!(v.shares_storage_with(&t));
        assert!(!v.is_standard_layout());
        assert_eq!(v.to_vec(), vec![1, 4, 2, 5, 3, 6]);
        assert_eq!(v.at(&[2, 1])?, 6);

        assert!(t.view_with(&[3, 3], &[3, 1]).is_err());
        assert!(t.view_with(&[6], &[1, 1]).is_err());
        // empty views never read the buffer
        assert!(t.view_with(&[0, 100], &[1, 1]).is_ok());

        let z = Tensor::<f32>::zeros(&[4], false);
        assert!(matches!(
            z.view_with(&[3], &[usize::MAX]),
            Err(TensorError::InvalidView { .. })
        ));
        assert!(z.view_with(&[2, 2], &[usize::MAX / 2 + 1, usize::MAX / 2 + 1]).is_err());
        Ok(())
    }

    #[test]
    fn test_expand() -> Result<(), TensorError> {
        let t = Tensor::<i32>::from_shape_vec(&[3], vec![1, 2, 3], false)?;
        let e = t.expand(&[2, 3])?;
        assert_eq!(e.strides(), &[0, 1]);
        assert_eq!(e.size(), 6);
        assert_eq!(e.storage().len(), 3);
        assert_eq!(e.to_vec(), vec![1, 2, 3, 1, 2, 3]);

        assert!(t.expand(&[2, 4]).is_err());
        Ok(())
    }

    #[test]
    fn test_contiguous() -> Result<(), TensorError> {
        let t = Tensor::<i32>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6], false)?;
        let same = t.contiguous();
        assert_eq!(same.id(), t.id());

        let v = t.view_with(&[3, 2], &[1, 3])?;
        let c = v.contiguous();
        assert!(c.is_standard_layout());
        assert!(!c.shares_storage_with(&t));
        assert_eq!(c.storage().as_slice(), &[1, 4, 2, 5, 3, 6]);
        Ok(())
    }

    #[test]
    fn test_zip_map() -> Result<(), TensorError> {
        let a = Tensor::<i32>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6], false)?;
        let b = Tensor::<i32>::from_shape_vec(&[3], vec![10, 20, 30], false)?.expand(&[2, 3])?;
        let c = a.zip_map(&b, |x, y| x + y)?;
        assert_eq!(c.to_vec(), vec![11, 22, 33, 14, 25, 36]);

        let d = Tensor::<i32>::zeros(&[3, 2], false);
        assert!(matches!(
            a.zip_map(&d, |x, y| x + y),
            Err(TensorError::ShapeMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_map() -> Result<(), TensorError> {
        let a = Tensor::<i32>::from_shape_vec(&[2, 2], vec![1, 2, 3, 4], false)?;
        let b: Tensor<f32> = a.map(|x| x as f32 * 0.5);
        assert_eq!(b.to_vec(), vec![0.5, 1.0, 1.5, 2.0]);
        Ok(())
    }

    #[test]
    fn test_sum_to_shape() -> Result<(), TensorError> {
        let t = Tensor::<i32>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6], false)?;
        assert_eq!(t.sum_to_shape(&[3])?.to_vec(), vec![5, 7, 9]);
        assert_eq!(t.sum_to_shape(&[2, 1])?.to_vec(), vec![6, 15]);
        assert_eq!(t.sum_to_shape(&[1, 3])?.shape(), &[1, 3]);
        assert_eq!(t.sum_to_shape(&[])?.to_vec(), vec![21]);
        assert_eq!(t.sum_to_shape(&[2, 3])?.to_vec(), t.to_vec());
        assert_eq!(
            t.sum_to_shape(&[2]),
            Err(TensorError::InvalidBroadcast {
                from: vec![2, 3],
                to: vec![2]
            })
        );
        Ok(())
    }

    #[test]
    fn test_accumulate_grad() -> Result<(), TensorError> {
        let t = Tensor::<f32>::zeros(&[2], true);
        let g = Tensor::<f32>::from_shape_vec(&[2], vec![1.0, 2.0], false)?;
        t.accumulate_grad(&g)?;
        t.accumulate_grad(&g)?;
        assert_eq!(t.grad().map(|g| g.to_vec()), Some(vec![2.0, 4.0]));

        // clones are the same node
        let alias = t.clone();
        assert_eq!(alias.grad().map(|g| g.to_vec()), Some(vec![2.0, 4.0]));

        assert!(t.accumulate_grad(&Tensor::zeros(&[3], false)).is_err());

        t.zero_grad();
        assert!(alias.grad().is_none());
        Ok(())
    }

    #[test]
    fn test_detach() {
        let t = Tensor::<f32>::ones(&[2], true);
        let d = t.detach();
        assert!(!d.requires_grad());
        assert!(d.is_leaf());
        assert!(d.shares_storage_with(&t));
        assert_ne!(d.id(), t.id());
    }

    #[test]
    fn test_display() -> Result<(), TensorError> {
        let t = Tensor::<f32>::from_shape_vec(&[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false)?;
        assert_eq!(
            t.to_string(),
            "Tensor(shape=[2, 3], strides=[3, 1], dtype=float32, leaf=true, requires_grad=false, \
             data=[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])"
        );

        let t = Tensor::<i8>::ones(&[10], true);
        assert_eq!(
            t.to_string(),
            "Tensor(shape=[10], strides=[1], dtype=int8, leaf=true, requires_grad=true, \
             data=[1, 1, 1, 1, 1, 1, 1, 1, ...])"
        );

        // views print what they address, not the buffer prefix
        let v = Tensor::<i32>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6], false)?.view_with(&[3, 2], &[1, 3])?;
        assert!(v.to_string().ends_with("data=[1, 4, 2, 5, 3, 6])"));
        Ok(())
    }
}
