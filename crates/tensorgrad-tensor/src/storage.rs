//! Arc-based storage management for zero-copy views and efficient sharing.
//!
//! Reshape, transpose and broadcast views all clone the same [`TensorStorage`],
//! so the buffer is freed when the last tensor referencing it is dropped.

use std::sync::Arc;

/// Reference-counted flat buffer backing one or more tensors.
///
/// Cloning is cheap (just incrementing a reference count). The buffer is
/// immutable once shared: mutable access is only handed out when this handle
/// is the sole owner, or through [`TensorStorage::make_mut`], which copies the
/// buffer first when it is shared.
pub struct TensorStorage<T> {
    inner: Arc<Vec<T>>,
}

impl<T> TensorStorage<T> {
    /// Creates a new storage taking ownership of the vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            inner: Arc::new(data),
        }
    }

    /// Returns the storage data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    /// Returns the number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns true if this storage is uniquely owned (no other references).
    ///
    /// This is useful for determining if mutation is safe without cloning.
    #[inline]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }

    /// Returns the number of handles sharing this buffer.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Returns true if both handles point to the same buffer.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a mutable slice if this handle is the only owner of the buffer.
    ///
    /// Returns `None` when the buffer is shared with another tensor, so a view
    /// can never silently write through to its source.
    pub fn try_as_mut_slice(&mut self) -> Option<&mut [T]> {
        Arc::get_mut(&mut self.inner).map(|v| v.as_mut_slice())
    }

    /// Returns a mutable slice, copying the buffer first if it is shared.
    ///
    /// After this call the handle owns a private buffer; other tensors keep
    /// seeing the old values.
    pub fn make_mut(&mut self) -> &mut [T]
    where
        T: Clone,
    {
        if !self.is_unique() {
            log::trace!("copy-on-write of a shared buffer of {} elements", self.len());
        }
        Arc::make_mut(&mut self.inner).as_mut_slice()
    }

    /// Consumes the storage and returns the data as a vector.
    ///
    /// The buffer is moved out when uniquely owned and copied otherwise.
    pub fn into_vec(self) -> Vec<T>
    where
        T: Clone,
    {
        Arc::try_unwrap(self.inner).unwrap_or_else(|shared| shared.as_ref().clone())
    }
}

impl<T> Clone for TensorStorage<T> {
    /// Creates a cheap clone by incrementing the Arc reference count.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for TensorStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorStorage")
            .field("len", &self.len())
            .field("ref_count", &self.ref_count())
            .finish()
    }
}
