//! Shape and stride algebra.
//!
//! Pure functions over dimension and stride slices. Nothing here touches tensor
//! data; the [`crate::Tensor`] views and the operations build on these.

use crate::error::TensorError;

/// Computes the number of elements of a shape.
///
/// The empty shape is a scalar and holds one element.
///
/// # Examples
///
/// ```rust
/// use tensorgrad_tensor::shape::compute_size;
///
/// assert_eq!(compute_size(&[2, 3, 4]), 24);
/// assert_eq!(compute_size(&[]), 1);
/// assert_eq!(compute_size(&[3, 0]), 0);
/// ```
pub fn compute_size(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// The rightmost dimension has stride 1 and each dimension's stride is the
/// product of all dimensions to its right.
///
/// # Examples
///
/// ```rust
/// use tensorgrad_tensor::shape::compute_strides;
///
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[2, 3, 4]), vec![12, 4, 1]);
/// ```
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// Checks whether the strides are the row-major strides of the shape.
///
/// Dimensions of size 1 are ignored since their stride is never used to
/// advance through the buffer.
pub fn is_standard_layout(shape: &[usize], strides: &[usize]) -> bool {
    if shape.len() != strides.len() {
        return false;
    }
    let mut expected_stride: usize = 1;
    for (&dim, &stride) in shape.iter().rev().zip(strides.iter().rev()) {
        if dim != 1 && stride != expected_stride {
            return false;
        }
        expected_stride = expected_stride.saturating_mul(dim);
    }
    true
}

/// Computes the NumPy-style broadcast shape of two shapes.
///
/// The shapes are aligned on the right. For each aligned pair of dimensions,
/// equal sizes are kept, a size of 1 takes the other size, and anything else
/// fails. The longer shape is always treated as the primary operand so the
/// result does not depend on argument order, and the axis reported in the
/// error is an index into the longer shape.
///
/// # Examples
///
/// ```rust
/// use tensorgrad_tensor::shape::broadcast_shapes;
///
/// assert_eq!(broadcast_shapes(&[2, 3], &[3]).unwrap(), vec![2, 3]);
/// assert_eq!(broadcast_shapes(&[7, 1, 5], &[8, 1, 6, 1]).unwrap(), vec![8, 7, 6, 5]);
/// assert!(broadcast_shapes(&[2, 3], &[4]).is_err());
/// ```
pub fn broadcast_shapes(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>, TensorError> {
    let (long, short) = if lhs.len() < rhs.len() {
        (rhs, lhs)
    } else {
        (lhs, rhs)
    };
    let offset = long.len() - short.len();

    let mut result = long.to_vec();
    for (i, &short_dim) in short.iter().enumerate() {
        let axis = i + offset;
        let long_dim = long[axis];
        result[axis] = if long_dim == short_dim || short_dim == 1 {
            long_dim
        } else if long_dim == 1 {
            short_dim
        } else {
            return Err(TensorError::BroadcastIncompatible {
                lhs: long.to_vec(),
                rhs: short.to_vec(),
                axis,
                lhs_dim: long_dim,
                rhs_dim: short_dim,
            });
        };
    }
    Ok(result)
}

/// Computes the strides of a broadcast view of `shape`/`strides` over `target`.
///
/// Missing leading dimensions are prepended with stride 0, and every dimension
/// of size 1 expanded to a larger target size gets stride 0 so the same buffer
/// slice is read repeatedly. Dimensions equal to the target keep their stride.
///
/// # Errors
///
/// Fails when the source has more dimensions than the target, or when a source
/// dimension differs from the target and is not 1.
///
/// # Examples
///
/// ```rust
/// use tensorgrad_tensor::shape::broadcast_strides;
///
/// let strides = broadcast_strides(&[3, 1], &[1, 1], &[2, 3, 4]).unwrap();
/// assert_eq!(strides, vec![0, 1, 0]);
/// ```
pub fn broadcast_strides(
    shape: &[usize],
    strides: &[usize],
    target: &[usize],
) -> Result<Vec<usize>, TensorError> {
    let invalid = || TensorError::InvalidBroadcast {
        from: shape.to_vec(),
        to: target.to_vec(),
    };

    if shape.len() > target.len() || shape.len() != strides.len() {
        return Err(invalid());
    }

    let offset = target.len() - shape.len();
    let mut result = vec![0; target.len()];
    for (i, (&dim, &stride)) in shape.iter().zip(strides).enumerate() {
        let target_dim = target[i + offset];
        result[i + offset] = if dim == target_dim {
            stride
        } else if dim == 1 {
            0
        } else {
            return Err(invalid());
        };
    }
    Ok(result)
}

/// Normalises auxiliary integer arguments (shapes, axis orders) to dimensions.
///
/// # Errors
///
/// Negative values cannot be dimensions and fail with
/// [`TensorError::TypeConversion`].
pub fn cast_to_dims(op: &'static str, args: &[isize]) -> Result<Vec<usize>, TensorError> {
    args.iter()
        .map(|&value| usize::try_from(value).map_err(|_| TensorError::TypeConversion { op, value }))
        .collect()
}

/// Iterator over buffer offsets of a strided layout, in logical row-major order.
///
/// This is how every kernel reads a tensor that might be a transposed or
/// broadcast view: the logical index advances like an odometer and the offset
/// follows the strides.
#[derive(Debug, Clone)]
pub struct StridedOffsets<'a> {
    shape: &'a [usize],
    strides: &'a [usize],
    index: Vec<usize>,
    offset: usize,
    remaining: usize,
}

impl<'a> StridedOffsets<'a> {
    /// Creates an iterator over the given layout.
    pub fn new(shape: &'a [usize], strides: &'a [usize]) -> Self {
        Self {
            shape,
            strides,
            index: vec![0; shape.len()],
            offset: 0,
            remaining: compute_size(shape),
        }
    }
}

impl Iterator for StridedOffsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.offset;

        for dim in (0..self.shape.len()).rev() {
            self.index[dim] += 1;
            self.offset += self.strides[dim];
            if self.index[dim] < self.shape[dim] {
                break;
            }
            self.offset -= self.strides[dim] * self.shape[dim];
            self.index[dim] = 0;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for StridedOffsets<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_size() {
        assert_eq!(compute_size(&[]), 1);
        assert_eq!(compute_size(&[5]), 5);
        assert_eq!(compute_size(&[2, 3]), 6);
        assert_eq!(compute_size(&[2, 0, 3]), 0);
    }

    #[test]
    fn test_compute_strides() {
        assert_eq!(compute_strides(&[]), Vec::<usize>::new());
        assert_eq!(compute_strides(&[5]), vec![1]);
        assert_eq!(compute_strides(&[3, 4]), vec![4, 1]);
        assert_eq!(compute_strides(&[2, 3, 4]), vec![12, 4, 1]);
    }

    #[test]
    fn test_standard_layout() {
        assert!(is_standard_layout(&[2, 3], &[3, 1]));
        assert!(!is_standard_layout(&[3, 2], &[1, 3]));
        assert!(!is_standard_layout(&[2, 3], &[0, 1]));
        // singleton dimensions do not matter
        assert!(is_standard_layout(&[1, 3], &[0, 1]));
        assert!(is_standard_layout(&[], &[]));
    }

    #[test]
    fn test_broadcast_shapes() -> Result<(), TensorError> {
        assert_eq!(broadcast_shapes(&[2, 3], &[3])?, vec![2, 3]);
        assert_eq!(broadcast_shapes(&[3], &[2, 3])?, vec![2, 3]);
        assert_eq!(broadcast_shapes(&[8, 1, 6, 1], &[7, 1, 5])?, vec![8, 7, 6, 5]);
        assert_eq!(broadcast_shapes(&[2, 1], &[1, 3])?, vec![2, 3]);
        assert_eq!(broadcast_shapes(&[1], &[1])?, vec![1]);
        assert_eq!(broadcast_shapes(&[], &[2, 2])?, vec![2, 2]);
        // 1 is the wildcard on both sides
        assert_eq!(broadcast_shapes(&[1, 1, 2, 3], &[2, 3, 1, 1])?, vec![2, 3, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_broadcast_shapes_incompatible() {
        let err = broadcast_shapes(&[4], &[2, 3]).unwrap_err();
        assert_eq!(
            err,
            TensorError::BroadcastIncompatible {
                lhs: vec![2, 3],
                rhs: vec![4],
                axis: 1,
                lhs_dim: 3,
                rhs_dim: 4,
            }
        );

        // the first conflicting axis is reported
        let err = broadcast_shapes(&[2, 3, 4], &[5, 3, 6]).unwrap_err();
        assert!(matches!(err, TensorError::BroadcastIncompatible { axis: 0, .. }));
    }

    #[test]
    fn test_broadcast_strides() -> Result<(), TensorError> {
        assert_eq!(broadcast_strides(&[2, 3], &[3, 1], &[1, 1, 2, 3])?, vec![0, 0, 3, 1]);
        assert_eq!(broadcast_strides(&[3], &[1], &[2, 3])?, vec![0, 1]);
        assert_eq!(broadcast_strides(&[2, 1], &[1, 1], &[2, 4])?, vec![1, 0]);
        assert_eq!(broadcast_strides(&[], &[], &[2])?, vec![0]);
        Ok(())
    }

    #[test]
    fn test_broadcast_strides_invalid() {
        // rank cannot shrink
        assert!(broadcast_strides(&[2, 3], &[3, 1], &[3]).is_err());
        // 2 cannot be expanded nor shrunk to 1
        let err = broadcast_strides(&[2, 3], &[3, 1], &[2, 3, 1, 1]).unwrap_err();
        assert_eq!(
            err,
            TensorError::InvalidBroadcast {
                from: vec![2, 3],
                to: vec![2, 3, 1, 1],
            }
        );
    }

    #[test]
    fn test_cast_to_dims() {
        assert_eq!(cast_to_dims("reshape", &[3, 2]), Ok(vec![3, 2]));
        assert_eq!(
            cast_to_dims("reshape", &[3, -1]),
            Err(TensorError::TypeConversion {
                op: "reshape",
                value: -1
            })
        );
    }

    #[test]
    fn test_strided_offsets() {
        let offsets: Vec<usize> = StridedOffsets::new(&[2, 3], &[3, 1]).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4, 5]);

        // transposed [2, 3] -> [3, 2]
        let offsets: Vec<usize> = StridedOffsets::new(&[3, 2], &[1, 3]).collect();
        assert_eq!(offsets, vec![0, 3, 1, 4, 2, 5]);

        // broadcast row
        let offsets: Vec<usize> = StridedOffsets::new(&[2, 3], &[0, 1]).collect();
        assert_eq!(offsets, vec![0, 1, 2, 0, 1, 2]);

        // scalar
        let offsets: Vec<usize> = StridedOffsets::new(&[], &[]).collect();
        assert_eq!(offsets, vec![0]);

        // empty
        assert_eq!(StridedOffsets::new(&[2, 0], &[0, 1]).count(), 0);
    }
}
