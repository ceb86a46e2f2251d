#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `tensorgrad-tensor` holds the data side of the engine: a strided
//! N-dimensional [`Tensor`] over shared storage, the shape and stride algebra
//! behind its views, and the bookkeeping types ([`Context`], [`Function`]) that
//! the operations in `tensorgrad-tensor-ops` plug into.
//!
//! # Architecture
//!
//! - **Tensor**: a cheap-to-clone graph node holding storage, shape, strides,
//!   the gradient cell and the producing operation
//! - **TensorStorage**: an `Arc`-shared flat buffer, so views never copy
//! - **shape**: pure functions computing sizes, strides and broadcast layouts
//! - **Context / Function**: what a differentiable operation saves and implements
//! - **random**: the process-wide seeded sampler behind the random constructors
//!
//! # Quick Start
//!
//! ```rust
//! use tensorgrad_tensor::Tensor;
//!
//! let t = Tensor::<f32>::from_shape_vec(&[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false).unwrap();
//! assert_eq!(t.at(&[0, 1]).unwrap(), 2.0);
//!
//! // a raw transposed view over the same buffer
//! let v = t.view_with(&[3, 2], &[1, 3]).unwrap();
//! assert!(v.shares_storage_with(&t));
//! assert_eq!(v.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
//!
//! // the reverse of broadcasting
//! let s = t.sum_to_shape(&[3]).unwrap();
//! assert_eq!(s.to_vec(), vec![5.0, 7.0, 9.0]);
//! ```

/// Context module holding what an operation saves for backward.
pub mod context;

/// Element kinds a tensor can hold.
pub mod dtype;

/// Error types for the tensor crate.
pub mod error;

/// Function module defining the differentiable operation contract.
pub mod function;

/// Process-wide seeded sampler.
pub mod random;

/// Shape and stride algebra.
pub mod shape;

/// Storage module containing the shared memory buffer.
///
/// This module provides [`storage::TensorStorage`] which manages the actual buffer
/// for tensor data and is shared between a tensor and all its views.
pub mod storage;

/// Tensor module containing the main tensor implementation.
pub mod tensor;

pub use crate::context::Context;
pub use crate::dtype::{DType, Element};
pub use crate::error::{ErrorKind, TensorError};
pub use crate::function::Function;
pub use crate::storage::TensorStorage;
pub use crate::tensor::{Tensor, TensorId};
