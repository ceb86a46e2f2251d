#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use tensorgrad_tensor as tensor;

#[doc(inline)]
pub use tensorgrad_tensor_ops as ops;

/// The types most programs need.
pub mod prelude {
    pub use tensorgrad_tensor::{random, DType, Element, Tensor, TensorError};
    pub use tensorgrad_tensor_ops::{TensorOps, TensorOpsError};
}
