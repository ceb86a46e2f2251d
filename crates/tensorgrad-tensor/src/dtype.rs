use std::fmt;

/// The element kinds a tensor can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl DType {
    /// Size of one element in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::I8 => 1,
            DType::I16 => 2,
            DType::I32 | DType::F32 => 4,
            DType::I64 | DType::F64 => 8,
        }
    }

    /// Whether the element kind is a floating point type.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    /// Lower-case name of the element kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric type that can be stored in a [`crate::Tensor`].
///
/// The arithmetic comes from `num-traits`; `NumCast` is used to convert the
/// samples of the random constructors into the element kind.
pub trait Element:
    num_traits::Num
    + num_traits::NumCast
    + Copy
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
{
    /// The runtime tag of this element kind.
    const DTYPE: DType;

    /// Converts an `f32` sample, truncating toward zero for integer kinds.
    fn from_f32(value: f32) -> Self {
        <Self as num_traits::NumCast>::from(value).unwrap_or_else(Self::zero)
    }

    /// Addition used by every kernel. Integer kinds wrap on overflow.
    fn add_elem(self, other: Self) -> Self;

    /// Multiplication used by every kernel. Integer kinds wrap on overflow.
    fn mul_elem(self, other: Self) -> Self;
}

macro_rules! impl_element {
    (int: $ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            #[inline]
            fn add_elem(self, other: Self) -> Self {
                self.wrapping_add(other)
            }

            #[inline]
            fn mul_elem(self, other: Self) -> Self {
                self.wrapping_mul(other)
            }
        }
    };
    (float: $ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            #[inline]
            fn add_elem(self, other: Self) -> Self {
                self + other
            }

            #[inline]
            fn mul_elem(self, other: Self) -> Self {
                self * other
            }
        }
    };
}

impl_element!(int: i8, DType::I8);
impl_element!(int: i16, DType::I16);
impl_element!(int: i32, DType::I32);
impl_element!(int: i64, DType::I64);
impl_element!(float: f32, DType::F32);
impl_element!(float: f64, DType::F64);
