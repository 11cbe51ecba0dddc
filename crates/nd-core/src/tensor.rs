use std::fmt;

use smallvec::SmallVec;

use crate::dtype::DType;
use crate::error::CoreError;
use crate::order::Order;
use crate::shape::Shape;
use crate::storage::Storage;
use crate::Result;

/// A multi-dimensional array as seen by the operation framework.
///
/// A tensor is shape and layout metadata plus an optional CPU buffer.
/// Tensors built with [`Tensor::placeholder`] carry metadata only and report
/// `non_null() == false`, which is how validation tells a declared-but-empty
/// input apart from a real one.
///
/// Flat indices in the public API are always logical row-major positions;
/// the `order` only decides where an element sits in the buffer.
///
/// # Examples
///
/// ```
/// use nd_core::{Order, Tensor};
///
/// let t = Tensor::from_f32(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
/// assert_eq!(t.shape().dims(), &[2, 3]);
/// assert_eq!(t.length(), 6);
///
/// let f = t.to_order(Order::F).unwrap();
/// assert_eq!(f.as_f32_slice().unwrap(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
/// assert_eq!(f.get_f64(1), Some(2.0));
/// ```
#[derive(Clone)]
pub struct Tensor {
    storage: Option<Storage>,
    shape: Shape,
    strides: SmallVec<[usize; 4]>,
    order: Order,
    dtype: DType,
}

impl Tensor {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a row-major tensor from f32 data with the given shape.
    pub fn from_f32(data: &[f32], shape: &[usize]) -> Self {
        Self::check_numel(shape, data.len());
        Self::from_parts(Storage::from_f32(data), Shape::new(shape), Order::C)
    }

    /// Create a row-major tensor from f64 data with the given shape.
    pub fn from_f64(data: &[f64], shape: &[usize]) -> Self {
        Self::check_numel(shape, data.len());
        Self::from_parts(Storage::from_f64(data), Shape::new(shape), Order::C)
    }

    /// Create a row-major tensor from i32 data with the given shape.
    pub fn from_i32(data: &[i32], shape: &[usize]) -> Self {
        Self::check_numel(shape, data.len());
        Self::from_parts(Storage::from_i32(data), Shape::new(shape), Order::C)
    }

    /// Create a row-major tensor from i64 data with the given shape.
    pub fn from_i64(data: &[i64], shape: &[usize]) -> Self {
        Self::check_numel(shape, data.len());
        Self::from_parts(Storage::from_i64(data), Shape::new(shape), Order::C)
    }

    /// Create a tensor of zeros with the given shape, dtype and ordering.
    pub fn zeros(shape: &[usize], dtype: DType, order: Order) -> Self {
        let s = Shape::new(shape);
        let storage = Storage::zeros(dtype, s.numel());
        Self::from_parts(storage, s, order)
    }

    /// Create a tensor with shape metadata but no data buffer.
    pub fn placeholder(shape: &[usize], dtype: DType, order: Order) -> Self {
        let s = Shape::new(shape);
        let strides = s.strides_for(order);
        Self {
            storage: None,
            shape: s,
            strides,
            order,
            dtype,
        }
    }

    /// Build a tensor of `dtype` from logical row-major values, stored in `order`.
    ///
    /// Values are narrowed from f64 to the target dtype (integers truncate).
    pub fn from_values(values: &[f64], shape: &[usize], dtype: DType, order: Order) -> Result<Self> {
        let s = Self::checked_shape(shape, values.len())?;
        let physical = scatter_to_order(values, &s, order);
        let storage = match dtype {
            DType::F32 => Storage::from_f32(&physical.iter().map(|&v| v as f32).collect::<Vec<_>>()),
            DType::F64 => Storage::from_f64(&physical),
            DType::I32 => Storage::from_i32(&physical.iter().map(|&v| v as i32).collect::<Vec<_>>()),
            DType::I64 => Storage::from_i64(&physical.iter().map(|&v| v as i64).collect::<Vec<_>>()),
        };
        Ok(Self::from_parts(storage, s, order))
    }

    /// Build an integer tensor from logical row-major values, stored in `order`.
    ///
    /// `I32` keeps the low 32 bits of each value, so results computed with
    /// wrapping i64 arithmetic stay wrapped at 32 bits.
    pub fn from_i64_values(values: &[i64], shape: &[usize], dtype: DType, order: Order) -> Result<Self> {
        let s = Self::checked_shape(shape, values.len())?;
        let physical = scatter_to_order(values, &s, order);
        let storage = match dtype {
            DType::I32 => Storage::from_i32(&physical.iter().map(|&v| v as i32).collect::<Vec<_>>()),
            DType::I64 => Storage::from_i64(&physical),
            other => return Err(CoreError::UnsupportedDType(other)),
        };
        Ok(Self::from_parts(storage, s, order))
    }

    fn checked_shape(shape: &[usize], got: usize) -> Result<Shape> {
        let s = Shape::new(shape);
        let expected = s
            .checked_numel()
            .ok_or_else(|| CoreError::ShapeOverflow(shape.to_vec()))?;
        if expected != got {
            return Err(CoreError::LengthMismatch {
                shape: shape.to_vec(),
                expected,
                got,
            });
        }
        Ok(s)
    }

    fn from_parts(storage: Storage, shape: Shape, order: Order) -> Self {
        let strides = shape.strides_for(order);
        let dtype = storage.dtype();
        Self {
            storage: Some(storage),
            shape,
            strides,
            order,
            dtype,
        }
    }

    fn check_numel(shape: &[usize], got: usize) {
        let s = Shape::new(shape);
        assert_eq!(
            s.numel(),
            got,
            "Shape {:?} requires {} elements, got {}",
            shape,
            s.numel(),
            got
        );
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Shape of the tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements.
    pub fn length(&self) -> usize {
        self.shape.numel()
    }

    /// Memory ordering of the buffer.
    pub fn ordering(&self) -> Order {
        self.order
    }

    /// Data type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Strides (in elements, not bytes).
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Whether the tensor actually holds a data buffer.
    pub fn non_null(&self) -> bool {
        self.storage.is_some()
    }

    // =========================================================================
    // Data access
    // =========================================================================

    /// The raw f32 buffer in physical (ordering-dependent) layout.
    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        self.storage.as_ref()?.as_f32_slice()
    }

    /// Mutable f32 buffer (copy-on-write).
    pub fn as_f32_slice_mut(&mut self) -> Option<&mut [f32]> {
        self.storage.as_mut()?.as_f32_slice_mut()
    }

    /// The raw f64 buffer in physical (ordering-dependent) layout.
    pub fn as_f64_slice(&self) -> Option<&[f64]> {
        self.storage.as_ref()?.as_f64_slice()
    }

    /// Get a single element by logical row-major index, widened to f64.
    pub fn get_f64(&self, flat_index: usize) -> Option<f64> {
        let storage = self.storage.as_ref()?;
        let physical = self.flat_to_physical(flat_index)?;
        storage.get_f64(physical)
    }

    /// All elements in logical row-major order, widened to f64.
    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        let storage = self.storage.as_ref().ok_or(CoreError::Unallocated)?;
        if self.order == Order::C {
            return Ok((0..storage.numel()).filter_map(|i| storage.get_f64(i)).collect());
        }
        (0..self.length())
            .map(|i| self.get_f64(i).ok_or(CoreError::Unallocated))
            .collect()
    }

    /// All elements of an integer tensor in logical row-major order, widened
    /// to i64 without loss.
    pub fn to_i64_vec(&self) -> Result<Vec<i64>> {
        let storage = self.storage.as_ref().ok_or(CoreError::Unallocated)?;
        if !self.dtype.is_integer() {
            return Err(CoreError::UnsupportedDType(self.dtype));
        }
        (0..self.length())
            .map(|i| {
                self.flat_to_physical(i)
                    .and_then(|p| storage.get_i64(p))
                    .ok_or(CoreError::Unallocated)
            })
            .collect()
    }

    /// Copy of this tensor with its buffer re-laid out in `order`.
    pub fn to_order(&self, order: Order) -> Result<Tensor> {
        if order == self.order {
            return Ok(self.clone());
        }
        if !self.non_null() {
            return Ok(Tensor::placeholder(self.shape.dims(), self.dtype, order));
        }
        if self.dtype.is_integer() {
            let values = self.to_i64_vec()?;
            return Tensor::from_i64_values(&values, self.shape.dims(), self.dtype, order);
        }
        let values = self.to_f64_vec()?;
        Tensor::from_values(&values, self.shape.dims(), self.dtype, order)
    }

    /// Convert logical row-major index to physical storage index.
    fn flat_to_physical(&self, flat_index: usize) -> Option<usize> {
        if flat_index >= self.length() {
            return None;
        }
        Some(physical_index(flat_index, &self.shape, &self.strides))
    }
}

fn physical_index(flat_index: usize, shape: &Shape, strides: &[usize]) -> usize {
    let mut remaining = flat_index;
    let mut physical = 0;
    for (i, &cs) in shape.contiguous_strides().iter().enumerate() {
        let idx = remaining / cs;
        remaining %= cs;
        physical += idx * strides[i];
    }
    physical
}

/// Place logical row-major values at their physical positions for `order`.
fn scatter_to_order<T: Copy + Default>(values: &[T], shape: &Shape, order: Order) -> Vec<T> {
    if order == Order::C || shape.ndim() < 2 {
        return values.to_vec();
    }
    let strides = shape.strides_for(order);
    let mut out = vec![T::default(); values.len()];
    for (i, &v) in values.iter().enumerate() {
        out[physical_index(i, shape, &strides)] = v;
    }
    out
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={}, dtype={}, order={}, allocated={})",
            self.shape,
            self.dtype,
            self.order,
            self.non_null(),
        )
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_f64_vec() {
            Ok(data) if data.len() <= 20 => {
                write!(f, "tensor({:?}, shape={}, order={})", data, self.shape, self.order)
            }
            Ok(data) => write!(
                f,
                "tensor([{:.4}, {:.4}, ..., {:.4}], shape={}, order={})",
                data[0],
                data[1],
                data[data.len() - 1],
                self.shape,
                self.order
            ),
            Err(_) => write!(f, "tensor(<unallocated>, shape={}, dtype={})", self.shape, self.dtype),
        }
    }
}
