use smallvec::SmallVec;
use std::fmt;

use crate::order::Order;

/// Tensor shape with stack-allocated storage for ≤4 dimensions.
///
/// Most operation inputs are 1D-4D, so we avoid heap allocation for the
/// common case. A shape carries dimension sizes only; strides and ordering
/// live on the tensor.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    /// Create a new shape from dimensions.
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: SmallVec::from_slice(dims),
        }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements, saturating at `usize::MAX`.
    ///
    /// Metadata-only tensors may carry dims whose product does not fit; use
    /// [`Shape::checked_numel`] before allocating.
    pub fn numel(&self) -> usize {
        self.dims.iter().fold(1usize, |acc, &d| acc.saturating_mul(d))
    }

    /// Total number of elements, or `None` if the product overflows.
    pub fn checked_numel(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Get dimension sizes as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Dimension-wise equality: same rank and same size along every axis.
    ///
    /// Strides, ordering and element type are not part of a `Shape`, so two
    /// tensors with different layouts still compare soft-equal here.
    pub fn equals_soft(&self, other: &Shape) -> bool {
        self.dims.as_slice() == other.dims.as_slice()
    }

    /// Compute default strides for a contiguous row-major layout.
    pub fn contiguous_strides(&self) -> SmallVec<[usize; 4]> {
        let ndim = self.dims.len();
        if ndim == 0 {
            return SmallVec::new();
        }
        let mut strides: SmallVec<[usize; 4]> = SmallVec::from_elem(0usize, ndim);
        strides[ndim - 1] = 1;
        for i in (0..ndim - 1).rev() {
            strides[i] = strides[i + 1].saturating_mul(self.dims[i + 1]);
        }
        strides
    }

    /// Compute default strides for a contiguous column-major layout.
    pub fn fortran_strides(&self) -> SmallVec<[usize; 4]> {
        let ndim = self.dims.len();
        if ndim == 0 {
            return SmallVec::new();
        }
        let mut strides: SmallVec<[usize; 4]> = SmallVec::from_elem(0usize, ndim);
        strides[0] = 1;
        for i in 1..ndim {
            strides[i] = strides[i - 1].saturating_mul(self.dims[i - 1]);
        }
        strides
    }

    /// Contiguous strides for the given ordering.
    pub fn strides_for(&self, order: Order) -> SmallVec<[usize; 4]> {
        match order {
            Order::C => self.contiguous_strides(),
            Order::F => self.fortran_strides(),
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.dims.as_slice())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_zero_has_one_element() {
        let s = Shape::new(&[]);
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.numel(), 1);
        assert_eq!(s.checked_numel(), Some(1));
    }

    #[test]
    fn test_basic_shape() {
        let s = Shape::new(&[2, 3, 4]);
        assert_eq!(s.ndim(), 3);
        assert_eq!(s.numel(), 24);
        assert_eq!(s.dims(), &[2, 3, 4]);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_overflowing_dims() {
        let s = Shape::new(&[1 << 32, (1 << 32) + 1]);
        assert_eq!(s.checked_numel(), None);
        assert_eq!(s.numel(), usize::MAX);
        assert_eq!(s.strides_for(Order::C).as_slice(), &[(1 << 32) + 1, 1]);
    }

    #[test]
    fn test_strides_both_orders() {
        let s = Shape::new(&[2, 3, 4]);
        assert_eq!(s.strides_for(Order::C).as_slice(), &[12, 4, 1]);
        assert_eq!(s.strides_for(Order::F).as_slice(), &[1, 2, 6]);
    }

    #[test]
    fn test_equals_soft() {
        let a = Shape::new(&[2, 3]);
        assert!(a.equals_soft(&Shape::new(&[2, 3])));
        assert!(!a.equals_soft(&Shape::new(&[3, 2])));
        assert!(!a.equals_soft(&Shape::new(&[2, 3, 1])));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Shape::new(&[2, 3])), "[2, 3]");
        assert_eq!(format!("{}", Shape::new(&[])), "[]");
    }
}
