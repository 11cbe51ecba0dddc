use std::sync::Arc;

use crate::DType;

/// Typed CPU buffer behind a tensor.
#[derive(Debug, Clone, PartialEq)]
enum StorageData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
}

/// Shared, reference-counted tensor storage.
///
/// Clones share the same buffer; mutable access copies it first when other
/// references exist (copy-on-write).
#[derive(Debug, Clone)]
pub struct Storage {
    data: Arc<StorageData>,
}

impl Storage {
    /// Allocate zeroed storage for `numel` elements of the given dtype.
    pub fn zeros(dtype: DType, numel: usize) -> Self {
        let data = match dtype {
            DType::F32 => StorageData::F32(vec![0.0; numel]),
            DType::F64 => StorageData::F64(vec![0.0; numel]),
            DType::I32 => StorageData::I32(vec![0; numel]),
            DType::I64 => StorageData::I64(vec![0; numel]),
        };
        Self { data: Arc::new(data) }
    }

    /// Create storage from a slice of f32 values.
    pub fn from_f32(data: &[f32]) -> Self {
        Self { data: Arc::new(StorageData::F32(data.to_vec())) }
    }

    /// Create storage from a slice of f64 values.
    pub fn from_f64(data: &[f64]) -> Self {
        Self { data: Arc::new(StorageData::F64(data.to_vec())) }
    }

    /// Create storage from a slice of i32 values.
    pub fn from_i32(data: &[i32]) -> Self {
        Self { data: Arc::new(StorageData::I32(data.to_vec())) }
    }

    /// Create storage from a slice of i64 values.
    pub fn from_i64(data: &[i64]) -> Self {
        Self { data: Arc::new(StorageData::I64(data.to_vec())) }
    }

    /// Get the dtype of this storage.
    pub fn dtype(&self) -> DType {
        match self.data.as_ref() {
            StorageData::F32(_) => DType::F32,
            StorageData::F64(_) => DType::F64,
            StorageData::I32(_) => DType::I32,
            StorageData::I64(_) => DType::I64,
        }
    }

    /// Number of logical elements.
    pub fn numel(&self) -> usize {
        match self.data.as_ref() {
            StorageData::F32(v) => v.len(),
            StorageData::F64(v) => v.len(),
            StorageData::I32(v) => v.len(),
            StorageData::I64(v) => v.len(),
        }
    }

    /// Interpret storage as a slice of f32 values.
    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        match self.data.as_ref() {
            StorageData::F32(v) => Some(v),
            _ => None,
        }
    }

    /// Interpret storage as a mutable slice of f32 values (copy-on-write).
    pub fn as_f32_slice_mut(&mut self) -> Option<&mut [f32]> {
        match Arc::make_mut(&mut self.data) {
            StorageData::F32(v) => Some(v),
            _ => None,
        }
    }

    /// Interpret storage as a slice of f64 values.
    pub fn as_f64_slice(&self) -> Option<&[f64]> {
        match self.data.as_ref() {
            StorageData::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Element at physical index `i`, widened to f64.
    pub fn get_f64(&self, i: usize) -> Option<f64> {
        match self.data.as_ref() {
            StorageData::F32(v) => v.get(i).map(|&x| x as f64),
            StorageData::F64(v) => v.get(i).copied(),
            StorageData::I32(v) => v.get(i).map(|&x| x as f64),
            StorageData::I64(v) => v.get(i).map(|&x| x as f64),
        }
    }

    /// Element at physical index `i` of an integer buffer, widened to i64.
    pub fn get_i64(&self, i: usize) -> Option<i64> {
        match self.data.as_ref() {
            StorageData::I32(v) => v.get(i).map(|&x| x as i64),
            StorageData::I64(v) => v.get(i).copied(),
            StorageData::F32(_) | StorageData::F64(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let s = Storage::zeros(DType::F32, 10);
        assert_eq!(s.dtype(), DType::F32);
        assert_eq!(s.numel(), 10);
        assert!(s.as_f32_slice().unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_f32() {
        let s = Storage::from_f32(&[1.0, 2.0, 3.0]);
        assert_eq!(s.numel(), 3);
        assert_eq!(s.as_f32_slice().unwrap(), &[1.0, 2.0, 3.0]);
        assert!(s.as_f64_slice().is_none());
    }

    #[test]
    fn test_copy_on_write() {
        let s1 = Storage::from_f32(&[1.0, 2.0, 3.0]);
        let mut s2 = s1.clone();

        let slice = s2.as_f32_slice_mut().unwrap();
        slice[0] = 99.0;

        assert_eq!(s1.as_f32_slice().unwrap()[0], 1.0);
        assert_eq!(s2.as_f32_slice().unwrap()[0], 99.0);
    }

    #[test]
    fn test_get_f64_widens() {
        let s = Storage::from_i32(&[7, -3]);
        assert_eq!(s.get_f64(1), Some(-3.0));
        assert_eq!(s.get_f64(2), None);
    }

    #[test]
    fn test_get_i64() {
        let s = Storage::from_i64(&[i64::MAX, -1]);
        assert_eq!(s.get_i64(0), Some(i64::MAX));
        assert_eq!(Storage::from_i32(&[-5]).get_i64(0), Some(-5));
        assert_eq!(Storage::from_f32(&[1.0]).get_i64(0), None);
    }
}
