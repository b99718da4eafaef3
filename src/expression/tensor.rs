//! Dense row-major tensors

use crate::types::{Error, Result};
use itertools::{Either, Itertools};

/// A dense tensor of arbitrary rank, stored in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Tensor {
    /// Create a tensor from its shape and row-major data
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        let size = shape.iter().product::<usize>();
        if data.len() != size {
            return Err(Error::EvaluationConsistency(format!(
                "tensor of shape {shape:?} needs {size} values but {} were given",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Create a tensor full of zeros
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product::<usize>();
        Self {
            shape,
            data: vec![0.0; size],
        }
    }

    /// Create a rank 0 tensor
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: vec![],
            data: vec![value],
        }
    }

    /// Create a tensor by evaluating a function at every multi-index
    pub fn from_fn(shape: Vec<usize>, mut f: impl FnMut(&[usize]) -> f64) -> Self {
        let data = multi_indices(&shape).map(|i| f(&i)).collect();
        Self { shape, data }
    }

    /// The shape of the tensor
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The values of the tensor in row-major order
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the values of the tensor in row-major order
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// The entry at a multi-index
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.offset(index).map(|i| self.data[i])
    }

    /// Mutable access to the entry at a multi-index
    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut f64> {
        self.offset(index).map(|i| &mut self.data[i])
    }

    fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (i, n) in index.iter().zip(&self.shape) {
            if i >= n {
                return None;
            }
            offset = offset * n + i;
        }
        Some(offset)
    }
}

/// Iterate through every multi-index of a shape in row-major order
///
/// A shape with no axes has a single empty multi-index; a shape with a zero-length axis has
/// none.
pub fn multi_indices(shape: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    if shape.is_empty() {
        Either::Left(std::iter::once(vec![]))
    } else {
        Either::Right(shape.iter().map(|n| 0..*n).multi_cartesian_product())
    }
}
