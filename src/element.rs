//! Finite elements

mod cache;
mod entity_dofs;
pub mod lagrange;
pub mod tensor_product;

pub use cache::DofCache;
pub use entity_dofs::{
    compute_entity_closure_dofs, compute_entity_support_dofs, compute_permutations,
    supported_dofs,
};
pub use lagrange::LagrangeElement;
pub use tensor_product::TensorProductElement;

use crate::expression::{evaluate, multi_indices, Expression, Index, Tensor};
use crate::quadrature::PointSet;
use crate::traits::FiniteElement;
use crate::types::{Array4D, Dimension, Error, Result};
use itertools::Itertools;
use rlst::{RandomAccessByRef, Shape};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// The smallest integral of the square of a basis function over an entity for the basis
/// function to be considered non-zero on that entity
pub const SUPPORT_TOLERANCE: f64 = 1e-8;

/// The DOFs whose basis functions are non-zero on each entity of the given dimension
pub fn entity_support_dofs<E: FiniteElement + ?Sized>(
    element: &E,
    dim: Dimension,
) -> Result<&BTreeMap<usize, Vec<usize>>> {
    element
        .entity_support_dofs()?
        .get(&dim)
        .ok_or_else(|| {
            Error::MalformedTopology(format!("the cell has no entities of dimension {dim}"))
        })
}

/// All derivative multi-indices of total order at most `nderivs` in `tdim` dimensions
///
/// The multi-indices are sorted by total order. Within each order, derivatives in earlier
/// directions come first, so for `nderivs = 1` the derivative in direction `j` is at
/// position `j + 1`.
pub fn derivative_multi_indices(tdim: usize, nderivs: usize) -> Vec<Vec<usize>> {
    multi_indices(&vec![nderivs + 1; tdim])
        .filter(|alpha| alpha.iter().sum::<usize>() <= nderivs)
        .sorted_by_key(|alpha| (alpha.iter().sum::<usize>(), Reverse(alpha.clone())))
        .collect()
}

/// Copy one derivative out of a tabulated array into a tensor with the given shape
///
/// The values are laid out as (point, basis function, value component), so `shape` must
/// have as many entries as the array has values for one derivative.
pub(crate) fn derivative_table(data: &Array4D, deriv: usize, shape: Vec<usize>) -> Result<Tensor> {
    let [_, npoints, dim, value_size] = data.shape();
    let mut values = Vec::with_capacity(npoints * dim * value_size);
    for p in 0..npoints {
        for b in 0..dim {
            for j in 0..value_size {
                values.push(*data.get([deriv, p, b, j]).ok_or_else(|| {
                    Error::UnsupportedBasis(format!("derivative {deriv} has not been tabulated"))
                })?);
            }
        }
    }
    Tensor::new(shape, values)
}

/// An expression for a table of values whose leading axes run over the given free indices
///
/// The result has `free` as its free indices, and its shape is the shape of the table
/// without the leading axes.
pub(crate) fn table_expression(table: Tensor, free: &[Index]) -> Result<Expression> {
    let fresh = table.shape()[free.len().min(table.shape().len())..]
        .iter()
        .map(|n| Index::new(*n))
        .collect::<Vec<_>>();
    let indices = free
        .iter()
        .chain(fresh.iter())
        .copied()
        .collect::<Vec<_>>();
    Expression::component_tensor(
        &Expression::indexed(&Expression::literal(table), &indices)?,
        &fresh,
    )
}

/// An expression for a table of values whose first axis runs over a point set
pub(crate) fn point_table_expression(table: Tensor, point_set: &PointSet) -> Result<Expression> {
    table_expression(table, &point_set.indices())
}

/// The points described by a vector-valued coordinate expression
///
/// Returns the free indices of the expression and one point for every value of those
/// indices, in row-major order.
pub(crate) fn reference_points(ref_coords: &Expression) -> Result<(Vec<Index>, Vec<Vec<f64>>)> {
    let [tdim] = ref_coords.shape()[..] else {
        return Err(Error::UnsupportedBasis(format!(
            "reference coordinates must be a vector, not shape {:?}",
            ref_coords.shape()
        )));
    };
    let value = evaluate(&[ref_coords.clone()])?
        .pop()
        .ok_or_else(|| Error::EvaluationConsistency("no value for the coordinates".to_string()))?;
    let npoints = value.fids.iter().map(|i| i.extent()).product::<usize>();
    let points = if tdim == 0 {
        vec![vec![]; npoints]
    } else {
        value.arr.data().chunks(tdim).map(|p| p.to_vec()).collect()
    };
    Ok((value.fids, points))
}
