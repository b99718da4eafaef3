//! Type definitions.

use crate::arrays::to_coordinates;
use crate::expression::{Expression, Index, Tensor};
use crate::types::{Array2D, CellKind, Degree, ReferenceCellType, Result};
use rlst::Shape;

/// Quadrature error
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QuadratureError {
    /// Rule not found
    #[error("No quadrature rule available for a {0:?} cell")]
    RuleNotFound(ReferenceCellType),
    /// The degree does not fit the cell
    #[error("Degree {0:?} cannot be used on a {1:?} cell")]
    InvalidDegree(Degree, CellKind),
}

/// Definition of a numerical quadrature rule.
#[derive(Debug, Clone)]
pub struct NumericalQuadratureDefinition {
    /// The dimension d of a single point.
    pub dim: usize,

    /// The polynomial degree that the rule integrates exactly.
    pub order: usize,

    /// The number of points of the quadrature rule.
    pub npoints: usize,

    /// The weights of the quadrature rule.
    pub weights: Vec<f64>,
    /// The point coordinates of the quadrature rule.
    ///
    /// A single point has the coordinates p_1, p_2, ..., p_d,
    /// with d being the dimension of the point (typically, 1, 2, or 3).
    /// The vector points stores all points in consecutive order.
    /// Hence, the first point starts at position zero, the second point at
    /// position d, and the third point at position 2d.
    pub points: Vec<f64>,
}

/// A set of points together with the symbolic index that runs over them
#[derive(Debug)]
pub struct PointSet {
    points: Array2D,
    index: Index,
}

impl PointSet {
    /// Create a point set from a `[dim, npoints]` array with one point per column
    pub fn new(points: Array2D) -> Self {
        let index = Index::new(points.shape()[1]);
        Self { points, index }
    }

    /// The points, one point per column
    pub fn points(&self) -> &Array2D {
        &self.points
    }

    /// The coordinates of each point
    pub fn coordinates(&self) -> Vec<Vec<f64>> {
        to_coordinates(&self.points)
    }

    /// The number of points
    pub fn npoints(&self) -> usize {
        self.points.shape()[1]
    }

    /// The dimension of each point
    pub fn dim(&self) -> usize {
        self.points.shape()[0]
    }

    /// The index that runs over the points
    pub fn index(&self) -> Index {
        self.index
    }

    /// The indices that run over the points
    pub fn indices(&self) -> Vec<Index> {
        vec![self.index]
    }
}

/// A quadrature rule, ready to be used in symbolic expressions
#[derive(Debug)]
pub struct QuadratureRule {
    /// The quadrature points
    pub point_set: PointSet,
    /// The quadrature weights
    pub weights: Vec<f64>,
    /// The weights as a scalar expression with the point index as its free index
    pub weight_expression: Expression,
}

impl QuadratureRule {
    /// Create a rule from its points and weights
    pub fn new(point_set: PointSet, weights: Vec<f64>) -> Result<Self> {
        let weight_tensor = Tensor::new(vec![weights.len()], weights.clone())?;
        let weight_expression =
            Expression::indexed(&Expression::literal(weight_tensor), &point_set.indices())?;
        Ok(Self {
            point_set,
            weights,
            weight_expression,
        })
    }
}
