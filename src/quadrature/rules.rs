//! Quadrature rules on reference cells.

use crate::arrays::from_coordinates;
use crate::quadrature::{NumericalQuadratureDefinition, PointSet, QuadratureError, QuadratureRule};
use crate::reference_cell::ReferenceCell;
use crate::types::{CellKind, Degree, ReferenceCellType, Result};
use ndelement::quadrature::make_gauss_jacobi_quadrature;
use ndelement::traits::QuadratureRule as _;

/// A rule on a single reference cell that integrates polynomials of the given degree exactly.
///
/// Intervals, quadrilaterals and hexahedra use tensor products of Gauss–Jacobi rules,
/// triangles and tetrahedra use collapsed Gauss–Jacobi rules.
pub fn reference_rule(
    cell_type: ReferenceCellType,
    degree: usize,
) -> std::result::Result<NumericalQuadratureDefinition, QuadratureError> {
    match cell_type {
        ReferenceCellType::Point => Ok(NumericalQuadratureDefinition {
            dim: 0,
            order: degree,
            npoints: 1,
            weights: vec![1.0],
            points: vec![],
        }),
        ReferenceCellType::Interval
        | ReferenceCellType::Triangle
        | ReferenceCellType::Quadrilateral
        | ReferenceCellType::Tetrahedron
        | ReferenceCellType::Hexahedron => {
            let rule = make_gauss_jacobi_quadrature::<f64>(cell_type, degree);
            Ok(NumericalQuadratureDefinition {
                dim: rule.dim(),
                order: degree,
                npoints: rule.npoints(),
                weights: rule.weights().to_vec(),
                points: rule.points().to_vec(),
            })
        }
        ReferenceCellType::Prism | ReferenceCellType::Pyramid => {
            Err(QuadratureError::RuleNotFound(cell_type))
        }
    }
}

/// The points of a rule, one vector per point
fn point_coordinates(rule: &NumericalQuadratureDefinition) -> Vec<Vec<f64>> {
    (0..rule.npoints)
        .map(|i| rule.points[i * rule.dim..(i + 1) * rule.dim].to_vec())
        .collect()
}

/// Create a quadrature rule on a cell that integrates polynomials of the given degree exactly.
///
/// On a tensor product cell, the degree may be given separately for each factor; a single
/// degree is used for both factors.
pub fn make_quadrature(cell: &ReferenceCell, degree: Degree) -> Result<QuadratureRule> {
    let (weights, points) = match (cell.kind(), degree) {
        (CellKind::Single(c), Degree::Single(p)) => {
            let rule = reference_rule(c, p)?;
            (rule.weights.clone(), point_coordinates(&rule))
        }
        (CellKind::TensorProduct(c0, c1), Degree::Single(p)) => {
            product_rule(&reference_rule(c0, p)?, &reference_rule(c1, p)?)
        }
        (CellKind::TensorProduct(c0, c1), Degree::Product(p0, p1)) => {
            product_rule(&reference_rule(c0, p0)?, &reference_rule(c1, p1)?)
        }
        (kind, Degree::Product(_, _)) => {
            return Err(QuadratureError::InvalidDegree(degree, kind).into());
        }
    };
    QuadratureRule::new(PointSet::new(from_coordinates(&points, cell.dim())), weights)
}

/// The tensor product of two rules
fn product_rule(
    rule0: &NumericalQuadratureDefinition,
    rule1: &NumericalQuadratureDefinition,
) -> (Vec<f64>, Vec<Vec<f64>>) {
    let points1 = point_coordinates(rule1);
    let mut weights = vec![];
    let mut points = vec![];
    for (p0, w0) in point_coordinates(rule0).iter().zip(&rule0.weights) {
        for (p1, w1) in points1.iter().zip(&rule1.weights) {
            weights.push(w0 * w1);
            points.push(p0.iter().chain(p1).copied().collect::<Vec<_>>());
        }
    }
    (weights, points)
}
