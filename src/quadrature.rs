//! Quadrature rules on reference cells

mod rules;
mod types;

pub use rules::{make_quadrature, reference_rule};
pub use types::{NumericalQuadratureDefinition, PointSet, QuadratureError, QuadratureRule};
