//! Type definitions

use crate::quadrature::QuadratureError;
use rlst::{Array, BaseArray, VectorContainer};
use std::collections::BTreeMap;
use std::fmt;

pub use ndelement::types::{Continuity, MapType, ReferenceCellType};

/// A two-dimensional array of points, one point per column
pub type Array2D = Array<f64, BaseArray<f64, VectorContainer<f64>, 2>, 2>;

/// Tabulated values, indexed by (derivative, point, basis function, value component)
pub type Array4D = Array<f64, BaseArray<f64, VectorContainer<f64>, 4>, 4>;

/// How a reference cell is constructed
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CellKind {
    /// A single reference cell
    Single(ReferenceCellType),
    /// The tensor product of two reference cells
    TensorProduct(ReferenceCellType, ReferenceCellType),
}

/// The family of an element
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum ElementFamily {
    /// Continuous Lagrange
    Lagrange = 0,
    /// Discontinuous Lagrange
    DiscontinuousLagrange = 1,
}

/// The topological dimension of an entity
///
/// Entities of a tensor product cell are indexed by a pair of dimensions, one for each
/// factor cell.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Dimension {
    /// The dimension of an entity of a single cell
    Single(usize),
    /// The dimensions of an entity of a tensor product cell
    Product(usize, usize),
}

impl Dimension {
    /// The total dimension of the entity
    pub fn total(&self) -> usize {
        match self {
            Dimension::Single(d) => *d,
            Dimension::Product(d0, d1) => d0 + d1,
        }
    }
}

impl From<usize> for Dimension {
    fn from(d: usize) -> Self {
        Dimension::Single(d)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Single(d) => write!(f, "{d}"),
            Dimension::Product(d0, d1) => write!(f, "({d0}, {d1})"),
        }
    }
}

/// The orientation of an entity relative to the reference numbering
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// Orientation of an entity of a single cell
    Single(usize),
    /// Orientations of the two factors of an entity of a tensor product cell
    Product(usize, usize),
}

/// The polynomial degree of an element
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Degree {
    /// Degree of an element on a single cell
    Single(usize),
    /// Degrees of the factors of an element on a tensor product cell
    Product(usize, usize),
}

impl Degree {
    /// The degree needed to integrate the square of a function of this degree
    pub fn doubled(&self) -> Degree {
        match self {
            Degree::Single(p) => Degree::Single(2 * p),
            Degree::Product(p0, p1) => Degree::Product(2 * p0, 2 * p1),
        }
    }
}

/// The description of an element by its family, cell and degree
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct ElementSignature {
    /// The element family
    pub family: ElementFamily,
    /// The cell the element is defined on
    pub cell: CellKind,
    /// The polynomial degree
    pub degree: Degree,
    /// The value shape
    pub value_shape: Vec<usize>,
}

/// A topological entity, given as a (dimension, local index) pair
pub type Entity = (Dimension, usize);

/// Map from dimension and entity number to the DOFs associated with that entity
pub type EntityDofMap = BTreeMap<Dimension, BTreeMap<usize, Vec<usize>>>;

/// Map from dimension and entity number to the DOFs on the closure of that entity
pub type ClosureDofMap = BTreeMap<Dimension, BTreeMap<usize, Vec<usize>>>;

/// Map from dimension and entity number to the DOFs with non-zero support on that entity
pub type SupportDofMap = BTreeMap<Dimension, BTreeMap<usize, Vec<usize>>>;

/// Map from dimension and orientation to a permutation of the DOFs of an entity
pub type PermutationMap = BTreeMap<Dimension, BTreeMap<Orientation, Vec<usize>>>;

/// Error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The DOF layout does not match the topology of the cell
    #[error("Malformed topology: {0}")]
    MalformedTopology(String),
    /// The element cannot tabulate the requested basis
    #[error("Unsupported basis evaluation: {0}")]
    UnsupportedBasis(String),
    /// Indices in a symbolic expression are wired inconsistently
    #[error("Evaluation consistency error: {0}")]
    EvaluationConsistency(String),
    /// The element has no equivalent legacy description
    #[error("Cannot make equivalent legacy element for {0}")]
    EquivalenceUnavailable(String),
    /// Quadrature error
    #[error(transparent)]
    Quadrature(#[from] QuadratureError),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
