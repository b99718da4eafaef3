//! Finite element definitions

use crate::element::{
    compute_entity_closure_dofs, compute_entity_support_dofs, compute_permutations, DofCache,
};
use crate::expression::{Expression, Index};
use crate::quadrature::PointSet;
use crate::reference_cell::ReferenceCell;
use crate::types::{
    ClosureDofMap, Degree, ElementSignature, Entity, EntityDofMap, Error, MapType,
    PermutationMap, Result, SupportDofMap,
};
use std::collections::BTreeMap;

/// Physical geometry callbacks
///
/// Elements that are not mapped from the reference cell with an affine map need information
/// about the physical cell when they are tabulated. The elements in this crate only use the
/// reference cell and ignore the mapping.
pub trait CoordinateMapping {
    /// The Jacobian of the map from the reference cell at a point
    fn jacobian_at(&self, point: &Expression) -> Result<Expression>;

    /// The determinant of the Jacobian at a point
    fn detj_at(&self, point: &Expression) -> Result<Expression>;
}

/// A finite element defined on a reference cell
///
/// An element provides its cell, its basis and the DOFs associated with each sub-entity of
/// the cell. The DOFs on the closure of each entity and the DOFs that are supported on each
/// entity are derived from these and are computed once per element.
pub trait FiniteElement {
    /// The reference cell
    fn cell(&self) -> &ReferenceCell;

    /// The polynomial degree of the embedding polynomial space
    ///
    /// For an element on a tensor product cell, this is the degree in each factor.
    fn degree(&self) -> Degree;

    /// The degree of the associated form
    fn form_degree(&self) -> usize;

    /// The DOFs associated with each sub-entity of the reference cell
    fn entity_dofs(&self) -> &EntityDofMap;

    /// The number of basis functions
    fn space_dimension(&self) -> usize;

    /// The number of basis functions along each axis
    ///
    /// A scalar P2 element on a triangle has index shape `[6]`, the vector-valued version of
    /// the same element has index shape `[6, 2]`.
    fn index_shape(&self) -> &[usize];

    /// The shape of the values of a basis function
    fn value_shape(&self) -> &[usize];

    /// The push forward / pull back map to use for this element
    fn mapping(&self) -> MapType;

    /// Evaluate the basis functions and their derivatives at a set of points
    ///
    /// The result contains one expression for each derivative multi-index of total order at
    /// most `order`. Each expression has the point index as its only free index and has shape
    /// `index_shape ++ value_shape`. If `entity` is given, the points are on the reference
    /// cell of that entity.
    fn basis_evaluation(
        &self,
        order: usize,
        point_set: &PointSet,
        entity: Option<Entity>,
        coordinate_mapping: Option<&dyn CoordinateMapping>,
    ) -> Result<BTreeMap<Vec<usize>, Expression>>;

    /// Evaluate the basis functions and their derivatives at points given by an expression
    ///
    /// `ref_coords` is a vector-valued expression giving coordinates on the reference cell of
    /// `entity` (or the cell itself if `entity` is `None`). If `ref_coords` has free indices,
    /// the basis is evaluated at every point they select and the results keep those free
    /// indices.
    fn point_evaluation(
        &self,
        order: usize,
        ref_coords: &Expression,
        entity: Option<Entity>,
    ) -> Result<BTreeMap<Vec<usize>, Expression>>;

    /// Storage for the derived DOF maps
    fn dof_cache(&self) -> &DofCache;

    /// A description of this element as a (family, cell, degree) triple
    fn legacy_equivalent(&self) -> Result<ElementSignature> {
        Err(Error::EquivalenceUnavailable(
            std::any::type_name::<Self>().to_string(),
        ))
    }

    /// Indices that run over the basis functions
    fn get_indices(&self) -> Vec<Index> {
        self.index_shape().iter().map(|n| Index::new(*n)).collect()
    }

    /// Indices that run over the value shape
    fn get_value_indices(&self) -> Vec<Index> {
        self.value_shape().iter().map(|n| Index::new(*n)).collect()
    }

    /// The DOFs on the closure of each sub-entity of the reference cell
    fn entity_closure_dofs(&self) -> Result<&ClosureDofMap> {
        self.dof_cache()
            .closure_dofs(|| compute_entity_closure_dofs(self))
    }

    /// The DOFs whose basis functions are non-zero on each sub-entity of the reference cell
    fn entity_support_dofs(&self) -> Result<&SupportDofMap> {
        self.dof_cache()
            .support_dofs(|| compute_entity_support_dofs(self))
    }

    /// The permutation of the DOFs of each entity for each orientation of the entity
    ///
    /// Every permutation is currently the identity.
    fn permutations(&self) -> Result<PermutationMap> {
        compute_permutations(self)
    }
}
