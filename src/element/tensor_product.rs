//! Elements on the tensor product of two cells

use crate::arrays::from_coordinates;
use crate::element::{point_table_expression, reference_points, table_expression, DofCache};
use crate::expression::{evaluate, Expression, Tensor};
use crate::quadrature::PointSet;
use crate::reference_cell::ReferenceCell;
use crate::traits::{CoordinateMapping, FiniteElement};
use crate::types::{CellKind, Degree, Dimension, Entity, EntityDofMap, Error, MapType, Result};
use itertools::iproduct;
use std::collections::BTreeMap;

/// The tensor product of two scalar-valued elements
///
/// The basis function for DOF `i * n_b + j` is the product of basis function `i` of the first
/// factor and basis function `j` of the second factor, where `n_b` is the number of basis
/// functions of the second factor.
#[derive(Debug)]
pub struct TensorProductElement<A: FiniteElement, B: FiniteElement> {
    a: A,
    b: B,
    cell: ReferenceCell,
    degree: (usize, usize),
    index_shape: Vec<usize>,
    entity_dofs: EntityDofMap,
    dof_cache: DofCache,
}

impl<A: FiniteElement, B: FiniteElement> TensorProductElement<A, B> {
    /// Create the tensor product of two elements
    pub fn new(a: A, b: B) -> Result<Self> {
        let (CellKind::Single(cell_a), CellKind::Single(cell_b)) =
            (a.cell().kind(), b.cell().kind())
        else {
            return Err(Error::UnsupportedBasis(
                "the factors of a tensor product element must be defined on single cells"
                    .to_string(),
            ));
        };
        let (Degree::Single(degree_a), Degree::Single(degree_b)) = (a.degree(), b.degree()) else {
            return Err(Error::UnsupportedBasis(
                "the factors of a tensor product element must have a single degree".to_string(),
            ));
        };
        if !a.value_shape().is_empty() || !b.value_shape().is_empty() {
            return Err(Error::UnsupportedBasis(
                "the factors of a tensor product element must be scalar-valued".to_string(),
            ));
        }
        if a.mapping() != MapType::Identity || b.mapping() != MapType::Identity {
            return Err(Error::UnsupportedBasis(
                "the factors of a tensor product element must use the identity map".to_string(),
            ));
        }

        let nb = b.space_dimension();
        let mut entity_dofs = EntityDofMap::new();
        for ((dim_a, entities_a), (dim_b, entities_b)) in
            iproduct!(a.entity_dofs().iter(), b.entity_dofs().iter())
        {
            let (Dimension::Single(d0), Dimension::Single(d1)) = (*dim_a, *dim_b) else {
                return Err(Error::MalformedTopology(format!(
                    "factor DOFs are given for dimensions {dim_a} and {dim_b}"
                )));
            };
            let n1 = b.cell().entity_count(*dim_b);
            entity_dofs.insert(
                Dimension::Product(d0, d1),
                iproduct!(entities_a.iter(), entities_b.iter())
                    .map(|((ea, dofs_a), (eb, dofs_b))| {
                        (
                            ea * n1 + eb,
                            iproduct!(dofs_a.iter(), dofs_b.iter())
                                .map(|(i, j)| i * nb + j)
                                .collect::<Vec<_>>(),
                        )
                    })
                    .collect(),
            );
        }

        Ok(Self {
            cell: ReferenceCell::tensor_product(cell_a, cell_b),
            degree: (degree_a, degree_b),
            index_shape: a
                .index_shape()
                .iter()
                .chain(b.index_shape())
                .copied()
                .collect(),
            entity_dofs,
            dof_cache: DofCache::new(),
            a,
            b,
        })
    }

    /// The factors of the element
    pub fn factors(&self) -> (&A, &B) {
        (&self.a, &self.b)
    }

    /// The entity of each factor that makes up an entity of the product cell
    fn factor_entities(&self, entity: Option<Entity>) -> Result<(Entity, Entity)> {
        let (d0, d1, index) = match entity {
            None => (self.a.cell().dim(), self.b.cell().dim(), 0),
            Some((Dimension::Product(d0, d1), index)) => (d0, d1, index),
            Some((dim, _)) => {
                return Err(Error::MalformedTopology(format!(
                    "{dim} is not a sub-entity dimension of a tensor product cell"
                )))
            }
        };
        let n1 = self.b.cell().entity_count(Dimension::Single(d1));
        if index >= self.cell.entity_count(Dimension::Product(d0, d1)) {
            return Err(Error::MalformedTopology(format!(
                "entity {index} of dimension ({d0}, {d1}) does not exist"
            )));
        }
        Ok((
            (Dimension::Single(d0), index / n1),
            (Dimension::Single(d1), index % n1),
        ))
    }

    /// The values of the basis functions at points on an entity, laid out as
    /// (point, basis function)
    fn tabulate_values(
        &self,
        coordinates: &[Vec<f64>],
        entity: Option<Entity>,
        coordinate_mapping: Option<&dyn CoordinateMapping>,
    ) -> Result<Vec<f64>> {
        let (entity_a, entity_b) = self.factor_entities(entity)?;
        let d0 = entity_a.0.total();
        let width = d0 + entity_b.0.total();
        if let Some(p) = coordinates.iter().find(|p| p.len() != width) {
            return Err(Error::UnsupportedBasis(format!(
                "points have dimension {} but the entity has dimension {width}",
                p.len()
            )));
        }
        let points_a = coordinates
            .iter()
            .map(|p| p[..d0].to_vec())
            .collect::<Vec<_>>();
        let points_b = coordinates
            .iter()
            .map(|p| p[d0..].to_vec())
            .collect::<Vec<_>>();
        let values_a = factor_values(&self.a, &points_a, entity_a, coordinate_mapping)?;
        let values_b = factor_values(&self.b, &points_b, entity_b, coordinate_mapping)?;

        let (na, nb) = (self.a.space_dimension(), self.b.space_dimension());
        let mut values = Vec::with_capacity(coordinates.len() * na * nb);
        for p in 0..coordinates.len() {
            for (va, vb) in iproduct!(
                &values_a[p * na..(p + 1) * na],
                &values_b[p * nb..(p + 1) * nb]
            ) {
                values.push(va * vb);
            }
        }
        Ok(values)
    }
}

/// The values of the basis functions of a factor, laid out as (point, basis function)
fn factor_values<E: FiniteElement>(
    element: &E,
    points: &[Vec<f64>],
    entity: Entity,
    coordinate_mapping: Option<&dyn CoordinateMapping>,
) -> Result<Vec<f64>> {
    let point_set = PointSet::new(from_coordinates(points, entity.0.total()));
    let tables = element.basis_evaluation(0, &point_set, Some(entity), coordinate_mapping)?;
    let values = tables.get(&vec![0; element.cell().dim()]).ok_or_else(|| {
        Error::UnsupportedBasis("the factor did not tabulate its values".to_string())
    })?;
    let evaluation = evaluate(&[values.clone()])?
        .pop()
        .ok_or_else(|| Error::EvaluationConsistency("no value for the factor".to_string()))?;
    if evaluation.fids != point_set.indices() {
        return Err(Error::EvaluationConsistency(format!(
            "the factor values have free indices {:?}",
            evaluation.fids
        )));
    }
    Ok(evaluation.arr.data().to_vec())
}

impl<A: FiniteElement, B: FiniteElement> FiniteElement for TensorProductElement<A, B> {
    fn cell(&self) -> &ReferenceCell {
        &self.cell
    }
    fn degree(&self) -> Degree {
        Degree::Product(self.degree.0, self.degree.1)
    }
    fn form_degree(&self) -> usize {
        self.a.form_degree() + self.b.form_degree()
    }
    fn entity_dofs(&self) -> &EntityDofMap {
        &self.entity_dofs
    }
    fn space_dimension(&self) -> usize {
        self.a.space_dimension() * self.b.space_dimension()
    }
    fn index_shape(&self) -> &[usize] {
        &self.index_shape
    }
    fn value_shape(&self) -> &[usize] {
        &[]
    }
    fn mapping(&self) -> MapType {
        MapType::Identity
    }
    fn basis_evaluation(
        &self,
        order: usize,
        point_set: &PointSet,
        entity: Option<Entity>,
        coordinate_mapping: Option<&dyn CoordinateMapping>,
    ) -> Result<BTreeMap<Vec<usize>, Expression>> {
        if order > 0 {
            return Err(Error::UnsupportedBasis(format!(
                "tensor product elements can only tabulate values, not derivatives of order {order}"
            )));
        }
        let values = self.tabulate_values(&point_set.coordinates(), entity, coordinate_mapping)?;
        let shape = [point_set.npoints()]
            .iter()
            .chain(&self.index_shape)
            .copied()
            .collect();
        let table = Tensor::new(shape, values)?;
        Ok(BTreeMap::from([(
            vec![0; self.cell.dim()],
            point_table_expression(table, point_set)?,
        )]))
    }
    fn point_evaluation(
        &self,
        order: usize,
        ref_coords: &Expression,
        entity: Option<Entity>,
    ) -> Result<BTreeMap<Vec<usize>, Expression>> {
        if order > 0 {
            return Err(Error::UnsupportedBasis(format!(
                "tensor product elements can only tabulate values, not derivatives of order {order}"
            )));
        }
        let (fids, coordinates) = reference_points(ref_coords)?;
        let values = self.tabulate_values(&coordinates, entity, None)?;
        let shape = fids
            .iter()
            .map(|i| i.extent())
            .chain(self.index_shape.iter().copied())
            .collect();
        let table = Tensor::new(shape, values)?;
        Ok(BTreeMap::from([(
            vec![0; self.cell.dim()],
            table_expression(table, &fids)?,
        )]))
    }
    fn dof_cache(&self) -> &DofCache {
        &self.dof_cache
    }
}
