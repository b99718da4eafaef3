//! Lagrange elements

use crate::arrays::from_coordinates;
use crate::element::{
    derivative_multi_indices, derivative_table, point_table_expression, reference_points,
    table_expression, DofCache,
};
use crate::expression::Expression;
use crate::quadrature::PointSet;
use crate::reference_cell::ReferenceCell;
use crate::traits::{CoordinateMapping, FiniteElement};
use crate::types::{
    Array2D, Array4D, CellKind, Continuity, Degree, Dimension, ElementFamily, ElementSignature,
    Entity, EntityDofMap, Error, MapType, ReferenceCellType, Result,
};
use log::warn;
use ndelement::ciarlet::{lagrange, CiarletElement};
use ndelement::reference_cell;
use ndelement::traits::FiniteElement as _;
use rlst::{rlst_dynamic_array4, RandomAccessByRef, RandomAccessMut, Shape};
use std::collections::BTreeMap;

/// A Lagrange element with equally spaced nodes
///
/// Available with any degree on intervals, triangles, quadrilaterals, tetrahedra and
/// hexahedra. The degree 0 element must be discontinuous.
#[derive(Debug)]
pub struct LagrangeElement {
    element: CiarletElement<f64>,
    cell: ReferenceCell,
    value_size: usize,
    value_shape: Vec<usize>,
    index_shape: Vec<usize>,
    entity_dofs: EntityDofMap,
    dof_cache: DofCache,
}

impl LagrangeElement {
    /// Create a scalar-valued Lagrange element
    pub fn create(
        cell_type: ReferenceCellType,
        degree: usize,
        continuity: Continuity,
    ) -> Result<Self> {
        Self::build(cell_type, degree, continuity, None)
    }

    /// Create a vector-valued Lagrange element, with each component in the scalar space
    ///
    /// The DOF for component `c` of scalar basis function `i` is `i * components + c`.
    pub fn vector(
        cell_type: ReferenceCellType,
        degree: usize,
        continuity: Continuity,
        components: usize,
    ) -> Result<Self> {
        if components == 0 {
            return Err(Error::UnsupportedBasis(
                "a vector-valued element needs at least one component".to_string(),
            ));
        }
        if components == 1 {
            warn!(
                "Creating a vector-valued Lagrange element with one component. \
                 Using a scalar element would be simpler."
            );
        }
        Self::build(cell_type, degree, continuity, Some(components))
    }

    fn build(
        cell_type: ReferenceCellType,
        degree: usize,
        continuity: Continuity,
        components: Option<usize>,
    ) -> Result<Self> {
        check_supported(cell_type, degree, continuity)?;
        let element = lagrange::create::<f64>(cell_type, degree, continuity);
        let tdim = reference_cell::dim(cell_type);
        let value_size = components.unwrap_or(1);

        let mut entity_dofs = EntityDofMap::new();
        for (d, count) in reference_cell::entity_counts(cell_type)
            .iter()
            .enumerate()
            .take(tdim + 1)
        {
            let mut dim_dofs = BTreeMap::new();
            for e in 0..*count {
                let scalar_dofs = element.entity_dofs(d, e).ok_or_else(|| {
                    Error::MalformedTopology(format!(
                        "no DOFs are associated with entity {e} of dimension {d}"
                    ))
                })?;
                dim_dofs.insert(
                    e,
                    scalar_dofs
                        .iter()
                        .flat_map(|s| (0..value_size).map(move |c| s * value_size + c))
                        .collect::<Vec<_>>(),
                );
            }
            entity_dofs.insert(Dimension::Single(d), dim_dofs);
        }

        let nscalar = element.dim();
        Ok(Self {
            element,
            cell: ReferenceCell::new(cell_type),
            value_size,
            value_shape: components.map_or(vec![], |k| vec![k]),
            index_shape: components.map_or(vec![nscalar], |k| vec![nscalar, k]),
            entity_dofs,
            dof_cache: DofCache::new(),
        })
    }

    /// The cell type
    pub fn cell_type(&self) -> ReferenceCellType {
        self.element.cell_type()
    }

    /// The continuity of the element between cells
    pub fn continuity(&self) -> Continuity {
        self.element.continuity()
    }

    /// The element family
    pub fn family(&self) -> ElementFamily {
        match self.continuity() {
            Continuity::Standard => ElementFamily::Lagrange,
            Continuity::Discontinuous => ElementFamily::DiscontinuousLagrange,
        }
    }

    /// The number of components of each basis function
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// The shape of the array filled by [LagrangeElement::tabulate]
    pub fn tabulate_array_shape(&self, nderivs: usize, npoints: usize) -> [usize; 4] {
        let [nderivs, npoints, nscalar, _] = self.element.tabulate_array_shape(nderivs, npoints);
        [nderivs, npoints, nscalar * self.value_size, self.value_size]
    }

    /// Tabulate the values of the basis functions and their derivatives at a set of points
    ///
    /// `points` has shape `[tdim, npoints]` and `data` is indexed by (derivative, point, basis
    /// function, value component). The derivatives are ordered as by
    /// [derivative_multi_indices].
    pub fn tabulate(&self, points: &Array2D, nderivs: usize, data: &mut Array4D) -> Result<()> {
        let tdim = reference_cell::dim(self.cell_type());
        let [width, npoints] = points.shape();
        if width != tdim {
            return Err(Error::UnsupportedBasis(format!(
                "points have dimension {width} but the cell has dimension {tdim}"
            )));
        }
        let shape = self.tabulate_array_shape(nderivs, npoints);
        if data.shape() != shape {
            return Err(Error::UnsupportedBasis(format!(
                "data has shape {:?} but shape {shape:?} is needed",
                data.shape()
            )));
        }

        let k = self.value_size;
        if self.value_shape.is_empty() {
            self.element.tabulate(points, nderivs, data);
            return Ok(());
        }
        let mut scalar = rlst_dynamic_array4!(
            f64,
            self.element.tabulate_array_shape(nderivs, npoints)
        );
        self.element.tabulate(points, nderivs, &mut scalar);
        for d in 0..shape[0] {
            for p in 0..npoints {
                for s in 0..self.element.dim() {
                    let v = *scalar.get([d, p, s, 0]).unwrap();
                    for c in 0..k {
                        for j in 0..k {
                            *data.get_mut([d, p, s * k + c, j]).unwrap() =
                                if j == c { v } else { 0.0 };
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn tabulate_at(&self, points: &Array2D, order: usize) -> Result<Array4D> {
        let mut data =
            rlst_dynamic_array4!(f64, self.tabulate_array_shape(order, points.shape()[1]));
        self.tabulate(points, order, &mut data)?;
        Ok(data)
    }

    fn table_shape(&self) -> Vec<usize> {
        self.index_shape
            .iter()
            .chain(&self.value_shape)
            .copied()
            .collect()
    }
}

impl FiniteElement for LagrangeElement {
    fn cell(&self) -> &ReferenceCell {
        &self.cell
    }
    fn degree(&self) -> Degree {
        Degree::Single(self.element.degree())
    }
    fn form_degree(&self) -> usize {
        0
    }
    fn entity_dofs(&self) -> &EntityDofMap {
        &self.entity_dofs
    }
    fn space_dimension(&self) -> usize {
        self.element.dim() * self.value_size
    }
    fn index_shape(&self) -> &[usize] {
        &self.index_shape
    }
    fn value_shape(&self) -> &[usize] {
        &self.value_shape
    }
    fn mapping(&self) -> MapType {
        self.element.map_type()
    }
    fn basis_evaluation(
        &self,
        order: usize,
        point_set: &PointSet,
        entity: Option<Entity>,
        _coordinate_mapping: Option<&dyn CoordinateMapping>,
    ) -> Result<BTreeMap<Vec<usize>, Expression>> {
        let points = self.cell.push_forward(entity, point_set.points())?;
        let data = self.tabulate_at(&points, order)?;
        let shape = [point_set.npoints()]
            .into_iter()
            .chain(self.table_shape())
            .collect::<Vec<_>>();
        derivative_multi_indices(self.cell.dim(), order)
            .into_iter()
            .enumerate()
            .map(|(d, alpha)| {
                let table = derivative_table(&data, d, shape.clone())?;
                Ok((alpha, point_table_expression(table, point_set)?))
            })
            .collect()
    }
    fn point_evaluation(
        &self,
        order: usize,
        ref_coords: &Expression,
        entity: Option<Entity>,
    ) -> Result<BTreeMap<Vec<usize>, Expression>> {
        let (fids, coordinates) = reference_points(ref_coords)?;
        let width = ref_coords.shape()[0];
        let points = self
            .cell
            .push_forward(entity, &from_coordinates(&coordinates, width))?;
        let data = self.tabulate_at(&points, order)?;
        let shape = fids
            .iter()
            .map(|i| i.extent())
            .chain(self.table_shape())
            .collect::<Vec<_>>();
        derivative_multi_indices(self.cell.dim(), order)
            .into_iter()
            .enumerate()
            .map(|(d, alpha)| {
                let table = derivative_table(&data, d, shape.clone())?;
                Ok((alpha, table_expression(table, &fids)?))
            })
            .collect()
    }
    fn dof_cache(&self) -> &DofCache {
        &self.dof_cache
    }
    fn legacy_equivalent(&self) -> Result<ElementSignature> {
        Ok(ElementSignature {
            family: self.family(),
            cell: CellKind::Single(self.cell_type()),
            degree: Degree::Single(self.element.degree()),
            value_shape: self.value_shape.clone(),
        })
    }
}

fn check_supported(
    cell_type: ReferenceCellType,
    degree: usize,
    continuity: Continuity,
) -> Result<()> {
    if degree == 0 && continuity == Continuity::Standard {
        return Err(Error::UnsupportedBasis(
            "Cannot create continuous degree 0 Lagrange element".to_string(),
        ));
    }
    match cell_type {
        ReferenceCellType::Interval
        | ReferenceCellType::Triangle
        | ReferenceCellType::Quadrilateral
        | ReferenceCellType::Tetrahedron
        | ReferenceCellType::Hexahedron => Ok(()),
        ReferenceCellType::Point | ReferenceCellType::Prism | ReferenceCellType::Pyramid => {
            Err(Error::UnsupportedBasis(format!(
                "Lagrange elements are not implemented on a {cell_type:?}"
            )))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expression::{evaluate, Index, Tensor};
    use approx::*;
    use paste::paste;

    fn check_dofs(e: &impl FiniteElement) {
        let mut dofs = e
            .entity_dofs()
            .values()
            .flat_map(|entities| entities.values().flatten().copied())
            .collect::<Vec<_>>();
        dofs.sort_unstable();
        assert_eq!(dofs, (0..e.space_dimension()).collect::<Vec<_>>());
    }

    fn random_points(cell_type: ReferenceCellType) -> Array2D {
        let tdim = reference_cell::dim(cell_type);
        let coordinates = [[0.1, 0.2, 0.3], [0.25, 0.05, 0.6], [0.0, 0.0, 0.0], [0.3, 0.3, 0.1]]
            .iter()
            .map(|r| r[..tdim].to_vec())
            .collect::<Vec<_>>();
        from_coordinates(&coordinates, tdim)
    }

    macro_rules! test_lagrange {

        ($(($cell:ident, $degree:literal)),+) => {

        $(
            paste! {

                #[test]
                fn [<test_partition_of_unity_ $cell:lower _ $degree>]() {
                    let continuity = if $degree == 0 { Continuity::Discontinuous } else { Continuity::Standard };
                    let e = LagrangeElement::create(ReferenceCellType::[<$cell>], $degree, continuity).unwrap();
                    check_dofs(&e);
                    let points = random_points(ReferenceCellType::[<$cell>]);
                    let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(1, 4));
                    e.tabulate(&points, 1, &mut data).unwrap();
                    for d in 0..data.shape()[0] {
                        for p in 0..4 {
                            let sum = (0..e.space_dimension())
                                .map(|b| *data.get([d, p, b, 0]).unwrap())
                                .sum::<f64>();
                            assert_relative_eq!(sum, if d == 0 { 1.0 } else { 0.0 }, epsilon = 1e-10);
                        }
                    }
                }

                #[test]
                fn [<test_nodal_ $cell:lower _ $degree>]() {
                    let e = LagrangeElement::create(ReferenceCellType::[<$cell>], $degree, Continuity::Discontinuous).unwrap();
                    let vertices = reference_cell::vertices::<f64>(ReferenceCellType::[<$cell>]);
                    let tdim = reference_cell::dim(ReferenceCellType::[<$cell>]);
                    if $degree > 0 {
                        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, vertices.len()));
                        e.tabulate(&from_coordinates(&vertices, tdim), 0, &mut data).unwrap();
                        for (p, _) in vertices.iter().enumerate() {
                            for b in 0..vertices.len() {
                                assert_relative_eq!(
                                    *data.get([0, p, b, 0]).unwrap(),
                                    if p == b { 1.0 } else { 0.0 },
                                    epsilon = 1e-12
                                );
                            }
                        }
                    }
                }

            }
        )*
        };
    }

    test_lagrange!(
        (Interval, 0),
        (Interval, 1),
        (Interval, 2),
        (Interval, 4),
        (Triangle, 0),
        (Triangle, 1),
        (Triangle, 2),
        (Triangle, 3),
        (Quadrilateral, 0),
        (Quadrilateral, 1),
        (Quadrilateral, 2),
        (Tetrahedron, 0),
        (Tetrahedron, 1),
        (Tetrahedron, 2),
        (Hexahedron, 0),
        (Hexahedron, 1),
        (Hexahedron, 2)
    );

    #[test]
    fn test_lagrange_1_triangle() {
        let e =
            LagrangeElement::create(ReferenceCellType::Triangle, 1, Continuity::Standard).unwrap();
        assert_eq!(e.value_size(), 1);
        let coordinates = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.5, 0.0],
            vec![0.0, 0.5],
            vec![0.5, 0.5],
        ];
        let points = from_coordinates(&coordinates, 2);
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(1, 6));
        e.tabulate(&points, 1, &mut data).unwrap();

        for (pt, p) in coordinates.iter().enumerate() {
            let (x, y) = (p[0], p[1]);
            assert_relative_eq!(*data.get([0, pt, 0, 0]).unwrap(), 1.0 - x - y, epsilon = 1e-12);
            assert_relative_eq!(*data.get([0, pt, 1, 0]).unwrap(), x, epsilon = 1e-12);
            assert_relative_eq!(*data.get([0, pt, 2, 0]).unwrap(), y, epsilon = 1e-12);
            assert_relative_eq!(*data.get([1, pt, 0, 0]).unwrap(), -1.0, epsilon = 1e-12);
            assert_relative_eq!(*data.get([2, pt, 0, 0]).unwrap(), -1.0, epsilon = 1e-12);
            assert_relative_eq!(*data.get([1, pt, 1, 0]).unwrap(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(*data.get([2, pt, 1, 0]).unwrap(), 0.0, epsilon = 1e-12);
            assert_relative_eq!(*data.get([1, pt, 2, 0]).unwrap(), 0.0, epsilon = 1e-12);
            assert_relative_eq!(*data.get([2, pt, 2, 0]).unwrap(), 1.0, epsilon = 1e-12);
        }
        check_dofs(&e);
    }

    #[test]
    fn test_lagrange_2_triangle_edges() {
        let e =
            LagrangeElement::create(ReferenceCellType::Triangle, 2, Continuity::Standard).unwrap();
        assert_eq!(e.space_dimension(), 6);
        assert_eq!(e.entity_dofs()[&Dimension::Single(1)][&0], vec![3]);
        assert_eq!(e.entity_dofs()[&Dimension::Single(2)][&0], Vec::<usize>::new());

        // Edge 0 joins vertices 1 and 2
        let points = from_coordinates(&[vec![0.5, 0.5], vec![0.0, 0.5], vec![0.5, 0.0]], 2);
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, 3));
        e.tabulate(&points, 0, &mut data).unwrap();
        for p in 0..3 {
            for b in 0..6 {
                assert_relative_eq!(
                    *data.get([0, p, b, 0]).unwrap(),
                    if b == p + 3 { 1.0 } else { 0.0 },
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_interval_dofs() {
        let e =
            LagrangeElement::create(ReferenceCellType::Interval, 3, Continuity::Standard).unwrap();
        assert_eq!(e.degree(), Degree::Single(3));
        assert_eq!(e.entity_dofs()[&Dimension::Single(0)][&0], vec![0]);
        assert_eq!(e.entity_dofs()[&Dimension::Single(0)][&1], vec![1]);
        assert_eq!(e.entity_dofs()[&Dimension::Single(1)][&0], vec![2, 3]);
        let points = from_coordinates(&[vec![1.0 / 3.0]], 1);
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, 1));
        e.tabulate(&points, 0, &mut data).unwrap();
        assert_relative_eq!(*data.get([0, 0, 2, 0]).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(*data.get([0, 0, 3, 0]).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_second_derivatives() {
        // The basis functions are 2(x - 1/2)(x - 1), 2x(x - 1/2) and 4x(1 - x)
        let e =
            LagrangeElement::create(ReferenceCellType::Interval, 2, Continuity::Standard).unwrap();
        let points = from_coordinates(&[vec![0.2], vec![0.7]], 1);
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(2, 2));
        assert_eq!(data.shape(), [3, 2, 3, 1]);
        e.tabulate(&points, 2, &mut data).unwrap();
        for p in 0..2 {
            assert_relative_eq!(*data.get([2, p, 0, 0]).unwrap(), 4.0, epsilon = 1e-10);
            assert_relative_eq!(*data.get([2, p, 1, 0]).unwrap(), 4.0, epsilon = 1e-10);
            assert_relative_eq!(*data.get([2, p, 2, 0]).unwrap(), -8.0, epsilon = 1e-10);
        }
        assert_relative_eq!(*data.get([1, 0, 2, 0]).unwrap(), 2.4, epsilon = 1e-10);
    }

    #[test]
    fn test_discontinuous_dofs() {
        let e = LagrangeElement::create(
            ReferenceCellType::Quadrilateral,
            1,
            Continuity::Discontinuous,
        )
        .unwrap();
        for v in 0..4 {
            assert!(e.entity_dofs()[&Dimension::Single(0)][&v].is_empty());
        }
        assert_eq!(e.entity_dofs()[&Dimension::Single(2)][&0], vec![0, 1, 2, 3]);
        assert_eq!(e.family(), ElementFamily::DiscontinuousLagrange);
        assert_eq!(e.continuity(), Continuity::Discontinuous);
        assert_eq!(e.cell_type(), ReferenceCellType::Quadrilateral);
    }

    #[test]
    fn test_vector_element() {
        let e = LagrangeElement::vector(ReferenceCellType::Triangle, 1, Continuity::Standard, 2)
            .unwrap();
        assert_eq!(e.index_shape(), &[3, 2]);
        assert_eq!(e.value_shape(), &[2]);
        assert_eq!(e.space_dimension(), 6);
        assert_eq!(e.entity_dofs()[&Dimension::Single(0)][&1], vec![2, 3]);
        check_dofs(&e);

        let points = from_coordinates(&[vec![0.2, 0.3]], 2);
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, 1));
        e.tabulate(&points, 0, &mut data).unwrap();
        assert_relative_eq!(*data.get([0, 0, 2, 0]).unwrap(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(*data.get([0, 0, 2, 1]).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(*data.get([0, 0, 3, 1]).unwrap(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(*data.get([0, 0, 5, 1]).unwrap(), 0.3, epsilon = 1e-12);

        assert!(
            LagrangeElement::vector(ReferenceCellType::Triangle, 1, Continuity::Standard, 0)
                .is_err()
        );
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(
            LagrangeElement::create(ReferenceCellType::Triangle, 0, Continuity::Standard),
            Err(Error::UnsupportedBasis(_))
        ));
        for cell_type in [
            ReferenceCellType::Point,
            ReferenceCellType::Prism,
            ReferenceCellType::Pyramid,
        ] {
            assert!(matches!(
                LagrangeElement::create(cell_type, 1, Continuity::Standard),
                Err(Error::UnsupportedBasis(_))
            ));
        }

        let e =
            LagrangeElement::create(ReferenceCellType::Triangle, 1, Continuity::Standard).unwrap();
        let mut data = rlst_dynamic_array4!(f64, [3, 1, 3, 1]);
        assert!(e
            .tabulate(&from_coordinates(&[vec![0.0, 0.0]], 2), 2, &mut data)
            .is_err());
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, 1));
        assert!(e
            .tabulate(&from_coordinates(&[vec![0.0]], 1), 0, &mut data)
            .is_err());
    }

    #[test]
    fn test_basis_evaluation() {
        let e =
            LagrangeElement::create(ReferenceCellType::Triangle, 1, Continuity::Standard).unwrap();
        let point_set = PointSet::new(from_coordinates(&[vec![0.2, 0.3], vec![0.5, 0.1]], 2));
        let tables = e.basis_evaluation(1, &point_set, None, None).unwrap();
        assert_eq!(
            tables.keys().cloned().collect::<Vec<_>>(),
            vec![vec![0, 0], vec![0, 1], vec![1, 0]]
        );
        for table in tables.values() {
            assert_eq!(table.shape(), &[3]);
            assert_eq!(table.free_indices(), &[point_set.index()]);
        }

        let values = evaluate(&[tables[&vec![0, 0]].clone()]).unwrap().pop().unwrap();
        assert_eq!(values.fids, vec![point_set.index()]);
        assert_eq!(values.arr.shape(), &[2, 3]);
        assert_relative_eq!(values.arr.get(&[0, 0]).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(values.arr.get(&[1, 1]).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(values.arr.get(&[1, 2]).unwrap(), 0.1, epsilon = 1e-12);

        let dy = evaluate(&[tables[&vec![0, 1]].clone()]).unwrap().pop().unwrap();
        assert_relative_eq!(dy.arr.get(&[0, 0]).unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(dy.arr.get(&[0, 2]).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_basis_evaluation_on_entity() {
        let e =
            LagrangeElement::create(ReferenceCellType::Triangle, 1, Continuity::Standard).unwrap();
        // Points on edge 1, which joins vertices 0 and 2
        let point_set = PointSet::new(from_coordinates(&[vec![0.25]], 1));
        let tables = e
            .basis_evaluation(0, &point_set, Some((Dimension::Single(1), 1)), None)
            .unwrap();
        let values = evaluate(&[tables[&vec![0, 0]].clone()]).unwrap().pop().unwrap();
        assert_relative_eq!(values.arr.get(&[0, 0]).unwrap(), 0.75, epsilon = 1e-12);
        assert_relative_eq!(values.arr.get(&[0, 1]).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(values.arr.get(&[0, 2]).unwrap(), 0.25, epsilon = 1e-12);

        let cell_points = PointSet::new(from_coordinates(&[vec![0.2, 0.3]], 2));
        assert!(e
            .basis_evaluation(0, &cell_points, Some((Dimension::Single(1), 1)), None)
            .is_err());
    }

    #[test]
    fn test_point_evaluation() {
        let e = LagrangeElement::vector(ReferenceCellType::Interval, 1, Continuity::Standard, 2)
            .unwrap();
        let x = Expression::literal(Tensor::new(vec![1], vec![0.25]).unwrap());
        let tables = e.point_evaluation(1, &x, None).unwrap();
        assert_eq!(tables.len(), 2);
        let values = evaluate(&[tables[&vec![0]].clone()]).unwrap().pop().unwrap();
        assert!(values.fids.is_empty());
        assert_eq!(values.arr.shape(), &[2, 2, 2]);
        assert_relative_eq!(values.arr.get(&[0, 0, 0]).unwrap(), 0.75, epsilon = 1e-12);
        assert_relative_eq!(values.arr.get(&[0, 0, 1]).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(values.arr.get(&[1, 1, 1]).unwrap(), 0.25, epsilon = 1e-12);
        let derivatives = evaluate(&[tables[&vec![1]].clone()]).unwrap().pop().unwrap();
        assert_relative_eq!(derivatives.arr.get(&[0, 0, 0]).unwrap(), -1.0, epsilon = 1e-12);

        let vertex = Expression::literal(Tensor::new(vec![0], vec![]).unwrap());
        let at_vertex = e
            .point_evaluation(0, &vertex, Some((Dimension::Single(0), 1)))
            .unwrap();
        let values = evaluate(&[at_vertex[&vec![0]].clone()]).unwrap().pop().unwrap();
        assert_relative_eq!(values.arr.get(&[1, 0, 0]).unwrap(), 1.0, epsilon = 1e-12);

        let i = Index::new(1);
        let scalar = Expression::indexed(&x, &[i]).unwrap();
        assert!(matches!(
            e.point_evaluation(0, &scalar, None),
            Err(Error::UnsupportedBasis(_))
        ));
    }

    #[test]
    fn test_point_evaluation_free_index() {
        let e =
            LagrangeElement::create(ReferenceCellType::Interval, 1, Continuity::Standard).unwrap();
        // x[q] runs over the points 0.25 and 1
        let table = Expression::literal(Tensor::new(vec![2, 1], vec![0.25, 1.0]).unwrap());
        let q = Index::new(2);
        let i = Index::new(1);
        let xq = Expression::component_tensor(&Expression::indexed(&table, &[q, i]).unwrap(), &[i])
            .unwrap();
        assert_eq!(xq.free_indices(), &[q]);

        let tables = e.point_evaluation(1, &xq, None).unwrap();
        let values = tables[&vec![0]].clone();
        assert_eq!(values.shape(), &[2]);
        assert_eq!(values.free_indices(), &[q]);
        let values = evaluate(&[values]).unwrap().pop().unwrap();
        assert_eq!(values.fids, vec![q]);
        assert_eq!(values.arr.shape(), &[2, 2]);
        assert_relative_eq!(values.arr.get(&[0, 0]).unwrap(), 0.75, epsilon = 1e-12);
        assert_relative_eq!(values.arr.get(&[0, 1]).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(values.arr.get(&[1, 0]).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(values.arr.get(&[1, 1]).unwrap(), 1.0, epsilon = 1e-12);

        let derivatives = evaluate(&[tables[&vec![1]].clone()]).unwrap().pop().unwrap();
        assert_eq!(derivatives.fids, vec![q]);
        assert_relative_eq!(derivatives.arr.get(&[1, 0]).unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(derivatives.arr.get(&[1, 1]).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_legacy_equivalent() {
        let e = LagrangeElement::create(ReferenceCellType::Tetrahedron, 2, Continuity::Standard)
            .unwrap();
        assert_eq!(
            e.legacy_equivalent().unwrap(),
            ElementSignature {
                family: ElementFamily::Lagrange,
                cell: CellKind::Single(ReferenceCellType::Tetrahedron),
                degree: Degree::Single(2),
                value_shape: vec![],
            }
        );
        assert_eq!(e.mapping(), MapType::Identity);
        let dg0 = LagrangeElement::create(ReferenceCellType::Interval, 0, Continuity::Discontinuous)
            .unwrap();
        assert_eq!(
            dg0.legacy_equivalent().unwrap().family,
            ElementFamily::DiscontinuousLagrange
        );
    }
}
