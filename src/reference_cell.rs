//! Reference cells and their topology

use crate::arrays::{from_coordinates, to_coordinates};
use crate::types::{Array2D, CellKind, Dimension, Entity, Error, ReferenceCellType, Result};
use ndelement::reference_cell;
use rlst::Shape;
use std::collections::BTreeMap;

/// Map from dimension and entity number to the vertices of that entity
pub type Topology = BTreeMap<Dimension, BTreeMap<usize, Vec<usize>>>;

/// Map from dimension and entity number to every entity in the closure of that entity
pub type SubEntities = BTreeMap<Dimension, BTreeMap<usize, Vec<Entity>>>;

/// A reference cell together with its topology
///
/// The topology and the closure of every sub-entity are computed once when the cell is
/// created. Entities of a tensor product cell are keyed by [Dimension::Product], and the
/// entity `(e0, e1)` is numbered `e0 * n1 + e1`, where `n1` is the number of entities of
/// the second factor with the same dimension as `e1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCell {
    kind: CellKind,
    topology: Topology,
    sub_entities: SubEntities,
}

impl ReferenceCell {
    /// Create a reference cell
    pub fn new(cell_type: ReferenceCellType) -> Self {
        let conn = reference_cell::connectivity(cell_type);
        let counts = reference_cell::entity_counts(cell_type);
        let mut topology = Topology::new();
        let mut sub_entities = SubEntities::new();
        for d in 0..reference_cell::dim(cell_type) + 1 {
            let mut t = BTreeMap::new();
            let mut s = BTreeMap::new();
            for e in 0..counts[d] {
                t.insert(e, conn[d][e][0].clone());
                s.insert(
                    e,
                    (0..d + 1)
                        .flat_map(|k| {
                            conn[d][e][k].iter().map(move |i| (Dimension::Single(k), *i))
                        })
                        .collect::<Vec<_>>(),
                );
            }
            topology.insert(Dimension::Single(d), t);
            sub_entities.insert(Dimension::Single(d), s);
        }
        Self {
            kind: CellKind::Single(cell_type),
            topology,
            sub_entities,
        }
    }

    /// Create the tensor product of two reference cells
    pub fn tensor_product(cell0: ReferenceCellType, cell1: ReferenceCellType) -> Self {
        let factor0 = Self::new(cell0);
        let factor1 = Self::new(cell1);
        let counts1 = reference_cell::entity_counts(cell1);
        let nvertices1 = counts1[0];

        let mut topology = Topology::new();
        let mut sub_entities = SubEntities::new();
        for d0 in 0..reference_cell::dim(cell0) + 1 {
            for d1 in 0..reference_cell::dim(cell1) + 1 {
                let (dim0, dim1) = (Dimension::Single(d0), Dimension::Single(d1));
                let mut t = BTreeMap::new();
                let mut s = BTreeMap::new();
                for (e0, closure0) in &factor0.sub_entities[&dim0] {
                    for (e1, closure1) in &factor1.sub_entities[&dim1] {
                        let e = e0 * counts1[d1] + e1;
                        let vertices0 = &factor0.topology[&dim0][e0];
                        let vertices1 = &factor1.topology[&dim1][e1];
                        t.insert(
                            e,
                            vertices0
                                .iter()
                                .flat_map(|v0| vertices1.iter().map(move |v1| v0 * nvertices1 + v1))
                                .collect::<Vec<_>>(),
                        );
                        let mut closure = vec![];
                        for (sd0, se0) in closure0 {
                            for (sd1, se1) in closure1 {
                                let (k0, k1) = (sd0.total(), sd1.total());
                                closure.push((Dimension::Product(k0, k1), se0 * counts1[k1] + se1));
                            }
                        }
                        s.insert(e, closure);
                    }
                }
                topology.insert(Dimension::Product(d0, d1), t);
                sub_entities.insert(Dimension::Product(d0, d1), s);
            }
        }
        Self {
            kind: CellKind::TensorProduct(cell0, cell1),
            topology,
            sub_entities,
        }
    }

    /// How the cell is constructed
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Is this the tensor product of two cells?
    pub fn is_tensor_product(&self) -> bool {
        matches!(self.kind, CellKind::TensorProduct(_, _))
    }

    /// The factors of a tensor product cell
    pub fn factors(&self) -> Option<(ReferenceCell, ReferenceCell)> {
        match self.kind {
            CellKind::Single(_) => None,
            CellKind::TensorProduct(c0, c1) => Some((Self::new(c0), Self::new(c1))),
        }
    }

    /// The topological dimension of the cell
    pub fn dim(&self) -> usize {
        match self.kind {
            CellKind::Single(c) => reference_cell::dim(c),
            CellKind::TensorProduct(c0, c1) => reference_cell::dim(c0) + reference_cell::dim(c1),
        }
    }

    /// The dimension key of the cell itself
    pub fn cell_dimension(&self) -> Dimension {
        match self.kind {
            CellKind::Single(c) => Dimension::Single(reference_cell::dim(c)),
            CellKind::TensorProduct(c0, c1) => {
                Dimension::Product(reference_cell::dim(c0), reference_cell::dim(c1))
            }
        }
    }

    /// The vertices of each entity
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The closure of each entity
    ///
    /// The closure of an entity lists the entity itself and every sub-entity of every lower
    /// dimension.
    pub fn sub_entities(&self) -> &SubEntities {
        &self.sub_entities
    }

    /// The number of entities of the given dimension
    pub fn entity_count(&self, dim: Dimension) -> usize {
        self.topology.get(&dim).map_or(0, |t| t.len())
    }

    /// Create the reference cell of the sub-entities of the given dimension
    ///
    /// All the sub-entities of that dimension must have the same cell type.
    pub fn construct_subelement(&self, dimension: Dimension) -> Result<ReferenceCell> {
        match (self.kind, dimension) {
            (CellKind::Single(c), Dimension::Single(d)) => {
                Ok(Self::new(uniform_entity_type(c, d)?))
            }
            (CellKind::TensorProduct(c0, c1), Dimension::Product(d0, d1)) => Ok(
                Self::tensor_product(uniform_entity_type(c0, d0)?, uniform_entity_type(c1, d1)?),
            ),
            _ => Err(Error::MalformedTopology(format!(
                "{dimension} is not a sub-entity dimension of {:?}",
                self.kind
            ))),
        }
    }

    /// Map points on the reference cell of an entity to points on this cell
    ///
    /// The points are the columns of `points`. If `entity` is `None`, the points are already
    /// on this cell and are copied.
    pub fn push_forward(&self, entity: Option<Entity>, points: &Array2D) -> Result<Array2D> {
        let (dimension, index) = entity.unwrap_or((self.cell_dimension(), 0));
        let coordinates = to_coordinates(points);
        if dimension == self.cell_dimension() {
            if index != 0 {
                return Err(Error::MalformedTopology(format!(
                    "entity {index} of dimension {dimension} does not exist"
                )));
            }
            check_width(points, self.dim())?;
            return Ok(from_coordinates(&coordinates, self.dim()));
        }
        check_width(points, dimension.total())?;
        let mapped = match (self.kind, dimension) {
            (CellKind::Single(c), Dimension::Single(d)) => {
                let vs = entity_vertices(c, d, index)?;
                coordinates
                    .iter()
                    .map(|p| affine_map(&vs, p))
                    .collect::<Vec<_>>()
            }
            (CellKind::TensorProduct(c0, c1), Dimension::Product(d0, d1)) => {
                let n1 = reference_cell::entity_counts(c1)
                    .get(d1)
                    .copied()
                    .unwrap_or(0);
                if n1 == 0 || index >= self.entity_count(dimension) {
                    return Err(Error::MalformedTopology(format!(
                        "entity {index} of dimension {dimension} does not exist"
                    )));
                }
                let (e0, e1) = (index / n1, index % n1);
                let v0 = entity_vertices(c0, d0, e0)?;
                let v1 = entity_vertices(c1, d1, e1)?;
                coordinates
                    .iter()
                    .map(|p| {
                        let mut x = affine_map(&v0, &p[..d0]);
                        x.extend(affine_map(&v1, &p[d0..]));
                        x
                    })
                    .collect::<Vec<_>>()
            }
            _ => {
                return Err(Error::MalformedTopology(format!(
                    "{dimension} is not a sub-entity dimension of {:?}",
                    self.kind
                )))
            }
        };
        Ok(from_coordinates(&mapped, self.dim()))
    }
}

/// The coordinates of the vertices of an entity of a single cell
fn entity_vertices(cell_type: ReferenceCellType, d: usize, index: usize) -> Result<Vec<Vec<f64>>> {
    let cell_vertices = reference_cell::vertices::<f64>(cell_type);
    let vs = reference_cell::connectivity(cell_type)
        .get(d)
        .and_then(|c| c.get(index))
        .map(|c| c[0].clone())
        .ok_or_else(|| {
            Error::MalformedTopology(format!(
                "entity {index} of dimension {d} does not exist on a {cell_type:?}"
            ))
        })?;
    if d == reference_cell::dim(cell_type) {
        // The cell itself: the origin followed by the unit point on each axis
        let origin = cell_vertices.first().cloned().unwrap_or_default();
        return Ok((0..d + 1)
            .map(|i| {
                let mut v = origin.clone();
                if i > 0 {
                    v[i - 1] += 1.0;
                }
                v
            })
            .collect());
    }
    Ok(vs.iter().map(|v| cell_vertices[*v].clone()).collect())
}

/// The type of the sub-entities of the given dimension, if they all have the same type
fn uniform_entity_type(cell: ReferenceCellType, d: usize) -> Result<ReferenceCellType> {
    let types = reference_cell::entity_types(cell);
    match types.get(d).map(|t| &t[..]) {
        Some([first, rest @ ..]) if rest.iter().all(|t| t == first) => Ok(*first),
        Some([_, ..]) => Err(Error::MalformedTopology(format!(
            "sub-entities of dimension {d} of a {cell:?} do not all have the same type"
        ))),
        _ => Err(Error::MalformedTopology(format!(
            "a {cell:?} has no sub-entities of dimension {d}"
        ))),
    }
}

/// Map a point on the reference entity to the entity with the given vertices
///
/// The first vertex is the image of the origin and the next vertices are the images of the
/// unit points on each axis.
fn affine_map(entity_vertices: &[Vec<f64>], point: &[f64]) -> Vec<f64> {
    let origin = &entity_vertices[0];
    let mut x = origin.clone();
    for (k, p) in point.iter().enumerate() {
        for (j, xj) in x.iter_mut().enumerate() {
            *xj += p * (entity_vertices[k + 1][j] - origin[j]);
        }
    }
    x
}

fn check_width(points: &Array2D, expected: usize) -> Result<()> {
    let [width, _] = points.shape();
    if width == expected {
        Ok(())
    } else {
        Err(Error::UnsupportedBasis(format!(
            "points have dimension {width} but the entity has dimension {expected}"
        )))
    }
}
