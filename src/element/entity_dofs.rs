//! DOF maps derived from the entity DOFs of an element

use crate::element::SUPPORT_TOLERANCE;
use crate::expression::{evaluate, Expression};
use crate::quadrature::make_quadrature;
use crate::reference_cell::Topology;
use crate::traits::FiniteElement;
use crate::types::{
    ClosureDofMap, Dimension, Error, Orientation, PermutationMap, Result, SupportDofMap,
};
use itertools::iproduct;
use log::debug;
use std::collections::BTreeMap;

/// Compute the DOFs on the closure of each sub-entity of an element's reference cell
///
/// The DOFs of each entity are the union of the DOFs of every entity in its closure, sorted
/// in ascending order.
pub fn compute_entity_closure_dofs<E: FiniteElement + ?Sized>(
    element: &E,
) -> Result<ClosureDofMap> {
    let entity_dofs = element.entity_dofs();
    let sub_entities = element.cell().sub_entities();
    for (dim, entities) in entity_dofs {
        if let Some(e) = entities
            .keys()
            .find(|e| !sub_entities.get(dim).is_some_and(|s| s.contains_key(e)))
        {
            return Err(Error::MalformedTopology(format!(
                "DOFs are given for entity {e} of dimension {dim}, which is not in the cell"
            )));
        }
    }

    let mut closure_dofs = ClosureDofMap::new();
    for (dim, entities) in sub_entities {
        let mut dim_dofs = BTreeMap::new();
        for (e, closure) in entities {
            let mut dofs = vec![];
            for (sub_dim, sub_entity) in closure {
                dofs.extend_from_slice(
                    entity_dofs
                        .get(sub_dim)
                        .and_then(|d| d.get(sub_entity))
                        .ok_or_else(|| {
                            Error::MalformedTopology(format!(
                                "no DOFs are given for entity {sub_entity} of dimension {sub_dim}"
                            ))
                        })?,
                );
            }
            dofs.sort_unstable();
            dim_dofs.insert(*e, dofs);
        }
        closure_dofs.insert(*dim, dim_dofs);
    }
    debug!("Computed closure DOFs for {} dimensions", closure_dofs.len());
    Ok(closure_dofs)
}

/// Compute the DOFs whose basis functions are non-zero on each sub-entity of an element's
/// reference cell
///
/// For each entity, the square of each basis function is integrated over the entity with a
/// quadrature rule that is exact for the square, and the DOFs whose integral is larger than
/// [SUPPORT_TOLERANCE] are kept.
pub fn compute_entity_support_dofs<E: FiniteElement + ?Sized>(
    element: &E,
) -> Result<SupportDofMap> {
    let cell = element.cell();
    let quadrature_degree = element.degree().doubled();
    let mut support_dofs = SupportDofMap::new();
    for dim in cell.sub_entities().keys() {
        let beta = element.get_indices();
        let zeta = element.get_value_indices();
        let beta_zeta = beta.iter().chain(&zeta).copied().collect::<Vec<_>>();

        let entity_cell = cell.construct_subelement(*dim)?;
        let quad = make_quadrature(&entity_cell, quadrature_degree)?;

        let entities = element.entity_dofs().get(dim).ok_or_else(|| {
            Error::MalformedTopology(format!("no DOFs are given for dimension {dim}"))
        })?;
        let mut result = BTreeMap::new();
        for e in entities.keys() {
            let tables = element.basis_evaluation(0, &quad.point_set, Some((*dim, *e)), None)?;
            let mut tables = tables.into_values();
            let (Some(vals), None) = (tables.next(), tables.next()) else {
                return Err(Error::UnsupportedBasis(format!(
                    "expected a single table of values on entity {e} of dimension {dim}"
                )));
            };

            // Integrate the square of each basis function over the entity
            let v = Expression::indexed(&vals, &beta_zeta)?;
            let squared = Expression::index_sum(&Expression::product(&v, &v)?, &zeta)?;
            let ints = Expression::index_sum(
                &Expression::product(&squared, &quad.weight_expression)?,
                &quad.point_set.indices(),
            )?;
            let evaluation = evaluate(&[Expression::component_tensor(&ints, &beta)?])?
                .pop()
                .ok_or_else(|| {
                    Error::EvaluationConsistency("no value for the integrals".to_string())
                })?;
            if !evaluation.fids.is_empty() {
                return Err(Error::EvaluationConsistency(format!(
                    "the integrals have free indices {:?}",
                    evaluation.fids
                )));
            }
            result.insert(*e, supported_dofs(evaluation.arr.data(), SUPPORT_TOLERANCE));
        }
        debug!(
            "Computed support DOFs for {} entities of dimension {dim} with {} quadrature points",
            result.len(),
            quad.point_set.npoints()
        );
        support_dofs.insert(*dim, result);
    }
    Ok(support_dofs)
}

/// The DOFs whose integral is strictly larger than the tolerance
pub fn supported_dofs(integrals: &[f64], tolerance: f64) -> Vec<usize> {
    integrals
        .iter()
        .enumerate()
        .filter(|(_, i)| **i > tolerance)
        .map(|(dof, _)| dof)
        .collect()
}

/// Compute the permutation of the DOFs of each entity for each orientation of the entity
///
/// This is a placeholder: every orientation is given the identity permutation. An entity
/// with `m` vertices has `m! * 2` orientations, and an entity of a tensor product cell has
/// a pair of orientations, one for each factor. Vertices have a single orientation.
pub fn compute_permutations<E: FiniteElement + ?Sized>(element: &E) -> Result<PermutationMap> {
    let cell = element.cell();
    let factors = cell.factors();
    let mut permutations = PermutationMap::new();
    for (dim, entities) in element.entity_dofs() {
        let n = uniform_count(entities.values().map(|dofs| dofs.len()), "DOFs", *dim)?;
        let identity = (0..n).collect::<Vec<_>>();
        let orientations = match (dim, &factors) {
            (Dimension::Single(0), None) => vec![Orientation::Single(0)],
            (Dimension::Single(_), None) => {
                let m = vertex_count(cell.topology(), *dim)?;
                (0..orientation_count(m)).map(Orientation::Single).collect()
            }
            (Dimension::Product(d0, d1), Some((factor0, factor1))) => {
                let m0 = vertex_count(factor0.topology(), Dimension::Single(*d0))?;
                let m1 = vertex_count(factor1.topology(), Dimension::Single(*d1))?;
                iproduct!(0..orientation_count(m0), 0..orientation_count(m1))
                    .map(|(i0, i1)| Orientation::Product(i0, i1))
                    .collect()
            }
            _ => {
                return Err(Error::MalformedTopology(format!(
                    "dimension {dim} does not match the cell {:?}",
                    cell.kind()
                )))
            }
        };
        permutations.insert(
            *dim,
            orientations
                .into_iter()
                .map(|o| (o, identity.clone()))
                .collect(),
        );
    }
    Ok(permutations)
}

/// The number of orientations of an entity with `m` vertices
fn orientation_count(m: usize) -> usize {
    (1..m + 1).product::<usize>() * 2
}

/// The number of vertices of each entity of a dimension
fn vertex_count(topology: &Topology, dim: Dimension) -> Result<usize> {
    let entities = topology.get(&dim).ok_or_else(|| {
        Error::MalformedTopology(format!("the cell has no entities of dimension {dim}"))
    })?;
    uniform_count(entities.values().map(|v| v.len()), "vertices", dim)
}

fn uniform_count(
    mut counts: impl Iterator<Item = usize>,
    what: &str,
    dim: Dimension,
) -> Result<usize> {
    let first = counts.next().unwrap_or(0);
    if counts.all(|c| c == first) {
        Ok(first)
    } else {
        Err(Error::MalformedTopology(format!(
            "the entities of dimension {dim} do not all have the same number of {what}"
        )))
    }
}
