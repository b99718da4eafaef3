//! Expression nodes

use crate::expression::{Index, Tensor};
use crate::types::{Error, Result};
use itertools::Itertools;
use std::sync::Arc;

#[derive(Debug)]
pub(crate) enum Node {
    Literal(Tensor),
    Indexed(Expression, Vec<Index>),
    Product(Expression, Expression),
    IndexSum(Expression, Vec<Index>),
    ComponentTensor(Expression, Vec<Index>),
}

#[derive(Debug)]
struct ExpressionData {
    node: Node,
    shape: Vec<usize>,
    free_indices: Vec<Index>,
}

/// A symbolic tensor expression
///
/// An expression has a shape and a list of free indices. Cloning an expression is cheap and
/// shares the underlying node.
#[derive(Debug, Clone)]
pub struct Expression(Arc<ExpressionData>);

impl Expression {
    fn from_node(node: Node, shape: Vec<usize>, free_indices: Vec<Index>) -> Self {
        Self(Arc::new(ExpressionData {
            node,
            shape,
            free_indices,
        }))
    }

    /// A literal tensor
    pub fn literal(value: Tensor) -> Self {
        let shape = value.shape().to_vec();
        Self::from_node(Node::Literal(value), shape, vec![])
    }

    /// Index every axis of a tensor-valued expression
    ///
    /// The result is scalar valued and has `indices` appended to its free indices.
    pub fn indexed(child: &Expression, indices: &[Index]) -> Result<Self> {
        if child.shape().len() != indices.len() {
            return Err(Error::EvaluationConsistency(format!(
                "cannot index an expression of shape {:?} with {} indices",
                child.shape(),
                indices.len()
            )));
        }
        for (i, n) in indices.iter().zip(child.shape()) {
            if i.extent() != *n {
                return Err(Error::EvaluationConsistency(format!(
                    "index {i} has extent {} but the axis has extent {n}",
                    i.extent()
                )));
            }
        }
        check_distinct(indices)?;
        if let Some(i) = indices.iter().find(|i| child.free_indices().contains(i)) {
            return Err(Error::EvaluationConsistency(format!(
                "index {i} is already free in the indexed expression"
            )));
        }
        let free_indices = child
            .free_indices()
            .iter()
            .chain(indices)
            .copied()
            .collect();
        Ok(Self::from_node(
            Node::Indexed(child.clone(), indices.to_vec()),
            vec![],
            free_indices,
        ))
    }

    /// The product of two scalar-valued expressions
    ///
    /// Free indices shared by both factors are not summed over.
    pub fn product(a: &Expression, b: &Expression) -> Result<Self> {
        check_scalar(a)?;
        check_scalar(b)?;
        let free_indices = a
            .free_indices()
            .iter()
            .chain(b.free_indices())
            .unique()
            .copied()
            .collect();
        Ok(Self::from_node(
            Node::Product(a.clone(), b.clone()),
            vec![],
            free_indices,
        ))
    }

    /// Sum a scalar-valued expression over some of its free indices
    pub fn index_sum(child: &Expression, indices: &[Index]) -> Result<Self> {
        check_scalar(child)?;
        if indices.is_empty() {
            return Ok(child.clone());
        }
        check_free(child, indices)?;
        let free_indices = child
            .free_indices()
            .iter()
            .filter(|i| !indices.contains(i))
            .copied()
            .collect();
        Ok(Self::from_node(
            Node::IndexSum(child.clone(), indices.to_vec()),
            vec![],
            free_indices,
        ))
    }

    /// Turn free indices of a scalar-valued expression into the axes of a tensor
    pub fn component_tensor(child: &Expression, indices: &[Index]) -> Result<Self> {
        check_scalar(child)?;
        if indices.is_empty() {
            return Ok(child.clone());
        }
        check_free(child, indices)?;
        let free_indices = child
            .free_indices()
            .iter()
            .filter(|i| !indices.contains(i))
            .copied()
            .collect();
        Ok(Self::from_node(
            Node::ComponentTensor(child.clone(), indices.to_vec()),
            indices.iter().map(|i| i.extent()).collect(),
            free_indices,
        ))
    }

    /// The shape of the expression
    pub fn shape(&self) -> &[usize] {
        &self.0.shape
    }

    /// The free indices of the expression
    pub fn free_indices(&self) -> &[Index] {
        &self.0.free_indices
    }

    pub(crate) fn node(&self) -> &Node {
        &self.0.node
    }

    /// An identifier shared by all clones of this expression
    pub(crate) fn key(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

fn check_scalar(e: &Expression) -> Result<()> {
    if e.shape().is_empty() {
        Ok(())
    } else {
        Err(Error::EvaluationConsistency(format!(
            "expected a scalar-valued expression, found shape {:?}",
            e.shape()
        )))
    }
}

fn check_distinct(indices: &[Index]) -> Result<()> {
    if indices.iter().all_unique() {
        Ok(())
    } else {
        Err(Error::EvaluationConsistency(format!(
            "repeated index in {}",
            indices.iter().join(", ")
        )))
    }
}

fn check_free(e: &Expression, indices: &[Index]) -> Result<()> {
    check_distinct(indices)?;
    match indices.iter().find(|i| !e.free_indices().contains(i)) {
        Some(i) => Err(Error::EvaluationConsistency(format!(
            "index {i} is not free in the expression"
        ))),
        None => Ok(()),
    }
}
