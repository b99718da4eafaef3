//! Numerical evaluation of expressions

use crate::expression::node::Node;
use crate::expression::{multi_indices, Expression, Index, Tensor};
use crate::types::{Error, Result};
use std::collections::HashMap;

/// The value of an evaluated expression
///
/// The axes of `arr` are the free indices `fids` followed by the shape of the expression.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The free indices of the expression
    pub fids: Vec<Index>,
    /// The values
    pub arr: Tensor,
}

/// Evaluate a list of expressions
///
/// Sub-expressions that are shared between the expressions are only evaluated once.
pub fn evaluate(expressions: &[Expression]) -> Result<Vec<Evaluation>> {
    let mut cache = HashMap::new();
    expressions
        .iter()
        .map(|e| evaluate_cached(e, &mut cache))
        .collect()
}

fn evaluate_cached(
    expression: &Expression,
    cache: &mut HashMap<usize, Evaluation>,
) -> Result<Evaluation> {
    if let Some(value) = cache.get(&expression.key()) {
        return Ok(value.clone());
    }
    let value = match expression.node() {
        Node::Literal(t) => Evaluation {
            fids: vec![],
            arr: t.clone(),
        },
        Node::Indexed(child, indices) => {
            // The axes are relabelled, the values are unchanged
            let c = evaluate_cached(child, cache)?;
            Evaluation {
                fids: c.fids.iter().chain(indices).copied().collect(),
                arr: c.arr,
            }
        }
        Node::Product(a, b) => {
            let a = evaluate_cached(a, cache)?;
            let b = evaluate_cached(b, cache)?;
            let fids = expression.free_indices().to_vec();
            let a_pos = positions(&a.fids, &fids)?;
            let b_pos = positions(&b.fids, &fids)?;
            let mut values = vec![];
            for i in multi_indices(&extents(&fids)) {
                values.push(lookup(&a.arr, &a_pos, &i)? * lookup(&b.arr, &b_pos, &i)?);
            }
            Evaluation {
                arr: Tensor::new(extents(&fids), values)?,
                fids,
            }
        }
        Node::IndexSum(child, indices) => {
            let c = evaluate_cached(child, cache)?;
            let fids = expression.free_indices().to_vec();
            let all = fids.iter().chain(indices).copied().collect::<Vec<_>>();
            let c_pos = positions(&c.fids, &all)?;
            let mut arr = Tensor::zeros(extents(&fids));
            for i in multi_indices(&extents(&all)) {
                let value = lookup(&c.arr, &c_pos, &i)?;
                *arr.get_mut(&i[..fids.len()])
                    .ok_or_else(|| out_of_range(&i[..fids.len()]))? += value;
            }
            Evaluation { fids, arr }
        }
        Node::ComponentTensor(child, indices) => {
            let c = evaluate_cached(child, cache)?;
            let fids = expression.free_indices().to_vec();
            let axes = fids.iter().chain(indices).copied().collect::<Vec<_>>();
            let c_pos = positions(&c.fids, &axes)?;
            let mut values = vec![];
            for i in multi_indices(&extents(&axes)) {
                values.push(lookup(&c.arr, &c_pos, &i)?);
            }
            Evaluation {
                arr: Tensor::new(extents(&axes), values)?,
                fids,
            }
        }
    };
    cache.insert(expression.key(), value.clone());
    Ok(value)
}

fn extents(indices: &[Index]) -> Vec<usize> {
    indices.iter().map(|i| i.extent()).collect()
}

/// The position of each of `indices` within `within`
fn positions(indices: &[Index], within: &[Index]) -> Result<Vec<usize>> {
    indices
        .iter()
        .map(|i| {
            within.iter().position(|j| j == i).ok_or_else(|| {
                Error::EvaluationConsistency(format!("index {i} is not bound in the expression"))
            })
        })
        .collect()
}

fn lookup(arr: &Tensor, pos: &[usize], multi_index: &[usize]) -> Result<f64> {
    let i = pos.iter().map(|p| multi_index[*p]).collect::<Vec<_>>();
    arr.get(&i).ok_or_else(|| out_of_range(&i))
}

fn out_of_range(i: &[usize]) -> Error {
    Error::EvaluationConsistency(format!("multi-index {i:?} is out of range"))
}
