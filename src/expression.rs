//! Symbolic tensor expressions
//!
//! Expressions are built as a graph of [Expression] nodes over symbolic [Index] objects and
//! are only reduced to numbers by [evaluate].

mod index;
mod interpreter;
mod node;
mod tensor;

pub use index::Index;
pub use interpreter::{evaluate, Evaluation};
pub use node::Expression;
pub use tensor::{multi_indices, Tensor};
