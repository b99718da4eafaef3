//! Finite element descriptions for symbolic generation of integration kernels
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod arrays;
pub mod element;
pub mod expression;
pub mod quadrature;
pub mod reference_cell;
pub mod traits;
pub mod types;

pub use element::{entity_support_dofs, LagrangeElement, TensorProductElement};
pub use traits::FiniteElement;
