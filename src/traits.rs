//! Trait definitions

mod element;

pub use element::{CoordinateMapping, FiniteElement};
