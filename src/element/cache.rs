//! Memoised DOF maps

use crate::types::{ClosureDofMap, Result, SupportDofMap};
use once_cell::sync::OnceCell;

/// Storage for the DOF maps that are derived from an element's entity DOFs
///
/// Each map is computed at most once. If several threads ask for a map at the same time, one
/// of them computes it and the others wait for the result. A computation that fails is not
/// stored.
#[derive(Debug, Default, Clone)]
pub struct DofCache {
    closure_dofs: OnceCell<ClosureDofMap>,
    support_dofs: OnceCell<SupportDofMap>,
}

impl DofCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The closure DOFs, computed by `f` on first access
    pub fn closure_dofs(
        &self,
        f: impl FnOnce() -> Result<ClosureDofMap>,
    ) -> Result<&ClosureDofMap> {
        self.closure_dofs.get_or_try_init(f)
    }

    /// The support DOFs, computed by `f` on first access
    pub fn support_dofs(
        &self,
        f: impl FnOnce() -> Result<SupportDofMap>,
    ) -> Result<&SupportDofMap> {
        self.support_dofs.get_or_try_init(f)
    }

    /// Have the closure DOFs been computed?
    pub fn has_closure_dofs(&self) -> bool {
        self.closure_dofs.get().is_some()
    }

    /// Have the support DOFs been computed?
    pub fn has_support_dofs(&self) -> bool {
        self.support_dofs.get().is_some()
    }
}
