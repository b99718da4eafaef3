//! Symbolic indices

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_INDEX_ID: AtomicUsize = AtomicUsize::new(0);

/// A symbolic index with a fixed extent
///
/// Every call to [Index::new] creates an index that is distinct from all other indices,
/// even if the extents agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Index {
    id: usize,
    extent: usize,
}

impl Index {
    /// Create a new index
    pub fn new(extent: usize) -> Self {
        Self {
            id: NEXT_INDEX_ID.fetch_add(1, Ordering::Relaxed),
            extent,
        }
    }

    /// The number of values the index takes
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// The unique identifier of the index
    pub fn id(&self) -> usize {
        self.id
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i_{}", self.id)
    }
}
