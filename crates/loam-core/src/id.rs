//! Element kinds, the missing-index sentinel and grid instance identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sentinel stored in dense incidence arrays where an element has no
/// counterpart (a perimeter node has no cell, a perimeter link has no face,
/// a corner node has only two links).
pub const BAD_INDEX: usize = usize::MAX;

/// The six element sets a grid is made of.
///
/// Nodes, links and patches form the primary graph; cells, faces and
/// corners form its dual. Every field lives on exactly one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// Points of the primary graph.
    Node,
    /// Directed edges joining two nodes.
    Link,
    /// Quadrilaterals bounded by four links.
    Patch,
    /// Points of the dual graph, one per patch centre.
    Corner,
    /// Dual edges, one per link fully interior to the grid.
    Face,
    /// Dual areas, one per interior node.
    Cell,
}

impl ElementKind {
    /// All kinds, in storage order.
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Node,
        ElementKind::Link,
        ElementKind::Patch,
        ElementKind::Corner,
        ElementKind::Face,
        ElementKind::Cell,
    ];

    /// Position of this kind in [`ElementKind::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Node => 0,
            Self::Link => 1,
            Self::Patch => 2,
            Self::Corner => 3,
            Self::Face => 4,
            Self::Cell => 5,
        }
    }

    /// Lower-case name, as used in field-group lookups (`"node"`, `"link"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Link => "link",
            Self::Patch => "patch",
            Self::Corner => "corner",
            Self::Face => "face",
            Self::Cell => "cell",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counter for unique [`GridInstanceId`] allocation.
static GRID_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a grid object.
///
/// Allocated from a monotonic atomic counter via [`GridInstanceId::next`].
/// Components record the id of the grid they were built against so that
/// stepping them with a different grid is caught instead of silently
/// indexing the wrong arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridInstanceId(u64);

impl GridInstanceId {
    /// Allocate a fresh, unique instance ID.
    pub fn next() -> Self {
        Self(GRID_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GridInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
