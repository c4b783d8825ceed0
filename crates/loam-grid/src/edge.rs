//! The four edges of a raster grid.

/// One edge of a raster grid.
///
/// Each edge includes both of its corner nodes, so the bottom-left node
/// belongs to both [`GridEdge::Bottom`] and [`GridEdge::Left`].
///
/// # Examples
///
/// ```
/// use loam_grid::{GridEdge, RasterModelGrid};
///
/// let grid = RasterModelGrid::new(3, 4, 1.0).unwrap();
/// assert_eq!(grid.nodes_at_edge(GridEdge::Bottom), vec![0, 1, 2, 3]);
/// assert_eq!(grid.nodes_at_edge(GridEdge::Left), vec![0, 4, 8]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridEdge {
    /// Maximum-x column.
    Right,
    /// Maximum-y row.
    Top,
    /// Minimum-x column.
    Left,
    /// Minimum-y row.
    Bottom,
}

impl GridEdge {
    /// All edges, counter-clockwise from the right.
    pub const ALL: [GridEdge; 4] = [
        GridEdge::Right,
        GridEdge::Top,
        GridEdge::Left,
        GridEdge::Bottom,
    ];
}
