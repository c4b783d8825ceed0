//! The `ModelGrid` trait and `dyn ModelGrid` downcast support.

use std::any::Any;

use loam_core::{
    ElementCounts, FieldStore, GridInstanceId, LinkStatus, NodeStatus, ShapeViewError, BAD_INDEX,
};
use smallvec::SmallVec;

use crate::view::RasterView;

/// Grid surface that process components operate on.
///
/// Everything a component needs to read topology, boundary status and
/// fields goes through this trait. [`RasterModelGrid`](crate::RasterModelGrid)
/// is the only implementation in this crate; other grid types (hex,
/// Voronoi) can implement it without components changing.
///
/// Per-node arrays have four slots, padded with
/// [`BAD_INDEX`](loam_core::BAD_INDEX) where a node has fewer neighbours.
///
/// # Object Safety
///
/// Designed for use as `dyn ModelGrid`. Use
/// [`downcast_ref`](Self::downcast_ref) for opt-in specialization on a
/// concrete grid type.
pub trait ModelGrid: Any {
    /// Identifier allocated when the grid was built.
    fn instance_id(&self) -> GridInstanceId;

    /// Number of elements of each kind.
    fn counts(&self) -> ElementCounts;

    /// Number of nodes.
    fn number_of_nodes(&self) -> usize {
        self.counts().nodes
    }

    /// Number of links.
    fn number_of_links(&self) -> usize {
        self.counts().links
    }

    /// Number of patches.
    fn number_of_patches(&self) -> usize {
        self.counts().patches
    }

    /// Number of corners.
    fn number_of_corners(&self) -> usize {
        self.counts().corners
    }

    /// Number of faces.
    fn number_of_faces(&self) -> usize {
        self.counts().faces
    }

    /// Number of cells.
    fn number_of_cells(&self) -> usize {
        self.counts().cells
    }

    /// Number of nodes with [`NodeStatus::Core`].
    fn number_of_core_nodes(&self) -> usize {
        self.status_at_node()
            .iter()
            .filter(|&&s| s == NodeStatus::Core)
            .count()
    }

    /// Number of cells whose node is core.
    fn number_of_core_cells(&self) -> usize {
        self.number_of_core_nodes()
    }

    /// Number of active links.
    fn number_of_active_links(&self) -> usize {
        self.status_at_link().iter().filter(|s| s.is_active()).count()
    }

    /// Core node ids in increasing order.
    fn core_nodes(&self) -> Vec<usize> {
        self.status_at_node()
            .iter()
            .enumerate()
            .filter_map(|(n, &s)| (s == NodeStatus::Core).then_some(n))
            .collect()
    }

    /// Active links at `node` paired with the neighbour across each,
    /// in slot order.
    fn active_neighbours_at_node(&self, node: usize) -> SmallVec<[(usize, usize); 4]> {
        let status = self.status_at_link();
        self.links_at_node()[node]
            .iter()
            .zip(&self.adjacent_nodes_at_node()[node])
            .filter(|&(&link, _)| link != BAD_INDEX && status[link].is_active())
            .map(|(&link, &nb)| (link, nb))
            .collect()
    }

    /// x coordinate of every node.
    fn x_of_node(&self) -> &[f64];

    /// y coordinate of every node.
    fn y_of_node(&self) -> &[f64];

    /// Links at each node.
    fn links_at_node(&self) -> &[[usize; 4]];

    /// `+1` / `-1` where the node is a link's tail / head, `0` in empty slots.
    fn link_dirs_at_node(&self) -> &[[i8; 4]];

    /// Neighbouring nodes of each node, slot-aligned with
    /// [`links_at_node`](Self::links_at_node).
    fn adjacent_nodes_at_node(&self) -> &[[usize; 4]];

    /// Tail node of every link.
    fn node_at_link_tail(&self) -> &[usize];

    /// Head node of every link.
    fn node_at_link_head(&self) -> &[usize];

    /// Centre-to-centre length of a link.
    fn length_of_link(&self, link: usize) -> f64;

    /// Cell around each node, or `BAD_INDEX`.
    fn cell_at_node(&self) -> &[usize];

    /// Area of a cell.
    fn area_of_cell(&self, cell: usize) -> f64;

    /// Face crossing each link, or `BAD_INDEX`.
    fn face_at_link(&self) -> &[usize];

    /// Length of a face.
    fn width_of_face(&self, face: usize) -> f64;

    /// Status of every node.
    fn status_at_node(&self) -> &[NodeStatus];

    /// Status of every link, derived from its endpoints.
    fn status_at_link(&self) -> &[LinkStatus];

    /// The grid's field store.
    fn fields(&self) -> &FieldStore;

    /// Mutable access for registering fields.
    fn fields_mut(&mut self) -> &mut FieldStore;

    /// `(rows, cols)` for grids with row/column structure.
    fn raster_shape(&self) -> Option<(usize, usize)> {
        None
    }
}

impl dyn ModelGrid {
    /// Attempt to downcast a trait object to a concrete grid type.
    pub fn downcast_ref<T: ModelGrid>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// View a node-sized array as `rows x cols`.
    ///
    /// # Errors
    ///
    /// [`ShapeViewError::NotARaster`] if the grid has no raster shape,
    /// [`ShapeViewError::LengthMismatch`] if `values` is not node-sized.
    pub fn reshape<'a>(&self, values: &'a [f64]) -> Result<RasterView<'a>, ShapeViewError> {
        let (rows, cols) = self.raster_shape().ok_or(ShapeViewError::NotARaster)?;
        RasterView::new(rows, cols, values)
    }
}
