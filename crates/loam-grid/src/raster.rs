//! `RasterModelGrid`: topology, boundary status and fields in one object.

use loam_core::{
    BoundaryKind, ClassificationError, ConstructionError, ElementCounts, ElementKind, FieldError,
    FieldHandle, FieldStore, GridInstanceId, LinkStatus, NodeStatus, ShapeViewError,
};

use crate::boundary::BoundaryClassifier;
use crate::config::GridConfig;
use crate::edge::GridEdge;
use crate::grid::ModelGrid;
use crate::topology::RasterTopology;
use crate::view::RasterView;

/// A structured grid of square or rectangular cells.
///
/// Owns an immutable [`RasterTopology`], a [`BoundaryClassifier`] and a
/// [`FieldStore`] sized to the topology. Boundary setters take `&mut self`,
/// so no component can observe a half-updated classification.
///
/// # Examples
///
/// ```
/// use loam_core::{BoundaryKind, ElementKind, NodeStatus};
/// use loam_grid::{GridEdge, ModelGrid, RasterModelGrid};
///
/// let mut grid = RasterModelGrid::new(4, 5, 10.0).unwrap();
/// assert_eq!(grid.number_of_core_nodes(), 6);
///
/// grid.set_status_at_edge(GridEdge::Top, BoundaryKind::Closed);
/// assert_eq!(grid.status_at_node()[17], NodeStatus::Closed);
///
/// let z = grid.add_zeros(ElementKind::Node, "topographic__elevation");
/// z.write()[7] = 1.5;
/// assert_eq!(grid.field_values(ElementKind::Node, "topographic__elevation").unwrap()[7], 1.5);
/// ```
#[derive(Debug)]
pub struct RasterModelGrid {
    topology: RasterTopology,
    boundary: BoundaryClassifier,
    fields: FieldStore,
    instance_id: GridInstanceId,
}

/// Builder for [`RasterModelGrid`].
///
/// Defaults to unit spacing at the origin; the shape is required.
#[derive(Clone, Debug, Default)]
pub struct RasterModelGridBuilder {
    shape: Option<(usize, usize)>,
    spacing: Option<(f64, f64)>,
    xy_of_lower_left: Option<(f64, f64)>,
}

impl RasterModelGridBuilder {
    /// Number of node rows and columns.
    pub fn shape(mut self, rows: usize, cols: usize) -> Self {
        self.shape = Some((rows, cols));
        self
    }

    /// Equal spacing along both axes.
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some((spacing, spacing));
        self
    }

    /// Separate spacing along x and y.
    pub fn spacing_xy(mut self, dx: f64, dy: f64) -> Self {
        self.spacing = Some((dx, dy));
        self
    }

    /// Coordinates of node 0.
    pub fn xy_of_lower_left(mut self, x: f64, y: f64) -> Self {
        self.xy_of_lower_left = Some((x, y));
        self
    }

    /// Build the grid.
    ///
    /// A builder with no shape fails as an `InvalidShape { rows: 0, cols: 0 }`.
    pub fn build(self) -> Result<RasterModelGrid, ConstructionError> {
        let (rows, cols) = self.shape.unwrap_or((0, 0));
        let mut config = GridConfig::new(rows, cols);
        if let Some((dx, dy)) = self.spacing {
            config.dx = dx;
            config.dy = dy;
        }
        if let Some(origin) = self.xy_of_lower_left {
            config.xy_of_lower_left = origin;
        }
        RasterModelGrid::from_config(&config)
    }
}

impl RasterModelGrid {
    /// A `rows x cols` grid with equal spacing, lower-left node at the origin.
    pub fn new(rows: usize, cols: usize, spacing: f64) -> Result<Self, ConstructionError> {
        Self::builder().shape(rows, cols).spacing(spacing).build()
    }

    /// Start a [`RasterModelGridBuilder`].
    pub fn builder() -> RasterModelGridBuilder {
        RasterModelGridBuilder::default()
    }

    /// Build from a validated configuration.
    pub fn from_config(config: &GridConfig) -> Result<Self, ConstructionError> {
        config.validate()?;
        let topology = RasterTopology::new(
            config.rows,
            config.cols,
            config.dx,
            config.dy,
            config.xy_of_lower_left,
        )?;
        let boundary = BoundaryClassifier::new(&topology);
        let fields = FieldStore::new(topology.counts());
        let instance_id = GridInstanceId::next();
        tracing::debug!(
            %instance_id,
            rows = config.rows,
            cols = config.cols,
            dx = config.dx,
            dy = config.dy,
            "raster grid built"
        );
        Ok(Self {
            topology,
            boundary,
            fields,
            instance_id,
        })
    }

    /// The immutable index structure.
    pub fn topology(&self) -> &RasterTopology {
        &self.topology
    }

    /// The boundary classification.
    pub fn boundary(&self) -> &BoundaryClassifier {
        &self.boundary
    }

    /// `(rows, cols)` of nodes.
    pub fn shape(&self) -> (usize, usize) {
        self.topology.shape()
    }

    /// `(dx, dy)`.
    pub fn spacing(&self) -> (f64, f64) {
        (self.topology.dx(), self.topology.dy())
    }

    /// Coordinates of node 0.
    pub fn xy_of_lower_left(&self) -> (f64, f64) {
        self.topology.xy_of_lower_left()
    }

    /// Nodes along one edge, corners included.
    pub fn nodes_at_edge(&self, edge: GridEdge) -> Vec<usize> {
        self.topology.nodes_at_edge(edge)
    }

    /// Node at `(row, col)`.
    pub fn node_at(&self, row: usize, col: usize) -> Option<usize> {
        self.topology.node_at(row, col)
    }

    /// Links of each patch in `[right, top, left, bottom]` order.
    pub fn links_at_patch(&self) -> &[[usize; 4]] {
        self.topology.links_at_patch()
    }

    /// Nodes of each patch, counter-clockwise from the upper right.
    pub fn nodes_at_patch(&self) -> &[[usize; 4]] {
        self.topology.nodes_at_patch()
    }

    /// Patches around each node, counter-clockwise from the upper right.
    pub fn patches_at_node(&self) -> &[[usize; 4]] {
        self.topology.patches_at_node()
    }

    /// Node each cell surrounds.
    pub fn node_at_cell(&self) -> &[usize] {
        self.topology.node_at_cell()
    }

    /// Link each face crosses.
    pub fn link_at_face(&self) -> &[usize] {
        self.topology.link_at_face()
    }

    /// Faces of each cell in `[east, north, west, south]` order.
    pub fn faces_at_cell(&self) -> &[[usize; 4]] {
        self.topology.faces_at_cell()
    }

    // ── Boundary conditions ─────────────────────────────────────

    /// See [`BoundaryClassifier::set_status_at_edge`].
    pub fn set_status_at_edge(&mut self, edge: GridEdge, kind: BoundaryKind) {
        self.boundary.set_status_at_edge(&self.topology, edge, kind);
    }

    /// See [`BoundaryClassifier::set_closed_boundaries_at_grid_edges`].
    pub fn set_closed_boundaries_at_grid_edges(
        &mut self,
        right: bool,
        top: bool,
        left: bool,
        bottom: bool,
    ) {
        self.boundary
            .set_closed_boundaries_at_grid_edges(&self.topology, right, top, left, bottom);
    }

    /// See [`BoundaryClassifier::set_looped_boundaries`].
    pub fn set_looped_boundaries(&mut self, top_bottom: bool, left_right: bool) {
        self.boundary
            .set_looped_boundaries(&self.topology, top_bottom, left_right);
    }

    /// See [`BoundaryClassifier::set_status_at_node`].
    pub fn set_status_at_node(
        &mut self,
        node: usize,
        status: NodeStatus,
    ) -> Result<(), ClassificationError> {
        self.boundary
            .set_status_at_node(&self.topology, node, status)
    }

    /// See [`BoundaryClassifier::set_nodata_nodes_to_closed`].
    pub fn set_nodata_nodes_to_closed(
        &mut self,
        values: &[f64],
        nodata: f64,
    ) -> Result<usize, ClassificationError> {
        self.boundary
            .set_nodata_nodes_to_closed(&self.topology, values, nodata)
    }

    /// See [`BoundaryClassifier::close_nodes_where`].
    pub fn close_nodes_where(
        &mut self,
        values: &[f64],
        predicate: impl Fn(f64) -> bool,
    ) -> Result<usize, ClassificationError> {
        self.boundary
            .close_nodes_where(&self.topology, values, predicate)
    }

    /// See [`BoundaryClassifier::set_outlet`].
    pub fn set_outlet(&mut self, node: usize) -> Result<(), ClassificationError> {
        self.boundary.set_outlet(&self.topology, node)
    }

    /// See [`BoundaryClassifier::set_watershed_boundary_condition_outlet_id`].
    pub fn set_watershed_boundary_condition_outlet_id(
        &mut self,
        outlet: usize,
        values: &[f64],
        nodata: f64,
    ) -> Result<(), ClassificationError> {
        self.boundary.set_watershed_boundary_condition_outlet_id(
            &self.topology,
            outlet,
            values,
            nodata,
        )
    }

    /// See [`BoundaryClassifier::set_watershed_boundary_condition`].
    pub fn set_watershed_boundary_condition(
        &mut self,
        values: &[f64],
        nodata: f64,
    ) -> Result<usize, ClassificationError> {
        self.boundary
            .set_watershed_boundary_condition(&self.topology, values, nodata)
    }

    /// Non-core nodes.
    pub fn boundary_nodes(&self) -> Vec<usize> {
        self.boundary.boundary_nodes()
    }

    /// Fixed-value, fixed-gradient and looped nodes.
    pub fn open_boundary_nodes(&self) -> Vec<usize> {
        self.boundary.open_boundary_nodes()
    }

    /// Closed nodes.
    pub fn closed_boundary_nodes(&self) -> Vec<usize> {
        self.boundary.closed_boundary_nodes()
    }

    /// Active links.
    pub fn active_links(&self) -> Vec<usize> {
        self.boundary.active_links()
    }

    /// Active links with a fixed-gradient endpoint.
    pub fn fixed_links(&self) -> Vec<usize> {
        self.boundary.fixed_links(&self.topology)
    }

    /// `true` for any non-core node.
    pub fn node_is_boundary(&self, node: usize) -> bool {
        self.boundary.node_is_boundary(node)
    }

    // ── Fields ──────────────────────────────────────────────────

    /// See [`FieldStore::add_zeros`].
    pub fn add_zeros(&mut self, kind: ElementKind, name: &str) -> FieldHandle {
        self.fields.add_zeros(kind, name)
    }

    /// See [`FieldStore::add_ones`].
    pub fn add_ones(&mut self, kind: ElementKind, name: &str) -> FieldHandle {
        self.fields.add_ones(kind, name)
    }

    /// See [`FieldStore::add_full`].
    pub fn add_full(&mut self, kind: ElementKind, name: &str, value: f64) -> FieldHandle {
        self.fields.add_full(kind, name, value)
    }

    /// See [`FieldStore::add_field`].
    pub fn add_field(
        &mut self,
        kind: ElementKind,
        name: &str,
        values: Vec<f64>,
    ) -> Result<FieldHandle, FieldError> {
        self.fields.add_field(kind, name, values)
    }

    /// See [`FieldStore::attach`].
    pub fn attach(
        &mut self,
        kind: ElementKind,
        name: &str,
        handle: FieldHandle,
    ) -> Result<(), FieldError> {
        self.fields.attach(kind, name, handle)
    }

    /// See [`FieldStore::field`].
    pub fn field(&self, kind: ElementKind, name: &str) -> Result<FieldHandle, FieldError> {
        self.fields.field(kind, name)
    }

    /// See [`FieldStore::field_values`].
    pub fn field_values(&self, kind: ElementKind, name: &str) -> Result<Vec<f64>, FieldError> {
        self.fields.field_values(kind, name)
    }

    /// See [`FieldStore::has_field`].
    pub fn has_field(&self, kind: ElementKind, name: &str) -> bool {
        self.fields.has_field(kind, name)
    }

    /// View a node array as rows bottom to top.
    pub fn reshape<'a>(&self, values: &'a [f64]) -> Result<RasterView<'a>, ShapeViewError> {
        let (rows, cols) = self.shape();
        RasterView::new(rows, cols, values)
    }
}

impl ModelGrid for RasterModelGrid {
    fn instance_id(&self) -> GridInstanceId {
        self.instance_id
    }

    fn counts(&self) -> ElementCounts {
        self.fields.counts()
    }

    fn number_of_core_nodes(&self) -> usize {
        self.boundary.number_of_core_nodes()
    }

    fn number_of_active_links(&self) -> usize {
        self.boundary.number_of_active_links()
    }

    fn core_nodes(&self) -> Vec<usize> {
        self.boundary.core_nodes()
    }

    fn x_of_node(&self) -> &[f64] {
        self.topology.x_of_node()
    }

    fn y_of_node(&self) -> &[f64] {
        self.topology.y_of_node()
    }

    fn links_at_node(&self) -> &[[usize; 4]] {
        self.topology.links_at_node()
    }

    fn link_dirs_at_node(&self) -> &[[i8; 4]] {
        self.topology.link_dirs_at_node()
    }

    fn adjacent_nodes_at_node(&self) -> &[[usize; 4]] {
        self.topology.adjacent_nodes_at_node()
    }

    fn node_at_link_tail(&self) -> &[usize] {
        self.topology.node_at_link_tail()
    }

    fn node_at_link_head(&self) -> &[usize] {
        self.topology.node_at_link_head()
    }

    fn length_of_link(&self, link: usize) -> f64 {
        self.topology.length_of_link(link)
    }

    fn cell_at_node(&self) -> &[usize] {
        self.topology.cell_at_node()
    }

    fn area_of_cell(&self, cell: usize) -> f64 {
        self.topology.area_of_cell(cell)
    }

    fn face_at_link(&self) -> &[usize] {
        self.topology.face_at_link()
    }

    fn width_of_face(&self, face: usize) -> f64 {
        self.topology.width_of_face(face)
    }

    fn status_at_node(&self) -> &[NodeStatus] {
        self.boundary.status_at_node()
    }

    fn status_at_link(&self) -> &[LinkStatus] {
        self.boundary.status_at_link()
    }

    fn fields(&self) -> &FieldStore {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }

    fn raster_shape(&self) -> Option<(usize, usize)> {
        Some(self.shape())
    }
}
