//! Raster topology: nodes, links, patches and their duals.
//!
//! [`RasterTopology`] derives every incidence array of a structured grid
//! from its shape and spacing. Everything here is immutable once built.
//!
//! # Numbering
//!
//! Nodes are row-major from the lower-left, x fastest. Links are ordered by
//! the position of their midpoint, y then x: each node row contributes its
//! `cols - 1` horizontal links, followed by the `cols` vertical links that
//! join it to the row above.
//!
//! ```text
//!    8 --14--  9 --15-- 10 --16-- 11      row 2
//!    |         |         |         |
//!   10        11        12        13
//!    |         |         |         |
//!    4 --7---  5 --8---  6 --9---  7      row 1
//!    |         |         |         |
//!    3         4         5         6
//!    |         |         |         |
//!    0 --0---  1 --1---  2 --2---  3      row 0
//! ```
//!
//! Per-node, per-patch and per-cell arrays use fixed slot orders documented
//! on each accessor; absent slots hold [`BAD_INDEX`].

use loam_core::{ConstructionError, ElementCounts, BAD_INDEX};

use crate::edge::GridEdge;

/// Slot of the east-pointing entry in per-node arrays.
pub const EAST: usize = 0;
/// Slot of the north-pointing entry in per-node arrays.
pub const NORTH: usize = 1;
/// Slot of the west-pointing entry in per-node arrays.
pub const WEST: usize = 2;
/// Slot of the south-pointing entry in per-node arrays.
pub const SOUTH: usize = 3;

/// Complete index structure of a raster grid.
///
/// Built once by [`RasterTopology::new`]; every accessor returns a borrow
/// of a dense array indexed by element id.
#[derive(Debug, Clone)]
pub struct RasterTopology {
    rows: usize,
    cols: usize,
    dx: f64,
    dy: f64,
    origin: (f64, f64),

    x_of_node: Vec<f64>,
    y_of_node: Vec<f64>,

    node_at_link_tail: Vec<usize>,
    node_at_link_head: Vec<usize>,
    links_at_node: Vec<[usize; 4]>,
    link_dirs_at_node: Vec<[i8; 4]>,
    adjacent_nodes_at_node: Vec<[usize; 4]>,

    links_at_patch: Vec<[usize; 4]>,
    nodes_at_patch: Vec<[usize; 4]>,
    patches_at_node: Vec<[usize; 4]>,

    node_at_cell: Vec<usize>,
    cell_at_node: Vec<usize>,
    faces_at_cell: Vec<[usize; 4]>,

    link_at_face: Vec<usize>,
    face_at_link: Vec<usize>,
}

impl RasterTopology {
    /// Largest supported node count. Per-node arrays hold four `usize`
    /// slots and there are fewer than two links per node, so every array
    /// stays within `isize::MAX` bytes.
    pub const MAX_NODES: usize =
        isize::MAX as usize / (2 * std::mem::size_of::<[usize; 4]>());

    /// Node and link counts of a `rows x cols` raster, or
    /// [`ConstructionError::TooLarge`] past [`MAX_NODES`](Self::MAX_NODES).
    pub(crate) fn checked_counts(
        rows: usize,
        cols: usize,
    ) -> Result<(usize, usize), ConstructionError> {
        match rows.checked_mul(cols) {
            Some(n) if n <= Self::MAX_NODES => Ok((n, 2 * n - rows - cols)),
            _ => Err(ConstructionError::TooLarge { rows, cols }),
        }
    }

    /// Build the topology of a `rows x cols` raster with node spacing
    /// `(dx, dy)` and lower-left node at `origin`.
    ///
    /// # Errors
    ///
    /// - [`ConstructionError::InvalidShape`] if `rows < 2` or `cols < 2`.
    /// - [`ConstructionError::InvalidSpacing`] if either spacing is not a
    ///   finite positive number.
    /// - [`ConstructionError::InvalidOrigin`] if the origin is not finite.
    /// - [`ConstructionError::TooLarge`] if the node count exceeds
    ///   [`MAX_NODES`](Self::MAX_NODES).
    ///
    /// # Examples
    ///
    /// ```
    /// use loam_grid::RasterTopology;
    ///
    /// let topo = RasterTopology::new(4, 5, 10.0, 10.0, (0.0, 0.0)).unwrap();
    /// assert_eq!(topo.number_of_nodes(), 20);
    /// assert_eq!(topo.number_of_links(), 31);
    /// assert_eq!(topo.number_of_patches(), 12);
    /// assert_eq!(topo.number_of_cells(), 6);
    /// ```
    pub fn new(
        rows: usize,
        cols: usize,
        dx: f64,
        dy: f64,
        origin: (f64, f64),
    ) -> Result<Self, ConstructionError> {
        if rows < 2 || cols < 2 {
            return Err(ConstructionError::InvalidShape { rows, cols });
        }
        if !(dx.is_finite() && dx > 0.0 && dy.is_finite() && dy > 0.0) {
            return Err(ConstructionError::InvalidSpacing { dx, dy });
        }
        if !(origin.0.is_finite() && origin.1.is_finite()) {
            return Err(ConstructionError::InvalidOrigin {
                x: origin.0,
                y: origin.1,
            });
        }
        let (n_nodes, n_links) = Self::checked_counts(rows, cols)?;

        let mut topo = Self {
            rows,
            cols,
            dx,
            dy,
            origin,
            x_of_node: Vec::with_capacity(n_nodes),
            y_of_node: Vec::with_capacity(n_nodes),
            node_at_link_tail: Vec::with_capacity(n_links),
            node_at_link_head: Vec::with_capacity(n_links),
            links_at_node: Vec::with_capacity(n_nodes),
            link_dirs_at_node: Vec::with_capacity(n_nodes),
            adjacent_nodes_at_node: Vec::with_capacity(n_nodes),
            links_at_patch: Vec::new(),
            nodes_at_patch: Vec::new(),
            patches_at_node: Vec::with_capacity(n_nodes),
            node_at_cell: Vec::new(),
            cell_at_node: Vec::with_capacity(n_nodes),
            faces_at_cell: Vec::new(),
            link_at_face: Vec::new(),
            face_at_link: Vec::with_capacity(n_links),
        };
        topo.build_nodes();
        topo.build_links();
        topo.build_patches();
        topo.build_cells_and_faces();
        Ok(topo)
    }

    fn build_nodes(&mut self) {
        let (x0, y0) = self.origin;
        for r in 0..self.rows {
            for c in 0..self.cols {
                self.x_of_node.push(x0 + c as f64 * self.dx);
                self.y_of_node.push(y0 + r as f64 * self.dy);
            }
        }
    }

    fn build_links(&mut self) {
        let (rows, cols) = (self.rows, self.cols);
        for r in 0..rows {
            for c in 0..cols - 1 {
                let tail = r * cols + c;
                self.node_at_link_tail.push(tail);
                self.node_at_link_head.push(tail + 1);
            }
            if r + 1 < rows {
                for c in 0..cols {
                    let tail = r * cols + c;
                    self.node_at_link_tail.push(tail);
                    self.node_at_link_head.push(tail + cols);
                }
            }
        }

        for r in 0..rows {
            for c in 0..cols {
                let node = r * cols + c;
                let mut links = [BAD_INDEX; 4];
                let mut dirs = [0i8; 4];
                let mut adjacent = [BAD_INDEX; 4];
                if c + 1 < cols {
                    links[EAST] = self.horizontal_link(r, c);
                    dirs[EAST] = 1;
                    adjacent[EAST] = node + 1;
                }
                if r + 1 < rows {
                    links[NORTH] = self.vertical_link(r, c);
                    dirs[NORTH] = 1;
                    adjacent[NORTH] = node + cols;
                }
                if c > 0 {
                    links[WEST] = self.horizontal_link(r, c - 1);
                    dirs[WEST] = -1;
                    adjacent[WEST] = node - 1;
                }
                if r > 0 {
                    links[SOUTH] = self.vertical_link(r - 1, c);
                    dirs[SOUTH] = -1;
                    adjacent[SOUTH] = node - cols;
                }
                self.links_at_node.push(links);
                self.link_dirs_at_node.push(dirs);
                self.adjacent_nodes_at_node.push(adjacent);
            }
        }
    }

    fn build_patches(&mut self) {
        let (rows, cols) = (self.rows, self.cols);
        for r in 0..rows - 1 {
            for c in 0..cols - 1 {
                self.links_at_patch.push([
                    self.vertical_link(r, c + 1),
                    self.horizontal_link(r + 1, c),
                    self.vertical_link(r, c),
                    self.horizontal_link(r, c),
                ]);
                let ll = r * cols + c;
                self.nodes_at_patch
                    .push([ll + cols + 1, ll + cols, ll, ll + 1]);
            }
        }

        let patch = |r: usize, c: usize| r * (cols - 1) + c;
        for r in 0..rows {
            for c in 0..cols {
                let up = r + 1 < rows;
                let right = c + 1 < cols;
                let mut patches = [BAD_INDEX; 4];
                if up && right {
                    patches[0] = patch(r, c);
                }
                if up && c > 0 {
                    patches[1] = patch(r, c - 1);
                }
                if r > 0 && c > 0 {
                    patches[2] = patch(r - 1, c - 1);
                }
                if r > 0 && right {
                    patches[3] = patch(r - 1, c);
                }
                self.patches_at_node.push(patches);
            }
        }
    }

    fn build_cells_and_faces(&mut self) {
        let (rows, cols) = (self.rows, self.cols);

        for link in 0..self.node_at_link_tail.len() {
            if self.link_is_interior(link) {
                self.face_at_link.push(self.link_at_face.len());
                self.link_at_face.push(link);
            } else {
                self.face_at_link.push(BAD_INDEX);
            }
        }

        for r in 0..rows {
            for c in 0..cols {
                let node = r * cols + c;
                if r == 0 || c == 0 || r + 1 == rows || c + 1 == cols {
                    self.cell_at_node.push(BAD_INDEX);
                    continue;
                }
                self.cell_at_node.push(self.node_at_cell.len());
                self.node_at_cell.push(node);
                let links = self.links_at_node[node];
                self.faces_at_cell.push([
                    self.face_at_link[links[EAST]],
                    self.face_at_link[links[NORTH]],
                    self.face_at_link[links[WEST]],
                    self.face_at_link[links[SOUTH]],
                ]);
            }
        }
    }

    fn horizontal_link(&self, r: usize, c: usize) -> usize {
        r * (2 * self.cols - 1) + c
    }

    fn vertical_link(&self, r: usize, c: usize) -> usize {
        r * (2 * self.cols - 1) + (self.cols - 1) + c
    }

    /// A link is interior when a cell boundary crosses it: horizontal links
    /// off the top and bottom rows, vertical links off the side columns.
    fn link_is_interior(&self, link: usize) -> bool {
        let per_row = 2 * self.cols - 1;
        let r = link / per_row;
        let offset = link % per_row;
        if offset < self.cols - 1 {
            r > 0 && r + 1 < self.rows
        } else {
            let c = offset - (self.cols - 1);
            c > 0 && c + 1 < self.cols
        }
    }

    // ── Shape and geometry ──────────────────────────────────────

    /// `(rows, cols)` of nodes.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of node rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of node columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Node spacing along x.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Node spacing along y.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Coordinates of node 0.
    pub fn xy_of_lower_left(&self) -> (f64, f64) {
        self.origin
    }

    /// Number of elements of every kind.
    pub fn counts(&self) -> ElementCounts {
        ElementCounts {
            nodes: self.number_of_nodes(),
            links: self.number_of_links(),
            patches: self.number_of_patches(),
            corners: self.number_of_corners(),
            faces: self.number_of_faces(),
            cells: self.number_of_cells(),
        }
    }

    // ── Counts ──────────────────────────────────────────────────

    /// `rows * cols`.
    pub fn number_of_nodes(&self) -> usize {
        self.x_of_node.len()
    }

    /// `2 * rows * cols - rows - cols`.
    pub fn number_of_links(&self) -> usize {
        self.node_at_link_tail.len()
    }

    /// `(rows - 1) * (cols - 1)`.
    pub fn number_of_patches(&self) -> usize {
        self.links_at_patch.len()
    }

    /// One corner per patch.
    pub fn number_of_corners(&self) -> usize {
        self.links_at_patch.len()
    }

    /// One face per interior link.
    pub fn number_of_faces(&self) -> usize {
        self.link_at_face.len()
    }

    /// `(rows - 2) * (cols - 2)`.
    pub fn number_of_cells(&self) -> usize {
        self.node_at_cell.len()
    }

    // ── Nodes ───────────────────────────────────────────────────

    /// x coordinate of every node.
    pub fn x_of_node(&self) -> &[f64] {
        &self.x_of_node
    }

    /// y coordinate of every node.
    pub fn y_of_node(&self) -> &[f64] {
        &self.y_of_node
    }

    /// Node at `(row, col)`, or `None` outside the grid.
    pub fn node_at(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// `(row, col)` of a node, or `None` for an unknown id.
    pub fn row_col_of_node(&self, node: usize) -> Option<(usize, usize)> {
        (node < self.number_of_nodes()).then(|| (node / self.cols, node % self.cols))
    }

    /// `true` if the node lies on the outer ring of the grid.
    pub fn node_is_perimeter(&self, node: usize) -> bool {
        match self.row_col_of_node(node) {
            Some((r, c)) => r == 0 || c == 0 || r + 1 == self.rows || c + 1 == self.cols,
            None => false,
        }
    }

    /// Nodes along one edge, in increasing id order (corners included).
    pub fn nodes_at_edge(&self, edge: GridEdge) -> Vec<usize> {
        let (rows, cols) = (self.rows, self.cols);
        match edge {
            GridEdge::Bottom => (0..cols).collect(),
            GridEdge::Top => ((rows - 1) * cols..rows * cols).collect(),
            GridEdge::Left => (0..rows).map(|r| r * cols).collect(),
            GridEdge::Right => (0..rows).map(|r| r * cols + cols - 1).collect(),
        }
    }

    /// Every perimeter node, in increasing id order.
    pub fn perimeter_nodes(&self) -> Vec<usize> {
        (0..self.number_of_nodes())
            .filter(|&n| self.node_is_perimeter(n))
            .collect()
    }

    /// Links at each node in `[east, north, west, south]` order.
    pub fn links_at_node(&self) -> &[[usize; 4]] {
        &self.links_at_node
    }

    /// Direction of each entry of [`links_at_node`](Self::links_at_node):
    /// `+1` where the node is the link's tail, `-1` where it is the head,
    /// `0` in absent slots.
    pub fn link_dirs_at_node(&self) -> &[[i8; 4]] {
        &self.link_dirs_at_node
    }

    /// Neighbouring nodes in `[east, north, west, south]` order.
    pub fn adjacent_nodes_at_node(&self) -> &[[usize; 4]] {
        &self.adjacent_nodes_at_node
    }

    /// Patches touching each node in `[upper-right, upper-left, lower-left,
    /// lower-right]` order.
    pub fn patches_at_node(&self) -> &[[usize; 4]] {
        &self.patches_at_node
    }

    // ── Links ───────────────────────────────────────────────────

    /// Tail node of every link.
    pub fn node_at_link_tail(&self) -> &[usize] {
        &self.node_at_link_tail
    }

    /// Head node of every link.
    pub fn node_at_link_head(&self) -> &[usize] {
        &self.node_at_link_head
    }

    /// `true` for links pointing along +x.
    pub fn is_horizontal_link(&self, link: usize) -> bool {
        link % (2 * self.cols - 1) < self.cols - 1
    }

    /// Length of a link: `dx` for horizontal links, `dy` for vertical ones.
    pub fn length_of_link(&self, link: usize) -> f64 {
        if self.is_horizontal_link(link) {
            self.dx
        } else {
            self.dy
        }
    }

    /// Face crossing each link, or [`BAD_INDEX`] on perimeter links.
    pub fn face_at_link(&self) -> &[usize] {
        &self.face_at_link
    }

    // ── Patches and corners ─────────────────────────────────────

    /// Links bounding each patch in `[right, top, left, bottom]` order.
    pub fn links_at_patch(&self) -> &[[usize; 4]] {
        &self.links_at_patch
    }

    /// Nodes of each patch in `[upper-right, upper-left, lower-left,
    /// lower-right]` order.
    pub fn nodes_at_patch(&self) -> &[[usize; 4]] {
        &self.nodes_at_patch
    }

    /// Area of a patch.
    pub fn area_of_patch(&self, _patch: usize) -> f64 {
        self.dx * self.dy
    }

    /// Patch a corner sits at the centre of.
    pub fn patch_at_corner(&self, corner: usize) -> Option<usize> {
        (corner < self.number_of_corners()).then_some(corner)
    }

    /// Corner at the centre of a patch.
    pub fn corner_at_patch(&self, patch: usize) -> Option<usize> {
        (patch < self.number_of_patches()).then_some(patch)
    }

    /// `(x, y)` of a corner (the centre of its patch).
    pub fn xy_of_corner(&self, corner: usize) -> Option<(f64, f64)> {
        let [_, _, ll, _] = *self.nodes_at_patch.get(corner)?;
        Some((
            self.x_of_node[ll] + 0.5 * self.dx,
            self.y_of_node[ll] + 0.5 * self.dy,
        ))
    }

    // ── Cells and faces ─────────────────────────────────────────

    /// Node each cell surrounds.
    pub fn node_at_cell(&self) -> &[usize] {
        &self.node_at_cell
    }

    /// Cell around each node, or [`BAD_INDEX`] on the perimeter.
    pub fn cell_at_node(&self) -> &[usize] {
        &self.cell_at_node
    }

    /// Faces of each cell in `[east, north, west, south]` order.
    pub fn faces_at_cell(&self) -> &[[usize; 4]] {
        &self.faces_at_cell
    }

    /// Area of a cell.
    pub fn area_of_cell(&self, _cell: usize) -> f64 {
        self.dx * self.dy
    }

    /// Link each face crosses.
    pub fn link_at_face(&self) -> &[usize] {
        &self.link_at_face
    }

    /// Length of a face: faces across horizontal links run along y.
    pub fn width_of_face(&self, face: usize) -> f64 {
        match self.link_at_face.get(face) {
            Some(&link) if self.is_horizontal_link(link) => self.dy,
            _ => self.dx,
        }
    }
}
