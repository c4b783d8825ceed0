//! Boundary classification of nodes and links.
//!
//! [`BoundaryClassifier`] owns the status of every node and derives the
//! status of every link from it. Each mutator builds a candidate status
//! array, validates it, and only then commits, so a failed call leaves the
//! classification untouched. Link status is recomputed on every commit and
//! cannot be written directly.

use loam_core::{BoundaryKind, ClassificationError, LinkStatus, NodeStatus, BAD_INDEX};

use crate::edge::GridEdge;
use crate::topology::RasterTopology;

/// Node and link status for one raster topology.
#[derive(Clone, Debug)]
pub struct BoundaryClassifier {
    status_at_node: Vec<NodeStatus>,
    status_at_link: Vec<LinkStatus>,
}

fn matches_nodata(value: f64, nodata: f64) -> bool {
    if nodata.is_nan() {
        value.is_nan()
    } else {
        value == nodata
    }
}

impl BoundaryClassifier {
    /// Default classification: perimeter nodes [`NodeStatus::FixedValue`],
    /// interior nodes [`NodeStatus::Core`].
    pub fn new(topo: &RasterTopology) -> Self {
        let status = (0..topo.number_of_nodes())
            .map(|n| {
                if topo.node_is_perimeter(n) {
                    NodeStatus::FixedValue
                } else {
                    NodeStatus::Core
                }
            })
            .collect();
        let mut classifier = Self {
            status_at_node: Vec::new(),
            status_at_link: Vec::new(),
        };
        classifier.commit(topo, status);
        classifier
    }

    fn commit(&mut self, topo: &RasterTopology, status: Vec<NodeStatus>) {
        debug_assert_eq!(status.len(), topo.number_of_nodes());
        self.status_at_link = topo
            .node_at_link_tail()
            .iter()
            .zip(topo.node_at_link_head())
            .map(|(&t, &h)| LinkStatus::from_endpoints(status[t], status[h]))
            .collect();
        self.status_at_node = status;
        tracing::trace!(
            core = self.number_of_core_nodes(),
            active_links = self.number_of_active_links(),
            "boundary status refreshed"
        );
    }

    fn check_values(&self, values: &[f64]) -> Result<(), ClassificationError> {
        if values.len() != self.status_at_node.len() {
            return Err(ClassificationError::ValuesLengthMismatch {
                expected: self.status_at_node.len(),
                actual: values.len(),
            });
        }
        Ok(())
    }

    fn check_node(&self, node: usize) -> Result<(), ClassificationError> {
        if node >= self.status_at_node.len() {
            return Err(ClassificationError::NodeOutOfBounds {
                node,
                count: self.status_at_node.len(),
            });
        }
        Ok(())
    }

    // ── Edge setters ────────────────────────────────────────────

    /// Apply `kind` to every node on `edge`, corners included.
    ///
    /// A corner belongs to two edges; whichever setter runs last decides
    /// its status.
    pub fn set_status_at_edge(&mut self, topo: &RasterTopology, edge: GridEdge, kind: BoundaryKind) {
        let mut status = self.status_at_node.clone();
        let new = NodeStatus::from(kind);
        for node in topo.nodes_at_edge(edge) {
            status[node] = new;
        }
        tracing::debug!(?edge, status = %new, "edge status set");
        self.commit(topo, status);
    }

    /// Close the edges flagged `true`, leaving the others as they are.
    pub fn set_closed_boundaries_at_grid_edges(
        &mut self,
        topo: &RasterTopology,
        right: bool,
        top: bool,
        left: bool,
        bottom: bool,
    ) {
        let mut status = self.status_at_node.clone();
        for (edge, closed) in GridEdge::ALL.into_iter().zip([right, top, left, bottom]) {
            if closed {
                for node in topo.nodes_at_edge(edge) {
                    status[node] = NodeStatus::Closed;
                }
            }
        }
        tracing::debug!(right, top, left, bottom, "edges closed");
        self.commit(topo, status);
    }

    /// Mark the top and bottom edges and/or the left and right edges
    /// [`NodeStatus::Looped`].
    pub fn set_looped_boundaries(&mut self, topo: &RasterTopology, top_bottom: bool, left_right: bool) {
        let mut status = self.status_at_node.clone();
        let mut edges = Vec::with_capacity(4);
        if top_bottom {
            edges.extend([GridEdge::Top, GridEdge::Bottom]);
        }
        if left_right {
            edges.extend([GridEdge::Left, GridEdge::Right]);
        }
        for edge in edges {
            for node in topo.nodes_at_edge(edge) {
                status[node] = NodeStatus::Looped;
            }
        }
        tracing::debug!(top_bottom, left_right, "looped boundaries set");
        self.commit(topo, status);
    }

    // ── Per-node setters ────────────────────────────────────────

    /// Set one node's status.
    ///
    /// # Errors
    ///
    /// [`ClassificationError::NodeOutOfBounds`] for an unknown node;
    /// [`ClassificationError::ConflictingStatus`] when marking a perimeter
    /// node core, since a core node must own a cell.
    pub fn set_status_at_node(
        &mut self,
        topo: &RasterTopology,
        node: usize,
        new: NodeStatus,
    ) -> Result<(), ClassificationError> {
        self.check_node(node)?;
        if new == NodeStatus::Core && topo.node_is_perimeter(node) {
            return Err(ClassificationError::ConflictingStatus { node, status: new });
        }
        let mut status = self.status_at_node.clone();
        status[node] = new;
        tracing::trace!(node, status = %new, "node status set");
        self.commit(topo, status);
        Ok(())
    }

    /// Close every node whose value equals `nodata` (NaN matches NaN).
    /// Returns the number of nodes newly closed.
    pub fn set_nodata_nodes_to_closed(
        &mut self,
        topo: &RasterTopology,
        values: &[f64],
        nodata: f64,
    ) -> Result<usize, ClassificationError> {
        self.close_nodes_where(topo, values, |v| matches_nodata(v, nodata))
    }

    /// Close every node whose value satisfies `predicate`. Returns the
    /// number of nodes newly closed.
    pub fn close_nodes_where(
        &mut self,
        topo: &RasterTopology,
        values: &[f64],
        predicate: impl Fn(f64) -> bool,
    ) -> Result<usize, ClassificationError> {
        self.check_values(values)?;
        let mut status = self.status_at_node.clone();
        let mut closed = 0;
        for (s, &v) in status.iter_mut().zip(values) {
            if predicate(v) && *s != NodeStatus::Closed {
                *s = NodeStatus::Closed;
                closed += 1;
            }
        }
        tracing::debug!(closed, "nodes closed by value");
        self.commit(topo, status);
        Ok(closed)
    }

    // ── Outlets and watersheds ──────────────────────────────────

    /// Make `node` a fixed-value outlet, overriding its current status.
    ///
    /// # Errors
    ///
    /// [`ClassificationError::NoValidOutlet`] if the node is closed.
    pub fn set_outlet(&mut self, topo: &RasterTopology, node: usize) -> Result<(), ClassificationError> {
        self.check_node(node)?;
        if self.status_at_node[node] == NodeStatus::Closed {
            return Err(ClassificationError::NoValidOutlet { node: Some(node) });
        }
        let mut status = self.status_at_node.clone();
        status[node] = NodeStatus::FixedValue;
        tracing::debug!(node, "outlet set");
        self.commit(topo, status);
        Ok(())
    }

    /// Watershed classification: nodata nodes and every data node on the
    /// perimeter are closed, every other node is core.
    fn watershed_status(&self, topo: &RasterTopology, values: &[f64], nodata: f64) -> Vec<NodeStatus> {
        values
            .iter()
            .enumerate()
            .map(|(node, &v)| {
                if matches_nodata(v, nodata) || topo.node_is_perimeter(node) {
                    NodeStatus::Closed
                } else {
                    NodeStatus::Core
                }
            })
            .collect()
    }

    /// Classify a single-outlet watershed around a known outlet.
    ///
    /// # Errors
    ///
    /// [`ClassificationError::NoValidOutlet`] if the outlet holds nodata,
    /// plus the usual length and bounds errors.
    pub fn set_watershed_boundary_condition_outlet_id(
        &mut self,
        topo: &RasterTopology,
        outlet: usize,
        values: &[f64],
        nodata: f64,
    ) -> Result<(), ClassificationError> {
        self.check_values(values)?;
        self.check_node(outlet)?;
        if matches_nodata(values[outlet], nodata) {
            return Err(ClassificationError::NoValidOutlet { node: Some(outlet) });
        }
        let mut status = self.watershed_status(topo, values, nodata);
        status[outlet] = NodeStatus::FixedValue;
        tracing::debug!(outlet, "watershed classified");
        self.commit(topo, status);
        Ok(())
    }

    /// Classify a single-outlet watershed, choosing the outlet: the
    /// lowest-valued data node that is on the perimeter or next to a
    /// closed node (ties go to the lowest id). Returns the outlet.
    ///
    /// # Errors
    ///
    /// [`ClassificationError::NoValidOutlet`] when every node is nodata.
    pub fn set_watershed_boundary_condition(
        &mut self,
        topo: &RasterTopology,
        values: &[f64],
        nodata: f64,
    ) -> Result<usize, ClassificationError> {
        self.check_values(values)?;
        let mut status = self.watershed_status(topo, values, nodata);
        let adjacent = topo.adjacent_nodes_at_node();

        let mut outlet: Option<usize> = None;
        for (node, &v) in values.iter().enumerate() {
            if matches_nodata(v, nodata) {
                continue;
            }
            let candidate = topo.node_is_perimeter(node)
                || adjacent[node]
                    .iter()
                    .any(|&nb| nb != BAD_INDEX && status[nb] == NodeStatus::Closed);
            if !candidate {
                continue;
            }
            // Strict comparison keeps the lowest id on ties.
            if outlet.is_none_or(|best| v < values[best]) {
                outlet = Some(node);
            }
        }

        let outlet = outlet.ok_or(ClassificationError::NoValidOutlet { node: None })?;
        status[outlet] = NodeStatus::FixedValue;
        tracing::debug!(outlet, elevation = values[outlet], "watershed outlet chosen");
        self.commit(topo, status);
        Ok(outlet)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Status of every node.
    pub fn status_at_node(&self) -> &[NodeStatus] {
        &self.status_at_node
    }

    /// Status of every link.
    pub fn status_at_link(&self) -> &[LinkStatus] {
        &self.status_at_link
    }

    /// `true` for any non-core node. Unknown ids are `false`.
    pub fn node_is_boundary(&self, node: usize) -> bool {
        self.status_at_node
            .get(node)
            .is_some_and(|s| s.is_boundary())
    }

    fn nodes_where(&self, f: impl Fn(NodeStatus) -> bool) -> Vec<usize> {
        self.status_at_node
            .iter()
            .enumerate()
            .filter_map(|(n, &s)| f(s).then_some(n))
            .collect()
    }

    /// Core node ids in increasing order.
    pub fn core_nodes(&self) -> Vec<usize> {
        self.nodes_where(|s| s == NodeStatus::Core)
    }

    /// Every non-core node.
    pub fn boundary_nodes(&self) -> Vec<usize> {
        self.nodes_where(NodeStatus::is_boundary)
    }

    /// Fixed-value, fixed-gradient and looped nodes.
    pub fn open_boundary_nodes(&self) -> Vec<usize> {
        self.nodes_where(NodeStatus::is_open_boundary)
    }

    /// Closed nodes.
    pub fn closed_boundary_nodes(&self) -> Vec<usize> {
        self.nodes_where(|s| s == NodeStatus::Closed)
    }

    /// Active link ids in increasing order.
    pub fn active_links(&self) -> Vec<usize> {
        self.status_at_link
            .iter()
            .enumerate()
            .filter_map(|(l, s)| s.is_active().then_some(l))
            .collect()
    }

    /// Active links with a fixed-gradient endpoint.
    pub fn fixed_links(&self, topo: &RasterTopology) -> Vec<usize> {
        let tails = topo.node_at_link_tail();
        let heads = topo.node_at_link_head();
        self.active_links()
            .into_iter()
            .filter(|&l| {
                self.status_at_node[tails[l]] == NodeStatus::FixedGradient
                    || self.status_at_node[heads[l]] == NodeStatus::FixedGradient
            })
            .collect()
    }

    /// Number of core nodes.
    pub fn number_of_core_nodes(&self) -> usize {
        self.status_at_node
            .iter()
            .filter(|&&s| s == NodeStatus::Core)
            .count()
    }

    /// Number of active links.
    pub fn number_of_active_links(&self) -> usize {
        self.status_at_link.iter().filter(|s| s.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup(rows: usize, cols: usize) -> (RasterTopology, BoundaryClassifier) {
        let topo = RasterTopology::new(rows, cols, 1.0, 1.0, (0.0, 0.0)).unwrap();
        let bc = BoundaryClassifier::new(&topo);
        (topo, bc)
    }

    #[test]
    fn default_perimeter_is_fixed_value() {
        let (_, bc) = setup(4, 5);
        assert_eq!(bc.open_boundary_nodes().len(), 14);
        assert_eq!(bc.core_nodes(), vec![6, 7, 8, 11, 12, 13]);
        assert!(bc.closed_boundary_nodes().is_empty());
    }

    #[test]
    fn edge_setter_includes_corners_last_write_wins() {
        let (topo, mut bc) = setup(3, 4);
        bc.set_status_at_edge(&topo, GridEdge::Bottom, BoundaryKind::Closed);
        bc.set_status_at_edge(&topo, GridEdge::Left, BoundaryKind::FixedGradient);
        assert_eq!(bc.status_at_node()[0], NodeStatus::FixedGradient);
        assert_eq!(bc.status_at_node()[3], NodeStatus::Closed);
        assert_eq!(bc.status_at_node()[8], NodeStatus::FixedGradient);
    }

    #[test]
    fn edge_setter_is_idempotent() {
        let (topo, mut bc) = setup(4, 4);
        bc.set_status_at_edge(&topo, GridEdge::Top, BoundaryKind::Closed);
        let once = bc.status_at_node().to_vec();
        let links_once = bc.status_at_link().to_vec();
        bc.set_status_at_edge(&topo, GridEdge::Top, BoundaryKind::Closed);
        assert_eq!(bc.status_at_node(), once.as_slice());
        assert_eq!(bc.status_at_link(), links_once.as_slice());
    }

    #[test]
    fn closing_all_edges_leaves_only_core_links_active() {
        let (topo, mut bc) = setup(4, 5);
        bc.set_closed_boundaries_at_grid_edges(&topo, true, true, true, true);
        assert_eq!(bc.closed_boundary_nodes().len(), 14);
        for link in bc.active_links() {
            let t = topo.node_at_link_tail()[link];
            let h = topo.node_at_link_head()[link];
            assert_eq!(bc.status_at_node()[t], NodeStatus::Core);
            assert_eq!(bc.status_at_node()[h], NodeStatus::Core);
        }
        // 2 rows of 2 horizontal + 3 columns of 1 vertical
        assert_eq!(bc.number_of_active_links(), 7);
    }

    #[test]
    fn looped_edges() {
        let (topo, mut bc) = setup(3, 3);
        bc.set_looped_boundaries(&topo, true, false);
        assert_eq!(bc.status_at_node()[1], NodeStatus::Looped);
        assert_eq!(bc.status_at_node()[3], NodeStatus::FixedValue);
        assert!(bc.status_at_link()[topo.links_at_node()[4][3]].is_active());
    }

    #[test]
    fn core_on_perimeter_conflicts() {
        let (topo, mut bc) = setup(3, 3);
        let before = bc.status_at_node().to_vec();
        let err = bc.set_status_at_node(&topo, 0, NodeStatus::Core).unwrap_err();
        assert_eq!(
            err,
            ClassificationError::ConflictingStatus {
                node: 0,
                status: NodeStatus::Core
            }
        );
        assert_eq!(bc.status_at_node(), before.as_slice());
    }

    #[test]
    fn unknown_node_is_rejected() {
        let (topo, mut bc) = setup(3, 3);
        assert_eq!(
            bc.set_status_at_node(&topo, 9, NodeStatus::Closed),
            Err(ClassificationError::NodeOutOfBounds { node: 9, count: 9 })
        );
        assert_eq!(
            bc.set_outlet(&topo, 42),
            Err(ClassificationError::NodeOutOfBounds { node: 42, count: 9 })
        );
    }

    #[test]
    fn closing_interior_node_deactivates_its_links() {
        let (topo, mut bc) = setup(3, 3);
        bc.set_status_at_node(&topo, 4, NodeStatus::Closed).unwrap();
        assert!(bc.active_links().is_empty());
    }

    #[test]
    fn outlet_on_closed_edge_fails_unchanged() {
        let (topo, mut bc) = setup(4, 5);
        bc.set_closed_boundaries_at_grid_edges(&topo, true, true, true, true);
        let before = bc.status_at_node().to_vec();
        assert_eq!(
            bc.set_outlet(&topo, 0),
            Err(ClassificationError::NoValidOutlet { node: Some(0) })
        );
        assert_eq!(bc.status_at_node(), before.as_slice());
    }

    #[test]
    fn outlet_overrides_any_open_status() {
        let (topo, mut bc) = setup(4, 5);
        bc.set_status_at_edge(&topo, GridEdge::Bottom, BoundaryKind::FixedGradient);
        bc.set_outlet(&topo, 2).unwrap();
        assert_eq!(bc.status_at_node()[2], NodeStatus::FixedValue);
        bc.set_outlet(&topo, 7).unwrap();
        assert_eq!(bc.status_at_node()[7], NodeStatus::FixedValue);
    }

    #[test]
    fn nodata_nodes_close_including_nan() {
        let (topo, mut bc) = setup(3, 3);
        let mut values = vec![1.0; 9];
        values[4] = f64::NAN;
        assert_eq!(bc.set_nodata_nodes_to_closed(&topo, &values, f64::NAN), Ok(1));
        assert_eq!(bc.status_at_node()[4], NodeStatus::Closed);
        // Already closed: nothing new.
        assert_eq!(bc.set_nodata_nodes_to_closed(&topo, &values, f64::NAN), Ok(0));
    }

    #[test]
    fn values_length_checked() {
        let (topo, mut bc) = setup(3, 3);
        assert_eq!(
            bc.close_nodes_where(&topo, &[0.0; 4], |v| v < 0.0),
            Err(ClassificationError::ValuesLengthMismatch {
                expected: 9,
                actual: 4
            })
        );
    }

    #[test]
    fn watershed_with_named_outlet() {
        let (topo, mut bc) = setup(4, 4);
        let mut z = vec![5.0; 16];
        z[5] = -9999.0;
        bc.set_watershed_boundary_condition_outlet_id(&topo, 1, &z, -9999.0)
            .unwrap();
        assert_eq!(bc.status_at_node()[1], NodeStatus::FixedValue);
        assert_eq!(bc.status_at_node()[5], NodeStatus::Closed);
        assert_eq!(bc.status_at_node()[6], NodeStatus::Core);
        assert_eq!(bc.open_boundary_nodes(), vec![1]);
    }

    #[test]
    fn watershed_outlet_on_nodata_fails() {
        let (topo, mut bc) = setup(4, 4);
        let mut z = vec![5.0; 16];
        z[1] = -9999.0;
        assert_eq!(
            bc.set_watershed_boundary_condition_outlet_id(&topo, 1, &z, -9999.0),
            Err(ClassificationError::NoValidOutlet { node: Some(1) })
        );
        assert_eq!(bc.core_nodes(), vec![5, 6, 9, 10]);
    }

    #[test]
    fn watershed_picks_lowest_candidate() {
        let (topo, mut bc) = setup(4, 4);
        let z: Vec<f64> = (0..16).map(|n| 10.0 + n as f64).collect();
        let mut z = z;
        z[13] = 1.0;
        z[14] = 1.0;
        assert_eq!(bc.set_watershed_boundary_condition(&topo, &z, -9999.0), Ok(13));
        assert_eq!(bc.status_at_node()[13], NodeStatus::FixedValue);
    }

    #[test]
    fn watershed_all_nodata_fails() {
        let (topo, mut bc) = setup(3, 3);
        assert_eq!(
            bc.set_watershed_boundary_condition(&topo, &[0.0; 9], 0.0),
            Err(ClassificationError::NoValidOutlet { node: None })
        );
    }

    #[test]
    fn fixed_links_need_fixed_gradient_endpoint() {
        let (topo, mut bc) = setup(3, 4);
        assert!(bc.fixed_links(&topo).is_empty());
        bc.set_status_at_edge(&topo, GridEdge::Left, BoundaryKind::FixedGradient);
        // only node 4 on the left edge touches a core node (5) by link 7
        assert_eq!(bc.fixed_links(&topo), vec![7]);
    }

    proptest! {
        #[test]
        fn link_status_always_derived(
            rows in 3usize..8,
            cols in 3usize..8,
            closed in proptest::collection::vec(any::<bool>(), 64),
        ) {
            let (topo, mut bc) = setup(rows, cols);
            let values: Vec<f64> = (0..topo.number_of_nodes())
                .map(|n| if closed[n % closed.len()] { 1.0 } else { 0.0 })
                .collect();
            bc.close_nodes_where(&topo, &values, |v| v > 0.5).unwrap();
            for link in 0..topo.number_of_links() {
                let t = bc.status_at_node()[topo.node_at_link_tail()[link]];
                let h = bc.status_at_node()[topo.node_at_link_head()[link]];
                prop_assert_eq!(bc.status_at_link()[link], LinkStatus::from_endpoints(t, h));
            }
        }
    }
}
