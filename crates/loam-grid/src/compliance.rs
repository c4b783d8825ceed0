//! Topology compliance test helpers.
//!
//! These functions check the incidence invariants every raster topology
//! must satisfy, whatever its shape or spacing. Reused from the topology,
//! classifier and grid test modules.

use loam_core::BAD_INDEX;

use crate::topology::RasterTopology;

/// Assert that every link's head is a neighbour of its tail along +x or +y.
pub fn assert_links_point_up_or_right(topo: &RasterTopology) {
    let cols = topo.cols();
    for link in 0..topo.number_of_links() {
        let tail = topo.node_at_link_tail()[link];
        let head = topo.node_at_link_head()[link];
        let expected = if topo.is_horizontal_link(link) {
            tail + 1
        } else {
            tail + cols
        };
        assert_eq!(
            head, expected,
            "link {link}: head {head} is not the +x/+y neighbour of tail {tail}"
        );
    }
}

/// Assert that `links_at_node` and the tail/head arrays agree, with `+1`
/// marking tails, `-1` heads and `0` absent slots.
pub fn assert_link_dirs_consistent(topo: &RasterTopology) {
    let mut seen = vec![0usize; topo.number_of_links()];
    for node in 0..topo.number_of_nodes() {
        let links = topo.links_at_node()[node];
        let dirs = topo.link_dirs_at_node()[node];
        for slot in 0..4 {
            let link = links[slot];
            match dirs[slot] {
                0 => assert_eq!(link, BAD_INDEX, "node {node} slot {slot}: dir 0 on a real link"),
                1 => {
                    assert_eq!(topo.node_at_link_tail()[link], node, "node {node}: +1 on link {link}");
                    seen[link] += 1;
                }
                -1 => {
                    assert_eq!(topo.node_at_link_head()[link], node, "node {node}: -1 on link {link}");
                    seen[link] += 1;
                }
                d => panic!("node {node} slot {slot}: direction {d} out of range"),
            }
        }
    }
    for (link, &count) in seen.iter().enumerate() {
        assert_eq!(count, 2, "link {link} referenced by {count} nodes, expected 2");
    }
}

/// Assert that adjacency is symmetric and matches the link endpoints.
pub fn assert_adjacency_symmetric(topo: &RasterTopology) {
    let adjacent = topo.adjacent_nodes_at_node();
    for node in 0..topo.number_of_nodes() {
        for (slot, &nb) in adjacent[node].iter().enumerate() {
            if nb == BAD_INDEX {
                assert_eq!(topo.links_at_node()[node][slot], BAD_INDEX);
                continue;
            }
            assert!(
                adjacent[nb].contains(&node),
                "adjacency violated: {nb} in N({node}) but {node} not in N({nb})"
            );
        }
    }
}

/// Assert that every patch is bounded by four links whose endpoints are
/// exactly the patch's four nodes.
pub fn assert_patches_closed(topo: &RasterTopology) {
    for patch in 0..topo.number_of_patches() {
        let mut from_links: Vec<usize> = topo.links_at_patch()[patch]
            .iter()
            .flat_map(|&l| [topo.node_at_link_tail()[l], topo.node_at_link_head()[l]])
            .collect();
        from_links.sort_unstable();
        from_links.dedup();
        let mut nodes = topo.nodes_at_patch()[patch].to_vec();
        nodes.sort_unstable();
        assert_eq!(from_links, nodes, "patch {patch}: links and nodes disagree");
        for &node in &topo.nodes_at_patch()[patch] {
            assert!(
                topo.patches_at_node()[node].contains(&patch),
                "patch {patch} missing from patches_at_node[{node}]"
            );
        }
    }
}

/// Assert that cells and faces are duals of interior nodes and links.
pub fn assert_duals_consistent(topo: &RasterTopology) {
    for (cell, &node) in topo.node_at_cell().iter().enumerate() {
        assert_eq!(topo.cell_at_node()[node], cell);
        assert!(!topo.node_is_perimeter(node), "cell {cell} on perimeter node {node}");
        for (slot, &face) in topo.faces_at_cell()[cell].iter().enumerate() {
            assert_ne!(face, BAD_INDEX, "cell {cell} slot {slot} has no face");
            assert_eq!(topo.link_at_face()[face], topo.links_at_node()[node][slot]);
        }
    }
    for (face, &link) in topo.link_at_face().iter().enumerate() {
        assert_eq!(topo.face_at_link()[link], face);
    }
    let perimeter_cells = (0..topo.number_of_nodes())
        .filter(|&n| topo.node_is_perimeter(n) && topo.cell_at_node()[n] != BAD_INDEX)
        .count();
    assert_eq!(perimeter_cells, 0);
}

/// Run all compliance checks.
pub fn run_full_compliance(topo: &RasterTopology) {
    assert_links_point_up_or_right(topo);
    assert_link_dirs_consistent(topo);
    assert_adjacency_symmetric(topo);
    assert_patches_closed(topo);
    assert_duals_consistent(topo);
}
