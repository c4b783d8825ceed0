//! Finite-volume gradient and divergence on any [`ModelGrid`].

use loam_core::{ElementKind, FieldError, BAD_INDEX};

use crate::grid::ModelGrid;

fn check_len(
    grid: &dyn ModelGrid,
    kind: ElementKind,
    name: &str,
    values: &[f64],
) -> Result<(), FieldError> {
    let expected = grid.counts().of(kind);
    if values.len() != expected {
        return Err(FieldError::SizeMismatch {
            kind,
            name: name.to_string(),
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Gradient of a node field along every link: `(head - tail) / length`.
///
/// # Errors
///
/// [`FieldError::SizeMismatch`] if `values` is not node-sized.
///
/// # Examples
///
/// ```
/// use loam_grid::{calc_grad_at_link, RasterModelGrid};
///
/// let grid = RasterModelGrid::new(2, 2, 2.0).unwrap();
/// let grad = calc_grad_at_link(&grid, &[0.0, 1.0, 4.0, 5.0]).unwrap();
/// assert_eq!(grad, vec![0.5, 2.0, 2.0, 0.5]);
/// ```
pub fn calc_grad_at_link(grid: &dyn ModelGrid, values: &[f64]) -> Result<Vec<f64>, FieldError> {
    check_len(grid, ElementKind::Node, "node values for gradient", values)?;
    let tails = grid.node_at_link_tail();
    let heads = grid.node_at_link_head();
    Ok((0..grid.number_of_links())
        .map(|link| (values[heads[link]] - values[tails[link]]) / grid.length_of_link(link))
        .collect())
}

/// Net outflow of a link flux per unit cell area at every node.
///
/// Flux is positive along the link direction. Nodes without a cell get 0.
///
/// # Errors
///
/// [`FieldError::SizeMismatch`] if `flux` is not link-sized.
pub fn calc_flux_div_at_node(grid: &dyn ModelGrid, flux: &[f64]) -> Result<Vec<f64>, FieldError> {
    check_len(grid, ElementKind::Link, "link flux for divergence", flux)?;
    let cell_at_node = grid.cell_at_node();
    let face_at_link = grid.face_at_link();
    let mut div = vec![0.0; grid.number_of_nodes()];
    for (node, out) in div.iter_mut().enumerate() {
        let cell = cell_at_node[node];
        if cell == BAD_INDEX {
            continue;
        }
        let links = grid.links_at_node()[node];
        let dirs = grid.link_dirs_at_node()[node];
        let mut net = 0.0;
        for (&link, &dir) in links.iter().zip(&dirs) {
            if dir == 0 {
                continue;
            }
            let face = face_at_link[link];
            if face == BAD_INDEX {
                continue;
            }
            net += f64::from(dir) * flux[link] * grid.width_of_face(face);
        }
        *out = net / grid.area_of_cell(cell);
    }
    Ok(div)
}
