//! Row-major 2D views over node arrays.

use std::ops::Index;

use loam_core::ShapeViewError;

/// Borrowed `rows x cols` view of a flat node array.
///
/// Row 0 is the bottom row, so `view.get(r, c) == values[r * cols + c]`.
/// Indexing by row gives a slice, so `view[r][c]` also works.
///
/// # Examples
///
/// ```
/// use loam_grid::RasterView;
///
/// let values: Vec<f64> = (0..12).map(f64::from).collect();
/// let view = RasterView::new(3, 4, &values).unwrap();
/// assert_eq!(view.get(1, 2), Some(6.0));
/// assert_eq!(view[2], [8.0, 9.0, 10.0, 11.0]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RasterView<'a> {
    rows: usize,
    cols: usize,
    data: &'a [f64],
}

impl<'a> RasterView<'a> {
    /// Wrap `data`, which must hold exactly `rows * cols` values.
    pub fn new(rows: usize, cols: usize, data: &'a [f64]) -> Result<Self, ShapeViewError> {
        let expected = rows.saturating_mul(cols);
        if data.len() != expected {
            return Err(ShapeViewError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`, or `None` outside the view.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// If `row >= rows()`.
    pub fn row(&self, row: usize) -> &'a [f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Rows from bottom to top.
    pub fn iter_rows(&self) -> impl Iterator<Item = &'a [f64]> + 'a {
        self.data.chunks_exact(self.cols.max(1))
    }

    /// The underlying flat array.
    pub fn as_flat(&self) -> &'a [f64] {
        self.data
    }
}

impl Index<usize> for RasterView<'_> {
    type Output = [f64];

    fn index(&self, row: usize) -> &[f64] {
        self.row(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_wrong_length() {
        let values = [0.0; 5];
        assert_eq!(
            RasterView::new(2, 3, &values).unwrap_err(),
            ShapeViewError::LengthMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn rows_run_bottom_to_top() {
        let values: Vec<f64> = (0..6).map(f64::from).collect();
        let view = RasterView::new(2, 3, &values).unwrap();
        let rows: Vec<&[f64]> = view.iter_rows().collect();
        assert_eq!(rows, vec![&[0.0, 1.0, 2.0][..], &[3.0, 4.0, 5.0][..]]);
        assert_eq!(view.get(2, 0), None);
        assert_eq!(view.get(0, 3), None);
    }

    proptest! {
        #[test]
        fn get_matches_flat_index(rows in 1usize..10, cols in 1usize..10) {
            let values: Vec<f64> = (0..rows * cols).map(|i| i as f64).collect();
            let view = RasterView::new(rows, cols, &values).unwrap();
            for r in 0..rows {
                for c in 0..cols {
                    prop_assert_eq!(view.get(r, c), Some(values[r * cols + c]));
                    prop_assert_eq!(view[r][c], values[r * cols + c]);
                }
            }
        }
    }
}
