// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Grids
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Coordinate grids of (y, x) arc-second positions.
//!
//! [`Grid`] is the flat `[N, 2]` representation every lensing quantity is
//! evaluated on. [`RegularGrid`] keeps the row/column structure of a uniform
//! pixel grid, which finite-difference derivatives and contouring need.

use crate::error::{LensError, LensResult};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;

/// Ordered sequence of (y, x) coordinates, stored as an `[N, 2]` array.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    points: Array2<f64>,
}

impl Grid {
    /// Wrap an `[N, 2]` array of (y, x) coordinates.
    pub fn new(points: Array2<f64>) -> LensResult<Self> {
        if points.ncols() != 2 {
            return Err(LensError::GridShapeMismatch {
                expected: (points.nrows(), 2),
                found: points.dim(),
            });
        }
        if points.iter().any(|v| !v.is_finite()) {
            return Err(LensError::InvalidGrid(
                "grid coordinates must be finite".to_string(),
            ));
        }
        Ok(Grid { points })
    }

    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut arr = Array2::zeros((points.len(), 2));
        for (i, &(y, x)) in points.iter().enumerate() {
            arr[[i, 0]] = y;
            arr[[i, 1]] = x;
        }
        Grid { points: arr }
    }

    pub fn empty() -> Self {
        Grid {
            points: Array2::zeros((0, 2)),
        }
    }

    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    pub fn into_points(self) -> Array2<f64> {
        self.points
    }

    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        (index < self.len()).then(|| (self.points[[index, 0]], self.points[[index, 1]]))
    }

    pub fn ys(&self) -> ArrayView1<'_, f64> {
        self.points.column(0)
    }

    pub fn xs(&self) -> ArrayView1<'_, f64> {
        self.points.column(1)
    }

    /// Evaluate a scalar field at every point. Points are evaluated in
    /// parallel; the output keeps the grid's point order.
    pub fn map_points<F>(&self, f: F) -> Array1<f64>
    where
        F: Fn(f64, f64) -> f64 + Sync,
    {
        let points = &self.points;
        let values: Vec<f64> = (0..self.len())
            .into_par_iter()
            .map(|i| f(points[[i, 0]], points[[i, 1]]))
            .collect();
        Array1::from_vec(values)
    }

    /// Evaluate a (y, x) vector field at every point, returning `[N, 2]`.
    pub fn map_vectors<F>(&self, f: F) -> Array2<f64>
    where
        F: Fn(f64, f64) -> [f64; 2] + Sync,
    {
        let points = &self.points;
        let values: Vec<[f64; 2]> = (0..self.len())
            .into_par_iter()
            .map(|i| f(points[[i, 0]], points[[i, 1]]))
            .collect();
        let mut out = Array2::zeros((values.len(), 2));
        for (i, v) in values.iter().enumerate() {
            out[[i, 0]] = v[0];
            out[[i, 1]] = v[1];
        }
        out
    }

    /// The lens equation for one hop: `grid - deflections`.
    pub fn deflected_by(&self, deflections: &Array2<f64>) -> LensResult<Grid> {
        self.check_vectors(deflections)?;
        Ok(Grid {
            points: &self.points - deflections,
        })
    }

    /// In-place `grid -= scale * deflections`.
    pub fn subtract_scaled(&mut self, scale: f64, deflections: &Array2<f64>) -> LensResult<()> {
        self.check_vectors(deflections)?;
        self.points.scaled_add(-scale, deflections);
        Ok(())
    }

    /// Translate every point by (dy, dx).
    pub fn shifted(mut self, dy: f64, dx: f64) -> Grid {
        self.points.column_mut(0).mapv_inplace(|y| y + dy);
        self.points.column_mut(1).mapv_inplace(|x| x + dx);
        self
    }

    fn check_vectors(&self, vectors: &Array2<f64>) -> LensResult<()> {
        if vectors.dim() != self.points.dim() {
            return Err(LensError::GridShapeMismatch {
                expected: self.points.dim(),
                found: vectors.dim(),
            });
        }
        Ok(())
    }
}

/// Uniform square-pixel grid with a 2D row/column layout.
///
/// Row 0 is the top of the image (largest y), column 0 the left (smallest x):
///   y[row] = -(row - (rows-1)/2) · pixel_scale + origin.y
///   x[col] =  (col - (cols-1)/2) · pixel_scale + origin.x
#[derive(Debug, Clone)]
pub struct RegularGrid {
    pub rows: usize,
    pub cols: usize,
    pub pixel_scale: f64,
    pub origin: (f64, f64),
    pub ys: Array1<f64>, // y of each row [rows], decreasing
    pub xs: Array1<f64>, // x of each column [cols], increasing
    grid: Grid,
}

impl RegularGrid {
    pub fn new(shape: (usize, usize), pixel_scale: f64, origin: (f64, f64)) -> LensResult<Self> {
        let (rows, cols) = shape;
        if rows < 2 || cols < 2 {
            return Err(LensError::InvalidGrid(format!(
                "regular grid needs at least 2x2 pixels, got {rows}x{cols}"
            )));
        }
        if !pixel_scale.is_finite() || pixel_scale <= 0.0 {
            return Err(LensError::InvalidGrid(format!(
                "pixel scale must be finite and > 0, got {pixel_scale}"
            )));
        }
        if !origin.0.is_finite() || !origin.1.is_finite() {
            return Err(LensError::InvalidGrid(
                "grid origin must be finite".to_string(),
            ));
        }

        let y_centre = (rows as f64 - 1.0) / 2.0;
        let x_centre = (cols as f64 - 1.0) / 2.0;
        let ys = Array1::from_shape_fn(rows, |r| -(r as f64 - y_centre) * pixel_scale + origin.0);
        let xs = Array1::from_shape_fn(cols, |c| (c as f64 - x_centre) * pixel_scale + origin.1);

        // Row-major flattening: index = row * cols + col
        let points = Array2::from_shape_fn((rows * cols, 2), |(i, k)| {
            if k == 0 {
                ys[i / cols]
            } else {
                xs[i % cols]
            }
        });

        Ok(RegularGrid {
            rows,
            cols,
            pixel_scale,
            origin,
            ys,
            xs,
            grid: Grid { points },
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Flat `[rows * cols, 2]` view in row-major order.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Reshape a row-major flat array onto the `[rows, cols]` layout.
    pub fn array_2d_from_1d(&self, values: ArrayView1<'_, f64>) -> LensResult<Array2<f64>> {
        if values.len() != self.rows * self.cols {
            return Err(LensError::GridShapeMismatch {
                expected: (self.rows * self.cols, 1),
                found: (values.len(), 1),
            });
        }
        let cols = self.cols;
        Ok(Array2::from_shape_fn((self.rows, self.cols), |(r, c)| {
            values[r * cols + c]
        }))
    }

    /// Flatten a pair of `[rows, cols]` (y, x) maps back into `[N, 2]`.
    pub fn vectors_1d_from_2d(
        &self,
        y_map: &Array2<f64>,
        x_map: &Array2<f64>,
    ) -> LensResult<Array2<f64>> {
        for map in [y_map, x_map] {
            if map.dim() != self.shape() {
                return Err(LensError::GridShapeMismatch {
                    expected: self.shape(),
                    found: map.dim(),
                });
            }
        }
        let cols = self.cols;
        Ok(Array2::from_shape_fn((self.rows * self.cols, 2), |(i, k)| {
            let (r, c) = (i / cols, i % cols);
            if k == 0 {
                y_map[[r, c]]
            } else {
                x_map[[r, c]]
            }
        }))
    }

    /// Convert fractional (row, col) pixel coordinates to arc-seconds.
    ///
    /// Uses the pixel-edge convention: index `i` is the lower edge of pixel
    /// `i`, so integer indices land half a pixel away from pixel centres.
    pub fn grid_arcsec_from_grid_pixels(&self, pixels: &[[f64; 2]]) -> Grid {
        let ps = self.pixel_scale;
        let row_centre = (self.rows as f64 - 1.0) / 2.0 + self.origin.0 / ps;
        let col_centre = (self.cols as f64 - 1.0) / 2.0 - self.origin.1 / ps;

        let mut points = Array2::zeros((pixels.len(), 2));
        for (i, p) in pixels.iter().enumerate() {
            points[[i, 0]] = -(p[0] - row_centre - 0.5) * ps;
            points[[i, 1]] = (p[1] - col_centre - 0.5) * ps;
        }
        Grid { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rejects_wrong_column_count() {
        let err = Grid::new(Array2::zeros((4, 3))).unwrap_err();
        assert!(matches!(
            err,
            LensError::GridShapeMismatch {
                expected: (4, 2),
                found: (4, 3)
            }
        ));
    }

    #[test]
    fn test_grid_rejects_non_finite() {
        let mut pts = Array2::zeros((2, 2));
        pts[[1, 0]] = f64::NAN;
        assert!(Grid::new(pts).is_err());
    }

    #[test]
    fn test_map_points_preserves_order() {
        let grid = Grid::from_points(&[(1.0, 2.0), (3.0, 4.0), (-1.0, 0.5)]);
        let sums = grid.map_points(|y, x| y + x);
        assert_eq!(sums.to_vec(), vec![3.0, 7.0, -0.5]);

        let swapped = grid.map_vectors(|y, x| [x, y]);
        assert_eq!(swapped.row(2).to_vec(), vec![0.5, -1.0]);
    }

    #[test]
    fn test_subtract_scaled_and_deflected_by() {
        let mut grid = Grid::from_points(&[(1.0, 0.0), (0.0, 2.0)]);
        let defl = ndarray::arr2(&[[1.0, 0.0], [0.0, 1.0]]);

        let once = grid.deflected_by(&defl).unwrap();
        assert_eq!(once, Grid::from_points(&[(0.0, 0.0), (0.0, 1.0)]));

        grid.subtract_scaled(0.5, &defl).unwrap();
        assert_eq!(grid, Grid::from_points(&[(0.5, 0.0), (0.0, 1.5)]));

        let bad = Array2::zeros((3, 2));
        assert!(grid.deflected_by(&bad).is_err());
    }

    #[test]
    fn test_regular_grid_coordinates() {
        let rg = RegularGrid::new((3, 4), 0.5, (0.0, 0.0)).unwrap();
        assert_eq!(rg.grid().len(), 12);
        assert!((rg.ys[0] - 0.5).abs() < 1e-12);
        assert!((rg.ys[2] + 0.5).abs() < 1e-12);
        assert!((rg.xs[0] + 0.75).abs() < 1e-12);
        assert!((rg.xs[3] - 0.75).abs() < 1e-12);

        // Row-major: point 5 is row 1, col 1
        let (y, x) = rg.grid().point(5).unwrap();
        assert!((y - 0.0).abs() < 1e-12);
        assert!((x + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_regular_grid_rejects_degenerate() {
        assert!(RegularGrid::new((1, 5), 0.1, (0.0, 0.0)).is_err());
        assert!(RegularGrid::new((5, 5), 0.0, (0.0, 0.0)).is_err());
        assert!(RegularGrid::new((5, 5), 0.1, (f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_reshape_roundtrip() {
        let rg = RegularGrid::new((3, 2), 1.0, (0.0, 0.0)).unwrap();
        let ys_2d = rg.array_2d_from_1d(rg.grid().ys()).unwrap();
        let xs_2d = rg.array_2d_from_1d(rg.grid().xs()).unwrap();
        for r in 0..3 {
            for c in 0..2 {
                assert_eq!(ys_2d[[r, c]], rg.ys[r]);
                assert_eq!(xs_2d[[r, c]], rg.xs[c]);
            }
        }
        let flat = rg.vectors_1d_from_2d(&ys_2d, &xs_2d).unwrap();
        assert_eq!(&flat, rg.grid().points());

        let wrong = Array1::zeros(5);
        assert!(rg.array_2d_from_1d(wrong.view()).is_err());
    }

    #[test]
    fn test_pixel_to_arcsec_is_half_pixel_off_centre() {
        let rg = RegularGrid::new((6, 8), 0.2, (0.3, -0.4)).unwrap();
        let ps = rg.pixel_scale;
        let pixels = [[0.0, 0.0], [2.0, 5.0], [5.0, 7.0]];
        let arcsec = rg.grid_arcsec_from_grid_pixels(&pixels);

        for (i, p) in pixels.iter().enumerate() {
            let (y, x) = arcsec.point(i).unwrap();
            let (r, c) = (p[0] as usize, p[1] as usize);
            assert!((y - ps / 2.0 - rg.ys[r]).abs() < 1e-12, "y offset at {i}");
            assert!((x + ps / 2.0 - rg.xs[c]).abs() < 1e-12, "x offset at {i}");
        }
    }
}
