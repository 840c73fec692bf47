//! Finite-difference gradients on a RegularGrid.

use lens_types::error::{LensError, LensResult};
use lens_types::grid::RegularGrid;
use ndarray::{Array2, ArrayView1, Axis};

/// Compute gradient of a 2D field using central differences.
///
/// Returns (df_dy, df_dx) matching the axis convention:
/// - axis 0 = y (rows) → df_dy
/// - axis 1 = x (cols) → df_dx
///
/// Spacings come from the grid's actual coordinates, so the sign of the
/// decreasing row axis is handled. Uses forward/backward differences at
/// boundaries.
pub fn gradient_2d(
    field: &Array2<f64>,
    grid: &RegularGrid,
) -> LensResult<(Array2<f64>, Array2<f64>)> {
    if field.dim() != grid.shape() {
        return Err(LensError::GridShapeMismatch {
            expected: grid.shape(),
            found: field.dim(),
        });
    }
    let df_dy = gradient_along_axis(field, grid.ys.view(), Axis(0))?;
    let df_dx = gradient_along_axis(field, grid.xs.view(), Axis(1))?;
    Ok((df_dy, df_dx))
}

/// Derivative of `field` along one axis, with `coords` the coordinate of
/// each index on that axis. Coordinates may be decreasing.
pub fn gradient_along_axis(
    field: &Array2<f64>,
    coords: ArrayView1<'_, f64>,
    axis: Axis,
) -> LensResult<Array2<f64>> {
    let (nrows, ncols) = field.dim();
    let n = coords.len();
    if axis.index() > 1 || field.len_of(axis) != n || n < 2 {
        return Err(LensError::InvalidGrid(format!(
            "gradient along axis {} needs >= 2 coordinates matching field shape {:?}, got {}",
            axis.index(),
            field.dim(),
            n
        )));
    }
    Ok(Array2::from_shape_fn((nrows, ncols), |(r, c)| {
        let i = if axis == Axis(0) { r } else { c };
        let lo = i.saturating_sub(1);
        let hi = (i + 1).min(n - 1);
        let (f_lo, f_hi) = if axis == Axis(0) {
            (field[[lo, c]], field[[hi, c]])
        } else {
            (field[[r, lo]], field[[r, hi]])
        };
        (f_hi - f_lo) / (coords[hi] - coords[lo])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_2d_linear() {
        let grid = RegularGrid::new((11, 9), 0.5, (0.0, 0.0)).unwrap();
        // f(y, x) = 2*x + 3*y → df/dx = 2, df/dy = 3
        let field = Array2::from_shape_fn((11, 9), |(r, c)| 2.0 * grid.xs[c] + 3.0 * grid.ys[r]);
        let (df_dy, df_dx) = gradient_2d(&field, &grid).unwrap();

        for r in 0..11 {
            for c in 0..9 {
                assert!((df_dx[[r, c]] - 2.0).abs() < 1e-10, "df/dx at ({r},{c})");
                assert!((df_dy[[r, c]] - 3.0).abs() < 1e-10, "df/dy at ({r},{c})");
            }
        }
    }

    #[test]
    fn test_gradient_2d_quadratic_interior() {
        let grid = RegularGrid::new((21, 21), 0.1, (0.0, 0.0)).unwrap();
        // f = y² → df/dy = 2y, exact for central differences in the interior
        let field = Array2::from_shape_fn((21, 21), |(r, _)| grid.ys[r] * grid.ys[r]);
        let (df_dy, df_dx) = gradient_2d(&field, &grid).unwrap();

        for r in 1..20 {
            let expected = 2.0 * grid.ys[r];
            assert!(
                (df_dy[[r, 5]] - expected).abs() < 1e-10,
                "row {r}: {} vs {expected}",
                df_dy[[r, 5]]
            );
        }
        assert!(df_dx.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_gradient_along_axis_decreasing_coords() {
        // f = row index, coords decreasing by 0.5 per row → df/dcoord = -2
        let field = Array2::from_shape_fn((5, 3), |(r, _)| r as f64);
        let coords = ndarray::arr1(&[1.0, 0.5, 0.0, -0.5, -1.0]);
        let d = gradient_along_axis(&field, coords.view(), Axis(0)).unwrap();
        assert!(d.iter().all(|v| (v + 2.0).abs() < 1e-12));

        let short = ndarray::arr1(&[0.0, 1.0]);
        assert!(gradient_along_axis(&field, short.view(), Axis(0)).is_err());
        assert!(gradient_along_axis(&field, short.view(), Axis(2)).is_err());
    }

    #[test]
    fn test_gradient_2d_shape_mismatch() {
        let grid = RegularGrid::new((4, 4), 1.0, (0.0, 0.0)).unwrap();
        let field = Array2::zeros((4, 5));
        assert!(gradient_2d(&field, &grid).is_err());
    }
}
