// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Lensing Jacobian & Critical Curves
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Second-order lensing quantities derived from a deflection field.
//!
//! The Jacobian A = ∂β/∂θ of the lens mapping β = θ - α(θ) is evaluated by
//! finite differences of the 2D deflection maps:
//!   A11 = 1 - ∂αx/∂x   A12 = -∂αx/∂y
//!   A21 = -∂αy/∂x      A22 = 1 - ∂αy/∂y
//!
//! Anything that yields deflections and a potential on a grid gets the
//! full set of derived quantities through [`LensingField`].

use lens_math::contour::find_contours;
use lens_math::gradient::gradient_2d;
use lens_types::error::LensResult;
use lens_types::grid::{Grid, RegularGrid};
use ndarray::{Array1, Array2, Zip};
use tracing::debug;

/// Lensing Jacobian components on a regular grid, each `[rows, cols]`.
#[derive(Debug, Clone)]
pub struct LensingJacobian {
    pub a11: Array2<f64>,
    pub a12: Array2<f64>,
    pub a21: Array2<f64>,
    pub a22: Array2<f64>,
}

impl LensingJacobian {
    /// κ = 1 - (A11 + A22) / 2
    pub fn convergence(&self) -> Array2<f64> {
        Zip::from(&self.a11)
            .and(&self.a22)
            .map_collect(|&a11, &a22| 1.0 - 0.5 * (a11 + a22))
    }

    /// (γ1, γ2) = ((A22 - A11) / 2, -(A12 + A21) / 2)
    pub fn shear_components(&self) -> (Array2<f64>, Array2<f64>) {
        let gamma_1 = Zip::from(&self.a11)
            .and(&self.a22)
            .map_collect(|&a11, &a22| 0.5 * (a22 - a11));
        let gamma_2 = Zip::from(&self.a12)
            .and(&self.a21)
            .map_collect(|&a12, &a21| -0.5 * (a12 + a21));
        (gamma_1, gamma_2)
    }

    pub fn shear(&self) -> Array2<f64> {
        let (gamma_1, gamma_2) = self.shear_components();
        Zip::from(&gamma_1)
            .and(&gamma_2)
            .map_collect(|&g1, &g2| g1.hypot(g2))
    }

    /// λt = 1 - κ - γ
    pub fn tangential_eigen_value(&self) -> Array2<f64> {
        Zip::from(&self.convergence())
            .and(&self.shear())
            .map_collect(|&kappa, &gamma| 1.0 - kappa - gamma)
    }

    /// λr = 1 - κ + γ
    pub fn radial_eigen_value(&self) -> Array2<f64> {
        Zip::from(&self.convergence())
            .and(&self.shear())
            .map_collect(|&kappa, &gamma| 1.0 - kappa + gamma)
    }

    pub fn determinant(&self) -> Array2<f64> {
        Zip::from(&self.a11)
            .and(&self.a12)
            .and(&self.a21)
            .and(&self.a22)
            .map_collect(|&a11, &a12, &a21, &a22| a11 * a22 - a12 * a21)
    }
}

pub trait LensingField {
    /// (α_y, α_x) at every grid point, `[N, 2]`.
    fn deflections_from_grid(&self, grid: &Grid) -> Array2<f64>;

    fn potential_from_grid(&self, grid: &Grid) -> Array1<f64>;

    fn lensing_jacobian_from_grid(&self, grid: &RegularGrid) -> LensResult<LensingJacobian> {
        let deflections = self.deflections_from_grid(grid.grid());
        let alpha_y = grid.array_2d_from_1d(deflections.column(0))?;
        let alpha_x = grid.array_2d_from_1d(deflections.column(1))?;

        let (dalpha_y_dy, dalpha_y_dx) = gradient_2d(&alpha_y, grid)?;
        let (dalpha_x_dy, dalpha_x_dx) = gradient_2d(&alpha_x, grid)?;

        Ok(LensingJacobian {
            a11: dalpha_x_dx.mapv(|v| 1.0 - v),
            a12: dalpha_x_dy.mapv(|v| -v),
            a21: dalpha_y_dx.mapv(|v| -v),
            a22: dalpha_y_dy.mapv(|v| 1.0 - v),
        })
    }

    fn convergence_via_jacobian_from_grid(&self, grid: &RegularGrid) -> LensResult<Array2<f64>> {
        Ok(self.lensing_jacobian_from_grid(grid)?.convergence())
    }

    fn shear_via_jacobian_from_grid(&self, grid: &RegularGrid) -> LensResult<Array2<f64>> {
        Ok(self.lensing_jacobian_from_grid(grid)?.shear())
    }

    fn shear_components_via_jacobian_from_grid(
        &self,
        grid: &RegularGrid,
    ) -> LensResult<(Array2<f64>, Array2<f64>)> {
        Ok(self.lensing_jacobian_from_grid(grid)?.shear_components())
    }

    fn tangential_eigen_value_from_grid(&self, grid: &RegularGrid) -> LensResult<Array2<f64>> {
        Ok(self.lensing_jacobian_from_grid(grid)?.tangential_eigen_value())
    }

    fn radial_eigen_value_from_grid(&self, grid: &RegularGrid) -> LensResult<Array2<f64>> {
        Ok(self.lensing_jacobian_from_grid(grid)?.radial_eigen_value())
    }

    /// 1 / det(A)
    fn magnification_from_grid(&self, grid: &RegularGrid) -> LensResult<Array2<f64>> {
        Ok(self
            .lensing_jacobian_from_grid(grid)?
            .determinant()
            .mapv(|det| 1.0 / det))
    }

    /// 1 / (λt · λr)
    fn magnification_via_eigen_values_from_grid(&self, grid: &RegularGrid) -> LensResult<Array2<f64>> {
        let jacobian = self.lensing_jacobian_from_grid(grid)?;
        Ok(Zip::from(&jacobian.tangential_eigen_value())
            .and(&jacobian.radial_eigen_value())
            .map_collect(|&lt, &lr| 1.0 / (lt * lr)))
    }

    fn tangential_critical_curve_from_grid(&self, grid: &RegularGrid) -> LensResult<Grid> {
        let eigen_values = self.tangential_eigen_value_from_grid(grid)?;
        Ok(critical_curve_from_eigen_values(&eigen_values, grid, "tangential"))
    }

    fn radial_critical_curve_from_grid(&self, grid: &RegularGrid) -> LensResult<Grid> {
        let eigen_values = self.radial_eigen_value_from_grid(grid)?;
        Ok(critical_curve_from_eigen_values(&eigen_values, grid, "radial"))
    }

    /// (tangential, radial)
    fn critical_curves_from_grid(&self, grid: &RegularGrid) -> LensResult<(Grid, Grid)> {
        let jacobian = self.lensing_jacobian_from_grid(grid)?;
        let tangential =
            critical_curve_from_eigen_values(&jacobian.tangential_eigen_value(), grid, "tangential");
        let radial = critical_curve_from_eigen_values(&jacobian.radial_eigen_value(), grid, "radial");
        Ok((tangential, radial))
    }

    fn tangential_caustic_from_grid(&self, grid: &RegularGrid) -> LensResult<Grid> {
        let curve = self.tangential_critical_curve_from_grid(grid)?;
        curve.deflected_by(&self.deflections_from_grid(&curve))
    }

    fn radial_caustic_from_grid(&self, grid: &RegularGrid) -> LensResult<Grid> {
        let curve = self.radial_critical_curve_from_grid(grid)?;
        curve.deflected_by(&self.deflections_from_grid(&curve))
    }

    /// (tangential, radial)
    fn caustics_from_grid(&self, grid: &RegularGrid) -> LensResult<(Grid, Grid)> {
        let (tangential, radial) = self.critical_curves_from_grid(grid)?;
        let tangential_caustic = tangential.deflected_by(&self.deflections_from_grid(&tangential))?;
        let radial_caustic = radial.deflected_by(&self.deflections_from_grid(&radial))?;
        Ok((tangential_caustic, radial_caustic))
    }

    /// Deflections as the finite-difference gradient of the potential.
    fn deflections_via_potential_from_grid(&self, grid: &RegularGrid) -> LensResult<Array2<f64>> {
        let potential = self.potential_from_grid(grid.grid());
        let potential_2d = grid.array_2d_from_1d(potential.view())?;
        let (dpsi_dy, dpsi_dx) = gradient_2d(&potential_2d, grid)?;
        grid.vectors_1d_from_2d(&dpsi_dy, &dpsi_dx)
    }
}

/// Zero contour of an eigenvalue map, mapped to arc-seconds.
///
/// Only the first contour is kept. Pixel indices are lower pixel edges, so
/// the mapped points are shifted by half a pixel back onto the contour.
fn critical_curve_from_eigen_values(eigen_values: &Array2<f64>, grid: &RegularGrid, kind: &str) -> Grid {
    let Some(contour) = find_contours(eigen_values, 0.0).into_iter().next() else {
        debug!(kind, "no critical curve found on grid");
        return Grid::empty();
    };
    let half_pixel = grid.pixel_scale / 2.0;
    grid.grid_arcsec_from_grid_pixels(&contour)
        .shifted(-half_pixel, half_pixel)
}
