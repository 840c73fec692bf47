//! Light profiles: surface brightness as a function of sky position.

use lens_types::grid::Grid;
use ndarray::Array1;
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub enum LightProfile {
    /// I(r) = intensity / (σ√2π) · exp(-r² / 2σ²)
    SphericalGaussian {
        centre: (f64, f64),
        intensity: f64,
        sigma: f64,
    },
    /// I(r) = intensity · exp(-b_n [(r / R_e)^(1/n) - 1]) on elliptical radii.
    EllipticalSersic {
        centre: (f64, f64),
        axis_ratio: f64,
        /// Position angle, degrees counter-clockwise from the positive x-axis
        phi: f64,
        intensity: f64,
        effective_radius: f64,
        sersic_index: f64,
    },
}

impl LightProfile {
    pub fn spherical_sersic(
        centre: (f64, f64),
        intensity: f64,
        effective_radius: f64,
        sersic_index: f64,
    ) -> Self {
        LightProfile::EllipticalSersic {
            centre,
            axis_ratio: 1.0,
            phi: 0.0,
            intensity,
            effective_radius,
            sersic_index,
        }
    }

    pub fn spherical_exponential(centre: (f64, f64), intensity: f64, effective_radius: f64) -> Self {
        Self::spherical_sersic(centre, intensity, effective_radius, 1.0)
    }

    pub fn centre(&self) -> (f64, f64) {
        match self {
            LightProfile::SphericalGaussian { centre, .. }
            | LightProfile::EllipticalSersic { centre, .. } => *centre,
        }
    }

    pub fn image_from_grid(&self, grid: &Grid) -> Array1<f64> {
        grid.map_points(|y, x| self.intensity_at(y, x))
    }

    fn intensity_at(&self, y: f64, x: f64) -> f64 {
        match *self {
            LightProfile::SphericalGaussian {
                centre,
                intensity,
                sigma,
            } => {
                let r2 = (y - centre.0).powi(2) + (x - centre.1).powi(2);
                intensity / (sigma * (2.0 * PI).sqrt()) * (-0.5 * r2 / (sigma * sigma)).exp()
            }
            LightProfile::EllipticalSersic {
                centre,
                axis_ratio,
                phi,
                intensity,
                effective_radius,
                sersic_index,
            } => {
                let (sin_phi, cos_phi) = phi.to_radians().sin_cos();
                let (dy, dx) = (y - centre.0, x - centre.1);
                let x_rot = dx * cos_phi + dy * sin_phi;
                let y_rot = -dx * sin_phi + dy * cos_phi;
                let radius = (x_rot.powi(2) + (y_rot / axis_ratio).powi(2)).sqrt();
                let b_n = sersic_constant(sersic_index);
                intensity * (-b_n * ((radius / effective_radius).powf(1.0 / sersic_index) - 1.0)).exp()
            }
        }
    }
}

/// Asymptotic b_n such that R_e encloses half the total light.
fn sersic_constant(n: f64) -> f64 {
    2.0 * n - 1.0 / 3.0 + 4.0 / (405.0 * n) + 46.0 / (25515.0 * n * n)
        + 131.0 / (1148175.0 * n.powi(3))
        - 2194697.0 / (30690717750.0 * n.powi(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_peak_and_falloff() {
        let profile = LightProfile::SphericalGaussian {
            centre: (0.0, 0.0),
            intensity: 1.0,
            sigma: 1.0,
        };
        let grid = Grid::from_points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 2.0)]);
        let image = profile.image_from_grid(&grid);

        let peak = 1.0 / (2.0 * PI).sqrt();
        assert!((image[0] - peak).abs() < 1e-12);
        assert!((image[1] - peak * (-0.5f64).exp()).abs() < 1e-12);
        assert!((image[2] - peak * (-2.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_sersic_intensity_at_effective_radius() {
        let profile = LightProfile::spherical_exponential((0.5, -0.5), 3.0, 0.8);
        // At r = R_e the exponent vanishes
        let grid = Grid::from_points(&[(0.5, 0.3), (1.3, -0.5)]);
        let image = profile.image_from_grid(&grid);
        assert!((image[0] - 3.0).abs() < 1e-12, "I(R_e) = {}", image[0]);
        assert!((image[1] - 3.0).abs() < 1e-12, "I(R_e) = {}", image[1]);
    }

    #[test]
    fn test_elliptical_sersic_is_elongated_along_phi() {
        let profile = LightProfile::EllipticalSersic {
            centre: (0.0, 0.0),
            axis_ratio: 0.5,
            phi: 0.0,
            intensity: 1.0,
            effective_radius: 1.0,
            sersic_index: 4.0,
        };
        let grid = Grid::from_points(&[(0.0, 1.0), (1.0, 0.0)]);
        let image = profile.image_from_grid(&grid);
        assert!(image[0] > image[1], "major axis along x should be brighter");
    }

    #[test]
    fn test_sersic_constant_exponential() {
        assert!((sersic_constant(1.0) - 1.678).abs() < 1e-3);
        assert!((sersic_constant(4.0) - 7.669).abs() < 1e-3);
    }
}
