// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Mass Profiles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Analytic mass profiles in arc-second units.
//!
//! Each profile provides convergence κ, lensing potential ψ and deflection
//! α = ∇ψ. Deflections are returned as (α_y, α_x).

use lens_types::constants::RADIUS_FLOOR;
use lens_types::grid::Grid;
use ndarray::{Array1, Array2};

#[derive(Debug, Clone, PartialEq)]
pub enum MassProfile {
    /// Singular isothermal sphere: κ = θE / 2r.
    SphericalIsothermal {
        centre: (f64, f64),
        einstein_radius: f64,
    },
    /// Isothermal sphere with a flat core: κ = θE / 2√(r² + r_c²).
    SphericalCoredIsothermal {
        centre: (f64, f64),
        einstein_radius: f64,
        core_radius: f64,
    },
    /// Point mass: κ = 0 away from the centre, α = θE² / r.
    PointMass {
        centre: (f64, f64),
        einstein_radius: f64,
    },
    /// Uniform external shear, centred on the origin.
    ExternalShear {
        magnitude: f64,
        /// Shear angle, degrees counter-clockwise from the positive x-axis
        phi: f64,
    },
}

impl MassProfile {
    pub fn centre(&self) -> (f64, f64) {
        match self {
            MassProfile::SphericalIsothermal { centre, .. }
            | MassProfile::SphericalCoredIsothermal { centre, .. }
            | MassProfile::PointMass { centre, .. } => *centre,
            MassProfile::ExternalShear { .. } => (0.0, 0.0),
        }
    }

    /// Radius where the mean enclosed convergence is 1 [arcsec].
    /// Zero for a sub-critical cored profile, `None` for external shear.
    pub fn einstein_radius(&self) -> Option<f64> {
        match *self {
            MassProfile::SphericalIsothermal { einstein_radius, .. }
            | MassProfile::PointMass { einstein_radius, .. } => Some(einstein_radius),
            MassProfile::SphericalCoredIsothermal {
                einstein_radius,
                core_radius,
                ..
            } => {
                // α(r) = r  →  r² = θE (θE - 2 r_c)
                let r2 = einstein_radius * (einstein_radius - 2.0 * core_radius);
                Some(r2.max(0.0).sqrt())
            }
            MassProfile::ExternalShear { .. } => None,
        }
    }

    pub fn convergence_from_grid(&self, grid: &Grid) -> Array1<f64> {
        grid.map_points(|y, x| self.convergence_at(y, x))
    }

    pub fn potential_from_grid(&self, grid: &Grid) -> Array1<f64> {
        grid.map_points(|y, x| self.potential_at(y, x))
    }

    pub fn deflections_from_grid(&self, grid: &Grid) -> Array2<f64> {
        grid.map_vectors(|y, x| self.deflection_at(y, x))
    }

    fn convergence_at(&self, y: f64, x: f64) -> f64 {
        match *self {
            MassProfile::SphericalIsothermal {
                centre,
                einstein_radius,
            } => einstein_radius / (2.0 * radius(y, x, centre)),
            MassProfile::SphericalCoredIsothermal {
                centre,
                einstein_radius,
                core_radius,
            } => {
                let r = radius(y, x, centre);
                einstein_radius / (2.0 * (r * r + core_radius * core_radius).sqrt())
            }
            MassProfile::PointMass { .. } | MassProfile::ExternalShear { .. } => 0.0,
        }
    }

    fn potential_at(&self, y: f64, x: f64) -> f64 {
        match *self {
            MassProfile::SphericalIsothermal {
                centre,
                einstein_radius,
            } => einstein_radius * radius(y, x, centre),
            MassProfile::SphericalCoredIsothermal {
                centre,
                einstein_radius,
                core_radius,
            } => {
                let r = radius(y, x, centre);
                let s = (r * r + core_radius * core_radius).sqrt();
                einstein_radius * (s - core_radius * (core_radius + s).ln())
            }
            MassProfile::PointMass {
                centre,
                einstein_radius,
            } => einstein_radius * einstein_radius * radius(y, x, centre).ln(),
            MassProfile::ExternalShear { magnitude, phi } => {
                let (gamma_1, gamma_2) = shear_components(magnitude, phi);
                0.5 * gamma_1 * (x * x - y * y) + gamma_2 * x * y
            }
        }
    }

    fn deflection_at(&self, y: f64, x: f64) -> [f64; 2] {
        match *self {
            MassProfile::SphericalIsothermal {
                centre,
                einstein_radius,
            } => {
                let r = radius(y, x, centre);
                radial_deflection(y, x, centre, r, einstein_radius)
            }
            MassProfile::SphericalCoredIsothermal {
                centre,
                einstein_radius,
                core_radius,
            } => {
                let r = radius(y, x, centre);
                let s = (r * r + core_radius * core_radius).sqrt();
                radial_deflection(y, x, centre, r, einstein_radius * r / (s + core_radius))
            }
            MassProfile::PointMass {
                centre,
                einstein_radius,
            } => {
                let r = radius(y, x, centre);
                radial_deflection(y, x, centre, r, einstein_radius * einstein_radius / r)
            }
            MassProfile::ExternalShear { magnitude, phi } => {
                let (gamma_1, gamma_2) = shear_components(magnitude, phi);
                [-gamma_1 * y + gamma_2 * x, gamma_1 * x + gamma_2 * y]
            }
        }
    }
}

fn radius(y: f64, x: f64, centre: (f64, f64)) -> f64 {
    (y - centre.0).hypot(x - centre.1).max(RADIUS_FLOOR)
}

/// Deflection of magnitude `alpha` pointing away from the centre.
fn radial_deflection(y: f64, x: f64, centre: (f64, f64), r: f64, alpha: f64) -> [f64; 2] {
    [alpha * (y - centre.0) / r, alpha * (x - centre.1) / r]
}

fn shear_components(magnitude: f64, phi: f64) -> (f64, f64) {
    let (sin_2phi, cos_2phi) = (2.0 * phi.to_radians()).sin_cos();
    (magnitude * cos_2phi, magnitude * sin_2phi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sis(einstein_radius: f64) -> MassProfile {
        MassProfile::SphericalIsothermal {
            centre: (0.0, 0.0),
            einstein_radius,
        }
    }

    #[test]
    fn test_sis_deflection_magnitude_is_einstein_radius() {
        let grid = Grid::from_points(&[(1.0, 0.0), (1.0, 1.0), (0.0, -3.0)]);
        let defl = sis(1.0).deflections_from_grid(&grid);

        assert!((defl[[0, 0]] - 1.0).abs() < 1e-12);
        assert!(defl[[0, 1]].abs() < 1e-12);
        let val = std::f64::consts::FRAC_1_SQRT_2;
        assert!((defl[[1, 0]] - val).abs() < 1e-12);
        assert!((defl[[1, 1]] - val).abs() < 1e-12);
        assert!((defl[[2, 1]] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sis_convergence_and_potential() {
        let grid = Grid::from_points(&[(0.0, 2.0)]);
        let profile = sis(1.5);
        assert!((profile.convergence_from_grid(&grid)[0] - 0.375).abs() < 1e-12);
        assert!((profile.potential_from_grid(&grid)[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_centre_is_finite() {
        let grid = Grid::from_points(&[(0.0, 0.0)]);
        for profile in [
            sis(1.0),
            MassProfile::PointMass {
                centre: (0.0, 0.0),
                einstein_radius: 1.0,
            },
        ] {
            assert!(profile.deflections_from_grid(&grid).iter().all(|v| v.is_finite()));
            assert!(profile.convergence_from_grid(&grid).iter().all(|v| v.is_finite()));
            assert!(profile.potential_from_grid(&grid).iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_cored_isothermal_tends_to_sis() {
        let cored = MassProfile::SphericalCoredIsothermal {
            centre: (0.1, -0.2),
            einstein_radius: 1.2,
            core_radius: 1e-9,
        };
        let singular = MassProfile::SphericalIsothermal {
            centre: (0.1, -0.2),
            einstein_radius: 1.2,
        };
        let grid = Grid::from_points(&[(1.0, 0.5), (-0.7, 2.0)]);
        let d_cored = cored.deflections_from_grid(&grid);
        let d_sis = singular.deflections_from_grid(&grid);
        for (a, b) in d_cored.iter().zip(d_sis.iter()) {
            assert!((a - b).abs() < 1e-8, "{a} vs {b}");
        }
    }

    #[test]
    fn test_deflection_is_potential_gradient() {
        let profiles = [
            MassProfile::SphericalCoredIsothermal {
                centre: (0.2, 0.1),
                einstein_radius: 1.0,
                core_radius: 0.3,
            },
            MassProfile::PointMass {
                centre: (0.0, 0.0),
                einstein_radius: 0.8,
            },
            MassProfile::ExternalShear {
                magnitude: 0.1,
                phi: 30.0,
            },
        ];
        let (y, x, h) = (0.7, -1.1, 1e-5);
        for profile in profiles {
            let grid = Grid::from_points(&[(y + h, x), (y - h, x), (y, x + h), (y, x - h), (y, x)]);
            let psi = profile.potential_from_grid(&grid);
            let defl = profile.deflections_from_grid(&grid);
            let dpsi_dy = (psi[0] - psi[1]) / (2.0 * h);
            let dpsi_dx = (psi[2] - psi[3]) / (2.0 * h);
            assert!((defl[[4, 0]] - dpsi_dy).abs() < 1e-6, "{profile:?}: α_y");
            assert!((defl[[4, 1]] - dpsi_dx).abs() < 1e-6, "{profile:?}: α_x");
        }
    }

    #[test]
    fn test_einstein_radii() {
        assert_eq!(sis(1.3).einstein_radius(), Some(1.3));
        let cored = MassProfile::SphericalCoredIsothermal {
            centre: (0.0, 0.0),
            einstein_radius: 1.0,
            core_radius: 0.2,
        };
        let radius = cored.einstein_radius().unwrap();
        assert!((radius - 0.6f64.sqrt()).abs() < 1e-12);

        // α(θE) = θE at the Einstein radius
        let grid = Grid::from_points(&[(0.0, radius)]);
        let defl = cored.deflections_from_grid(&grid);
        assert!((defl[[0, 1]] - radius).abs() < 1e-12);

        let subcritical = MassProfile::SphericalCoredIsothermal {
            centre: (0.0, 0.0),
            einstein_radius: 0.5,
            core_radius: 1.0,
        };
        assert_eq!(subcritical.einstein_radius(), Some(0.0));
        let shear = MassProfile::ExternalShear {
            magnitude: 0.05,
            phi: 0.0,
        };
        assert_eq!(shear.einstein_radius(), None);
    }
}
