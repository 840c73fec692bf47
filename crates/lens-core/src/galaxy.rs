// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Galaxy
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! A galaxy at one redshift with its light and mass components.
//!
//! Capabilities are plain field checks: a galaxy "has" a pixelization when
//! `pixelization.is_some()`, a mass profile when `mass_profiles` is
//! non-empty, and so on.

use crate::cosmology::Cosmology;
use crate::hyper::HyperGalaxy;
use crate::light::LightProfile;
use crate::mass::MassProfile;
use lens_types::error::LensResult;
use lens_types::grid::Grid;
use lens_types::units::{UnitLength, UnitMass};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;

/// Source-plane pixelization scheme, consumed by an external inversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Pixelization {
    Rectangular { shape: (usize, usize) },
    VoronoiMagnification { shape: (usize, usize) },
}

/// Smoothness prior on a pixelized source, consumed by an external inversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Regularization {
    Constant {
        coefficient: f64,
    },
    AdaptiveBrightness {
        inner_coefficient: f64,
        outer_coefficient: f64,
        signal_scale: f64,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Galaxy {
    pub redshift: f64,
    pub light_profiles: Vec<LightProfile>,
    pub mass_profiles: Vec<MassProfile>,
    pub pixelization: Option<Pixelization>,
    pub regularization: Option<Regularization>,
    pub hyper_galaxy: Option<HyperGalaxy>,
    pub hyper_model_image: Option<Array1<f64>>,
    pub hyper_galaxy_image: Option<Array1<f64>>,
}

impl Galaxy {
    pub fn new(redshift: f64) -> Self {
        Galaxy {
            redshift,
            ..Galaxy::default()
        }
    }

    pub fn with_light(mut self, profile: LightProfile) -> Self {
        self.light_profiles.push(profile);
        self
    }

    pub fn with_mass(mut self, profile: MassProfile) -> Self {
        self.mass_profiles.push(profile);
        self
    }

    pub fn with_pixelization(mut self, pixelization: Pixelization) -> Self {
        self.pixelization = Some(pixelization);
        self
    }

    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.regularization = Some(regularization);
        self
    }

    /// Attach a hyper galaxy with the model and galaxy images it scales by.
    pub fn with_hyper_galaxy(
        mut self,
        hyper_galaxy: HyperGalaxy,
        hyper_model_image: Array1<f64>,
        hyper_galaxy_image: Array1<f64>,
    ) -> Self {
        self.hyper_galaxy = Some(hyper_galaxy);
        self.hyper_model_image = Some(hyper_model_image);
        self.hyper_galaxy_image = Some(hyper_galaxy_image);
        self
    }

    pub fn has_light_profile(&self) -> bool {
        !self.light_profiles.is_empty()
    }

    pub fn has_mass_profile(&self) -> bool {
        !self.mass_profiles.is_empty()
    }

    pub fn has_pixelization(&self) -> bool {
        self.pixelization.is_some()
    }

    pub fn has_regularization(&self) -> bool {
        self.regularization.is_some()
    }

    pub fn has_hyper_galaxy(&self) -> bool {
        self.hyper_galaxy.is_some()
    }

    pub fn profile_image_from_grid(&self, grid: &Grid) -> Array1<f64> {
        self.light_profiles
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, p| acc + p.image_from_grid(grid))
    }

    pub fn convergence_from_grid(&self, grid: &Grid) -> Array1<f64> {
        self.mass_profiles
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, p| acc + p.convergence_from_grid(grid))
    }

    pub fn potential_from_grid(&self, grid: &Grid) -> Array1<f64> {
        self.mass_profiles
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, p| acc + p.potential_from_grid(grid))
    }

    pub fn deflections_from_grid(&self, grid: &Grid) -> Array2<f64> {
        self.mass_profiles
            .iter()
            .fold(Array2::zeros((grid.len(), 2)), |acc, p| acc + p.deflections_from_grid(grid))
    }

    pub fn mass_profile_centres(&self) -> Vec<(f64, f64)> {
        self.mass_profiles.iter().map(MassProfile::centre).collect()
    }

    /// Sum of the mass profiles' Einstein radii, `None` when no profile
    /// defines one.
    pub fn einstein_radius_in_units(&self, unit_length: UnitLength, cosmology: &dyn Cosmology) -> Option<f64> {
        let radii: Vec<f64> = self
            .mass_profiles
            .iter()
            .filter_map(MassProfile::einstein_radius)
            .collect();
        if radii.is_empty() {
            return None;
        }
        let radius_arcsec: f64 = radii.iter().sum();
        Some(match unit_length {
            UnitLength::Arcsec => radius_arcsec,
            UnitLength::Kpc => radius_arcsec * cosmology.kpc_per_arcsec(self.redshift),
        })
    }

    /// Mass inside each profile's Einstein radius, π θE² summed over
    /// profiles. Solar masses use Σcr between this galaxy and
    /// `redshift_source`.
    pub fn einstein_mass_in_units(
        &self,
        unit_mass: UnitMass,
        redshift_source: f64,
        cosmology: &dyn Cosmology,
    ) -> Option<f64> {
        let angular: Vec<f64> = self
            .mass_profiles
            .iter()
            .filter_map(MassProfile::einstein_radius)
            .map(|r| PI * r * r)
            .collect();
        if angular.is_empty() {
            return None;
        }
        let mass_angular: f64 = angular.iter().sum();
        Some(match unit_mass {
            UnitMass::Angular => mass_angular,
            UnitMass::SolMass => {
                mass_angular
                    * cosmology.critical_surface_density_between_in_units(
                        self.redshift,
                        redshift_source,
                        UnitLength::Arcsec,
                        UnitMass::SolMass,
                    )
            }
        })
    }

    /// Normalised contribution map, `None` without a hyper galaxy and both
    /// hyper images.
    pub fn contribution_map(&self) -> LensResult<Option<Array1<f64>>> {
        match (&self.hyper_galaxy, &self.hyper_model_image, &self.hyper_galaxy_image) {
            (Some(hyper), Some(model), Some(galaxy)) => {
                Ok(Some(hyper.contribution_map_from_hyper_images(model, galaxy)?))
            }
            _ => Ok(None),
        }
    }

    /// Hyper noise for `noise_map`; all zeros without a hyper galaxy.
    pub fn hyper_noise_map_from_noise_map(&self, noise_map: &Array1<f64>) -> LensResult<Array1<f64>> {
        match (&self.hyper_galaxy, self.contribution_map()?) {
            (Some(hyper), Some(contribution)) => {
                hyper.hyper_noise_map_from_contribution_map(noise_map, &contribution)
            }
            _ => Ok(Array1::zeros(noise_map.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmology::FlatLambdaCdm;
    use ndarray::arr1;

    fn sis(einstein_radius: f64) -> MassProfile {
        MassProfile::SphericalIsothermal {
            centre: (0.0, 0.0),
            einstein_radius,
        }
    }

    #[test]
    fn test_capability_flags() {
        let bare = Galaxy::new(0.5);
        assert!(!bare.has_light_profile());
        assert!(!bare.has_mass_profile());
        assert!(!bare.has_pixelization());
        assert!(!bare.has_regularization());
        assert!(!bare.has_hyper_galaxy());

        let full = Galaxy::new(1.0)
            .with_light(LightProfile::spherical_exponential((0.0, 0.0), 1.0, 1.0))
            .with_mass(sis(1.0))
            .with_pixelization(Pixelization::Rectangular { shape: (3, 3) })
            .with_regularization(Regularization::Constant { coefficient: 1.0 })
            .with_hyper_galaxy(HyperGalaxy::default(), arr1(&[1.0]), arr1(&[1.0]));
        assert!(full.has_light_profile());
        assert!(full.has_mass_profile());
        assert!(full.has_pixelization());
        assert!(full.has_regularization());
        assert!(full.has_hyper_galaxy());
    }

    #[test]
    fn test_missing_profiles_sum_to_zero_arrays() {
        let galaxy = Galaxy::new(0.5);
        let grid = Grid::from_points(&[(1.0, 1.0), (0.0, 2.0), (-1.0, 0.5)]);
        assert_eq!(galaxy.profile_image_from_grid(&grid), Array1::<f64>::zeros(3));
        assert_eq!(galaxy.convergence_from_grid(&grid), Array1::<f64>::zeros(3));
        assert_eq!(galaxy.potential_from_grid(&grid), Array1::<f64>::zeros(3));
        assert_eq!(galaxy.deflections_from_grid(&grid), Array2::<f64>::zeros((3, 2)));
    }

    #[test]
    fn test_two_profiles_double_deflection() {
        let grid = Grid::from_points(&[(1.0, 1.0), (0.3, -2.0)]);
        let single = Galaxy::new(0.5).with_mass(sis(1.0));
        let double = Galaxy::new(0.5).with_mass(sis(1.0)).with_mass(sis(1.0));
        let d1 = single.deflections_from_grid(&grid);
        let d2 = double.deflections_from_grid(&grid);
        for (a, b) in d1.iter().zip(d2.iter()) {
            assert!((2.0 * a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_einstein_radius_and_mass_units() {
        let cosmo = FlatLambdaCdm::planck15();
        let galaxy = Galaxy::new(0.5).with_mass(sis(1.0)).with_mass(sis(0.5));

        let radius = galaxy.einstein_radius_in_units(UnitLength::Arcsec, &cosmo).unwrap();
        assert!((radius - 1.5).abs() < 1e-12);
        let radius_kpc = galaxy.einstein_radius_in_units(UnitLength::Kpc, &cosmo).unwrap();
        assert!((radius_kpc - 1.5 * cosmo.kpc_per_arcsec(0.5)).abs() < 1e-9);

        let mass = galaxy.einstein_mass_in_units(UnitMass::Angular, 1.0, &cosmo).unwrap();
        assert!((mass - PI * 1.25).abs() < 1e-12);
        let sigma =
            cosmo.critical_surface_density_between_in_units(0.5, 1.0, UnitLength::Arcsec, UnitMass::SolMass);
        let mass_sol = galaxy.einstein_mass_in_units(UnitMass::SolMass, 1.0, &cosmo).unwrap();
        assert!((mass_sol / (PI * 1.25 * sigma) - 1.0).abs() < 1e-12);

        let no_mass = Galaxy::new(0.5);
        assert_eq!(no_mass.einstein_radius_in_units(UnitLength::Arcsec, &cosmo), None);
        let shear_only = Galaxy::new(0.5).with_mass(MassProfile::ExternalShear {
            magnitude: 0.1,
            phi: 45.0,
        });
        assert_eq!(shear_only.einstein_mass_in_units(UnitMass::Angular, 1.0, &cosmo), None);
    }

    #[test]
    fn test_hyper_noise_map() {
        let noise = arr1(&[1.0, 2.0]);
        let plain = Galaxy::new(0.5);
        assert_eq!(plain.contribution_map().unwrap(), None);
        assert_eq!(plain.hyper_noise_map_from_noise_map(&noise).unwrap(), Array1::<f64>::zeros(2));

        let hyper = Galaxy::new(0.5).with_hyper_galaxy(
            HyperGalaxy::new(0.0, 1.0, 1.0),
            arr1(&[1.0, 1.0]),
            arr1(&[1.0, 0.5]),
        );
        let contribution = hyper.contribution_map().unwrap().unwrap();
        assert_eq!(contribution.to_vec(), vec![1.0, 0.5]);
        let map = hyper.hyper_noise_map_from_noise_map(&noise).unwrap();
        assert_eq!(map.to_vec(), vec![1.0, 1.0]);
    }
}
