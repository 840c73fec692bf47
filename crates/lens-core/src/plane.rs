// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Plane
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! A lens plane: the galaxies sharing one redshift.
//!
//! Every per-plane quantity is the sum over the plane's galaxies, in
//! insertion order. Galaxies without the relevant component contribute
//! zeros, so outputs always match the grid's length.

use crate::cosmology::Cosmology;
use crate::galaxy::{Galaxy, Pixelization, Regularization};
use crate::lensing::LensingField;
use lens_types::error::{LensError, LensResult};
use lens_types::grid::Grid;
use lens_types::units::{UnitLength, UnitMass};
use ndarray::{Array1, Array2};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Plane {
    redshift: f64,
    galaxies: Vec<Arc<Galaxy>>,
    cosmology: Arc<dyn Cosmology>,
}

impl Plane {
    /// Build a plane, deriving its redshift from the galaxies when none is
    /// given. Every galaxy must sit at the plane's redshift, and at most one
    /// may carry a pixelization (likewise a regularization).
    pub fn new(
        redshift: Option<f64>,
        galaxies: Vec<Arc<Galaxy>>,
        cosmology: Arc<dyn Cosmology>,
    ) -> LensResult<Self> {
        let redshift = match redshift {
            Some(z) => z,
            None => galaxies
                .first()
                .map(|g| g.redshift)
                .ok_or(LensError::UndeterminedPlaneRedshift)?,
        };
        if !redshift.is_finite() {
            return Err(LensError::ConfigError(format!(
                "plane redshift must be finite, got {redshift}"
            )));
        }
        if let Some((index, galaxy)) = galaxies
            .iter()
            .enumerate()
            .find(|(_, g)| g.redshift != redshift)
        {
            return Err(LensError::InconsistentPlaneRedshift {
                first: redshift,
                index,
                found: galaxy.redshift,
            });
        }

        let pixelizations = galaxies.iter().filter(|g| g.has_pixelization()).count();
        if pixelizations > 1 {
            return Err(LensError::PixelizationConfiguration {
                redshift,
                component: "pixelization",
                count: pixelizations,
            });
        }
        let regularizations = galaxies.iter().filter(|g| g.has_regularization()).count();
        if regularizations > 1 {
            return Err(LensError::PixelizationConfiguration {
                redshift,
                component: "regularization",
                count: regularizations,
            });
        }

        Ok(Plane {
            redshift,
            galaxies,
            cosmology,
        })
    }

    pub fn redshift(&self) -> f64 {
        self.redshift
    }

    pub fn galaxies(&self) -> &[Arc<Galaxy>] {
        &self.galaxies
    }

    pub fn cosmology(&self) -> &Arc<dyn Cosmology> {
        &self.cosmology
    }

    pub fn galaxy_redshifts(&self) -> Vec<f64> {
        self.galaxies.iter().map(|g| g.redshift).collect()
    }

    pub fn has_light_profile(&self) -> bool {
        self.galaxies.iter().any(|g| g.has_light_profile())
    }

    pub fn has_mass_profile(&self) -> bool {
        self.galaxies.iter().any(|g| g.has_mass_profile())
    }

    pub fn has_pixelization(&self) -> bool {
        self.galaxies.iter().any(|g| g.has_pixelization())
    }

    pub fn has_regularization(&self) -> bool {
        self.galaxies.iter().any(|g| g.has_regularization())
    }

    pub fn has_hyper_galaxy(&self) -> bool {
        self.galaxies.iter().any(|g| g.has_hyper_galaxy())
    }

    pub fn pixelization(&self) -> Option<&Pixelization> {
        self.galaxies.iter().find_map(|g| g.pixelization.as_ref())
    }

    pub fn regularization(&self) -> Option<&Regularization> {
        self.galaxies.iter().find_map(|g| g.regularization.as_ref())
    }

    pub fn profile_images_of_galaxies_from_grid(&self, grid: &Grid) -> Vec<Array1<f64>> {
        self.galaxies
            .iter()
            .map(|g| g.profile_image_from_grid(grid))
            .collect()
    }

    pub fn profile_image_from_grid(&self, grid: &Grid) -> Array1<f64> {
        self.galaxies
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, g| acc + g.profile_image_from_grid(grid))
    }

    pub fn convergence_from_grid(&self, grid: &Grid) -> Array1<f64> {
        self.galaxies
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, g| acc + g.convergence_from_grid(grid))
    }

    pub fn potential_from_grid(&self, grid: &Grid) -> Array1<f64> {
        self.galaxies
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, g| acc + g.potential_from_grid(grid))
    }

    pub fn deflections_from_grid(&self, grid: &Grid) -> Array2<f64> {
        self.galaxies
            .iter()
            .fold(Array2::zeros((grid.len(), 2)), |acc, g| acc + g.deflections_from_grid(grid))
    }

    /// One lens-equation hop: `grid - deflections(grid)`.
    pub fn traced_grid_from_grid(&self, grid: &Grid) -> LensResult<Grid> {
        grid.deflected_by(&self.deflections_from_grid(grid))
    }

    pub fn arcsec_per_kpc(&self) -> f64 {
        self.cosmology.arcsec_per_kpc(self.redshift)
    }

    pub fn kpc_per_arcsec(&self) -> f64 {
        self.cosmology.kpc_per_arcsec(self.redshift)
    }

    pub fn angular_diameter_distance_to_earth_in_units(&self, unit_length: UnitLength) -> f64 {
        self.cosmology
            .angular_diameter_distance_to_earth_in_units(self.redshift, unit_length)
    }

    /// Sum of the galaxies' Einstein radii, `None` when no galaxy has one.
    pub fn einstein_radius_in_units(&self, unit_length: UnitLength) -> Option<f64> {
        sum_defined(
            self.galaxies
                .iter()
                .map(|g| g.einstein_radius_in_units(unit_length, self.cosmology.as_ref())),
        )
    }

    /// Sum of the galaxies' Einstein masses for a source at `redshift_source`.
    pub fn einstein_mass_in_units(&self, unit_mass: UnitMass, redshift_source: f64) -> Option<f64> {
        sum_defined(self.galaxies.iter().map(|g| {
            g.einstein_mass_in_units(unit_mass, redshift_source, self.cosmology.as_ref())
        }))
    }

    pub fn centres_of_galaxy_mass_profiles(&self) -> Vec<Vec<(f64, f64)>> {
        self.galaxies.iter().map(|g| g.mass_profile_centres()).collect()
    }

    /// One entry per galaxy, `None` for galaxies without hyper data.
    pub fn contribution_maps_of_galaxies(&self) -> LensResult<Vec<Option<Array1<f64>>>> {
        self.galaxies.iter().map(|g| g.contribution_map()).collect()
    }

    /// Sum of the galaxies' hyper noise maps; zeros without a hyper galaxy.
    pub fn hyper_noise_map_from_noise_map(&self, noise_map: &Array1<f64>) -> LensResult<Array1<f64>> {
        let mut total = Array1::zeros(noise_map.len());
        for galaxy in &self.galaxies {
            total += &galaxy.hyper_noise_map_from_noise_map(noise_map)?;
        }
        Ok(total)
    }
}

impl LensingField for Plane {
    fn deflections_from_grid(&self, grid: &Grid) -> Array2<f64> {
        Plane::deflections_from_grid(self, grid)
    }

    fn potential_from_grid(&self, grid: &Grid) -> Array1<f64> {
        Plane::potential_from_grid(self, grid)
    }
}

fn sum_defined(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    values.flatten().fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}
