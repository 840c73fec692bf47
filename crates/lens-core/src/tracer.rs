// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Multi-Plane Ray Tracer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Redshift-ordered planes and multi-plane ray propagation.
//!
//! The grid traced to plane j is
//!   θ_j = θ_0 - Σ_{i<j, plane i has mass} β(i, j) · α_i(θ_i)
//! where α_i is evaluated at plane i's own traced grid and β(i, j) is the
//! distance-ratio scaling factor relative to the final plane. Planes are
//! traced strictly in order; each point set is independent.

use crate::cosmology::Cosmology;
use crate::galaxy::{Galaxy, Pixelization, Regularization};
use crate::lensing::LensingField;
use crate::plane::Plane;
use lens_types::error::{LensError, LensResult};
use lens_types::grid::Grid;
use lens_types::units::{UnitLength, UnitMass};
use ndarray::{Array1, Array2};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct Tracer {
    planes: Vec<Plane>,
    cosmology: Arc<dyn Cosmology>,
}

impl Tracer {
    /// Group galaxies into one plane per distinct redshift, in increasing
    /// redshift order. Galaxies sharing a redshift keep their input order.
    pub fn from_galaxies(galaxies: Vec<Arc<Galaxy>>, cosmology: Arc<dyn Cosmology>) -> LensResult<Self> {
        if galaxies.is_empty() {
            return Err(LensError::EmptyGalaxyList);
        }

        let mut redshifts: Vec<f64> = galaxies.iter().map(|g| g.redshift).collect();
        redshifts.sort_by(|a, b| a.total_cmp(b));
        redshifts.dedup();

        let planes = redshifts
            .iter()
            .map(|&z| {
                let members = galaxies.iter().filter(|g| g.redshift == z).cloned().collect();
                Plane::new(Some(z), members, cosmology.clone())
            })
            .collect::<LensResult<Vec<_>>>()?;

        Self::from_planes(planes, cosmology)
    }

    /// Wrap pre-built planes, which must be non-empty and strictly
    /// increasing in redshift.
    pub fn from_planes(planes: Vec<Plane>, cosmology: Arc<dyn Cosmology>) -> LensResult<Self> {
        if planes.is_empty() {
            return Err(LensError::EmptyGalaxyList);
        }
        for (index, pair) in planes.windows(2).enumerate() {
            if pair[1].redshift() <= pair[0].redshift() {
                return Err(LensError::UnorderedPlanes {
                    index: index + 1,
                    previous: pair[0].redshift(),
                    found: pair[1].redshift(),
                });
            }
        }
        let redshifts: Vec<f64> = planes.iter().map(Plane::redshift).collect();
        debug!(total_planes = planes.len(), ?redshifts, "tracer constructed");
        Ok(Tracer { planes, cosmology })
    }

    // ── Planes & galaxies ────────────────────────────────────────────

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn cosmology(&self) -> &Arc<dyn Cosmology> {
        &self.cosmology
    }

    pub fn total_planes(&self) -> usize {
        self.planes.len()
    }

    pub fn plane(&self, index: usize) -> LensResult<&Plane> {
        self.planes.get(index).ok_or(LensError::PlaneIndexOutOfRange {
            index,
            total_planes: self.planes.len(),
        })
    }

    pub fn image_plane(&self) -> &Plane {
        &self.planes[0]
    }

    pub fn source_plane(&self) -> &Plane {
        &self.planes[self.planes.len() - 1]
    }

    pub fn plane_redshifts(&self) -> Vec<f64> {
        self.planes.iter().map(Plane::redshift).collect()
    }

    /// All galaxies, in plane order.
    pub fn galaxies(&self) -> Vec<Arc<Galaxy>> {
        self.planes
            .iter()
            .flat_map(|p| p.galaxies().iter().cloned())
            .collect()
    }

    pub fn galaxies_in_planes(&self) -> Vec<Vec<Arc<Galaxy>>> {
        self.planes.iter().map(|p| p.galaxies().to_vec()).collect()
    }

    pub fn has_light_profile(&self) -> bool {
        self.planes.iter().any(Plane::has_light_profile)
    }

    pub fn has_mass_profile(&self) -> bool {
        self.planes.iter().any(Plane::has_mass_profile)
    }

    pub fn has_pixelization(&self) -> bool {
        self.planes.iter().any(Plane::has_pixelization)
    }

    pub fn has_regularization(&self) -> bool {
        self.planes.iter().any(Plane::has_regularization)
    }

    pub fn has_hyper_galaxy(&self) -> bool {
        self.planes.iter().any(Plane::has_hyper_galaxy)
    }

    pub fn plane_indexes_with_pixelizations(&self) -> Vec<usize> {
        self.planes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.has_pixelization())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn pixelizations_of_planes(&self) -> Vec<Option<Pixelization>> {
        self.planes.iter().map(|p| p.pixelization().cloned()).collect()
    }

    pub fn regularizations_of_planes(&self) -> Vec<Option<Regularization>> {
        self.planes.iter().map(|p| p.regularization().cloned()).collect()
    }

    /// Highest plane index containing a light profile.
    pub fn upper_plane_index_with_light_profile(&self) -> Option<usize> {
        self.planes.iter().rposition(Plane::has_light_profile)
    }

    // ── Cosmology per plane ──────────────────────────────────────────

    pub fn arcsec_per_kpc_proper_of_plane(&self, i: usize) -> LensResult<f64> {
        Ok(self.plane(i)?.arcsec_per_kpc())
    }

    pub fn kpc_per_arcsec_proper_of_plane(&self, i: usize) -> LensResult<f64> {
        Ok(self.plane(i)?.kpc_per_arcsec())
    }

    pub fn angular_diameter_distance_of_plane_to_earth_in_units(
        &self,
        i: usize,
        unit_length: UnitLength,
    ) -> LensResult<f64> {
        let z = self.plane(i)?.redshift();
        Ok(self
            .cosmology
            .angular_diameter_distance_to_earth_in_units(z, unit_length))
    }

    /// Signed: negative when plane `i` lies behind plane `j`.
    pub fn angular_diameter_distance_between_planes_in_units(
        &self,
        i: usize,
        j: usize,
        unit_length: UnitLength,
    ) -> LensResult<f64> {
        let (z_i, z_j) = (self.plane(i)?.redshift(), self.plane(j)?.redshift());
        Ok(self
            .cosmology
            .angular_diameter_distance_between_in_units(z_i, z_j, unit_length))
    }

    pub fn angular_diameter_distance_from_image_to_source_plane_in_units(&self, unit_length: UnitLength) -> f64 {
        self.cosmology.angular_diameter_distance_between_in_units(
            self.image_plane().redshift(),
            self.source_plane().redshift(),
            unit_length,
        )
    }

    pub fn critical_surface_density_between_planes_in_units(
        &self,
        i: usize,
        j: usize,
        unit_length: UnitLength,
        unit_mass: UnitMass,
    ) -> LensResult<f64> {
        let (z_i, z_j) = (self.plane(i)?.redshift(), self.plane(j)?.redshift());
        Ok(self
            .cosmology
            .critical_surface_density_between_in_units(z_i, z_j, unit_length, unit_mass))
    }

    /// β(i, j) relative to the source plane.
    pub fn scaling_factor_between_planes(&self, i: usize, j: usize) -> LensResult<f64> {
        let (z_i, z_j) = (self.plane(i)?.redshift(), self.plane(j)?.redshift());
        Ok(self
            .cosmology
            .scaling_factor_between_redshifts(z_i, z_j, self.source_plane().redshift()))
    }

    // ── Ray tracing ──────────────────────────────────────────────────

    /// The grid observed at every plane, truncated to planes
    /// `0..=plane_index_limit` when a limit is given.
    pub fn traced_grids_of_planes_from_grid(
        &self,
        grid: &Grid,
        plane_index_limit: Option<usize>,
    ) -> LensResult<Vec<Grid>> {
        if let Some(limit) = plane_index_limit {
            self.plane(limit)?;
        }
        let planes: Vec<&Plane> = self.planes.iter().collect();
        trace_grid_through_planes(&planes, self.cosmology.as_ref(), grid, plane_index_limit)
    }

    /// Each input point set traced through all planes, indexed
    /// `[plane][set]`.
    pub fn traced_positions_of_planes_from_positions(&self, positions: &[Grid]) -> LensResult<Vec<Vec<Grid>>> {
        let mut by_plane: Vec<Vec<Grid>> = vec![Vec::with_capacity(positions.len()); self.planes.len()];
        for set in positions {
            let traced = self.traced_grids_of_planes_from_grid(set, None)?;
            for (plane_positions, grid) in by_plane.iter_mut().zip(traced) {
                plane_positions.push(grid);
            }
        }
        Ok(by_plane)
    }

    /// Traced grid at an arbitrary redshift.
    ///
    /// At or in front of the first plane the input is returned unchanged; at
    /// an existing plane's redshift that plane's traced grid is returned.
    /// Otherwise an empty plane is inserted at `redshift` for this query
    /// only. A redshift behind the source plane becomes the final plane for
    /// the scaling factors.
    pub fn grid_at_redshift_from_grid_and_redshift(&self, grid: &Grid, redshift: f64) -> LensResult<Grid> {
        if redshift <= self.image_plane().redshift() {
            return Ok(grid.clone());
        }
        if let Some(index) = self.planes.iter().position(|p| p.redshift() == redshift) {
            return self
                .traced_grids_of_planes_from_grid(grid, Some(index))?
                .pop()
                .ok_or(LensError::PlaneIndexOutOfRange {
                    index,
                    total_planes: self.planes.len(),
                });
        }

        let insert_at = self.planes.iter().filter(|p| p.redshift() < redshift).count();
        let query_plane = Plane::new(Some(redshift), Vec::new(), self.cosmology.clone())?;
        let mut planes: Vec<&Plane> = self.planes.iter().collect();
        planes.insert(insert_at, &query_plane);

        trace_grid_through_planes(&planes, self.cosmology.as_ref(), grid, Some(insert_at))?
            .pop()
            .ok_or(LensError::PlaneIndexOutOfRange {
                index: insert_at,
                total_planes: planes.len(),
            })
    }

    /// Each plane's deflections evaluated at its own traced grid.
    pub fn traced_deflections_of_planes_from_grid(&self, grid: &Grid) -> LensResult<Vec<Array2<f64>>> {
        let traced = self.traced_grids_of_planes_from_grid(grid, None)?;
        Ok(self
            .planes
            .iter()
            .zip(&traced)
            .map(|(plane, plane_grid)| plane.deflections_from_grid(plane_grid))
            .collect())
    }

    /// traced[i] - traced[j]
    pub fn deflections_between_planes_from_grid(&self, grid: &Grid, i: usize, j: usize) -> LensResult<Array2<f64>> {
        self.plane(i)?;
        self.plane(j)?;
        let traced = self.traced_grids_of_planes_from_grid(grid, Some(i.max(j)))?;
        Ok(traced[i].points() - traced[j].points())
    }

    // ── Images ───────────────────────────────────────────────────────

    /// Plane k's light evaluated at the grid traced to plane k.
    pub fn profile_images_of_planes_from_grid(&self, grid: &Grid) -> LensResult<Vec<Array1<f64>>> {
        let traced = self.traced_grids_of_planes_from_grid(grid, None)?;
        Ok(self
            .planes
            .iter()
            .zip(&traced)
            .map(|(plane, plane_grid)| plane.profile_image_from_grid(plane_grid))
            .collect())
    }

    pub fn profile_image_from_grid(&self, grid: &Grid) -> LensResult<Array1<f64>> {
        let images = self.profile_images_of_planes_from_grid(grid)?;
        Ok(images
            .into_iter()
            .fold(Array1::zeros(grid.len()), |acc, image| acc + image))
    }

    /// One image per galaxy, in the order of [`Tracer::galaxies`].
    pub fn profile_images_of_galaxies_from_grid(&self, grid: &Grid) -> LensResult<Vec<Array1<f64>>> {
        let traced = self.traced_grids_of_planes_from_grid(grid, None)?;
        Ok(self
            .planes
            .iter()
            .zip(&traced)
            .flat_map(|(plane, plane_grid)| plane.profile_images_of_galaxies_from_grid(plane_grid))
            .collect())
    }

    // ── Totals on the unlensed grid ──────────────────────────────────

    pub fn convergence_from_grid(&self, grid: &Grid) -> Array1<f64> {
        self.planes
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, p| acc + p.convergence_from_grid(grid))
    }

    pub fn potential_from_grid(&self, grid: &Grid) -> Array1<f64> {
        self.planes
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, p| acc + p.potential_from_grid(grid))
    }

    pub fn deflections_from_grid(&self, grid: &Grid) -> Array2<f64> {
        self.planes
            .iter()
            .fold(Array2::zeros((grid.len(), 2)), |acc, p| acc + p.deflections_from_grid(grid))
    }

    // ── Einstein radius & mass ───────────────────────────────────────

    pub fn einstein_radius_of_plane_in_units(&self, i: usize, unit_length: UnitLength) -> LensResult<Option<f64>> {
        Ok(self.plane(i)?.einstein_radius_in_units(unit_length))
    }

    /// Einstein mass of plane `i` for light from plane `j`.
    pub fn einstein_mass_between_planes_in_units(
        &self,
        i: usize,
        j: usize,
        unit_mass: UnitMass,
    ) -> LensResult<Option<f64>> {
        let redshift_source = self.plane(j)?.redshift();
        Ok(self.plane(i)?.einstein_mass_in_units(unit_mass, redshift_source))
    }

    // ── Hyper noise ──────────────────────────────────────────────────

    /// One entry per plane, `None` for planes without a hyper galaxy.
    pub fn hyper_noise_maps_of_planes(&self, noise_map: &Array1<f64>) -> LensResult<Vec<Option<Array1<f64>>>> {
        self.planes
            .iter()
            .map(|p| {
                if p.has_hyper_galaxy() {
                    p.hyper_noise_map_from_noise_map(noise_map).map(Some)
                } else {
                    Ok(None)
                }
            })
            .collect()
    }

    pub fn hyper_noise_map_from_noise_map(&self, noise_map: &Array1<f64>) -> LensResult<Array1<f64>> {
        let mut total = Array1::zeros(noise_map.len());
        for map in self.hyper_noise_maps_of_planes(noise_map)?.into_iter().flatten() {
            total += &map;
        }
        Ok(total)
    }
}

impl LensingField for Tracer {
    fn deflections_from_grid(&self, grid: &Grid) -> Array2<f64> {
        Tracer::deflections_from_grid(self, grid)
    }

    fn potential_from_grid(&self, grid: &Grid) -> Array1<f64> {
        Tracer::potential_from_grid(self, grid)
    }
}

/// Multi-plane propagation over an ordered plane list whose last entry is
/// the final plane for the scaling factors.
fn trace_grid_through_planes(
    planes: &[&Plane],
    cosmology: &dyn Cosmology,
    grid: &Grid,
    plane_index_limit: Option<usize>,
) -> LensResult<Vec<Grid>> {
    let Some(final_plane) = planes.last() else {
        return Ok(Vec::new());
    };
    let redshift_final = final_plane.redshift();
    let count = plane_index_limit.map_or(planes.len(), |limit| (limit + 1).min(planes.len()));
    debug!(planes = count, limit = ?plane_index_limit, points = grid.len(), "tracing grid");

    let mut traced: Vec<Grid> = Vec::with_capacity(count);
    let mut deflections: Vec<Option<Array2<f64>>> = Vec::with_capacity(count);

    for (j, plane) in planes.iter().take(count).enumerate() {
        let mut plane_grid = grid.clone();
        for (i, deflection) in deflections.iter().enumerate() {
            let Some(deflection) = deflection else {
                continue;
            };
            let beta = cosmology.scaling_factor_between_redshifts(
                planes[i].redshift(),
                plane.redshift(),
                redshift_final,
            );
            trace!(i, j, beta, "scaling deflections");
            plane_grid.subtract_scaled(beta, deflection)?;
        }

        let needed_later = j + 1 < count;
        deflections.push(
            (needed_later && plane.has_mass_profile()).then(|| plane.deflections_from_grid(&plane_grid)),
        );
        traced.push(plane_grid);
    }

    Ok(traced)
}
