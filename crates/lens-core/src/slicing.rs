//! Tracers with extra planes sliced between the lens redshifts.
//!
//! The line of sight from the observer to the source is cut at `0`, each
//! distinct lens redshift and the source redshift. Gap `k` is split into
//! `planes_between_lenses[k]` equal slices with a plane at every slice
//! midpoint. Line-of-sight galaxies are moved onto the nearest plane in front
//! of the source, so the tracer sees them at that plane's redshift.

use crate::cosmology::Cosmology;
use crate::galaxy::Galaxy;
use crate::plane::Plane;
use crate::tracer::Tracer;
use lens_types::error::{LensError, LensResult};
use std::sync::Arc;
use tracing::debug;

pub fn sliced_tracer_from_lens_line_of_sight_and_source_galaxies(
    lens_galaxies: &[Arc<Galaxy>],
    line_of_sight_galaxies: &[Arc<Galaxy>],
    source_galaxies: &[Arc<Galaxy>],
    planes_between_lenses: &[usize],
    cosmology: Arc<dyn Cosmology>,
) -> LensResult<Tracer> {
    if source_galaxies.is_empty() {
        return Err(LensError::ConfigError(
            "sliced tracer requires at least one source galaxy".into(),
        ));
    }
    let source_plane = Plane::new(None, source_galaxies.to_vec(), cosmology.clone())?;
    let redshift_source = source_plane.redshift();

    let mut lens_redshifts: Vec<f64> = lens_galaxies.iter().map(|g| g.redshift).collect();
    lens_redshifts.sort_by(f64::total_cmp);
    lens_redshifts.dedup();
    if let Some(&nearest) = lens_redshifts.first() {
        if nearest <= 0.0 {
            return Err(LensError::ConfigError(format!(
                "lens redshifts must be positive, got {nearest}"
            )));
        }
    }
    if let Some(&furthest) = lens_redshifts.last() {
        if furthest >= redshift_source {
            return Err(LensError::ConfigError(format!(
                "lens at z={furthest} is not in front of the source at z={redshift_source}"
            )));
        }
    }
    if planes_between_lenses.len() != lens_redshifts.len() + 1 {
        return Err(LensError::ConfigError(format!(
            "planes_between_lenses has {} entries, expected {} for {} lens redshifts",
            planes_between_lenses.len(),
            lens_redshifts.len() + 1,
            lens_redshifts.len()
        )));
    }

    let plane_redshifts = slice_redshifts(&lens_redshifts, redshift_source, planes_between_lenses);
    let mut members: Vec<Vec<Arc<Galaxy>>> = vec![Vec::new(); plane_redshifts.len()];

    for galaxy in lens_galaxies {
        let index = plane_redshifts
            .iter()
            .position(|&z| z == galaxy.redshift)
            .ok_or_else(|| {
                LensError::ConfigError(format!("no plane at lens redshift z={}", galaxy.redshift))
            })?;
        members[index].push(Arc::clone(galaxy));
    }

    for galaxy in line_of_sight_galaxies {
        if galaxy.redshift >= redshift_source {
            debug!(redshift = galaxy.redshift, redshift_source, "dropping line-of-sight galaxy behind source");
            continue;
        }
        let Some(index) = nearest_plane_index(&plane_redshifts, galaxy.redshift) else {
            debug!(redshift = galaxy.redshift, "dropping line-of-sight galaxy with no plane in front of source");
            continue;
        };
        let redshift = plane_redshifts[index];
        let moved = if galaxy.redshift == redshift {
            Arc::clone(galaxy)
        } else {
            Arc::new(Galaxy {
                redshift,
                ..(**galaxy).clone()
            })
        };
        members[index].push(moved);
    }

    let mut planes = plane_redshifts
        .iter()
        .zip(members)
        .map(|(&z, galaxies)| Plane::new(Some(z), galaxies, cosmology.clone()))
        .collect::<LensResult<Vec<Plane>>>()?;
    planes.push(source_plane);

    debug!(
        slices = ?planes_between_lenses,
        line_of_sight = line_of_sight_galaxies.len(),
        "sliced tracer planes assembled"
    );
    Tracer::from_planes(planes, cosmology)
}

/// Slice midpoints and lens redshifts in increasing order, source excluded.
fn slice_redshifts(lens_redshifts: &[f64], redshift_source: f64, planes_between_lenses: &[usize]) -> Vec<f64> {
    let mut redshifts = Vec::new();
    let mut lower = 0.0;
    for (k, &slices) in planes_between_lenses.iter().enumerate() {
        let lens_redshift = lens_redshifts.get(k).copied();
        let upper = lens_redshift.unwrap_or(redshift_source);
        if slices > 0 {
            let width = (upper - lower) / slices as f64;
            redshifts.extend((0..slices).map(|m| lower + (m as f64 + 0.5) * width));
        }
        redshifts.extend(lens_redshift);
        lower = upper;
    }
    redshifts
}

/// Ties resolve to the lower redshift. `None` when there are no planes.
fn nearest_plane_index(plane_redshifts: &[f64], redshift: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &z) in plane_redshifts.iter().enumerate() {
        let distance = (z - redshift).abs();
        if best.map_or(true, |(_, nearest)| distance < nearest) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}
