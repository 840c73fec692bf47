// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Cosmology
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Angular-diameter distances, critical surface density and multi-plane
//! scaling factors.
//!
//! Distances between redshifts are signed: `D(z1, z2) < 0` when `z1 > z2`.
//! The multi-plane scaling factors rely on this convention.

use lens_math::quadrature::simpson;
use lens_types::config::CosmologyConfig;
use lens_types::constants::{
    ARCSEC_PER_RADIAN, GRAVITATIONAL_CONSTANT_KPC, KPC_PER_MPC, NEUTRINO_DENSITY_RATIO,
    PHOTON_DENSITY_COEFF, SPEED_OF_LIGHT_KMS,
};
use lens_types::error::LensResult;
use lens_types::units::{UnitLength, UnitMass};
use std::f64::consts::PI;
use std::fmt::Debug;

/// Distance service consumed by planes and tracers.
pub trait Cosmology: Send + Sync + Debug {
    /// Angular diameter distance from the observer to `redshift` [kpc].
    fn angular_diameter_distance_to_earth_kpc(&self, redshift: f64) -> f64;

    /// Angular diameter distance between two redshifts [kpc], negative
    /// when `redshift_1 > redshift_2` and zero when they are equal.
    fn angular_diameter_distance_between_kpc(&self, redshift_1: f64, redshift_2: f64) -> f64;

    /// Proper transverse size of one arc-second at `redshift` [kpc].
    fn kpc_per_arcsec(&self, redshift: f64) -> f64 {
        self.angular_diameter_distance_to_earth_kpc(redshift) / ARCSEC_PER_RADIAN
    }

    fn arcsec_per_kpc(&self, redshift: f64) -> f64 {
        1.0 / self.kpc_per_arcsec(redshift)
    }

    fn angular_diameter_distance_to_earth_in_units(&self, redshift: f64, unit_length: UnitLength) -> f64 {
        let distance_kpc = self.angular_diameter_distance_to_earth_kpc(redshift);
        match unit_length {
            UnitLength::Kpc => distance_kpc,
            UnitLength::Arcsec => distance_kpc * self.arcsec_per_kpc(redshift),
        }
    }

    /// Arc-second units use the angular scale of `redshift_1`.
    fn angular_diameter_distance_between_in_units(
        &self,
        redshift_1: f64,
        redshift_2: f64,
        unit_length: UnitLength,
    ) -> f64 {
        let distance_kpc = self.angular_diameter_distance_between_kpc(redshift_1, redshift_2);
        match unit_length {
            UnitLength::Kpc => distance_kpc,
            UnitLength::Arcsec => distance_kpc * self.arcsec_per_kpc(redshift_1),
        }
    }

    /// Σcr = c²/(4πG) · D_s / (D_l · D_ls) for a lens at `redshift_1` and a
    /// source at `redshift_2`, in solMass/kpc² or solMass/arcsec².
    /// `UnitMass::Angular` is dimensionless and always 1.
    fn critical_surface_density_between_in_units(
        &self,
        redshift_1: f64,
        redshift_2: f64,
        unit_length: UnitLength,
        unit_mass: UnitMass,
    ) -> f64 {
        if unit_mass == UnitMass::Angular {
            return 1.0;
        }
        let prefactor = SPEED_OF_LIGHT_KMS.powi(2) / (4.0 * PI * GRAVITATIONAL_CONSTANT_KPC);
        let d_l = self.angular_diameter_distance_to_earth_kpc(redshift_1);
        let d_s = self.angular_diameter_distance_to_earth_kpc(redshift_2);
        let d_ls = self.angular_diameter_distance_between_kpc(redshift_1, redshift_2);
        let sigma_kpc = prefactor * d_s / (d_l * d_ls);
        match unit_length {
            UnitLength::Kpc => sigma_kpc,
            UnitLength::Arcsec => sigma_kpc * self.kpc_per_arcsec(redshift_1).powi(2),
        }
    }

    /// β(z0, z1, z_final) = D(z0,z1)·D(z_final) / (D(z1)·D(z0,z_final)),
    /// the fraction of a deflection at `z0` seen at `z1` when the
    /// deflection is normalised to the final plane. Exactly 1 when
    /// `z1 == z_final`.
    fn scaling_factor_between_redshifts(&self, redshift_0: f64, redshift_1: f64, redshift_final: f64) -> f64 {
        if redshift_1 == redshift_final {
            return 1.0;
        }
        let d_01 = self.angular_diameter_distance_between_kpc(redshift_0, redshift_1);
        let d_1 = self.angular_diameter_distance_to_earth_kpc(redshift_1);
        let d_0f = self.angular_diameter_distance_between_kpc(redshift_0, redshift_final);
        let d_f = self.angular_diameter_distance_to_earth_kpc(redshift_final);
        (d_01 * d_f) / (d_1 * d_0f)
    }
}

/// Spatially flat ΛCDM with photons and massless neutrinos.
#[derive(Debug, Clone)]
pub struct FlatLambdaCdm {
    h0: f64,
    omega_m: f64,
    omega_r: f64,
    omega_de: f64,
    integration_steps: usize,
}

impl FlatLambdaCdm {
    pub fn from_config(config: &CosmologyConfig) -> LensResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Planck 2015 parameters (H0 = 67.74, Ωm = 0.3075, Tcmb = 2.7255 K).
    pub fn planck15() -> Self {
        Self::build(&CosmologyConfig::default())
    }

    fn build(config: &CosmologyConfig) -> Self {
        let h = config.h0 / 100.0;
        let omega_gamma = PHOTON_DENSITY_COEFF * config.t_cmb.powi(4) / (h * h);
        let omega_nu = NEUTRINO_DENSITY_RATIO * config.n_eff * omega_gamma;
        let omega_r = omega_gamma + omega_nu;
        FlatLambdaCdm {
            h0: config.h0,
            omega_m: config.omega_m,
            omega_r,
            omega_de: 1.0 - config.omega_m - omega_r,
            integration_steps: config.integration_steps,
        }
    }

    pub fn h0(&self) -> f64 {
        self.h0
    }

    pub fn omega_m(&self) -> f64 {
        self.omega_m
    }

    pub fn omega_r(&self) -> f64 {
        self.omega_r
    }

    pub fn omega_de(&self) -> f64 {
        self.omega_de
    }

    /// Dimensionless Hubble rate E(z) = H(z) / H0.
    pub fn efunc(&self, redshift: f64) -> f64 {
        let zp1 = 1.0 + redshift;
        (self.omega_m * zp1.powi(3) + self.omega_r * zp1.powi(4) + self.omega_de).sqrt()
    }

    /// c / H0 [kpc]
    pub fn hubble_distance_kpc(&self) -> f64 {
        SPEED_OF_LIGHT_KMS / self.h0 * KPC_PER_MPC
    }

    /// Line-of-sight comoving distance [kpc].
    pub fn comoving_distance_kpc(&self, redshift: f64) -> f64 {
        self.hubble_distance_kpc()
            * simpson(|z| 1.0 / self.efunc(z), 0.0, redshift, self.integration_steps)
    }
}

impl Default for FlatLambdaCdm {
    fn default() -> Self {
        Self::planck15()
    }
}

impl Cosmology for FlatLambdaCdm {
    fn angular_diameter_distance_to_earth_kpc(&self, redshift: f64) -> f64 {
        self.comoving_distance_kpc(redshift) / (1.0 + redshift)
    }

    fn angular_diameter_distance_between_kpc(&self, redshift_1: f64, redshift_2: f64) -> f64 {
        if redshift_1 == redshift_2 {
            return 0.0;
        }
        (self.comoving_distance_kpc(redshift_2) - self.comoving_distance_kpc(redshift_1))
            / (1.0 + redshift_2)
    }
}
