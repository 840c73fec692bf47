// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{LensError, LensResult};
use crate::grid::RegularGrid;
use serde::{Deserialize, Serialize};

/// Top-level lensing configuration: background cosmology plus the default
/// image-plane grid. Every section is optional in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub cosmology: CosmologyConfig,
    #[serde(default)]
    pub grid: GridConfig,
}

/// Flat ΛCDM parameters, named as in the usual astronomy tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmologyConfig {
    /// Hubble constant [km/s/Mpc]
    #[serde(rename = "H0", default = "default_h0")]
    pub h0: f64,
    /// Matter density at z = 0
    #[serde(rename = "Om0", default = "default_omega_m")]
    pub omega_m: f64,
    /// CMB temperature today [K]; 0 disables radiation
    #[serde(rename = "Tcmb0", default = "default_t_cmb")]
    pub t_cmb: f64,
    /// Effective number of neutrino species
    #[serde(rename = "Neff", default = "default_n_eff")]
    pub n_eff: f64,
    /// Simpson intervals per comoving-distance integral
    #[serde(default = "default_integration_steps")]
    pub integration_steps: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// [rows, cols]
    #[serde(default = "default_shape")]
    pub shape: [usize; 2],
    /// Arc-seconds per pixel
    #[serde(default = "default_pixel_scale")]
    pub pixel_scale: f64,
    /// (y, x) centre in arc-seconds
    #[serde(default)]
    pub origin: [f64; 2],
}

fn default_name() -> String {
    "unnamed".to_string()
}
fn default_h0() -> f64 {
    67.74
}
fn default_omega_m() -> f64 {
    0.3075
}
fn default_t_cmb() -> f64 {
    2.7255
}
fn default_n_eff() -> f64 {
    3.046
}
fn default_integration_steps() -> usize {
    1000
}
fn default_shape() -> [usize; 2] {
    [100, 100]
}
fn default_pixel_scale() -> f64 {
    0.05
}

impl Default for LensConfig {
    fn default() -> Self {
        LensConfig {
            name: default_name(),
            cosmology: CosmologyConfig::default(),
            grid: GridConfig::default(),
        }
    }
}

impl Default for CosmologyConfig {
    fn default() -> Self {
        CosmologyConfig {
            h0: default_h0(),
            omega_m: default_omega_m(),
            t_cmb: default_t_cmb(),
            n_eff: default_n_eff(),
            integration_steps: default_integration_steps(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            shape: default_shape(),
            pixel_scale: default_pixel_scale(),
            origin: [0.0, 0.0],
        }
    }
}

impl CosmologyConfig {
    pub fn validate(&self) -> LensResult<()> {
        if !self.h0.is_finite() || self.h0 <= 0.0 {
            return Err(LensError::ConfigError(format!(
                "H0 must be finite and > 0, got {}",
                self.h0
            )));
        }
        if !self.omega_m.is_finite() || !(0.0..=1.0).contains(&self.omega_m) {
            return Err(LensError::ConfigError(format!(
                "Om0 must be in [0, 1], got {}",
                self.omega_m
            )));
        }
        if !self.t_cmb.is_finite() || self.t_cmb < 0.0 {
            return Err(LensError::ConfigError(format!(
                "Tcmb0 must be finite and >= 0, got {}",
                self.t_cmb
            )));
        }
        if !self.n_eff.is_finite() || self.n_eff < 0.0 {
            return Err(LensError::ConfigError(format!(
                "Neff must be finite and >= 0, got {}",
                self.n_eff
            )));
        }
        if self.integration_steps < 2 {
            return Err(LensError::ConfigError(format!(
                "integration_steps must be >= 2, got {}",
                self.integration_steps
            )));
        }
        Ok(())
    }
}

impl LensConfig {
    pub fn from_file(path: &str) -> LensResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> LensResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.cosmology.validate()?;
        Ok(config)
    }

    /// Build the default image-plane grid described by this config.
    pub fn create_grid(&self) -> LensResult<RegularGrid> {
        RegularGrid::new(
            (self.grid.shape[0], self.grid.shape[1]),
            self.grid.pixel_scale,
            (self.grid.origin[0], self.grid.origin[1]),
        )
    }
}
