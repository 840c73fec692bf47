// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Speed of light (km/s)
pub const SPEED_OF_LIGHT_KMS: f64 = 299_792.458;

/// Newton's constant in kpc (km/s)² / M☉
pub const GRAVITATIONAL_CONSTANT_KPC: f64 = 4.300_917_270e-6;

/// Kiloparsecs per megaparsec
pub const KPC_PER_MPC: f64 = 1.0e3;

/// Arc-seconds per radian (180 · 3600 / π)
pub const ARCSEC_PER_RADIAN: f64 = 206_264.806_247_096_36;

/// Ω_γ h² per K⁴ of CMB temperature (photon density, Stefan–Boltzmann).
pub const PHOTON_DENSITY_COEFF: f64 = 4.481_500_52e-7;

/// Relativistic neutrino density per photon density per effective species,
/// 7/8 · (4/11)^(4/3).
pub const NEUTRINO_DENSITY_RATIO: f64 = 0.227_107_317_66;

/// Smallest radius (arcsec) used when evaluating profiles, avoiding the
/// central singularity of cusped mass profiles.
pub const RADIUS_FLOOR: f64 = 1.0e-8;
