// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Units
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Unit systems for lengths and masses reported by cosmological queries.

use serde::{Deserialize, Serialize};

/// Length unit: sky-plane angle or physical transverse size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitLength {
    #[default]
    Arcsec,
    Kpc,
}

/// Mass unit: dimensionless angular mass or solar masses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitMass {
    #[serde(rename = "angular")]
    Angular,
    #[default]
    #[serde(rename = "solMass")]
    SolMass,
}
