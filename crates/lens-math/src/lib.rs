//! Mathematical primitives for SCPN Lens Core.

pub mod contour;
pub mod gradient;
pub mod quadrature;
