//! Galaxies, lens planes and the multi-plane ray tracer.
//!
//! Profiles and galaxies: light, mass, hyper, galaxy
//! Planes and tracing: plane, tracer, slicing
//! Geometry: cosmology, lensing

pub mod cosmology;
pub mod galaxy;
pub mod hyper;
pub mod lensing;
pub mod light;
pub mod mass;
pub mod plane;
pub mod slicing;
pub mod tracer;
