//! Hyper-galaxy noise scaling.
//!
//! A hyper galaxy boosts the noise map where a galaxy dominates the model
//! image, down-weighting pixels the model fits poorly.

use lens_types::error::{LensError, LensResult};
use ndarray::Array1;

#[derive(Debug, Clone, PartialEq)]
pub struct HyperGalaxy {
    /// Regularises the ratio where the model image is faint
    pub contribution_factor: f64,
    pub noise_factor: f64,
    pub noise_power: f64,
}

impl Default for HyperGalaxy {
    fn default() -> Self {
        HyperGalaxy {
            contribution_factor: 0.0,
            noise_factor: 0.0,
            noise_power: 1.0,
        }
    }
}

impl HyperGalaxy {
    pub fn new(contribution_factor: f64, noise_factor: f64, noise_power: f64) -> Self {
        HyperGalaxy {
            contribution_factor,
            noise_factor,
            noise_power,
        }
    }

    /// galaxy / (model + contribution_factor), normalised to a maximum of 1.
    /// An all-zero ratio is returned unnormalised.
    pub fn contribution_map_from_hyper_images(
        &self,
        hyper_model_image: &Array1<f64>,
        hyper_galaxy_image: &Array1<f64>,
    ) -> LensResult<Array1<f64>> {
        check_lengths(hyper_model_image, hyper_galaxy_image)?;
        let mut contribution = hyper_galaxy_image / &(hyper_model_image + self.contribution_factor);
        let max = contribution.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 {
            contribution /= max;
        }
        Ok(contribution)
    }

    /// noise_factor · (noise · contribution)^noise_power
    pub fn hyper_noise_map_from_contribution_map(
        &self,
        noise_map: &Array1<f64>,
        contribution_map: &Array1<f64>,
    ) -> LensResult<Array1<f64>> {
        check_lengths(noise_map, contribution_map)?;
        let scaled = noise_map * contribution_map;
        Ok(scaled.mapv(|v| self.noise_factor * v.powf(self.noise_power)))
    }
}

fn check_lengths(a: &Array1<f64>, b: &Array1<f64>) -> LensResult<()> {
    if a.len() != b.len() {
        return Err(LensError::GridShapeMismatch {
            expected: (a.len(), 1),
            found: (b.len(), 1),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_contribution_map_normalised() {
        let hyper = HyperGalaxy::new(1.0, 0.0, 1.0);
        let model = arr1(&[1.0, 1.0, 3.0]);
        let galaxy = arr1(&[0.5, 1.0, 2.0]);
        let contribution = hyper.contribution_map_from_hyper_images(&model, &galaxy).unwrap();
        // Ratios 0.25, 0.5, 0.5 → normalised by 0.5
        assert!((contribution[0] - 0.5).abs() < 1e-12);
        assert!((contribution[1] - 1.0).abs() < 1e-12);
        assert!((contribution[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_contribution_map_all_zero() {
        let hyper = HyperGalaxy::new(1.0, 0.0, 1.0);
        let zeros = Array1::zeros(4);
        let contribution = hyper.contribution_map_from_hyper_images(&zeros, &zeros).unwrap();
        assert!(contribution.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_hyper_noise_map() {
        let hyper = HyperGalaxy::new(0.0, 2.0, 2.0);
        let noise = arr1(&[1.0, 2.0, 3.0]);
        let contribution = arr1(&[1.0, 0.5, 0.0]);
        let map = hyper.hyper_noise_map_from_contribution_map(&noise, &contribution).unwrap();
        assert_eq!(map.to_vec(), vec![2.0, 2.0, 0.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let hyper = HyperGalaxy::default();
        let a = Array1::zeros(3);
        let b = Array1::zeros(2);
        assert!(hyper.contribution_map_from_hyper_images(&a, &b).is_err());
        assert!(hyper.hyper_noise_map_from_contribution_map(&a, &b).is_err());
    }
}
