//! Measurement noise sources.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::ConfigError;

/// Produces one additive noise draw per call.
pub trait NoiseSource {
    fn sample(&mut self) -> f64;
}

impl<S: NoiseSource + ?Sized> NoiseSource for &mut S {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}

/// Zero-mean Gaussian noise drawn from a random number generator.
///
/// [`GaussianNoise::seeded`] uses [`ChaCha8Rng`], whose output is stable
/// across platforms, so a seed reproduces the same draws bit for bit.
#[derive(Debug, Clone)]
pub struct GaussianNoise<R = ChaCha8Rng> {
    rng: R,
    normal: Normal<f64>,
}

impl GaussianNoise<ChaCha8Rng> {
    /// Creates reproducible noise with standard deviation `std_dev`.
    ///
    /// # Errors
    ///
    /// Returns an error if `std_dev` is not finite and non-negative.
    pub fn seeded(std_dev: f64, seed: u64) -> Result<Self, ConfigError> {
        Self::new(std_dev, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> GaussianNoise<R> {
    /// Creates noise with standard deviation `std_dev` drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if `std_dev` is not finite and non-negative.
    pub fn new(std_dev: f64, rng: R) -> Result<Self, ConfigError> {
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(ConfigError::NoiseStd(std_dev));
        }
        let normal = Normal::new(0.0, std_dev).map_err(|_| ConfigError::NoiseStd(std_dev))?;
        Ok(Self { rng, normal })
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.normal.std_dev()
    }
}

impl<R: Rng> NoiseSource for GaussianNoise<R> {
    fn sample(&mut self) -> f64 {
        self.normal.sample(&mut self.rng)
    }
}

/// Noise that is always zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn sample(&mut self) -> f64 {
        0.0
    }
}
