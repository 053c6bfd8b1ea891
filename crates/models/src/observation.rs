//! Sampled observations and their flat layouts.

use crate::{ConfigError, noise::NoiseSource};

/// Stands in for any non-finite residual.
///
/// The optimizer sees a very poor but finite cost rather than a NaN.
pub const RESIDUAL_PENALTY: f64 = 1e100;

/// The order in which a multi-channel observation set is flattened.
///
/// The same order fixes how noise is drawn and how residuals are
/// concatenated, so a seed always perturbs the same entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Time outer, channel inner: `[c₀(t₀), c₁(t₀), …, c₀(t₁), …]`.
    TimeMajor,
    /// Channel outer, time inner: `[c₀(t₀), c₀(t₁), …, c₁(t₀), …]`.
    ChannelMajor,
}

/// Values of `C` channels observed at a sequence of times.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet<const C: usize> {
    times: Vec<f64>,
    values: Vec<[f64; C]>,
}

impl<const C: usize> ObservationSet<C> {
    /// Creates an observation set with one row of values per time.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` and `times` differ in length.
    pub fn new(times: Vec<f64>, values: Vec<[f64; C]>) -> Result<Self, ConfigError> {
        if values.len() != times.len() {
            return Err(ConfigError::Length {
                name: "observation values",
                expected: times.len(),
                actual: values.len(),
            });
        }
        Ok(Self { times, values })
    }

    /// Creates an observation set from rows already matched to `times`.
    pub(crate) fn from_rows(times: Vec<f64>, values: Vec<[f64; C]>) -> Self {
        debug_assert_eq!(times.len(), values.len());
        Self { times, values }
    }

    /// Creates an observation set whose every value is NaN.
    pub(crate) fn undefined(times: Vec<f64>) -> Self {
        let values = vec![[f64::NAN; C]; times.len()];
        Self { times, values }
    }

    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[must_use]
    pub fn values(&self) -> &[[f64; C]] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns one channel across all times.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= C`.
    #[must_use]
    pub fn channel(&self, channel: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[channel]).collect()
    }

    /// Flattens the values in the given layout.
    #[must_use]
    pub fn flatten(&self, layout: Layout) -> Vec<f64> {
        match layout {
            Layout::TimeMajor => self.values.iter().flatten().copied().collect(),
            Layout::ChannelMajor => (0..C)
                .flat_map(|c| self.values.iter().map(move |row| row[c]))
                .collect(),
        }
    }

    /// Returns a copy with one noise draw added to every value.
    ///
    /// Draws are taken in `layout` order.
    #[must_use]
    pub fn perturbed<S: NoiseSource + ?Sized>(&self, layout: Layout, noise: &mut S) -> Self {
        let mut values = self.values.clone();
        match layout {
            Layout::TimeMajor => {
                for value in values.iter_mut().flatten() {
                    *value += noise.sample();
                }
            }
            Layout::ChannelMajor => {
                for c in 0..C {
                    for row in &mut values {
                        row[c] += noise.sample();
                    }
                }
            }
        }
        Self {
            times: self.times.clone(),
            values,
        }
    }

    /// Returns `self − observed` flattened in `layout`.
    ///
    /// Non-finite entries are replaced by [`RESIDUAL_PENALTY`]. Both sets are
    /// expected to share the same times.
    #[must_use]
    pub fn misfit(&self, observed: &Self, layout: Layout) -> Vec<f64> {
        self.flatten(layout)
            .into_iter()
            .zip(observed.flatten(layout))
            .map(|(predicted, observed)| {
                let residual = predicted - observed;
                if residual.is_finite() {
                    residual
                } else {
                    RESIDUAL_PENALTY
                }
            })
            .collect()
    }
}
