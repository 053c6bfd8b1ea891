//! Spatial and temporal discretizations.

use crate::ConfigError;

/// Ratios this close to an integer are treated as that integer.
const SNAP_TOLERANCE: f64 = 1e-9;

/// A uniform one-dimensional grid on `[0, length]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    nodes: usize,
    length: f64,
    dx: f64,
}

impl Grid {
    /// Creates a grid of `nodes` evenly spaced points spanning `length`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two nodes or if `length` is
    /// not finite and positive.
    pub fn new(nodes: usize, length: f64) -> Result<Self, ConfigError> {
        if nodes < 2 {
            return Err(ConfigError::TooFewNodes(nodes));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(ConfigError::DomainLength(length));
        }

        Ok(Self {
            nodes,
            length,
            dx: length / (nodes - 1) as f64,
        })
    }

    #[must_use]
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the node spacing.
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Returns node positions `i·dx`.
    #[must_use]
    pub fn positions(&self) -> Vec<f64> {
        (0..self.nodes).map(|i| i as f64 * self.dx).collect()
    }
}

/// A fixed time step repeated `steps` times from `t = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    dt: f64,
    steps: usize,
}

impl TimeGrid {
    /// Creates a time grid from its step size and step count.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive.
    pub fn new(dt: f64, steps: usize) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::TimeStep(dt));
        }
        Ok(Self { dt, steps })
    }

    /// Creates a time grid covering `horizon` with steps of `dt`.
    ///
    /// The step count is `⌊horizon / dt⌋`, except that a ratio within a
    /// relative `1e-9` of an integer snaps to that integer, so a horizon of
    /// `2.0` with `dt = 0.01` yields 200 steps despite rounding in the
    /// division. The step size itself is never adjusted.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive or if `horizon` is
    /// not finite and non-negative.
    pub fn from_horizon(dt: f64, horizon: f64) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::TimeStep(dt));
        }
        if !horizon.is_finite() || horizon < 0.0 {
            return Err(ConfigError::Horizon(horizon));
        }

        let ratio = horizon / dt;
        if !ratio.is_finite() {
            return Err(ConfigError::Horizon(horizon));
        }

        let nearest = ratio.round();
        let steps = if (ratio - nearest).abs() <= SNAP_TOLERANCE * nearest.max(1.0) {
            nearest
        } else {
            ratio.floor()
        };

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = steps as usize;
        Self::new(dt, steps)
    }

    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the final time `steps·dt`.
    #[must_use]
    pub fn horizon(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    /// Returns the time of every snapshot, `i·dt` for `i` in `0..=steps`.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        (0..=self.steps).map(|i| i as f64 * self.dt).collect()
    }

    /// Maps a wall-clock time to the nearest step index.
    ///
    /// Halfway cases round to the even index.
    ///
    /// # Errors
    ///
    /// Returns an error if `time` is not finite and non-negative or if it maps
    /// past the last step.
    pub fn step_index(&self, time: f64) -> Result<usize, ConfigError> {
        if !time.is_finite() || time < 0.0 {
            return Err(ConfigError::SampleTime { time });
        }

        let step = (time / self.dt).round_ties_even();
        if step > self.steps as f64 {
            return Err(ConfigError::SampleBeyondHorizon {
                time,
                step,
                last: self.steps,
            });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let step = step as usize;
        Ok(step)
    }
}

/// Returns `count` evenly spaced values from `start` to `end` inclusive.
///
/// The last value is exactly `end`. A count of one yields `[start]`.
#[must_use]
pub fn evenly_spaced(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn grid_spacing_spans_the_domain() {
        let grid = Grid::new(5, 2.0).unwrap();

        assert_relative_eq!(grid.dx(), 0.5);
        assert_eq!(grid.positions(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn grid_rejects_degenerate_inputs() {
        assert_eq!(Grid::new(1, 1.0), Err(ConfigError::TooFewNodes(1)));
        assert!(matches!(Grid::new(10, 0.0), Err(ConfigError::DomainLength(_))));
        assert!(matches!(Grid::new(10, f64::NAN), Err(ConfigError::DomainLength(_))));
    }

    #[test]
    fn horizon_snaps_to_nearby_integer_step_counts() {
        assert_eq!(TimeGrid::from_horizon(0.01, 2.0).unwrap().steps(), 200);
        assert_eq!(TimeGrid::from_horizon(1e-4, 1.0).unwrap().steps(), 10_000);
        assert_eq!(TimeGrid::from_horizon(0.3, 1.0).unwrap().steps(), 3);
        assert_eq!(TimeGrid::from_horizon(0.5, 0.0).unwrap().steps(), 0);
    }

    #[test]
    fn time_grid_rejects_bad_steps() {
        assert!(matches!(TimeGrid::new(0.0, 10), Err(ConfigError::TimeStep(_))));
        assert!(matches!(TimeGrid::new(-0.1, 10), Err(ConfigError::TimeStep(_))));
        assert!(matches!(
            TimeGrid::from_horizon(0.1, f64::INFINITY),
            Err(ConfigError::Horizon(_))
        ));
    }

    #[test]
    fn step_index_rounds_half_to_even() {
        let time_grid = TimeGrid::new(1.0, 10).unwrap();

        assert_eq!(time_grid.step_index(2.5), Ok(2));
        assert_eq!(time_grid.step_index(3.5), Ok(4));
        assert_eq!(time_grid.step_index(10.0), Ok(10));
        assert!(matches!(
            time_grid.step_index(10.6),
            Err(ConfigError::SampleBeyondHorizon { last: 10, .. })
        ));
        assert!(matches!(
            time_grid.step_index(-1.0),
            Err(ConfigError::SampleTime { .. })
        ));
    }

    #[test]
    fn evenly_spaced_includes_both_ends() {
        let times = evenly_spaced(0.0, 2.0, 5);
        assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(evenly_spaced(0.0, 10.0, 20).last(), Some(&10.0));
        assert!(evenly_spaced(0.0, 1.0, 0).is_empty());
    }
}
