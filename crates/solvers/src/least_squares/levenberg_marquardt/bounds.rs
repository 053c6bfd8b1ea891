use thiserror::Error;

/// Box constraints `lower[i] <= x[i] <= upper[i]` on the solver variables.
///
/// Infinite bounds are allowed; NaN bounds are not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<const N: usize> {
    lower: [f64; N],
    upper: [f64; N],
}

/// Errors that can occur when constructing [`Bounds`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BoundsError {
    #[error("bound {index} is NaN")]
    NotANumber { index: usize },

    #[error("lower bound {lower} exceeds upper bound {upper} at index {index}")]
    Inverted {
        index: usize,
        lower: f64,
        upper: f64,
    },
}

impl<const N: usize> Bounds<N> {
    /// Creates validated bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if any bound is NaN or any `lower[i] > upper[i]`.
    pub fn new(lower: [f64; N], upper: [f64; N]) -> Result<Self, BoundsError> {
        for (index, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if lo.is_nan() || hi.is_nan() {
                return Err(BoundsError::NotANumber { index });
            }
            if lo > hi {
                return Err(BoundsError::Inverted {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }

        Ok(Self { lower, upper })
    }

    /// Bounds that admit every finite point.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            lower: [f64::NEG_INFINITY; N],
            upper: [f64::INFINITY; N],
        }
    }

    #[must_use]
    pub fn lower(&self) -> &[f64; N] {
        &self.lower
    }

    #[must_use]
    pub fn upper(&self) -> &[f64; N] {
        &self.upper
    }

    /// Returns the index of the first component of `x` outside the bounds.
    ///
    /// NaN components are always outside.
    #[must_use]
    pub fn first_violation(&self, x: &[f64; N]) -> Option<usize> {
        (0..N).find(|&i| !(self.lower[i] <= x[i] && x[i] <= self.upper[i]))
    }

    /// Returns true if every component of `x` lies within the bounds.
    #[must_use]
    pub fn contains(&self, x: &[f64; N]) -> bool {
        self.first_violation(x).is_none()
    }

    /// Clamps each component of `x` into its bounds.
    #[must_use]
    pub fn project(&self, x: [f64; N]) -> [f64; N] {
        std::array::from_fn(|i| x[i].clamp(self.lower[i], self.upper[i]))
    }

    /// Flags the components of `x` that cannot move along the descent
    /// direction `−gradient`.
    ///
    /// A component is blocked when it sits on its lower bound with a positive
    /// gradient, on its upper bound with a negative gradient, or is pinned.
    pub(super) fn blocked(&self, x: &[f64; N], gradient: &[f64]) -> [bool; N] {
        std::array::from_fn(|i| {
            let (lower, upper) = (self.lower[i], self.upper[i]);
            lower == upper
                || (x[i] <= lower && gradient[i] > 0.0)
                || (x[i] >= upper && gradient[i] < 0.0)
        })
    }

    /// Chooses a finite-difference probe for component `index` of `x`.
    ///
    /// Steps forward by `step` when that stays in bounds, otherwise backward,
    /// otherwise as far as the roomier side allows. Returns `None` when the
    /// component is pinned (`lower == upper`).
    pub(super) fn probe(&self, x: &[f64; N], index: usize, step: f64) -> Option<[f64; N]> {
        let value = x[index];
        let (lower, upper) = (self.lower[index], self.upper[index]);
        let room_up = upper - value;
        let room_down = value - lower;

        let target = if step <= room_up {
            value + step
        } else if step <= room_down {
            value - step
        } else if room_up >= room_down {
            upper
        } else {
            lower
        };

        let target = target.clamp(lower, upper);
        if target == value {
            return None;
        }

        let mut probe = *x;
        probe[index] = target;
        Some(probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_and_nan_bounds() {
        assert_eq!(
            Bounds::new([0.0, 2.0], [1.0, 1.0]),
            Err(BoundsError::Inverted {
                index: 1,
                lower: 2.0,
                upper: 1.0
            })
        );
        assert_eq!(
            Bounds::new([f64::NAN], [1.0]),
            Err(BoundsError::NotANumber { index: 0 })
        );
    }

    #[test]
    fn projects_into_the_box() {
        let bounds = Bounds::new([0.0, 0.0], [1.0, 10.0]).unwrap();
        assert_eq!(bounds.project([-3.0, 12.0]), [0.0, 10.0]);
        assert_eq!(bounds.project([0.5, 5.0]), [0.5, 5.0]);
        assert!(bounds.contains(&[1.0, 0.0]));
        assert_eq!(bounds.first_violation(&[0.5, f64::NAN]), Some(1));
    }

    #[test]
    fn probe_flips_direction_at_the_upper_bound() {
        let bounds = Bounds::new([0.0], [1.0]).unwrap();

        assert_eq!(bounds.probe(&[0.5], 0, 0.1), Some([0.6]));
        assert_eq!(bounds.probe(&[1.0], 0, 0.1), Some([0.9]));
        assert_eq!(bounds.probe(&[0.4], 0, 2.0), Some([1.0]));
    }

    #[test]
    fn blocks_components_pushed_outward() {
        let bounds = Bounds::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]).unwrap();
        let x = [0.0, 1.0, 0.5];

        assert_eq!(bounds.blocked(&x, &[1.0, 1.0, 1.0]), [true, false, false]);
        assert_eq!(bounds.blocked(&x, &[-1.0, -1.0, -1.0]), [false, true, false]);

        let pinned = Bounds::new([2.0], [2.0]).unwrap();
        assert_eq!(pinned.blocked(&[2.0], &[0.0]), [true]);
    }

    #[test]
    fn probe_skips_pinned_components() {
        let bounds = Bounds::new([2.0], [2.0]).unwrap();
        assert_eq!(bounds.probe(&[2.0], 0, 0.1), None);
    }
}
