use nalgebra::{DMatrix, DVector};

/// Diagonal scaling floor, so zero columns still receive some damping.
const MIN_SCALE: f64 = 1e-12;

/// The Gauss–Newton normal equations `JᵀJ δ = −Jᵀr` at one point.
pub(super) struct NormalEquations {
    jtj: DMatrix<f64>,
    gradient: DVector<f64>,
}

impl NormalEquations {
    pub(super) fn new(jacobian: &DMatrix<f64>, residuals: &[f64]) -> Self {
        let residuals = DVector::from_column_slice(residuals);
        Self {
            jtj: jacobian.tr_mul(jacobian),
            gradient: jacobian.tr_mul(&residuals),
        }
    }

    /// The gradient `Jᵀr`, one entry per component.
    pub(super) fn gradient(&self) -> &[f64] {
        self.gradient.as_slice()
    }

    /// Holds the flagged components fixed.
    ///
    /// Their rows and columns of `JᵀJ` are replaced by the identity and their
    /// gradient entries by zero, so the damped step leaves them in place and
    /// [`gradient_norm`](Self::gradient_norm) measures only the free ones.
    pub(super) fn freeze(&mut self, frozen: &[bool]) {
        for (i, _) in frozen.iter().enumerate().filter(|(_, frozen)| **frozen) {
            self.jtj.fill_row(i, 0.0);
            self.jtj.fill_column(i, 0.0);
            self.jtj[(i, i)] = 1.0;
            self.gradient[i] = 0.0;
        }
    }

    /// Infinity norm of `Jᵀr` over the components that are not frozen.
    pub(super) fn gradient_norm(&self) -> f64 {
        self.gradient.iter().fold(0.0, |max, g| max.max(g.abs()))
    }

    /// Solves `(JᵀJ + λ·diag(JᵀJ)) δ = −Jᵀr` for the damped step.
    ///
    /// Returns `None` if the damped matrix is not positive definite or the
    /// step is not finite.
    pub(super) fn damped_step<const N: usize>(&self, damping: f64) -> Option<[f64; N]> {
        let mut lhs = self.jtj.clone();
        for i in 0..N {
            lhs[(i, i)] += damping * self.jtj[(i, i)].abs().max(MIN_SCALE);
        }

        let step = lhs.cholesky()?.solve(&(-self.gradient.clone()));
        step.iter()
            .all(|v| v.is_finite())
            .then(|| std::array::from_fn(|i| step[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn undamped_step_solves_linear_least_squares() {
        // r(x) = J x - b with x = 0, so r = -b.
        let jacobian = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let b = [1.0, 2.0, 3.0];
        let residuals: Vec<f64> = b.iter().map(|v| -v).collect();

        let normal = NormalEquations::new(&jacobian, &residuals);
        let step: [f64; 2] = normal.damped_step(0.0).expect("positive definite");

        assert_relative_eq!(step[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(step[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn damping_shortens_the_step() {
        let jacobian = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 1.0]);
        let normal = NormalEquations::new(&jacobian, &[-2.0, -1.0]);

        let short: [f64; 2] = normal.damped_step(1.0).unwrap();
        let long: [f64; 2] = normal.damped_step(0.0).unwrap();

        assert_relative_eq!(long[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(short[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(normal.gradient_norm(), 4.0);
    }

    #[test]
    fn frozen_components_do_not_move() {
        // JᵀJ = [[1, 1], [1, 2]] and Jᵀr = [−1, −2].
        let jacobian = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.0, 1.0]);
        let mut normal = NormalEquations::new(&jacobian, &[-1.0, -1.0]);
        assert_eq!(normal.gradient(), &[-1.0, -2.0]);

        normal.freeze(&[true, false]);
        let step: [f64; 2] = normal.damped_step(0.0).unwrap();

        assert_eq!(step[0], 0.0);
        assert_relative_eq!(step[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(normal.gradient_norm(), 2.0);
    }
}
