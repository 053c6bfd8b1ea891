use phagefit_core::StepIntegrable;

/// Bacterial and phage densities at every grid node.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    pub bacteria: Vec<f64>,
    pub phage: Vec<f64>,
}

/// Time derivatives of [`Fields`], node by node.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRates {
    pub bacteria: Vec<f64>,
    pub phage: Vec<f64>,
}

impl Fields {
    /// Replaces every negative or NaN density with zero.
    pub fn clamp_nonnegative(&mut self) {
        for value in self.bacteria.iter_mut().chain(self.phage.iter_mut()) {
            *value = value.max(0.0);
        }
    }

    /// Returns `[ΣN, ΣP]` over all nodes.
    #[must_use]
    pub fn totals(&self) -> [f64; 2] {
        [self.bacteria.iter().sum(), self.phage.iter().sum()]
    }
}

impl StepIntegrable<f64> for Fields {
    type Derivative = FieldRates;

    fn step(&self, rates: FieldRates, dt: f64) -> Self {
        let advance = |values: &[f64], rates: &[f64]| -> Vec<f64> {
            values.iter().zip(rates).map(|(v, dv)| v + dt * dv).collect()
        };

        Self {
            bacteria: advance(&self.bacteria, &rates.bacteria),
            phage: advance(&self.phage, &rates.phage),
        }
    }
}
