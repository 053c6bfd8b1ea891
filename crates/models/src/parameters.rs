use crate::ConfigError;

/// A parameter struct with one fixed flat ordering.
///
/// The ordering given by [`ParameterVector::NAMES`] is used everywhere a
/// parameter set meets the optimizer: packing the initial guess and bounds,
/// and unpacking each candidate back into the struct.
pub trait ParameterVector<const N: usize>: Sized {
    /// Component names in flat order.
    const NAMES: [&'static str; N];

    /// Packs the parameters in flat order.
    fn to_array(&self) -> [f64; N];

    /// Unpacks parameters from flat order.
    fn from_array(values: [f64; N]) -> Self;

    /// Unpacks parameters from a slice of exactly `N` values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Length`] if the slice length is not `N`.
    fn from_slice(values: &[f64]) -> Result<Self, ConfigError> {
        let values: [f64; N] = values.try_into().map_err(|_| ConfigError::Length {
            name: "parameter vector",
            expected: N,
            actual: values.len(),
        })?;
        Ok(Self::from_array(values))
    }
}
