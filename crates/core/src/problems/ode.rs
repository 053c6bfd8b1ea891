use crate::{DerivativeOf, StepIntegrable};

/// Defines an initial value problem to be integrated in time.
///
/// The problem pulls the integrated state out of a model input, reads the
/// state's rate of change from the model output, and rebuilds a model input
/// once the solver has advanced the state. Any model whose input carries a
/// [`StepIntegrable`] state can be integrated this way, whether the state is a
/// handful of lumped populations or a density profile over a spatial mesh.
pub trait OdeProblem {
    type Input;
    type Output;
    type Delta;
    type State: StepIntegrable<Self::Delta>;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the integrated state from a model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be extracted.
    fn state(&self, input: &Self::Input) -> Result<Self::State, Self::Error>;

    /// Reads the state derivative from a model call.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be computed.
    fn derivative(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<DerivativeOf<Self::State, Self::Delta>, Self::Error>;

    /// Builds the model input for `state`, reached from `base` after `delta`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed.
    fn build_input(
        &self,
        base: &Self::Input,
        state: &Self::State,
        delta: &Self::Delta,
    ) -> Result<Self::Input, Self::Error>;

    /// Adjusts the input produced by an accepted step.
    ///
    /// Solvers call this once per accepted step, before the model is evaluated
    /// at the new state. Problems use it to enforce constraints the raw update
    /// does not respect, such as clamping densities at zero after an explicit
    /// step.
    ///
    /// The default implementation returns the input unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the adjustment fails.
    fn finalize_step(
        &self,
        next_input: Self::Input,
        _prev_input: &Self::Input,
        _prev_output: &Self::Output,
        _step_delta: &Self::Delta,
    ) -> Result<Self::Input, Self::Error> {
        Ok(next_input)
    }
}
