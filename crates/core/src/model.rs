/// A callable model that maps an input to an output.
///
/// Population models implement this for a single evaluation: a rate model maps
/// a state to its time derivative, and a forward simulator maps a parameter set
/// to a sampled prediction.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// A captured input/output pair from a model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> Snapshot<I, O> {
    /// Creates a new snapshot from input and output values.
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Splits the snapshot back into its input and output.
    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }
}
