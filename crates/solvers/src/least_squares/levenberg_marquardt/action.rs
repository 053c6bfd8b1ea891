/// Actions an observer can take during a Levenberg–Marquardt search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the best point found so far.
    StopEarly,

    /// Treat this trial point as worse than the current best.
    ///
    /// The trial is rejected and the damping increased, as if its cost were
    /// higher. On a Jacobian probe the action is ignored if the evaluation
    /// succeeded; if the probe failed, its column is taken as zero. On the
    /// initial evaluation it has no effect.
    AssumeWorse,
}
