use phagefit_core::Snapshot;

/// Event emitted by the Euler solver for each recorded snapshot.
///
/// Step 0 is the initial state; steps `1..=N` follow each integration step.
#[derive(Debug)]
pub struct Event<'a, I, O> {
    /// The step number.
    pub step: usize,

    /// The snapshot recorded at this step.
    pub snapshot: &'a Snapshot<I, O>,
}
