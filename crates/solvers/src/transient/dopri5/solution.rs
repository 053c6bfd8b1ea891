use phagefit_core::Snapshot;

/// The result of a Dormand–Prince integration.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    /// One snapshot per requested output time, in the requested order.
    pub history: Vec<Snapshot<I, O>>,

    /// Number of derivative evaluations across all output intervals.
    pub evaluations: u32,

    /// Number of accepted steps across all output intervals.
    pub accepted_steps: u32,

    /// Number of rejected steps across all output intervals.
    pub rejected_steps: u32,
}
