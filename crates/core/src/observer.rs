/// Receives solver events and decides how the solver should proceed.
///
/// Observers let callers monitor or steer a solver without changing its API:
/// logging progress, recording every evaluated candidate, or stopping once a
/// fit is good enough.
///
/// `observe` returns `Option<A>`, where `Some(action)` requests a
/// solver-specific action and `None` lets the solver continue unchanged.
///
/// Closures implement `Observer`, and `()` is a no-op observer.
pub trait Observer<E, A> {
    /// Observes a solver event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Action {
        Stop,
    }

    fn drive<O: Observer<f64, Action>>(mut observer: O, costs: &[f64]) -> Option<usize> {
        costs
            .iter()
            .position(|cost| observer.observe(cost) == Some(Action::Stop))
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), &[3.0, 2.0, 1.0]), None);
    }

    #[test]
    fn closure_observer_can_stop() {
        let stop_below = |cost: &f64| (*cost < 1.5).then_some(Action::Stop);
        assert_eq!(drive(stop_below, &[3.0, 2.0, 1.0]), Some(2));
    }
}
