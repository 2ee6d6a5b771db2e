//! Transition log shared by the navigation state machines.
//!
//! Machines advance on explicit ticks, so transitions are stamped with the
//! session time accumulated from tick deltas rather than wall-clock time.
//! That keeps the log deterministic under simulated time.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One recorded move between two phases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// Phase before the move
    pub from: S,
    /// Phase after the move
    pub to: S,
    /// Session time at which the move happened
    pub at: Duration,
}

/// Ordered log of transitions of one state machine.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use trailmark::core::StateHistory;
/// use trailmark::localization::LocalizationState;
///
/// let mut history = StateHistory::new();
/// history.record(
///     LocalizationState::Initializing,
///     LocalizationState::Localizing,
///     Duration::ZERO,
/// );
/// history.record(
///     LocalizationState::Localizing,
///     LocalizationState::Localized,
///     Duration::from_secs(4),
/// );
///
/// assert_eq!(history.path().len(), 3);
/// assert_eq!(history.entries_into(&LocalizationState::Localized), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Append a transition.
    pub fn record(&mut self, from: S, to: S, at: Duration) {
        self.transitions.push(StateTransition { from, to, at });
    }

    /// Phases visited in order: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// How many times the machine moved into `state`.
    pub fn entries_into(&self, state: &S) -> usize {
        self.transitions.iter().filter(|t| &t.to == state).count()
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    /// Session time spanned between the first and last recorded transition.
    pub fn span(&self) -> Option<Duration> {
        match (self.transitions.first(), self.transitions.last()) {
            (Some(first), Some(last)) => Some(last.at.saturating_sub(first.at)),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Leg {
        Idle,
        Walking,
        Done,
    }

    impl State for Leg {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Walking => "Walking",
                Self::Done => "Done",
            }
        }
    }

    #[test]
    fn empty_log_has_no_path_or_span() {
        let history: StateHistory<Leg> = StateHistory::new();
        assert!(history.path().is_empty());
        assert!(history.span().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn path_follows_recorded_order() {
        let mut history = StateHistory::new();
        history.record(Leg::Idle, Leg::Walking, Duration::from_secs(1));
        history.record(Leg::Walking, Leg::Done, Duration::from_secs(9));

        assert_eq!(history.path(), vec![&Leg::Idle, &Leg::Walking, &Leg::Done]);
        assert_eq!(history.span(), Some(Duration::from_secs(8)));
        assert_eq!(history.last().map(|t| &t.to), Some(&Leg::Done));
    }

    #[test]
    fn entries_into_counts_repeated_visits() {
        let mut history = StateHistory::new();
        history.record(Leg::Idle, Leg::Walking, Duration::ZERO);
        history.record(Leg::Walking, Leg::Idle, Duration::from_secs(2));
        history.record(Leg::Idle, Leg::Walking, Duration::from_secs(3));

        assert_eq!(history.entries_into(&Leg::Walking), 2);
        assert_eq!(history.entries_into(&Leg::Done), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let mut history = StateHistory::new();
        history.record(Leg::Idle, Leg::Walking, Duration::ZERO);
        history.clear();
        assert!(history.transitions().is_empty());
    }

    #[test]
    fn log_serializes() {
        let mut history = StateHistory::new();
        history.record(Leg::Idle, Leg::Done, Duration::from_millis(250));

        let json = serde_json::to_string(&history).unwrap();
        let back: StateHistory<Leg> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.transitions(), history.transitions());
    }
}
