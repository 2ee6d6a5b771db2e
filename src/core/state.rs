//! Common contract for the phases of the navigation state machines.
//!
//! Both the localization gate and the route tracker expose their current
//! phase as a value implementing [`State`], which is what lets them share
//! the transition log in [`super::StateHistory`].

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A phase of one of the tick-driven state machines.
///
/// Implementations are plain enums. All methods are pure.
///
/// # Example
///
/// ```rust
/// use trailmark::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Beacon {
///     Searching,
///     Locked,
///     Lost,
/// }
///
/// impl State for Beacon {
///     fn name(&self) -> &str {
///         match self {
///             Self::Searching => "Searching",
///             Self::Locked => "Locked",
///             Self::Lost => "Lost",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Lost)
///     }
/// }
///
/// assert_eq!(Beacon::Locked.name(), "Locked");
/// assert!(Beacon::Lost.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Stable name used in logs and status reports.
    fn name(&self) -> &str;

    /// Whether the machine can never leave this phase.
    ///
    /// Defaults to `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Whether this phase represents a failure the session cannot recover from.
    ///
    /// Defaults to `false`.
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Signal {
        Acquiring,
        Fixed,
        Dropped,
    }

    impl State for Signal {
        fn name(&self) -> &str {
            match self {
                Self::Acquiring => "Acquiring",
                Self::Fixed => "Fixed",
                Self::Dropped => "Dropped",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Dropped)
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Dropped)
        }
    }

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    struct Plain;

    impl State for Plain {
        fn name(&self) -> &str {
            "Plain"
        }
    }

    #[test]
    fn defaults_are_non_terminal() {
        assert!(!Plain.is_final());
        assert!(!Plain.is_error());
    }

    #[test]
    fn overrides_mark_terminal_phases() {
        assert!(!Signal::Acquiring.is_final());
        assert!(!Signal::Fixed.is_error());
        assert!(Signal::Dropped.is_final());
        assert!(Signal::Dropped.is_error());
    }

    #[test]
    fn phase_survives_json() {
        let json = serde_json::to_string(&Signal::Fixed).unwrap();
        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Signal::Fixed);
        assert_eq!(back.name(), "Fixed");
    }
}
