//! Per-attempt state machine
//!
//! `Idle -> Validating -> (Idle | Busy) -> (Done | Idle)`. Transitions happen
//! on button presses and on task completions.

use std::fmt;

/// Long-running operation the workflow can be busy with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Recognition,
    Translation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating(Operation),
    Busy(Operation),
    Done(Operation),
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Busy(_))
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: Phase) -> bool {
        match (self, next) {
            (Phase::Idle | Phase::Done(_), Phase::Validating(_)) => true,
            (Phase::Validating(_), Phase::Idle) => true,
            (Phase::Validating(a), Phase::Busy(b)) => *a == b,
            (Phase::Busy(a), Phase::Done(b)) => *a == b,
            (Phase::Busy(_), Phase::Idle) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Validating(op) => write!(f, "Validating({:?})", op),
            Phase::Busy(op) => write!(f, "Busy({:?})", op),
            Phase::Done(op) => write!(f, "Done({:?})", op),
        }
    }
}
