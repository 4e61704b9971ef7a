//! Workflow states and the transition table.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Step of the measurement workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkflowState {
    /// Waiting for an image or for the user to start analysis.
    #[default]
    Idle,
    /// A detection request is in flight.
    Analyzing,
    /// The user is asked whether the detected box is right.
    ConfirmReference,
    /// The user is asked for the reference's physical size.
    SetReferenceSize,
    /// Calibrated; waiting for a selection gesture.
    SelectRect,
    /// A selection has been measured.
    RectDone,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Analyzing => "analyzing",
            WorkflowState::ConfirmReference => "confirm_reference",
            WorkflowState::SetReferenceSize => "set_reference_size",
            WorkflowState::SelectRect => "select_rect",
            WorkflowState::RectDone => "rect_done",
        }
    }

    /// Whether `self -> next` is an edge of the workflow.
    ///
    /// Returning to `Idle` on a new image is a reset, not an edge.
    pub fn can_transition_to(self, next: WorkflowState) -> bool {
        use WorkflowState::*;
        matches!(
            (self, next),
            (Idle, Analyzing)
                | (Analyzing, ConfirmReference)
                | (Analyzing, Idle)
                | (ConfirmReference, SetReferenceSize)
                | (SetReferenceSize, SelectRect)
                | (SelectRect, RectDone)
                | (RectDone, SelectRect)
        )
    }

    /// Whether pointer gestures may start in this state.
    pub fn accepts_gestures(self) -> bool {
        matches!(self, WorkflowState::SelectRect | WorkflowState::RectDone)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation was attempted in a state that does not allow it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot {operation} while in state '{state}'")]
pub struct StateViolation {
    pub operation: &'static str,
    pub state: WorkflowState,
}

/// The single active workflow state, changed only along table edges.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    state: WorkflowState,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Fail with a [`StateViolation`] unless the workflow is in `expected`.
    pub fn require(
        &self,
        expected: WorkflowState,
        operation: &'static str,
    ) -> Result<(), StateViolation> {
        if self.state == expected {
            Ok(())
        } else {
            Err(StateViolation {
                operation,
                state: self.state,
            })
        }
    }

    /// Move to `next`, returning the previous state.
    pub fn transition(
        &mut self,
        next: WorkflowState,
        operation: &'static str,
    ) -> Result<WorkflowState, StateViolation> {
        if !self.state.can_transition_to(next) {
            return Err(StateViolation {
                operation,
                state: self.state,
            });
        }
        let previous = self.state;
        self.state = next;
        tracing::info!("Workflow: {} -> {}", previous, next);
        Ok(previous)
    }

    /// Return to `Idle` unconditionally, returning the previous state.
    pub fn reset(&mut self) -> WorkflowState {
        let previous = self.state;
        self.state = WorkflowState::Idle;
        if previous != WorkflowState::Idle {
            tracing::info!("Workflow reset: {} -> idle", previous);
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WorkflowState::*;

    const ALL: [WorkflowState; 6] = [
        Idle,
        Analyzing,
        ConfirmReference,
        SetReferenceSize,
        SelectRect,
        RectDone,
    ];

    #[test]
    fn test_happy_path() {
        let mut workflow = Workflow::new();
        for next in [Analyzing, ConfirmReference, SetReferenceSize, SelectRect, RectDone] {
            workflow.transition(next, "advance").unwrap();
        }
        assert_eq!(workflow.state(), RectDone);
        workflow.transition(SelectRect, "draw again").unwrap();
    }

    #[test]
    fn test_edge_count() {
        let edges = ALL
            .iter()
            .flat_map(|from| ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .count();
        assert_eq!(edges, 7);
    }

    #[test]
    fn test_illegal_transition_keeps_state() {
        let mut workflow = Workflow::new();
        let err = workflow.transition(SelectRect, "select").unwrap_err();
        assert_eq!(
            err,
            StateViolation {
                operation: "select",
                state: Idle
            }
        );
        assert_eq!(workflow.state(), Idle);
        assert_eq!(err.to_string(), "Cannot select while in state 'idle'");
    }

    #[test]
    fn test_require_and_reset() {
        let mut workflow = Workflow::new();
        workflow.transition(Analyzing, "analyze").unwrap();
        assert!(workflow.require(Analyzing, "complete").is_ok());
        assert!(workflow.require(Idle, "analyze").is_err());
        assert_eq!(workflow.reset(), Analyzing);
        assert_eq!(workflow.state(), Idle);
    }

    #[test]
    fn test_gesture_states() {
        let accepting: Vec<_> = ALL.into_iter().filter(|s| s.accepts_gestures()).collect();
        assert_eq!(accepting, vec![SelectRect, RectDone]);
    }
}
